// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timezone resolution.
//!
//! A [`Zone`] is always a *resolved* zone: either a fixed UTC offset or an
//! IANA named zone whose offset may vary with DST. Resolution starts from an
//! environment-style descriptor (the value of `TZ`, possibly absent), and is
//! deliberately lenient at the boundary — historical `TZ` values are often
//! garbage, so [`Zone::resolve_lenient`] degrades to UTC instead of aborting.
//!
//! Apart from [`Zone::system_default`] and [`Zone::from_env`] every function
//! here is pure: the same descriptor always resolves to the same zone, so
//! results are safe to cache per descriptor string.

use chrono::{FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::{Result, TimeError};

/// A resolved timezone: a fixed UTC offset or a DST-aware named zone.
///
/// # Examples
///
/// ```
/// use walltime::Zone;
///
/// let fixed = Zone::resolve(Some("+0930")).unwrap();
/// assert_eq!(fixed.offset_millis_at(0).unwrap(), 34_200_000);
/// assert!(!fixed.is_dst_at(0));
///
/// let named = Zone::resolve(Some("Europe/Madrid")).unwrap();
/// assert_eq!(named.offset_millis_at(0).unwrap(), 3_600_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Fixed offset from UTC, never subject to DST.
    Fixed(FixedOffset),
    /// IANA named zone; the effective offset depends on the instant.
    Named(Tz),
}

impl Zone {
    /// The UTC zone.
    #[inline]
    pub fn utc() -> Self {
        Zone::Named(Tz::UTC)
    }

    /// Resolve an environment-style descriptor into a zone.
    ///
    /// - absent, empty, or blank → [`Zone::system_default`] (never fails);
    /// - a recognized IANA name (`"Europe/Madrid"`, `"UTC"`) → named zone;
    /// - a numeric offset (`"+0930"`, `"-05"`, `"+09:30"`) → fixed zone;
    /// - anything else → [`TimeError::InvalidZoneDescriptor`].
    pub fn resolve(descriptor: Option<&str>) -> Result<Self> {
        let desc = match descriptor {
            Some(d) if !d.trim().is_empty() => d.trim(),
            _ => return Ok(Self::system_default()),
        };

        if let Some(offset) = parse_numeric_offset(desc) {
            return Ok(Zone::Fixed(offset));
        }
        desc.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| TimeError::InvalidZoneDescriptor(desc.to_owned()))
    }

    /// Like [`Zone::resolve`], but degrades to UTC on an unrecognized
    /// descriptor instead of failing.
    ///
    /// This is the caller-level fallback for malformed `TZ` values; the
    /// degradation is logged at `warn` level.
    pub fn resolve_lenient(descriptor: Option<&str>) -> Self {
        match Self::resolve(descriptor) {
            Ok(zone) => zone,
            Err(err) => {
                log::warn!("{err}; falling back to UTC");
                Zone::utc()
            }
        }
    }

    /// The process's default zone, discovered via the platform's IANA
    /// zone database. Falls back to UTC when discovery or parsing fails.
    pub fn system_default() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => Zone::Named(tz),
                Err(_) => {
                    log::debug!("unrecognized system timezone {name:?}; using UTC");
                    Zone::utc()
                }
            },
            Err(err) => {
                log::debug!("system timezone lookup failed: {err}; using UTC");
                Zone::utc()
            }
        }
    }

    /// Resolve from the `TZ` environment variable.
    ///
    /// This is the single environment read in the crate; everything else
    /// takes descriptors as explicit arguments so tests can vary them
    /// deterministically.
    pub fn from_env() -> Self {
        Self::resolve_lenient(std::env::var("TZ").ok().as_deref())
    }

    /// Build a fixed-offset zone from an offset in whole seconds.
    pub fn fixed_from_seconds(offset_seconds: i32) -> Result<Self> {
        FixedOffset::east_opt(offset_seconds)
            .map(Zone::Fixed)
            .ok_or(TimeError::Domain("utc offset out of range"))
    }

    /// Effective UTC offset, in milliseconds, at the given instant.
    ///
    /// DST-aware for named zones. Fails with [`TimeError::Overflow`] when
    /// the instant is outside the representable calendar range.
    pub fn offset_millis_at(&self, epoch_millis: i64) -> Result<i64> {
        match self {
            Zone::Fixed(offset) => Ok(i64::from(offset.local_minus_utc()) * 1_000),
            Zone::Named(tz) => {
                let utc = Utc
                    .timestamp_millis_opt(epoch_millis)
                    .single()
                    .ok_or(TimeError::Overflow)?;
                let offset = utc.with_timezone(tz).offset().fix();
                Ok(i64::from(offset.local_minus_utc()) * 1_000)
            }
        }
    }

    /// Whether DST is in effect at the given instant.
    ///
    /// `true` iff the effective offset carries a non-zero DST component.
    /// Fixed-offset zones carry no DST information and always report
    /// `false`, as does any instant outside the calendar range.
    pub fn is_dst_at(&self, epoch_millis: i64) -> bool {
        match self {
            Zone::Fixed(_) => false,
            Zone::Named(tz) => Utc
                .timestamp_millis_opt(epoch_millis)
                .single()
                .map(|utc| utc.with_timezone(tz).offset().dst_offset().num_seconds() != 0)
                .unwrap_or(false),
        }
    }

    /// Zone label at the given instant, e.g. `"CET"` or `"UTC"`.
    ///
    /// Returns `None` when the label is a raw signed numeric offset rather
    /// than an abbreviation — fixed-offset zones therefore never have a
    /// label, and neither do named zones whose tzdata abbreviation is
    /// numeric (`"+07"`).
    pub fn label_at(&self, epoch_millis: i64) -> Option<String> {
        let label = match self {
            Zone::Fixed(offset) => format_offset(offset.local_minus_utc(), false),
            Zone::Named(tz) => {
                let utc = Utc.timestamp_millis_opt(epoch_millis).single()?;
                utc.with_timezone(tz).offset().to_string()
            }
        };
        if looks_like_numeric_offset(&label) {
            None
        } else {
            Some(label)
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Fixed(offset) => f.write_str(&format_offset(offset.local_minus_utc(), true)),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Format an offset in seconds as `±HHMM` (or `±HH:MM` with `colon`).
pub(crate) fn format_offset(offset_seconds: i32, colon: bool) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.unsigned_abs();
    let (hours, minutes) = (abs / 3_600, (abs % 3_600) / 60);
    if colon {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}")
    }
}

/// Does the label end in a signed run of digits (`"+07"`, `"UTC-3"`, `"-0330"`)?
fn looks_like_numeric_offset(label: &str) -> bool {
    let bytes = label.as_bytes();
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1].is_ascii_digit() {
        i -= 1;
    }
    i < bytes.len() && i > 0 && matches!(bytes[i - 1], b'+' | b'-')
}

/// Parse the numeric offset grammar: `±HH`, `±HHMM`, `±HH:MM`.
fn parse_numeric_offset(descriptor: &str) -> Option<FixedOffset> {
    let bytes = descriptor.as_bytes();
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = &descriptor[1..];
    let well_formed = digits
        .bytes()
        .enumerate()
        .all(|(i, b)| b.is_ascii_digit() || (i == 2 && b == b':'));
    if !well_formed {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        5 if digits.as_bytes()[2] == b':' => (
            digits[..2].parse::<i32>().ok()?,
            digits[3..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}
