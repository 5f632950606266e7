// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Constructing instants from calendar components.
//!
//! This is the inverse of decomposition: user-supplied wall-clock fields
//! plus an offset source (explicit, UTC, or environment-derived) become an
//! epoch millisecond count. Unlike decomposition the mapping is not always
//! unique — a wall-clock time inside a DST fall-back hour exists twice and
//! one inside a spring-forward gap not at all — so the caller passes a
//! [`DstHint`] to disambiguate.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::OffsetComponents;

use crate::error::{Result, TimeError};
use crate::instant::Instant;
use crate::zone::Zone;

/// User-supplied wall-clock calendar components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Components {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Optional sub-second part; truncated to millisecond granularity.
    pub nanosecond: Option<u32>,
}

impl Components {
    /// Whole-second components, no sub-second part.
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond: None,
        }
    }
}

/// Caller's claim about whether the components describe a DST wall-clock.
///
/// Only consulted when the same local time maps to two instants (DST
/// fall-back); [`DstHint::Unknown`] picks the earlier of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstHint {
    /// No claim (the `-1` of the classic interface).
    Unknown,
    /// Standard time (`0`).
    Standard,
    /// Daylight-saving time (`1`).
    Daylight,
}

impl DstHint {
    /// Map the classic `-1 / 0 / 1` integer flag.
    pub const fn from_flag(flag: i32) -> Self {
        match flag {
            0 => DstHint::Standard,
            f if f > 0 => DstHint::Daylight,
            _ => DstHint::Unknown,
        }
    }
}

impl Instant {
    /// Build an instant from calendar components and an offset source.
    ///
    /// Exactly one offset source applies:
    /// - `utc_offset_seconds: Some(off)` — the components are wall-clock in
    ///   a fixed zone at that offset;
    /// - `from_utc: true` — the components are UTC;
    /// - neither — the components are wall-clock in the environment-derived
    ///   zone ([`Zone::from_env`]), with `hint` disambiguating DST overlaps
    ///   (see [`Instant::from_local`]).
    ///
    /// Supplying `from_utc` *and* an explicit offset is contradictory and
    /// fails with [`TimeError::UnsupportedConfiguration`].
    pub fn from_components(
        components: &Components,
        hint: DstHint,
        from_utc: bool,
        utc_offset_seconds: Option<i32>,
    ) -> Result<Self> {
        match (from_utc, utc_offset_seconds) {
            (true, Some(offset)) => Err(TimeError::UnsupportedConfiguration(format!(
                "from_utc combined with explicit offset {offset}"
            ))),
            (false, Some(offset)) => {
                Self::from_local(components, hint, Zone::fixed_from_seconds(offset)?)
            }
            (true, None) => Self::from_local(components, hint, Zone::utc()),
            (false, None) => Self::from_local(components, hint, Zone::from_env()),
        }
    }

    /// Map wall-clock components through an explicit zone.
    ///
    /// For named zones the local time is resolved against the zone's DST
    /// rules: unambiguous times map directly, fall-back overlaps are decided
    /// by `hint`, and spring-forward gaps resolve through the
    /// post-transition offset (the conventional "shift forward by the gap"
    /// behavior).
    pub fn from_local(components: &Components, hint: DstHint, zone: Zone) -> Result<Self> {
        let nanos = components.nanosecond.unwrap_or(0);
        if nanos >= 1_000_000_000 {
            return Err(TimeError::Domain("nanoseconds out of [0, 1e9)"));
        }

        let naive = NaiveDate::from_ymd_opt(components.year, components.month, components.day)
            .ok_or(TimeError::Domain("impossible calendar date"))?
            .and_hms_opt(components.hour, components.minute, components.second)
            .ok_or(TimeError::Domain("impossible wall-clock time"))?;

        let whole_millis = match zone {
            Zone::Fixed(offset) => naive
                .and_utc()
                .timestamp_millis()
                .checked_sub(i64::from(offset.local_minus_utc()) * 1_000)
                .ok_or(TimeError::Overflow)?,
            Zone::Named(tz) => resolve_local(&naive, tz, hint, &zone)?,
        };

        let millis = whole_millis
            .checked_add(i64::from(nanos) / 1_000_000)
            .ok_or(TimeError::Overflow)?;
        Ok(Instant::from_epoch_millis(millis, zone))
    }

    /// UTC fast path: `seconds * 1000 + nanos / 1_000_000`, with checked
    /// arithmetic — an out-of-range result is an explicit
    /// [`TimeError::Overflow`], never a silent wrap.
    pub fn from_utc_parts(seconds: i64, nanos: i64) -> Result<Self> {
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(TimeError::Domain("nanoseconds out of [0, 1e9)"));
        }
        let millis = seconds
            .checked_mul(1_000)
            .and_then(|ms| ms.checked_add(nanos / 1_000_000))
            .ok_or(TimeError::Overflow)?;
        Ok(Instant::from_epoch_millis(millis, Zone::utc()))
    }
}

fn resolve_local(
    naive: &NaiveDateTime,
    tz: chrono_tz::Tz,
    hint: DstHint,
    zone: &Zone,
) -> Result<i64> {
    use chrono::{MappedLocalTime, TimeZone};

    match tz.from_local_datetime(naive) {
        MappedLocalTime::Single(dt) => Ok(dt.timestamp_millis()),
        MappedLocalTime::Ambiguous(earliest, latest) => {
            Ok(pick_ambiguous(earliest, latest, hint).timestamp_millis())
        }
        MappedLocalTime::None => {
            // Spring-forward gap: interpret through the offset in effect at
            // the nominal instant, which lands just past the transition.
            let nominal = naive.and_utc().timestamp_millis();
            let offset = zone.offset_millis_at(nominal)?;
            nominal.checked_sub(offset).ok_or(TimeError::Overflow)
        }
    }
}

fn pick_ambiguous(
    earliest: DateTime<chrono_tz::Tz>,
    latest: DateTime<chrono_tz::Tz>,
    hint: DstHint,
) -> DateTime<chrono_tz::Tz> {
    let earliest_is_dst = earliest.offset().dst_offset().num_seconds() != 0;
    let latest_is_dst = latest.offset().dst_offset().num_seconds() != 0;
    match hint {
        DstHint::Unknown => earliest,
        DstHint::Daylight if earliest_is_dst => earliest,
        DstHint::Daylight if latest_is_dst => latest,
        DstHint::Standard if !earliest_is_dst => earliest,
        DstHint::Standard if !latest_is_dst => latest,
        // Neither sibling matches the claim; keep the earlier one.
        _ => earliest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Fields;

    #[test]
    fn explicit_offset_builds_a_fixed_zone_instant() {
        // 1970-01-01T09:30:00+09:30 is the epoch.
        let c = Components::new(1970, 1, 1, 9, 30, 0);
        let t = Instant::from_components(&c, DstHint::Unknown, false, Some(34_200)).unwrap();
        assert_eq!(t.epoch_millis(), 0);
        assert_eq!(t.utc_offset_seconds().unwrap(), 34_200);
    }

    #[test]
    fn utc_construction_is_supported() {
        let c = Components::new(2021, 7, 1, 12, 0, 0);
        let t = Instant::from_components(&c, DstHint::Unknown, true, None).unwrap();
        assert_eq!(t.epoch_millis(), 1_625_140_800_000);
        assert_eq!(t.zone(), Zone::utc());
    }

    #[test]
    fn contradictory_offset_sources_are_rejected() {
        let c = Components::new(2021, 7, 1, 12, 0, 0);
        assert!(matches!(
            Instant::from_components(&c, DstHint::Unknown, true, Some(3_600)),
            Err(TimeError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn impossible_dates_are_domain_errors() {
        for (y, mo, d, h, mi, s) in [
            (2021, 13, 1, 0, 0, 0),
            (2021, 2, 30, 0, 0, 0),
            (2021, 0, 1, 0, 0, 0),
            (2021, 1, 1, 24, 0, 0),
            (2021, 1, 1, 0, 60, 0),
        ] {
            let c = Components::new(y, mo, d, h, mi, s);
            assert!(
                matches!(
                    Instant::from_components(&c, DstHint::Unknown, true, None),
                    Err(TimeError::Domain(_))
                ),
                "expected {y}-{mo}-{d}T{h}:{mi}:{s} to be rejected"
            );
        }
    }

    #[test]
    fn nanoseconds_contribute_at_millisecond_granularity() {
        let mut c = Components::new(2021, 7, 1, 12, 0, 0);
        c.nanosecond = Some(123_456_789);
        let t = Instant::from_components(&c, DstHint::Unknown, true, None).unwrap();
        assert_eq!(t.epoch_millis(), 1_625_140_800_123);

        c.nanosecond = Some(1_000_000_000);
        assert!(matches!(
            Instant::from_components(&c, DstHint::Unknown, true, None),
            Err(TimeError::Domain(_))
        ));
    }

    #[test]
    fn ambiguous_fall_back_hour_obeys_the_hint() {
        // America/New_York 2021-11-07 01:30:00 exists twice:
        // once as EDT (05:30Z) and once as EST (06:30Z).
        let zone = Zone::resolve(Some("America/New_York")).unwrap();
        let c = Components::new(2021, 11, 7, 1, 30, 0);

        let daylight = Instant::from_local(&c, DstHint::Daylight, zone).unwrap();
        assert_eq!(daylight.epoch_millis(), 1_636_263_000_000);

        let standard = Instant::from_local(&c, DstHint::Standard, zone).unwrap();
        assert_eq!(standard.epoch_millis(), 1_636_266_600_000);

        // Unknown picks the earlier sibling.
        let unknown = Instant::from_local(&c, DstHint::Unknown, zone).unwrap();
        assert_eq!(unknown.epoch_millis(), daylight.epoch_millis());
    }

    #[test]
    fn spring_forward_gap_lands_after_the_transition() {
        // America/New_York 2021-03-14 02:30:00 does not exist; it resolves
        // to 03:30 EDT.
        let zone = Zone::resolve(Some("America/New_York")).unwrap();
        let c = Components::new(2021, 3, 14, 2, 30, 0);
        let t = Instant::from_local(&c, DstHint::Unknown, zone).unwrap();
        assert_eq!(t.epoch_millis(), 1_615_707_000_000);

        let fields = Fields::decompose(&t, None).unwrap();
        assert_eq!((fields.hour, fields.minute), (3, 30));
        assert!(fields.is_dst);
    }

    #[test]
    fn unambiguous_named_zone_times_map_directly() {
        let zone = Zone::resolve(Some("America/New_York")).unwrap();
        let c = Components::new(2021, 7, 1, 8, 0, 0);
        let t = Instant::from_local(&c, DstHint::Unknown, zone).unwrap();
        assert_eq!(t.epoch_millis(), 1_625_140_800_000); // 12:00Z
    }

    #[test]
    fn decompose_then_recompose_round_trips() {
        let zone = Zone::resolve(Some("+0930")).unwrap();
        let original = Instant::from_epoch_millis(1_625_140_800_000, zone);
        let fields = Fields::decompose(&original, None).unwrap();

        let c = Components::new(
            fields.year,
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
            fields.second,
        );
        let rebuilt =
            Instant::from_components(&c, DstHint::Unknown, false, Some(fields.utc_offset_seconds))
                .unwrap();
        assert_eq!(rebuilt.epoch_millis(), original.epoch_millis());
    }

    #[test]
    fn utc_parts_fast_path_and_overflow() {
        let t = Instant::from_utc_parts(1, 500_000_000).unwrap();
        assert_eq!(t.epoch_millis(), 1_500);

        let t = Instant::from_utc_parts(-1, 0).unwrap();
        assert_eq!(t.epoch_millis(), -1_000);

        assert_eq!(
            Instant::from_utc_parts(i64::MAX / 500, 0),
            Err(TimeError::Overflow)
        );
        assert!(matches!(
            Instant::from_utc_parts(0, -1),
            Err(TimeError::Domain(_))
        ));
    }

    #[test]
    fn dst_hint_flag_mapping() {
        assert_eq!(DstHint::from_flag(-1), DstHint::Unknown);
        assert_eq!(DstHint::from_flag(0), DstHint::Standard);
        assert_eq!(DstHint::from_flag(1), DstHint::Daylight);
    }
}
