// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar decomposition of an instant into local wall-clock fields.

use chrono::{DateTime, Datelike, Timelike};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeError};
use crate::instant::Instant;
use crate::zone::Zone;

/// Local calendar fields of an [`Instant`] in its effective zone.
///
/// Output-only value: decomposition produces it, nothing consumes it back
/// except [`Instant::from_components`](crate::Instant::from_components)
/// round trips driven by the caller.
///
/// `weekday` uses the `0 = Sunday` convention; `year_day` is 1-based.
/// `zone_label` is absent when the zone has no abbreviation beyond a raw
/// numeric offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fields {
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
    pub year_day: u32,
    pub is_dst: bool,
    pub zone_label: Option<String>,
    /// Effective UTC offset at the instant, in seconds. Carried alongside
    /// the nine calendar fields because rendering (`%z`) needs it.
    pub utc_offset_seconds: i32,
}

impl Fields {
    /// Decompose `instant` into local calendar fields.
    ///
    /// `env_tz` is the environment `TZ` descriptor threaded through as
    /// explicit context: when `Some`, it is re-resolved on every call and
    /// overrides the instant's stored zone, so a caller that changes the
    /// environment between calls observes the change. When `None`, the
    /// stored zone is used as-is.
    ///
    /// The DST flag is computed from the zone's offset components for named
    /// zones; fixed-offset zones carry no DST information and always report
    /// `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use walltime::{Fields, Instant, Zone};
    ///
    /// let epoch = Instant::from_epoch_millis(0, Zone::utc());
    /// let fields = Fields::decompose(&epoch, None).unwrap();
    /// assert_eq!((fields.year, fields.month, fields.day), (1970, 1, 1));
    /// assert_eq!(fields.weekday, 4); // Thursday
    /// assert_eq!(fields.zone_label.as_deref(), Some("UTC"));
    /// ```
    pub fn decompose(instant: &Instant, env_tz: Option<&str>) -> Result<Self> {
        let zone = match env_tz {
            Some(descriptor) => Zone::resolve(Some(descriptor))?,
            None => instant.zone(),
        };
        Self::in_zone(instant.epoch_millis(), &zone)
    }

    fn in_zone(epoch_millis: i64, zone: &Zone) -> Result<Self> {
        let offset_millis = zone.offset_millis_at(epoch_millis)?;
        let local_millis = epoch_millis
            .checked_add(offset_millis)
            .ok_or(TimeError::Overflow)?;
        // Shifting by the offset first lets plain UTC calendar math produce
        // the local fields.
        let local = DateTime::from_timestamp_millis(local_millis)
            .ok_or(TimeError::Overflow)?
            .naive_utc();

        Ok(Self {
            second: local.second(),
            minute: local.minute(),
            hour: local.hour(),
            day: local.day(),
            month: local.month(),
            year: local.year(),
            weekday: local.weekday().num_days_from_sunday(),
            year_day: local.ordinal(),
            is_dst: zone.is_dst_at(epoch_millis),
            zone_label: zone.label_at(epoch_millis),
            utc_offset_seconds: (offset_millis / 1_000) as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_decomposes_to_1970_in_utc() {
        let epoch = Instant::from_epoch_millis(0, Zone::utc());
        let fields = Fields::decompose(&epoch, None).unwrap();
        assert_eq!(fields.second, 0);
        assert_eq!(fields.minute, 0);
        assert_eq!(fields.hour, 0);
        assert_eq!(fields.day, 1);
        assert_eq!(fields.month, 1);
        assert_eq!(fields.year, 1970);
        assert_eq!(fields.weekday, 4); // 1970-01-01 was a Thursday
        assert_eq!(fields.year_day, 1);
        assert!(!fields.is_dst);
        assert_eq!(fields.zone_label.as_deref(), Some("UTC"));
        assert_eq!(fields.utc_offset_seconds, 0);
    }

    #[test]
    fn fixed_offset_shifts_the_wall_clock() {
        let zone = Zone::resolve(Some("+0930")).unwrap();
        let t = Instant::from_epoch_millis(0, zone);
        let fields = Fields::decompose(&t, None).unwrap();
        assert_eq!(fields.hour, 9);
        assert_eq!(fields.minute, 30);
        assert_eq!(fields.day, 1);
        assert!(!fields.is_dst);
        assert_eq!(fields.zone_label, None);
        assert_eq!(fields.utc_offset_seconds, 34_200);
    }

    #[test]
    fn negative_offset_crosses_the_date_line_backwards() {
        let zone = Zone::resolve(Some("-05")).unwrap();
        let t = Instant::from_epoch_millis(0, zone);
        let fields = Fields::decompose(&t, None).unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (1969, 12, 31));
        assert_eq!(fields.hour, 19);
        assert_eq!(fields.weekday, 3); // Wednesday
        assert_eq!(fields.year_day, 365);
    }

    #[test]
    fn env_descriptor_overrides_the_stored_zone() {
        let t = Instant::from_epoch_millis(0, Zone::utc());
        let fields = Fields::decompose(&t, Some("+0930")).unwrap();
        assert_eq!(fields.hour, 9);
        assert_eq!(fields.minute, 30);
        // The instant itself is untouched.
        assert_eq!(t.zone(), Zone::utc());
    }

    #[test]
    fn invalid_env_descriptor_propagates() {
        let t = Instant::from_epoch_millis(0, Zone::utc());
        assert!(matches!(
            Fields::decompose(&t, Some("Mars/Olympus")),
            Err(TimeError::InvalidZoneDescriptor(_))
        ));
    }

    #[test]
    fn named_zone_reports_dst_and_abbreviation() {
        let zone = Zone::resolve(Some("America/New_York")).unwrap();
        // 2021-07-01T12:00:00Z → 2021-07-01T08:00:00 EDT.
        let summer = Instant::from_epoch_millis(1_625_140_800_000, zone);
        let fields = Fields::decompose(&summer, None).unwrap();
        assert_eq!(fields.hour, 8);
        assert_eq!(fields.day, 1);
        assert_eq!(fields.month, 7);
        assert!(fields.is_dst);
        assert_eq!(fields.zone_label.as_deref(), Some("EDT"));
        assert_eq!(fields.utc_offset_seconds, -14_400);

        // 2021-01-15T00:00:00Z → 2021-01-14T19:00:00 EST.
        let winter = Instant::from_epoch_millis(1_610_668_800_000, zone);
        let fields = Fields::decompose(&winter, None).unwrap();
        assert!(!fields.is_dst);
        assert_eq!(fields.zone_label.as_deref(), Some("EST"));
        assert_eq!(fields.utc_offset_seconds, -18_000);
    }

    #[test]
    fn leap_year_ordinal_reaches_366() {
        // 2020-12-31T12:00:00Z.
        let t = Instant::from_epoch_millis(1_609_416_000_000, Zone::utc());
        let fields = Fields::decompose(&t, None).unwrap();
        assert_eq!((fields.year, fields.month, fields.day), (2020, 12, 31));
        assert_eq!(fields.year_day, 366);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trips_the_field_names() {
        let t = Instant::from_epoch_millis(0, Zone::utc());
        let fields = Fields::decompose(&t, None).unwrap();
        let json = serde_json::to_string(&fields).unwrap();
        assert!(json.contains("\"year\":1970"));
        assert!(json.contains("\"is_dst\":false"));
        let back: Fields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }
}
