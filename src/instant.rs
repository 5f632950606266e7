// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The zoned instant value.
//!
//! [`Instant`] is the core type of the crate: a signed millisecond count
//! since the Unix epoch paired with a resolved [`Zone`] used for
//! decomposition and rendering. The value is `Copy` and immutable apart
//! from one narrow operation, [`Instant::set_subsec_nanos`], which replaces
//! only the sub-second part.
//!
//! All whole/fractional accessors use **floor** division so that pre-epoch
//! instants decompose correctly: `-500 ms` is second `-1` plus `500 ms`,
//! never second `0` minus `500 ms`.

use chrono::Utc;

use crate::error::{Result, TimeError};
use crate::zone::Zone;

// ═══════════════════════════════════════════════════════════════════════════
// Clock
// ═══════════════════════════════════════════════════════════════════════════

/// Source of "now", injectable for tests.
///
/// [`Instant::now`] is the only impure operation on instants; routing it
/// through this trait keeps the rest of the engine deterministic.
pub trait Clock {
    /// Current milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Instant
// ═══════════════════════════════════════════════════════════════════════════

/// A point in time: milliseconds since the epoch plus a zone for rendering.
///
/// # Examples
///
/// ```
/// use walltime::{Instant, Zone};
///
/// let t = Instant::from_epoch_millis(-500, Zone::utc());
/// assert_eq!(t.whole_seconds(), -1);          // floor, not truncation
/// assert_eq!(t.subsec_micros(), 500_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    epoch_millis: i64,
    zone: Zone,
}

impl Instant {
    // ── constructors ──────────────────────────────────────────────────

    /// Create from a raw millisecond count and a zone.
    #[inline]
    pub const fn from_epoch_millis(epoch_millis: i64, zone: Zone) -> Self {
        Self { epoch_millis, zone }
    }

    /// Capture the current wall-clock time in the given zone.
    ///
    /// Reads the system clock; use [`Instant::now_with`] to inject a fake
    /// clock in tests.
    #[inline]
    pub fn now(zone: Zone) -> Self {
        Self::now_with(&SystemClock, zone)
    }

    /// Capture "now" from an explicit [`Clock`].
    #[inline]
    pub fn now_with(clock: &impl Clock, zone: Zone) -> Self {
        Self::from_epoch_millis(clock.now_millis(), zone)
    }

    /// Copy this instant, optionally rebinding it to another zone.
    ///
    /// The millisecond value is preserved exactly; with `None` the copy
    /// keeps this instant's zone.
    #[inline]
    pub fn duplicate(&self, target_zone: Option<Zone>) -> Self {
        Self::from_epoch_millis(self.epoch_millis, target_zone.unwrap_or(self.zone))
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Milliseconds since the Unix epoch (may be negative).
    #[inline]
    pub const fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// The zone this instant renders in.
    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Whole seconds since the epoch, floored toward negative infinity.
    #[inline]
    pub const fn whole_seconds(&self) -> i64 {
        self.epoch_millis.div_euclid(1_000)
    }

    /// Sub-second part in microseconds, always in `[0, 999_000]`.
    #[inline]
    pub const fn subsec_micros(&self) -> i64 {
        self.epoch_millis.rem_euclid(1_000) * 1_000
    }

    /// Sub-second part in nanoseconds, always in `[0, 999_000_000]`.
    ///
    /// The resolution is a millisecond, so the value is always a multiple
    /// of one million.
    #[inline]
    pub const fn subsec_nanos(&self) -> i64 {
        self.epoch_millis.rem_euclid(1_000) * 1_000_000
    }

    /// Effective UTC offset of this instant's zone, in seconds.
    pub fn utc_offset_seconds(&self) -> Result<i32> {
        let millis = self.zone.offset_millis_at(self.epoch_millis)?;
        Ok((millis / 1_000) as i32)
    }

    // ── mutation ──────────────────────────────────────────────────────

    /// Replace only the sub-second part of this instant.
    ///
    /// `nanoseconds` must be in `[0, 1_000_000_000)`. The stored resolution
    /// is a millisecond, so the value is truncated to `nanoseconds /
    /// 1_000_000`; the floor whole-second part is preserved. Returns the
    /// input value unchanged.
    ///
    /// This is the single in-place mutation an instant supports.
    pub fn set_subsec_nanos(&mut self, nanoseconds: i64) -> Result<i64> {
        if !(0..1_000_000_000).contains(&nanoseconds) {
            return Err(TimeError::Domain("nanoseconds out of [0, 1e9)"));
        }
        let whole = self
            .epoch_millis
            .div_euclid(1_000)
            .checked_mul(1_000)
            .ok_or(TimeError::Overflow)?;
        self.epoch_millis = whole
            .checked_add(nanoseconds / 1_000_000)
            .ok_or(TimeError::Overflow)?;
        Ok(nanoseconds)
    }

    // ── rendering convenience ─────────────────────────────────────────

    /// Compile `pattern` and render this instant with its own sub-second
    /// value. See [`CompiledPattern`](crate::CompiledPattern) for the
    /// directive set; reuse a compiled pattern when formatting repeatedly.
    pub fn strftime(&self, pattern: &[u8]) -> Result<Vec<u8>> {
        crate::strftime::CompiledPattern::compile(pattern)?.render(self, self.subsec_nanos())
    }
}

impl std::fmt::Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms {}", self.epoch_millis, self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn now_reads_the_injected_clock() {
        let t = Instant::now_with(&FixedClock(1_625_140_800_123), Zone::utc());
        assert_eq!(t.epoch_millis(), 1_625_140_800_123);
        assert_eq!(t.zone(), Zone::utc());
    }

    #[test]
    fn whole_seconds_floor_toward_negative_infinity() {
        let t = Instant::from_epoch_millis(-500, Zone::utc());
        assert_eq!(t.whole_seconds(), -1);
        assert_eq!(t.subsec_micros(), 500_000);
        assert_eq!(t.subsec_nanos(), 500_000_000);

        let t = Instant::from_epoch_millis(1_500, Zone::utc());
        assert_eq!(t.whole_seconds(), 1);
        assert_eq!(t.subsec_micros(), 500_000);
    }

    #[test]
    fn duplicate_copies_millis_and_optionally_rebinds_zone() {
        let original = Instant::from_epoch_millis(42, Zone::utc());
        let copy = original.duplicate(None);
        assert_eq!(copy, original);

        let fixed = Zone::resolve(Some("+0930")).unwrap();
        let rebound = original.duplicate(Some(fixed));
        assert_eq!(rebound.epoch_millis(), 42);
        assert_eq!(rebound.zone(), fixed);
    }

    #[test]
    fn set_subsec_nanos_truncates_to_millisecond_granularity() {
        let mut t = Instant::from_epoch_millis(1_234, Zone::utc());
        assert_eq!(t.set_subsec_nanos(999_999_999).unwrap(), 999_999_999);
        assert_eq!(t.epoch_millis(), 1_999);
        assert_eq!(t.subsec_nanos(), 999_000_000);
    }

    #[test]
    fn set_subsec_nanos_preserves_negative_whole_seconds() {
        // -1_234 ms is second -2 plus 766 ms; the whole part must stay -2.
        let mut t = Instant::from_epoch_millis(-1_234, Zone::utc());
        t.set_subsec_nanos(500_000_000).unwrap();
        assert_eq!(t.epoch_millis(), -1_500);
        assert_eq!(t.whole_seconds(), -2);
        assert_eq!(t.subsec_micros(), 500_000);
    }

    #[test]
    fn set_subsec_nanos_rejects_out_of_range_input() {
        let mut t = Instant::from_epoch_millis(0, Zone::utc());
        assert!(matches!(t.set_subsec_nanos(-1), Err(TimeError::Domain(_))));
        assert!(matches!(
            t.set_subsec_nanos(1_000_000_000),
            Err(TimeError::Domain(_))
        ));
        // A failed set leaves the instant untouched.
        assert_eq!(t.epoch_millis(), 0);
    }

    #[test]
    fn utc_offset_seconds_follows_the_zone() {
        let fixed = Zone::resolve(Some("+0930")).unwrap();
        let t = Instant::from_epoch_millis(0, fixed);
        assert_eq!(t.utc_offset_seconds().unwrap(), 34_200);
    }
}
