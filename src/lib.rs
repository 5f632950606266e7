// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock time value engine.
//!
//! This crate pairs an epoch millisecond count with a resolved timezone and
//! provides the operations a host runtime needs around such a value:
//! construction from components or from "now", decomposition into local
//! calendar fields, and `strftime`-style text rendering.
//!
//! # Core types
//!
//! - [`Instant`] — milliseconds since the Unix epoch plus a [`Zone`].
//! - [`Zone`] — a resolved timezone: fixed UTC offset or DST-aware IANA name.
//! - [`Fields`] — the local calendar fields of an instant (second through
//!   year, weekday, day-of-year, DST flag, zone label).
//! - [`CompiledPattern`] — a compiled `strftime` pattern, reusable across
//!   renders.
//! - [`Components`] / [`DstHint`] — inputs to component-based construction.
//! - [`Clock`] / [`SystemClock`] — the injectable "now" source.
//! - [`TimeError`] — every failure the engine reports.
//!
//! # Data flow
//!
//! | Step | Operation |
//! |------|-----------|
//! | construct | [`Instant::now`], [`Instant::from_components`], [`Instant::from_utc_parts`] |
//! | decompose | [`Fields::decompose`] |
//! | render | [`CompiledPattern::compile`] + [`CompiledPattern::render`] |
//!
//! # Timezone handling
//!
//! Zone descriptors follow the `TZ` environment convention: an IANA name
//! (`"Europe/Madrid"`), a raw numeric offset (`"+0930"`), or nothing at all
//! (the system default). Resolution is strict by default and lenient — UTC
//! fallback — through [`Zone::resolve_lenient`], because real-world `TZ`
//! values are frequently malformed. The environment is never read behind
//! the caller's back: [`Fields::decompose`] takes the descriptor as an
//! explicit argument and only [`Zone::from_env`] touches `TZ` itself.
//!
//! # Example
//!
//! ```
//! use walltime::{CompiledPattern, Fields, Instant, Zone};
//!
//! let zone = Zone::resolve(Some("+0930")).unwrap();
//! let t = Instant::from_epoch_millis(0, zone);
//!
//! let fields = Fields::decompose(&t, None).unwrap();
//! assert_eq!((fields.hour, fields.minute), (9, 30));
//!
//! let pattern = CompiledPattern::compile(b"%Y-%m-%d %H:%M:%S %z").unwrap();
//! let out = pattern.render(&t, 0).unwrap();
//! assert_eq!(out, b"1970-01-01 09:30:00 +0930");
//! ```

mod compose;
mod error;
mod fields;
pub(crate) mod instant;
pub(crate) mod strftime;
pub(crate) mod zone;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use compose::{Components, DstHint};
pub use error::{Result, TimeError};
pub use fields::Fields;
pub use instant::{Clock, Instant, SystemClock};
pub use strftime::CompiledPattern;
pub use zone::Zone;
