// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `strftime`-style pattern compilation and rendering.
//!
//! Two-phase by design: [`CompiledPattern::compile`] turns a pattern byte
//! sequence into an executable token plan once, and
//! [`CompiledPattern::render`] replays that plan against an [`Instant`] any
//! number of times. Patterns and output are byte sequences; only the
//! directive characters themselves are assumed to be ASCII, so arbitrary
//! (e.g. UTF-8) literal bytes pass through untouched.
//!
//! Unknown directives are a hard [`TimeError::InvalidFormatPattern`] rather
//! than literal pass-through — silent pass-through hides typos in patterns.
//! Month and weekday names are C-locale English.

use crate::error::{Result, TimeError};
use crate::fields::Fields;
use crate::instant::Instant;
use crate::zone::format_offset;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One element of a compiled plan: a literal byte run or a field directive.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(Vec<u8>),
    /// `%Y` — year, zero-padded to at least 4 digits, sign-prefixed if negative.
    Year,
    /// `%C` — century (floor of year / 100), 2 digits.
    Century,
    /// `%y` — year within century, 2 digits.
    YearShort,
    /// `%m` / `%d` / `%H` / `%M` / `%S` — 2-digit zero-padded fields.
    Month,
    Day,
    Hour,
    Minute,
    Second,
    /// `%e` / `%k` / `%l` — space-padded variants.
    DaySpace,
    HourSpace,
    Hour12Space,
    /// `%I` — 12-hour clock, 2 digits.
    Hour12,
    /// `%p` / `%P` — `AM`/`PM` and `am`/`pm`.
    AmPm,
    AmPmLower,
    /// `%j` — day of year, 3 digits.
    YearDay,
    /// `%a` / `%A` / `%b` / `%B` — C-locale names.
    WeekdayAbbrev,
    WeekdayName,
    MonthAbbrev,
    MonthName,
    /// `%u` (1 = Monday … 7 = Sunday) and `%w` (0 = Sunday … 6 = Saturday).
    WeekdayMon,
    WeekdaySun,
    /// `%L` — milliseconds, 3 digits.
    Millis,
    /// `%N` — nanosecond digits truncated/zero-padded to the given width.
    Nanos(u8),
    /// `%s` — floor seconds since the epoch.
    EpochSeconds,
    /// `%z` / `%:z` — signed numeric offset.
    Offset { colon: bool },
    /// `%Z` — zone label, numeric offset fallback.
    ZoneLabel,
}

/// A compiled format pattern: stateless and reusable across renders.
///
/// # Examples
///
/// ```
/// use walltime::{CompiledPattern, Instant, Zone};
///
/// let pattern = CompiledPattern::compile(b"%Y-%m-%dT%H:%M:%S").unwrap();
/// let epoch = Instant::from_epoch_millis(0, Zone::utc());
/// let out = pattern.render(&epoch, 0).unwrap();
/// assert_eq!(out, b"1970-01-01T00:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    tokens: Vec<Token>,
}

impl CompiledPattern {
    /// Compile a pattern byte sequence into an executable plan.
    ///
    /// Fails with [`TimeError::InvalidFormatPattern`] on a trailing `%`, an
    /// unknown directive, or a width prefix applied to anything but `%N`.
    pub fn compile(pattern: &[u8]) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut literal = Vec::new();
        let mut rest = pattern;

        while let Some((&byte, tail)) = rest.split_first() {
            rest = tail;
            if byte != b'%' {
                literal.push(byte);
                continue;
            }

            let (directive, width, tail) = take_directive(rest)?;
            rest = tail;
            if width.is_some() && directive != b'N' {
                return Err(TimeError::InvalidFormatPattern(format!(
                    "width prefix is not supported for %{}",
                    directive as char
                )));
            }
            match directive {
                // Escapes extend the current literal run instead of
                // producing a token of their own.
                b'%' => {
                    literal.push(b'%');
                    continue;
                }
                b'n' => {
                    literal.push(b'\n');
                    continue;
                }
                b't' => {
                    literal.push(b'\t');
                    continue;
                }
                _ => {}
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token_for(directive, width)?);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Ok(Self { tokens })
    }

    /// Render an instant through this pattern.
    ///
    /// `subsec_nanos` is the sub-second value used by `%L`/`%N`, supplied
    /// explicitly so callers can force a fraction independent of the
    /// instant's stored milliseconds (pass
    /// [`Instant::subsec_nanos`](crate::Instant::subsec_nanos) for the
    /// stored one). Must be in `[0, 1_000_000_000)`.
    ///
    /// The instant is decomposed once, in its own zone.
    pub fn render(&self, instant: &Instant, subsec_nanos: i64) -> Result<Vec<u8>> {
        if !(0..1_000_000_000).contains(&subsec_nanos) {
            return Err(TimeError::Domain("subsecond nanoseconds out of [0, 1e9)"));
        }
        let fields = Fields::decompose(instant, None)?;
        let mut out = Vec::with_capacity(self.tokens.len() * 4);

        for token in &self.tokens {
            match token {
                Token::Literal(bytes) => out.extend_from_slice(bytes),
                Token::Year => push_year(&mut out, fields.year),
                Token::Century => push_int(&mut out, i64::from(fields.year.div_euclid(100)), 2),
                Token::YearShort => {
                    push_int(&mut out, i64::from(fields.year.rem_euclid(100)), 2)
                }
                Token::Month => push_int(&mut out, i64::from(fields.month), 2),
                Token::Day => push_int(&mut out, i64::from(fields.day), 2),
                Token::Hour => push_int(&mut out, i64::from(fields.hour), 2),
                Token::Minute => push_int(&mut out, i64::from(fields.minute), 2),
                Token::Second => push_int(&mut out, i64::from(fields.second), 2),
                Token::DaySpace => push_str(&mut out, &format!("{:2}", fields.day)),
                Token::HourSpace => push_str(&mut out, &format!("{:2}", fields.hour)),
                Token::Hour12Space => push_str(&mut out, &format!("{:2}", hour12(fields.hour))),
                Token::Hour12 => push_int(&mut out, i64::from(hour12(fields.hour)), 2),
                Token::AmPm => push_str(&mut out, if fields.hour < 12 { "AM" } else { "PM" }),
                Token::AmPmLower => {
                    push_str(&mut out, if fields.hour < 12 { "am" } else { "pm" })
                }
                Token::YearDay => push_int(&mut out, i64::from(fields.year_day), 3),
                Token::WeekdayAbbrev => {
                    push_str(&mut out, &WEEKDAY_NAMES[fields.weekday as usize][..3])
                }
                Token::WeekdayName => push_str(&mut out, WEEKDAY_NAMES[fields.weekday as usize]),
                Token::MonthAbbrev => {
                    push_str(&mut out, &MONTH_NAMES[(fields.month - 1) as usize][..3])
                }
                Token::MonthName => push_str(&mut out, MONTH_NAMES[(fields.month - 1) as usize]),
                Token::WeekdayMon => {
                    let iso = if fields.weekday == 0 { 7 } else { fields.weekday };
                    push_int(&mut out, i64::from(iso), 1);
                }
                Token::WeekdaySun => push_int(&mut out, i64::from(fields.weekday), 1),
                Token::Millis => push_int(&mut out, subsec_nanos / 1_000_000, 3),
                Token::Nanos(width) => push_nanos(&mut out, subsec_nanos, *width),
                Token::EpochSeconds => push_str(&mut out, &instant.whole_seconds().to_string()),
                Token::Offset { colon } => {
                    push_str(&mut out, &format_offset(fields.utc_offset_seconds, *colon))
                }
                Token::ZoneLabel => match &fields.zone_label {
                    Some(label) => push_str(&mut out, label),
                    None => push_str(&mut out, &format_offset(fields.utc_offset_seconds, false)),
                },
            }
        }
        Ok(out)
    }
}

/// Pull the next directive byte, with an optional width prefix (`%3N`).
fn take_directive(rest: &[u8]) -> Result<(u8, Option<u8>, &[u8])> {
    let mut rest = rest;
    let mut width: Option<u8> = None;
    while let Some((&byte, tail)) = rest.split_first() {
        if byte.is_ascii_digit() {
            let accumulated = width
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|w| w.checked_add(byte - b'0'))
                .ok_or_else(|| {
                    TimeError::InvalidFormatPattern("directive width too large".into())
                })?;
            width = Some(accumulated);
            rest = tail;
        } else if byte == b':' {
            // `%:z` is the only colon form.
            return match tail.split_first() {
                Some((b'z', tail)) if width.is_none() => Ok((b':', None, tail)),
                _ => Err(TimeError::InvalidFormatPattern(
                    "':' modifier is only valid as %:z".into(),
                )),
            };
        } else {
            return Ok((byte, width, tail));
        }
    }
    Err(TimeError::InvalidFormatPattern(
        "unterminated directive at end of pattern".into(),
    ))
}

fn token_for(directive: u8, width: Option<u8>) -> Result<Token> {
    Ok(match directive {
        b'Y' => Token::Year,
        b'C' => Token::Century,
        b'y' => Token::YearShort,
        b'm' => Token::Month,
        b'd' => Token::Day,
        b'e' => Token::DaySpace,
        b'j' => Token::YearDay,
        b'H' => Token::Hour,
        b'k' => Token::HourSpace,
        b'I' => Token::Hour12,
        b'l' => Token::Hour12Space,
        b'M' => Token::Minute,
        b'S' => Token::Second,
        b'L' => Token::Millis,
        b'N' => Token::Nanos(width.unwrap_or(9)),
        b'p' => Token::AmPm,
        b'P' => Token::AmPmLower,
        b'a' => Token::WeekdayAbbrev,
        b'A' => Token::WeekdayName,
        b'b' => Token::MonthAbbrev,
        b'B' => Token::MonthName,
        b'u' => Token::WeekdayMon,
        b'w' => Token::WeekdaySun,
        b's' => Token::EpochSeconds,
        b'z' => Token::Offset { colon: false },
        b':' => Token::Offset { colon: true },
        b'Z' => Token::ZoneLabel,
        other if other.is_ascii_graphic() => {
            return Err(TimeError::InvalidFormatPattern(format!(
                "unknown directive %{}",
                other as char
            )))
        }
        other => {
            return Err(TimeError::InvalidFormatPattern(format!(
                "unknown directive byte 0x{other:02x}"
            )))
        }
    })
}

#[inline]
fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

#[inline]
fn push_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
}

fn push_int(out: &mut Vec<u8>, value: i64, width: usize) {
    if value < 0 {
        out.push(b'-');
        push_str(out, &format!("{:0width$}", value.unsigned_abs()));
    } else {
        push_str(out, &format!("{value:0width$}"));
    }
}

/// `%Y`: at least 4 digits, sign carried separately so padding applies to
/// the magnitude.
fn push_year(out: &mut Vec<u8>, year: i32) {
    push_int(out, i64::from(year), 4);
}

/// `%N`: the 9 nanosecond digits truncated or zero-extended to `width`.
fn push_nanos(out: &mut Vec<u8>, subsec_nanos: i64, width: u8) {
    let digits = format!("{subsec_nanos:09}");
    let width = width as usize;
    if width <= digits.len() {
        push_str(out, &digits[..width]);
    } else {
        push_str(out, &digits);
        out.resize(out.len() + (width - digits.len()), b'0');
    }
}
