// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation in the crate.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimeError>;

/// Errors produced by zone resolution, construction, and rendering.
///
/// Every failure is returned to the immediate caller; nothing is retried
/// internally. Zone-resolution failures are the only kind callers commonly
/// want to swallow — [`Zone::resolve_lenient`](crate::Zone::resolve_lenient)
/// packages the UTC fallback for that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The descriptor matched neither a known zone name nor the numeric
    /// offset grammar (`±HH`, `±HHMM`, `±HH:MM`).
    InvalidZoneDescriptor(String),
    /// A numeric input fell outside its documented range.
    Domain(&'static str),
    /// A format pattern contained an unterminated or unknown directive.
    InvalidFormatPattern(String),
    /// Construction inputs contradict each other (e.g. a UTC build combined
    /// with an explicit non-UTC offset).
    UnsupportedConfiguration(String),
    /// Millisecond arithmetic left the representable `i64` range.
    Overflow,
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZoneDescriptor(desc) => {
                write!(f, "invalid timezone descriptor: {desc:?}")
            }
            Self::Domain(what) => write!(f, "value out of range: {what}"),
            Self::InvalidFormatPattern(what) => write!(f, "invalid format pattern: {what}"),
            Self::UnsupportedConfiguration(what) => {
                write!(f, "unsupported configuration: {what}")
            }
            Self::Overflow => write!(f, "millisecond arithmetic overflow"),
        }
    }
}

impl std::error::Error for TimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_descriptor() {
        let err = TimeError::InvalidZoneDescriptor("Mars/Olympus".into());
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(TimeError::Overflow);
        assert_eq!(err.to_string(), "millisecond arithmetic overflow");
    }
}
