// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors produced when coercing text into look values.

use thiserror::Error;

/// A look value could not be parsed from text.
///
/// Each variant carries the offending input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookError {
    /// Not a recognized color literal.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// Not a number followed by an optional `px`, `em`, `rem` or `%` unit.
    #[error("invalid length: {0:?}")]
    InvalidLength(String),
    /// Not a font shorthand (`[style] [weight] size family`).
    #[error("invalid font: {0:?}")]
    InvalidFont(String),
    /// Not a timing (`duration [easing] [delay]`).
    #[error("invalid timing: {0:?}")]
    InvalidTiming(String),
    /// Not a finite number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    /// Not a box-shadow list.
    #[error("invalid shadow: {0:?}")]
    InvalidShadow(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_quotes_input() {
        let err = LookError::InvalidColor("#zz".into());
        assert_eq!(err.to_string(), "invalid color: \"#zz\"");
    }
}
