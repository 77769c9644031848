// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition timings and easing curves.

use core::fmt;
use core::str::FromStr;

use crate::error::LookError;
use crate::interpolate::{Interpolate, step};

/// An easing curve mapping linear progress to eased progress.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// CSS `ease`.
    Ease,
    /// Cubic ease-in.
    EaseIn,
    /// Cubic ease-out.
    EaseOut,
    /// Cubic ease-in-out.
    EaseInOut,
    /// Quadratic ease-in.
    EaseInQuad,
    /// Quadratic ease-out.
    EaseOutQuad,
    /// Quadratic ease-in-out.
    EaseInOutQuad,
    /// Quartic ease-in.
    EaseInQuart,
    /// Quartic ease-out.
    EaseOutQuart,
    /// Quartic ease-in-out.
    EaseInOutQuart,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    const NAMED: [(&'static str, Self); 11] = [
        ("linear", Self::Linear),
        ("ease", Self::Ease),
        ("ease-in", Self::EaseIn),
        ("ease-out", Self::EaseOut),
        ("ease-in-out", Self::EaseInOut),
        ("ease-in-quad", Self::EaseInQuad),
        ("ease-out-quad", Self::EaseOutQuad),
        ("ease-in-out-quad", Self::EaseInOutQuad),
        ("ease-in-quart", Self::EaseInQuart),
        ("ease-out-quart", Self::EaseOutQuart),
        ("ease-in-out-quart", Self::EaseInOutQuart),
    ];

    /// Applies the curve to progress `t` in `0.0..=1.0`.
    ///
    /// Inputs outside that range are clamped.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(t, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::CubicBezier(x1, y1, x2, y2) = self {
            return write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})");
        }
        let name = Self::NAMED
            .iter()
            .find(|(_, easing)| easing == self)
            .map_or("linear", |(name, _)| name);
        f.write_str(name)
    }
}

impl FromStr for Easing {
    type Err = LookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let invalid = || LookError::InvalidTiming(s.into());
        if let Some(args) = input
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values = args
                .split(',')
                .map(|v| v.trim().parse::<f64>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?;
            let [x1, y1, x2, y2] = values[..] else {
                return Err(invalid());
            };
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(invalid());
            }
            return Ok(Self::CubicBezier(x1, y1, x2, y2));
        }
        Self::NAMED
            .iter()
            .find(|(name, _)| *name == input)
            .map(|(_, easing)| *easing)
            .ok_or_else(invalid)
    }
}

/// Evaluates a CSS cubic-bezier curve at `t`.
///
/// Solves for the curve parameter with Newton-Raphson, falling back to bisection.
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..20 {
        let x = bezier_sample(p, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }
    bezier_sample(p, y1, y2)
}

/// `B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³` in Horner form.
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// How a value transitions: duration, delay and easing.
///
/// # Example
///
/// ```rust
/// use understory_mood::{Easing, Timing};
///
/// let timing: Timing = "250ms ease-out 50ms".parse().unwrap();
/// assert_eq!(timing.duration_ms(), 250.0);
/// assert_eq!(timing.delay_ms(), 50.0);
/// assert_eq!(timing.easing(), Easing::EaseOut);
///
/// // Progress is measured from the end of the delay.
/// assert_eq!(timing.progress(50.0), 0.0);
/// assert_eq!(timing.progress(300.0), 1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timing {
    duration_ms: f64,
    delay_ms: f64,
    easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self::INSTANT
    }
}

impl Timing {
    /// A transition that completes immediately.
    pub const INSTANT: Self = Self::linear(0.0);

    /// Creates a timing.
    #[must_use]
    pub const fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    /// Creates a linear timing.
    #[must_use]
    pub const fn linear(duration_ms: f64) -> Self {
        Self::new(duration_ms, Easing::Linear)
    }

    /// Returns this timing with a start delay.
    #[must_use]
    pub const fn with_delay(self, delay_ms: f64) -> Self {
        Self { delay_ms, ..self }
    }

    /// Duration in milliseconds.
    #[must_use]
    #[inline]
    pub const fn duration_ms(self) -> f64 {
        self.duration_ms
    }

    /// Delay in milliseconds.
    #[must_use]
    #[inline]
    pub const fn delay_ms(self) -> f64 {
        self.delay_ms
    }

    /// The easing curve.
    #[must_use]
    #[inline]
    pub const fn easing(self) -> Easing {
        self.easing
    }

    /// Total time from start to completion, including the delay.
    #[must_use]
    pub fn total_ms(self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    /// Linear progress `elapsed_ms` after the transition started, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(self, elapsed_ms: f64) -> f64 {
        let active = elapsed_ms - self.delay_ms;
        if active <= 0.0 {
            0.0
        } else if self.duration_ms <= 0.0 || active >= self.duration_ms {
            1.0
        } else {
            active / self.duration_ms
        }
    }

    /// Eased progress `elapsed_ms` after the transition started.
    #[must_use]
    pub fn eased(self, elapsed_ms: f64) -> f64 {
        self.easing.apply(self.progress(elapsed_ms))
    }
}

impl Interpolate for Timing {
    fn interpolate(&self, to: &Self, u: f64) -> Self {
        step(self, to, u)
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms {}", self.duration_ms, self.easing)?;
        if self.delay_ms != 0.0 {
            write!(f, " {}ms", self.delay_ms)?;
        }
        Ok(())
    }
}

fn parse_time(token: &str) -> Option<f64> {
    let (number, scale) = if let Some(ms) = token.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = token.strip_suffix('s') {
        (s, 1000.0)
    } else {
        return None;
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v * scale)
}

impl FromStr for Timing {
    type Err = LookError;

    /// Parses `duration [easing] [delay]` with times in `ms` or `s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LookError::InvalidTiming(s.into());
        let input = s.trim().to_ascii_lowercase();
        // `cubic-bezier(...)` may contain spaces; pull it out first.
        let (rest, bezier) = match input.find("cubic-bezier(") {
            Some(start) => {
                let end = input[start..].find(')').ok_or_else(invalid)? + start + 1;
                let easing = input[start..end].parse::<Easing>()?;
                (format!("{} {}", &input[..start], &input[end..]), Some(easing))
            }
            None => (input.clone(), None),
        };
        let mut times = Vec::new();
        let mut easing = bezier;
        for token in rest.split_whitespace() {
            if let Some(ms) = parse_time(token) {
                times.push(ms);
            } else if easing.is_none() {
                easing = Some(token.parse::<Easing>().map_err(|_| invalid())?);
            } else {
                return Err(invalid());
            }
        }
        let (duration_ms, delay_ms) = match times[..] {
            [duration] => (duration, 0.0),
            [duration, delay] => (duration, delay),
            _ => return Err(invalid()),
        };
        Ok(Self {
            duration_ms,
            delay_ms,
            easing: easing.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for (_, easing) in Easing::NAMED {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing}");
        }
    }

    #[test]
    fn cubic_bezier_matches_linear_diagonal() {
        let diagonal = Easing::CubicBezier(0.25, 0.25, 0.75, 0.75);
        assert!((diagonal.apply(0.3) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn parses_easings() {
        assert_eq!("ease-in-out".parse(), Ok(Easing::EaseInOut));
        assert_eq!(
            "cubic-bezier(0.4, 0, 0.2, 1)".parse(),
            Ok(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0))
        );
        assert!("cubic-bezier(2, 0, 0.2, 1)".parse::<Easing>().is_err());
        assert!("bouncy".parse::<Easing>().is_err());
    }

    #[test]
    fn parses_timings() {
        assert_eq!("300ms".parse(), Ok(Timing::linear(300.0)));
        assert_eq!(
            "0.2s cubic-bezier(0.4, 0, 0.2, 1) 10ms".parse(),
            Ok(Timing::new(200.0, Easing::CubicBezier(0.4, 0.0, 0.2, 1.0)).with_delay(10.0))
        );
        for bad in ["", "fast", "100ms linear ease", "1ms 2ms 3ms", "-5ms"] {
            assert!(
                matches!(bad.parse::<Timing>(), Err(LookError::InvalidTiming(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        let timing = Timing::new(150.0, Easing::EaseInOutQuad).with_delay(20.0);
        assert_eq!(timing.to_string(), "150ms ease-in-out-quad 20ms");
        assert_eq!(timing.to_string().parse(), Ok(timing));
    }

    #[test]
    fn zero_duration_completes_after_delay() {
        let timing = Timing::INSTANT.with_delay(10.0);
        assert_eq!(timing.progress(5.0), 0.0);
        assert_eq!(timing.progress(10.5), 1.0);
    }
}
