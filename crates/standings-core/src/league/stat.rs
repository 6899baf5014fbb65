// Integer statistic with an explicit not-a-number state.
//
// Numeric fields accept free text. Text that does not parse is kept as the
// NaN sentinel rather than rejected, and arithmetic on a NaN operand yields
// NaN, so derived columns stay total.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A whole-number statistic, or `NaN` when numeric coercion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stat(Option<i64>);

impl Stat {
    /// The not-a-number sentinel.
    pub const NAN: Stat = Stat(None);
    pub const ZERO: Stat = Stat(Some(0));

    pub const fn new(value: i64) -> Self {
        Stat(Some(value))
    }

    /// The numeric value, or `None` for the sentinel.
    pub fn value(self) -> Option<i64> {
        self.0
    }

    pub fn is_nan(self) -> bool {
        self.0.is_none()
    }

    /// Coerce free text into a statistic.
    ///
    /// Surrounding whitespace is ignored and blank input is zero. Anything
    /// that is not a whole number (including overflow) becomes `NaN`.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Stat::ZERO;
        }
        trimmed.parse::<i64>().map_or(Stat::NAN, Stat::new)
    }

    /// Whether the value is strictly positive. `NaN` is not.
    pub fn is_positive(self) -> bool {
        matches!(self.0, Some(v) if v > 0)
    }
}

impl From<i64> for Stat {
    fn from(value: i64) -> Self {
        Stat::new(value)
    }
}

impl Add for Stat {
    type Output = Stat;

    fn add(self, rhs: Stat) -> Stat {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Stat(a.checked_add(b)),
            _ => Stat::NAN,
        }
    }
}

impl Sub for Stat {
    type Output = Stat;

    fn sub(self, rhs: Stat) -> Stat {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Stat(a.checked_sub(b)),
            _ => Stat::NAN,
        }
    }
}

impl Mul<i64> for Stat {
    type Output = Stat;

    fn mul(self, rhs: i64) -> Stat {
        Stat(self.0.and_then(|v| v.checked_mul(rhs)))
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
