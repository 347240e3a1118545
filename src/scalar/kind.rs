//! Precision kinds and their per-kind constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KError;

/// The four arithmetic precisions compared by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionKind {
    /// Native IEEE binary64.
    Double,
    /// Double-double: two `f64` limbs.
    Dd,
    /// Quad-double class precision, two 106-bit halves.
    Dq,
    /// Extended-quad: one binary128-width limb.
    Qx,
}

impl PrecisionKind {
    pub const ALL: [PrecisionKind; 4] = [
        PrecisionKind::Double,
        PrecisionKind::Dd,
        PrecisionKind::Dq,
        PrecisionKind::Qx,
    ];

    /// Short lowercase label used in file names and exported metadata.
    pub fn label(self) -> &'static str {
        match self {
            PrecisionKind::Double => "double",
            PrecisionKind::Dd => "dd",
            PrecisionKind::Dq => "dq",
            PrecisionKind::Qx => "qx",
        }
    }

    /// Significant decimal digits used when stringifying (and therefore narrowing).
    pub fn text_digits(self) -> usize {
        match self {
            PrecisionKind::Double => 15,
            PrecisionKind::Dd => 32,
            PrecisionKind::Dq => 64,
            PrecisionKind::Qx => 33,
        }
    }

    /// Nominal decimal precision of the arithmetic itself.
    pub fn nominal_digits(self) -> u32 {
        match self {
            PrecisionKind::Double => 15,
            PrecisionKind::Dd => 31,
            PrecisionKind::Dq => 64,
            PrecisionKind::Qx => 33,
        }
    }

    /// Digit count written as `precision_digits` in exported artifacts.
    ///
    /// Deliberately kept apart from [`nominal_digits`](Self::nominal_digits): the
    /// exported labels for DD and DQ (30 and 66) are not the arithmetic's own figures.
    pub fn export_digits(self) -> u32 {
        match self {
            PrecisionKind::Double => 15,
            PrecisionKind::Dd => 30,
            PrecisionKind::Dq => 66,
            PrecisionKind::Qx => 33,
        }
    }

    /// Relative tolerance used by scalar equality and ordering.
    pub fn epsilon(self) -> f64 {
        match self {
            PrecisionKind::Double => 1e-15,
            PrecisionKind::Dd => 1e-30,
            PrecisionKind::Dq => 1e-62,
            PrecisionKind::Qx => 1e-31,
        }
    }

    /// Significand width in bits.
    pub const fn mantissa_bits(self) -> u32 {
        match self {
            PrecisionKind::Double => 53,
            PrecisionKind::Dd => 106,
            PrecisionKind::Dq => 212,
            PrecisionKind::Qx => 113,
        }
    }
}

impl fmt::Display for PrecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PrecisionKind {
    type Err = KError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "double" | "d" | "f64" => Ok(PrecisionKind::Double),
            "dd" => Ok(PrecisionKind::Dd),
            "dq" => Ok(PrecisionKind::Dq),
            "qx" => Ok(PrecisionKind::Qx),
            other => Err(KError::UnknownPrecision(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for kind in PrecisionKind::ALL {
            assert_eq!(kind.label().parse::<PrecisionKind>().unwrap(), kind);
        }
        assert!("octuple".parse::<PrecisionKind>().is_err());
    }

    #[test]
    fn export_digits_are_kept_apart_from_nominal_digits() {
        assert_eq!(PrecisionKind::Dd.nominal_digits(), 31);
        assert_eq!(PrecisionKind::Dd.export_digits(), 30);
        assert_eq!(PrecisionKind::Dq.nominal_digits(), 64);
        assert_eq!(PrecisionKind::Dq.export_digits(), 66);
        assert_eq!(PrecisionKind::Qx.export_digits(), PrecisionKind::Qx.nominal_digits());
    }
}
