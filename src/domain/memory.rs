use std::str::FromStr;

use thiserror::Error;

const KIB_PER_MIB: f64 = 1024.0;
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
const MIB_PER_GIB: f64 = 1024.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unknown memory format: {0}")]
    UnrecognizedUnit(String),

    #[error("Invalid memory value: {0}")]
    InvalidNumber(String),
}

/// IEC binary units printed by the container runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Bytes,
    Kibibytes,
    Mebibytes,
    Gibibytes,
}

impl MemoryUnit {
    /// Every known unit, longest suffix first
    pub const ALL: [MemoryUnit; 4] = [
        MemoryUnit::Gibibytes,
        MemoryUnit::Mebibytes,
        MemoryUnit::Kibibytes,
        MemoryUnit::Bytes,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Bytes => "B",
            Self::Kibibytes => "KiB",
            Self::Mebibytes => "MiB",
            Self::Gibibytes => "GiB",
        }
    }

    /// Scale `value` in this unit to MB (where 1 MB here is 1 MiB)
    pub fn to_megabytes(&self, value: f64) -> f64 {
        match self {
            Self::Bytes => value / BYTES_PER_MIB,
            Self::Kibibytes => value / KIB_PER_MIB,
            Self::Mebibytes => value,
            Self::Gibibytes => value * MIB_PER_GIB,
        }
    }
}

impl FromStr for MemoryUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.suffix() == s)
            .ok_or_else(|| UnitError::UnrecognizedUnit(s.to_string()))
    }
}

/// Convert a quantity such as `1.091GiB` or `512 MiB` into MB.
///
/// The unit is everything from the first alphabetic character on and must
/// match one of the known suffixes exactly, so `TiB` or `5XiB` are rejected
/// rather than read as plain bytes.
pub fn to_megabytes(input: &str) -> Result<f64, UnitError> {
    let trimmed = input.trim();
    let split_at = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| UnitError::UnrecognizedUnit(trimmed.to_string()))?;

    let (number, suffix) = trimmed.split_at(split_at);
    let unit: MemoryUnit = suffix
        .trim()
        .parse()
        .map_err(|_| UnitError::UnrecognizedUnit(trimmed.to_string()))?;

    let value = number
        .trim()
        .parse::<f64>()
        .map_err(|_| UnitError::InvalidNumber(trimmed.to_string()))?;

    Ok(unit.to_megabytes(value))
}
