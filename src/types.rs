//! RINEX file types
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// File type, as described by the first header line.
/// This library only decodes [Type::ObservationData],
/// other types are only described.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Phase, pseudo range, doppler and signal strength measurements
    #[default]
    ObservationData,
    /// Decoded radio messages
    NavigationData,
    /// Meteo sensors measurements
    MeteoData,
    /// Clock RINEX
    ClockData,
    /// Any other single letter descriptor
    Other(char),
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ObservationData => write!(f, "OBSERVATION DATA"),
            Self::NavigationData => write!(f, "NAVIGATION DATA"),
            Self::MeteoData => write!(f, "METEOROLOGICAL DATA"),
            Self::ClockData => write!(f, "CLOCK DATA"),
            Self::Other(c) => write!(f, "{}", c),
        }
    }
}

impl Type {
    /// Builds [Type] from its 1 letter header code
    pub fn from_code(code: char) -> Self {
        match code {
            'O' => Self::ObservationData,
            'N' => Self::NavigationData,
            'M' => Self::MeteoData,
            'C' => Self::ClockData,
            c => Self::Other(c),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn type_codes() {
        assert_eq!(Type::from_code('O'), Type::ObservationData);
        assert_eq!(Type::from_code('N'), Type::NavigationData);
        assert_eq!(Type::from_code('X'), Type::Other('X'));
        assert_eq!(Type::default(), Type::ObservationData);
    }
}
