//! RINEX revision descriptor
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("non supported version \"{0}\"")]
    NonSupportedVersion(String),
    #[error("failed to parse version")]
    ParseIntError(#[from] std::num::ParseIntError),
}

/// RINEX revision, as described by the first header line
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = ParsingError;
    /// Parses "3.04", "2.11" or "4" like content.
    /// A single minor digit counts tenths: "3.4" is 3.40.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('.') {
            Some((major, minor)) => {
                let major = major.parse::<u8>()?;
                let minor = match minor.len() {
                    0 => 0,
                    1 => minor.parse::<u8>()? * 10,
                    2 => minor.parse::<u8>()?,
                    _ => return Err(ParsingError::NonSupportedVersion(s.to_string())),
                };
                Ok(Self { major, minor })
            },
            None => Ok(Self {
                major: s.parse::<u8>()?,
                minor: 0,
            }),
        }
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
    /// Returns this revision as a floating point number, 3.04 for example.
    pub fn as_f64(&self) -> f64 {
        self.major as f64 + self.minor as f64 / 100.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn version_parsing() {
        for (content, major, minor) in [
            ("3.04", 3, 4),
            ("  3.05   ", 3, 5),
            ("2.11", 2, 11),
            ("3.4", 3, 40),
            ("4", 4, 0),
        ] {
            let version = Version::from_str(content).unwrap();
            assert_eq!(version, Version::new(major, minor));
        }
        assert!(Version::from_str("x.yy").is_err());
        assert!(Version::from_str("3.041").is_err());
    }
    #[test]
    fn version_display() {
        let version = Version::new(3, 4);
        assert_eq!(version.to_string(), "3.04");
        assert!((version.as_f64() - 3.04).abs() < 1E-9);
    }
}
