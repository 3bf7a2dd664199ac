//! Satellite vehicle (PRN) identification
use crate::{constellation, prelude::SV, Error};

/// Smallest satellite number we accept
pub const MIN_PRN: u8 = 1;

/// Largest satellite number we accept
pub const MAX_PRN: u8 = 60;

/// Builds the [SV] described by a satellite record descriptor, for example "G07"
/// or "E 5". `content` must be at least 3 bytes long.
/// `line` is only used to describe a possible error.
pub(crate) fn parse(content: &str, line: usize) -> Result<SV, Error> {
    let code = content.get(0..1).unwrap_or_default();

    let constellation = code
        .chars()
        .next()
        .and_then(constellation::lookup)
        .ok_or_else(|| Error::UnknownSystem {
            line,
            code: code.to_string(),
        })?;

    let number = content.get(1..3).ok_or_else(|| Error::PrnOutOfRange {
        line,
        sv: content.to_string(),
    })?;

    let prn = number
        .trim()
        .parse::<u8>()
        .map_err(|_| Error::ParseInt {
            line,
            field: "satellite number".to_string(),
            content: content.to_string(),
        })?;

    if !(MIN_PRN..=MAX_PRN).contains(&prn) {
        return Err(Error::PrnOutOfRange {
            line,
            sv: content.get(0..3).unwrap_or(content).to_string(),
        });
    }

    Ok(SV::new(constellation, prn))
}
