//! Timestamps & epoch flags, as found in Observation RINEX
use crate::{prelude::Epoch, Error};
use hifitime::TimeScale;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [EpochFlag] validates an epoch,
/// or describes possible events that occurred
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    /// Epoch is sane
    #[default]
    Ok,
    /// Power failure since previous epoch
    PowerFailure,
    /// Antenna is being moved at current epoch
    AntennaBeingMoved,
    /// Site has changed, received has moved since last epoch
    NewSiteOccupation,
    /// New information to come after this epoch
    HeaderInformationFollows,
    /// External event - significant event in this epoch
    ExternalEvent,
    /// Cycle slip at this epoch
    CycleSlip,
}

impl EpochFlag {
    /// Returns true if self is a valid epoch
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
    /// Returns true if this flag describes a special event
    /// rather than an actual sampling instant (flag > 1).
    pub fn is_event(self) -> bool {
        !matches!(self, Self::Ok | Self::PowerFailure)
    }
}

impl FromStr for EpochFlag {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Ok),
            "1" => Ok(Self::PowerFailure),
            "2" => Ok(Self::AntennaBeingMoved),
            "3" => Ok(Self::NewSiteOccupation),
            "4" => Ok(Self::HeaderInformationFollows),
            "5" => Ok(Self::ExternalEvent),
            "6" => Ok(Self::CycleSlip),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let value = match self {
            Self::Ok => 0,
            Self::PowerFailure => 1,
            Self::AntennaBeingMoved => 2,
            Self::NewSiteOccupation => 3,
            Self::HeaderInformationFollows => 4,
            Self::ExternalEvent => 5,
            Self::CycleSlip => 6,
        };
        write!(f, "{}", value)
    }
}

/// Interprates the time system tag found in TIME OF FIRST / LAST OBS.
pub(crate) fn parse_timescale(tag: &str) -> Option<TimeScale> {
    match tag.trim() {
        "GPS" | "QZS" | "IRN" => Some(TimeScale::GPST),
        "GAL" => Some(TimeScale::GST),
        "BDT" => Some(TimeScale::BDT),
        "GLO" | "UTC" => Some(TimeScale::UTC),
        "TAI" => Some(TimeScale::TAI),
        _ => None,
    }
}

/// Parses "yyyy mm dd hh mm ss.sssssss" content into an [Epoch]
/// expressed in given [TimeScale]. Fractional seconds are interprated
/// with up to nanosecond resolution. `line` is only used to describe errors.
pub(crate) fn parse_in_timescale(content: &str, ts: TimeScale, line: usize) -> Result<Epoch, Error> {
    let error = || Error::DateTime {
        line,
        content: content.to_string(),
    };

    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 6 {
        return Err(error());
    }

    let y = items[0].parse::<i32>().map_err(|_| error())?;
    let m = items[1].parse::<u8>().map_err(|_| error())?;
    let d = items[2].parse::<u8>().map_err(|_| error())?;
    let hh = items[3].parse::<u8>().map_err(|_| error())?;
    let mm = items[4].parse::<u8>().map_err(|_| error())?;

    let (ss, ns) = match items[5].split_once('.') {
        Some((secs, fract)) => {
            if fract.is_empty() || fract.len() > 9 || !fract.bytes().all(|b| b.is_ascii_digit()) {
                return Err(error());
            }
            let ss = secs.parse::<u8>().map_err(|_| error())?;
            let ns = format!("{:0<9}", fract).parse::<u32>().map_err(|_| error())?;
            (ss, ns)
        },
        None => (items[5].parse::<u8>().map_err(|_| error())?, 0),
    };

    Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, ts).map_err(|_| error())
}
