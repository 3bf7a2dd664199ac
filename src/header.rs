//! Describes the Observation RINEX header,
//! includes the header parser and associated methods
use crate::{
    constellation, epoch,
    prelude::{Constellation, Duration, Epoch, TimeScale},
    reader::Reader,
    types::Type,
    version::Version,
    Error,
};

use std::{collections::HashMap, io::BufRead, str::FromStr};

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Header section is abandonned past this number of lines
pub const MAX_HEADER_LINES: usize = 800;

/// Header lines are made of a 60 byte value field, followed by a label
const LABEL_OFFSET: usize = 60;

/// GNSS receiver description
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Receiver {
    /// Serial number
    pub sn: String,
    /// Receiver model
    pub model: String,
    /// Firmware version
    pub firmware: String,
}

/// Receiver antenna description
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Antenna {
    /// Serial number
    pub sn: String,
    /// Antenna model
    pub model: String,
}

/// Geocentric approximate marker position [m]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Antenna eccentricities, relative to the marker [m]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaDelta {
    pub north: f64,
    pub east: f64,
    pub up: f64,
}

/// Observation RINEX [Header]
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// RINEX revision
    pub version: Version,
    /// File type
    pub rinex_type: Type,
    /// Satellite system, [Constellation::Mixed] when this file
    /// contains several systems
    pub constellation: Constellation,
    /// Name of the program that created this file
    pub program: String,
    /// Name of the agency that created this file
    pub run_by: String,
    /// File creation date, as is
    pub date: String,
    /// Comments, in order of appearance
    pub comments: Vec<String>,
    pub marker_name: String,
    pub marker_number: String,
    pub marker_type: String,
    pub observer: String,
    pub agency: String,
    pub receiver: Receiver,
    pub antenna: Antenna,
    /// Approximate marker position
    pub position: Option<Position>,
    /// Antenna eccentricities
    pub antenna_delta: Option<AntennaDelta>,
    /// Observation codes per satellite system.
    /// The order of the codes is the order of the columns
    /// of each satellite record.
    pub obs_types: HashMap<Constellation, Vec<String>>,
    pub signal_strength_unit: String,
    /// Sampling interval, as reported by the receiver
    pub sampling_interval: Option<Duration>,
    pub time_of_first_obs: Option<Epoch>,
    pub time_of_last_obs: Option<Epoch>,
    pub leap_seconds: Option<i32>,
    /// Number of satellites for which observations are stored
    pub num_satellites: Option<u32>,
    /// All labels encountered, in order
    pub labels: Vec<String>,
    /// Non fatal issues encountered while parsing
    pub warnings: Vec<String>,
}

/// Returns content[start..end], tolerating short content
fn field(content: &str, start: usize, end: usize) -> &str {
    let end = end.min(content.len());
    if start >= end {
        return "";
    }
    content.get(start..end).unwrap_or("")
}

/// Parses the three floating point values of APPROX POSITION XYZ
/// and ANTENNA: DELTA H/E/N. Tokens that are not numbers are left to zero.
fn parse_triplet(label: &str, content: &str, warnings: &mut Vec<String>) -> Result<[f64; 3], Error> {
    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 3 {
        return Err(Error::BadHeaderField {
            label: label.to_string(),
            content: content.to_string(),
        });
    }
    let mut values = [0.0_f64; 3];
    for (value, item) in values.iter_mut().zip(items) {
        match item.parse::<f64>() {
            Ok(f) => *value = f,
            Err(_) => {
                warn!("{}: invalid value \"{}\"", label, item);
                warnings.push(format!("{}: invalid value \"{}\"", label, item));
            },
        }
    }
    Ok(values)
}

/// Parses one SYS / # / OBS TYPES line. `continued` is the system described
/// by the previous line of this record (if any), which is continued when the
/// system code is blank. Returns the system this line described.
fn parse_obs_types(
    content: &str,
    continued: Option<Constellation>,
    obs_types: &mut HashMap<Constellation, Vec<String>>,
    line: usize,
) -> Result<Constellation, Error> {
    let code = field(content, 0, 1);

    let system = if code.trim().is_empty() {
        continued
    } else {
        code.chars().next().and_then(constellation::lookup)
    };

    let system = system.ok_or_else(|| Error::UnknownSystem {
        line,
        code: code.to_string(),
    })?;

    let codes = field(content, 7, LABEL_OFFSET)
        .split_ascii_whitespace()
        .map(|code| code.to_string());

    if field(content, 3, 6).trim().is_empty() {
        obs_types.entry(system).or_default().extend(codes);
    } else {
        obs_types.insert(system, codes.collect());
    }

    Ok(system)
}

/// Parses TIME OF FIRST / LAST OBS. The time system tag follows the timestamp,
/// when missing we use the default [TimeScale] of this file.
fn parse_obs_time(content: &str, default_ts: TimeScale, line: usize) -> Result<Epoch, Error> {
    let tag = field(content, 43, LABEL_OFFSET);
    let ts = epoch::parse_timescale(tag).unwrap_or(default_ts);
    epoch::parse_in_timescale(field(content, 0, 43), ts, line)
}

fn parse_int<T: FromStr>(label: &str, content: &str, line: usize) -> Result<T, Error> {
    let value = field(content, 0, 6).trim();
    value.parse::<T>().map_err(|_| Error::ParseInt {
        line,
        field: label.to_string(),
        content: content.to_string(),
    })
}

impl Header {
    /// Parses the [Header] section by consuming lines until END OF HEADER.
    /// Lines shorter than 60 bytes are ignored, unknown labels are
    /// reported as warnings. Fails with [Error::NoHeader] if the stream ends
    /// before the header terminator, or [Error::HeaderTooLong] when it
    /// was not found within [MAX_HEADER_LINES].
    pub(crate) fn parse<R: BufRead>(reader: &mut Reader<R>) -> Result<Self, Error> {
        let mut header = Header::default();
        let mut obs_types_system: Option<Constellation> = None;

        loop {
            let (line_number, line) = match reader.next_line()? {
                Some(next) => next,
                None => return Err(Error::NoHeader),
            };

            if line_number > MAX_HEADER_LINES {
                return Err(Error::HeaderTooLong(MAX_HEADER_LINES));
            }

            if line.len() < LABEL_OFFSET || !line.is_char_boundary(LABEL_OFFSET) {
                continue;
            }

            let (content, label) = line.split_at(LABEL_OFFSET);
            let label = label.trim();
            header.labels.push(label.to_string());

            match label {
                "RINEX VERSION / TYPE" => {
                    header.version = Version::from_str(field(content, 0, 20)).map_err(|_| {
                        Error::BadHeaderField {
                            label: label.to_string(),
                            content: content.to_string(),
                        }
                    })?;

                    if let Some(code) = field(content, 20, 21).chars().next() {
                        header.rinex_type = Type::from_code(code);
                    }

                    let code = field(content, 40, 41);
                    header.constellation = code
                        .chars()
                        .next()
                        .and_then(constellation::lookup)
                        .ok_or_else(|| Error::UnknownSystem {
                            line: line_number,
                            code: code.to_string(),
                        })?;
                },
                "PGM / RUN BY / DATE" => {
                    header.program = field(content, 0, 20).trim().to_string();
                    header.run_by = field(content, 20, 40).trim().to_string();
                    header.date = field(content, 40, 60).trim().to_string();
                },
                "COMMENT" => {
                    header.comments.push(content.trim().to_string());
                },
                "MARKER NAME" => {
                    header.marker_name = content.trim().to_string();
                },
                "MARKER NUMBER" => {
                    header.marker_number = field(content, 0, 20).trim().to_string();
                },
                "MARKER TYPE" => {
                    header.marker_type = field(content, 20, 40).trim().to_string();
                },
                "OBSERVER / AGENCY" => {
                    header.observer = field(content, 0, 20).trim().to_string();
                    header.agency = field(content, 20, 60).trim().to_string();
                },
                "REC # / TYPE / VERS" => {
                    header.receiver = Receiver {
                        sn: field(content, 0, 20).trim().to_string(),
                        model: field(content, 20, 40).trim().to_string(),
                        firmware: field(content, 40, 60).trim().to_string(),
                    };
                },
                "ANT # / TYPE" => {
                    header.antenna = Antenna {
                        sn: field(content, 0, 20).trim().to_string(),
                        model: field(content, 20, 40).trim().to_string(),
                    };
                },
                "APPROX POSITION XYZ" => {
                    let [x, y, z] = parse_triplet(label, content, &mut header.warnings)?;
                    header.position = Some(Position { x, y, z });
                },
                "ANTENNA: DELTA H/E/N" => {
                    let [up, east, north] = parse_triplet(label, content, &mut header.warnings)?;
                    header.antenna_delta = Some(AntennaDelta { north, east, up });
                },
                "SYS / # / OBS TYPES" => {
                    let system = parse_obs_types(
                        content,
                        obs_types_system,
                        &mut header.obs_types,
                        line_number,
                    )?;
                    obs_types_system = Some(system);
                },
                "SIGNAL STRENGTH UNIT" => {
                    header.signal_strength_unit = field(content, 0, 20).trim().to_string();
                },
                "INTERVAL" => match content.trim().parse::<f64>() {
                    Ok(interval) => {
                        header.sampling_interval = Some(Duration::from_seconds(interval));
                    },
                    Err(_) => {
                        warn!("ignoring invalid INTERVAL \"{}\"", content.trim());
                        header
                            .warnings
                            .push(format!("invalid INTERVAL \"{}\"", content.trim()));
                    },
                },
                "TIME OF FIRST OBS" => {
                    let ts = header.default_timescale();
                    header.time_of_first_obs = Some(parse_obs_time(content, ts, line_number)?);
                },
                "TIME OF LAST OBS" => {
                    let ts = header.default_timescale();
                    header.time_of_last_obs = Some(parse_obs_time(content, ts, line_number)?);
                },
                "LEAP SECONDS" => {
                    header.leap_seconds = Some(parse_int(label, content, line_number)?);
                },
                "# OF SATELLITES" => {
                    header.num_satellites = Some(parse_int(label, content, line_number)?);
                },
                "END OF HEADER" => {
                    debug!("header: {} lines", line_number);
                    return Ok(header);
                },
                _ => {
                    warn!("header field \"{}\" not handled yet", label);
                    header
                        .warnings
                        .push(format!("header field \"{}\" not handled yet", label));
                },
            }
        }
    }

    /// Returns the ordered observation codes of given system
    pub fn obs_types(&self, constellation: Constellation) -> Option<&[String]> {
        self.obs_types.get(&constellation).map(|codes| codes.as_slice())
    }

    /// [TimeScale] in which timestamps are expressed. This is the time system
    /// of TIME OF FIRST OBS, or the default time system of the constellation.
    pub fn timescale(&self) -> TimeScale {
        match self.time_of_first_obs {
            Some(t) => t.time_scale,
            None => self.default_timescale(),
        }
    }

    fn default_timescale(&self) -> TimeScale {
        self.constellation.timescale().unwrap_or(TimeScale::GPST)
    }
}

impl FromStr for Header {
    type Err = Error;
    /// Parses a [Header] from readable content
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(content.as_bytes());
        Self::parse(&mut reader)
    }
}
