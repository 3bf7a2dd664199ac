//! Streaming Observation RINEX decoder
use crate::{
    epoch::{parse_in_timescale, EpochFlag},
    header::Header,
    observation::{ObsEpoch, Observation, SatelliteObservations},
    prelude::{Epoch, TimeScale},
    reader::Reader,
    sv, Error,
};

use std::{io::BufRead, str::FromStr};

use log::{debug, error};

/// Epoch descriptions start with this marker
const EPOCH_MARKER: &str = "> ";

/// Width of an observation value field (F14.3)
const VALUE_WIDTH: usize = 14;

/// Satellite records start with a 3 byte descriptor
const SV_WIDTH: usize = 3;

/// [DecoderState] once the header has been decoded
#[derive(Debug, Clone, Default)]
pub enum DecoderState {
    /// Epochs are being produced
    #[default]
    Streaming,
    /// End of stream was reached without error
    Exhausted,
    /// Decoding stopped on this error. This is terminal:
    /// the first error ever encountered is the only one reported.
    Failed(Error),
}

impl DecoderState {
    /// True when more epochs may come
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

/// Outcome of [ObsDecoder::next_epoch]
#[derive(Debug, Clone)]
pub enum Next<'a> {
    /// A new epoch was decoded
    Epoch(&'a ObsEpoch),
    /// End of stream
    Exhausted,
    /// Decoding failed on this error
    Failed(&'a Error),
}

/// [ObsDecoder] decodes one Observation RINEX stream, epoch after epoch.
/// The header is decoded on creation, epochs are then decoded on demand.
/// ```
/// use rinex_obs::prelude::*;
/// use std::{fs::File, io::BufReader};
///
/// let fd = File::open("test_resources/OBS/V3/ACOR00ESP_R_20183100000_01D_30S_MO.rnx")
///     .unwrap();
/// let mut decoder = ObsDecoder::new(BufReader::new(fd))
///     .unwrap();
///
/// while let Next::Epoch(epoch) = decoder.next_epoch() {
///     println!("{}", epoch.summary());
/// }
/// assert!(decoder.error().is_none());
/// ```
pub struct ObsDecoder<R: BufRead> {
    reader: Reader<R>,
    header: Header,
    timescale: TimeScale,
    epoch: Option<ObsEpoch>,
    state: DecoderState,
    error_reported: bool,
}

impl<R: BufRead> ObsDecoder<R> {
    /// Creates a new [ObsDecoder], which consumes and decodes the header
    /// section right away. Any header failure is returned here,
    /// no epoch will ever be produced in that case.
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut reader = Reader::new(reader);
        let header = Header::parse(&mut reader).map_err(|e| {
            error!("header: {}", e);
            e
        })?;
        let timescale = header.timescale();
        debug!(
            "header decoded: v{} {} ({} lines)",
            header.version,
            header.constellation,
            reader.line_number()
        );
        Ok(Self {
            reader,
            header,
            timescale,
            epoch: None,
            state: DecoderState::Streaming,
            error_reported: false,
        })
    }

    /// Returns the decoded [Header]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the last decoded epoch, if any
    pub fn epoch(&self) -> Option<&ObsEpoch> {
        self.epoch.as_ref()
    }

    /// Returns the error that stopped this decoder, if any
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            DecoderState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Returns current [DecoderState]
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Decodes the next epoch. Lines that do not start an epoch are skipped.
    /// Once [Next::Exhausted] or [Next::Failed] has been returned, this
    /// keeps returning the same outcome and the stream is no longer read.
    pub fn next_epoch(&mut self) -> Next<'_> {
        if self.state.is_streaming() {
            match decode_epoch(&mut self.reader, &self.header, self.timescale) {
                Ok(Some(epoch)) => {
                    self.epoch = Some(epoch);
                },
                Ok(None) => {
                    debug!("end of stream ({} lines)", self.reader.line_number());
                    self.state = DecoderState::Exhausted;
                },
                Err(e) => self.fail(e),
            }
        }
        match (&self.state, &self.epoch) {
            (DecoderState::Streaming, Some(epoch)) => Next::Epoch(epoch),
            (DecoderState::Failed(e), _) => Next::Failed(e),
            _ => Next::Exhausted,
        }
    }

    /// Stops this decoder on given error, unless it already failed.
    pub(crate) fn fail(&mut self, e: Error) {
        if let DecoderState::Failed(first) = &self.state {
            debug!("already failed on \"{}\", dropping \"{}\"", first, e);
            return;
        }
        error!("{}", e);
        self.state = DecoderState::Failed(e);
    }
}

impl<R: BufRead> Iterator for ObsDecoder<R> {
    type Item = Result<ObsEpoch, Error>;
    /// Yields decoded epochs. The error that stopped decoding, if any,
    /// is yielded once, right before the iteration ends.
    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.next_epoch() {
            Next::Epoch(epoch) => Some(Ok(epoch.clone())),
            Next::Exhausted => None,
            Next::Failed(e) => Some(Err(e.clone())),
        };
        if let Some(Err(_)) = item {
            if self.error_reported {
                return None;
            }
            self.error_reported = true;
        }
        item
    }
}

/// Decodes the next epoch from given stream, or returns None on end of stream.
fn decode_epoch<R: BufRead>(
    reader: &mut Reader<R>,
    header: &Header,
    timescale: TimeScale,
) -> Result<Option<ObsEpoch>, Error> {
    let (epoch, flag, num_sat) = loop {
        let (line_number, line) = match reader.next_line()? {
            Some(next) => next,
            None => return Ok(None),
        };
        if !line.starts_with(EPOCH_MARKER) {
            debug!("line {}: skipping \"{}\"", line_number, line);
            continue;
        }
        break parse_epoch_line(line, line_number, timescale)?;
    };

    let mut satellites = Vec::with_capacity(num_sat as usize);

    for nth in 0..num_sat {
        let last_line = reader.line_number();
        let (line_number, line) = match reader.next_line()? {
            Some(next) => next,
            None => {
                return Err(Error::MissingSatellites {
                    line: last_line,
                    expected: num_sat,
                    found: nth,
                })
            },
        };

        let sv = sv::parse(line, line_number)?;
        let mut sat = SatelliteObservations::new(sv);

        let remainder = line.get(SV_WIDTH..).unwrap_or_default();
        if !remainder.trim().is_empty() {
            match header.obs_types(sv.constellation) {
                Some(codes) => parse_observations(line, codes, line_number, &mut sat)?,
                None => debug!("line {}: no observables declared for {}", line_number, sv),
            }
        }

        satellites.push(sat);
    }

    Ok(Some(ObsEpoch {
        epoch,
        flag,
        num_sat,
        satellites,
    }))
}

/// Parses "> yyyy mm dd hh mm ss.sssssss  f nnn" epoch descriptions
fn parse_epoch_line(
    line: &str,
    line_number: usize,
    timescale: TimeScale,
) -> Result<(Epoch, EpochFlag, u16), Error> {
    let bad_line = || Error::BadEpochLine {
        line: line_number,
        content: line.to_string(),
    };

    let datetime = line.get(2..29).ok_or_else(bad_line)?;
    let epoch = parse_in_timescale(datetime, timescale, line_number)?;

    let flag = line.get(31..32).ok_or_else(bad_line)?;
    let flag = EpochFlag::from_str(flag).map_err(|_| Error::EpochFlag {
        line: line_number,
        content: flag.to_string(),
    })?;

    let num_sat = line.get(32..35).ok_or_else(bad_line)?;
    let num_sat = num_sat
        .trim()
        .parse::<u16>()
        .map_err(|_| Error::ParseInt {
            line: line_number,
            field: "number of satellites".to_string(),
            content: num_sat.to_string(),
        })?;

    Ok((epoch, flag, num_sat))
}

/// Parses LLI and SNR single digit flags, blank means 0
fn parse_flag(content: &str, field: &str, line_number: usize) -> Result<u8, Error> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u8>().map_err(|_| Error::ParseInt {
        line: line_number,
        field: field.to_string(),
        content: content.to_string(),
    })
}

/// Walks the observation fields of a satellite record, in declared order.
/// Each field is a 14 byte value followed by LLI and SNR flags.
/// The line may stop in between two fields, or right after a value:
/// remaining fields are then not produced.
fn parse_observations(
    line: &str,
    codes: &[String],
    line_number: usize,
    sat: &mut SatelliteObservations,
) -> Result<(), Error> {
    let len = line.len();
    let mut offset = SV_WIDTH;

    for code in codes {
        if offset >= len {
            break;
        }

        let content = line
            .get(offset..offset + VALUE_WIDTH)
            .ok_or_else(|| Error::ObservationOutOfRange {
                line: line_number,
                code: code.to_string(),
            })?;

        let trimmed = content.trim();
        let value = if trimmed.is_empty() {
            0.0
        } else {
            trimmed.parse::<f64>().map_err(|_| Error::ParseFloat {
                line: line_number,
                field: code.to_string(),
                content: content.to_string(),
            })?
        };
        offset += VALUE_WIDTH;

        let lli = match line.get(offset..offset + 1) {
            Some(content) => parse_flag(content, "LLI", line_number)?,
            None => {
                sat.observations
                    .push((code.to_string(), Observation::new(value, 0, 0)));
                break;
            },
        };
        offset += 1;

        let snr = match line.get(offset..offset + 1) {
            Some(content) => parse_flag(content, "SNR", line_number)?,
            None => {
                sat.observations
                    .push((code.to_string(), Observation::new(value, lli, 0)));
                break;
            },
        };
        offset += 1;

        sat.observations
            .push((code.to_string(), Observation::new(value, lli, snr)));
    }
    Ok(())
}
