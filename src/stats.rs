//! Observation RINEX statistics
use crate::{
    decoder::ObsDecoder,
    prelude::{Duration, Epoch},
    Error,
};

use std::io::BufRead;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sampling is infered from this many epoch intervals, at most
const SAMPLING_GAPS: usize = 10;

/// [FileStatistics] gathered over a complete stream
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FileStatistics {
    /// Number of decoded epochs
    pub num_epochs: usize,
    /// Dominant sampling interval, by analysis of the first epochs
    pub sampling: Option<Duration>,
    /// First [Epoch] encountered
    pub time_of_first_obs: Option<Epoch>,
    /// Last [Epoch] encountered
    pub time_of_last_obs: Option<Epoch>,
}

impl FileStatistics {
    /// Consumes all epochs of given [ObsDecoder].
    /// Fails with the error that stopped decoding, if any.
    pub fn collect<R: BufRead>(decoder: ObsDecoder<R>) -> Result<Self, Error> {
        let mut stats = Self::default();
        let mut gaps = Vec::with_capacity(SAMPLING_GAPS);

        for epoch in decoder {
            let t = epoch?.epoch;
            match stats.time_of_last_obs {
                Some(prev) => {
                    if gaps.len() < SAMPLING_GAPS {
                        gaps.push(t - prev);
                    }
                },
                None => stats.time_of_first_obs = Some(t),
            }
            stats.time_of_last_obs = Some(t);
            stats.num_epochs += 1;
        }

        stats.sampling = dominant_interval(&gaps);
        Ok(stats)
    }

    /// Total [Duration] of the stream
    pub fn duration(&self) -> Option<Duration> {
        Some(self.time_of_last_obs? - self.time_of_first_obs?)
    }
}

/// Most frequent interval, the shortest one on ties
fn dominant_interval(gaps: &[Duration]) -> Option<Duration> {
    gaps.iter()
        .fold(Vec::<(Duration, usize)>::new(), |mut histogram, dt| {
            match histogram.iter_mut().find(|(delta, _)| delta == dt) {
                Some((_, pop)) => *pop += 1,
                None => histogram.push((*dt, 1)),
            }
            histogram
        })
        .into_iter()
        .max_by(|(dt_i, pop_i), (dt_j, pop_j)| pop_i.cmp(pop_j).then(dt_j.cmp(dt_i)))
        .map(|(dt, _)| dt)
}
