#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

#[macro_use]
extern crate lazy_static;

pub mod constellation;
pub mod decoder;
pub mod diff;
pub mod epoch;
pub mod file;
pub mod hatanaka;
pub mod header;
pub mod observation;
pub mod stats;
pub mod sv;
pub mod sync;
pub mod types;
pub mod version;

mod error;
mod reader;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};

/// Package to include all basic structures
pub mod prelude {
    // export
    pub use crate::{
        decoder::{DecoderState, Next, ObsDecoder},
        diff::{diff_pair, DiffOptions, Discrepancy, Mismatch},
        epoch::EpochFlag,
        error::{Error, ErrorKind},
        file::{DiffReport, ObsFile},
        hatanaka::{Direction, ExternalTool, ToolError, Transform},
        header::Header,
        observation::{ObsEpoch, Observation, SatelliteObservations},
        stats::FileStatistics,
        sync::{SynchronizedPair, Synchronizer},
        types::Type as RinexType,
        version::Version,
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}
