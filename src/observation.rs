//! Observation records
use crate::{
    constellation,
    epoch::EpochFlag,
    prelude::{Constellation, Epoch, SV},
};

use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single measurement, as described by one observation field
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Measured value. Blank fields are decoded as 0.0:
    /// a missing observation cannot be told apart from a null one.
    pub value: f64,
    /// Loss of lock indicator, 0 when blank
    pub lli: u8,
    /// Signal strength indicator, 0 when blank
    pub snr: u8,
}

impl Observation {
    /// Builds a new [Observation]
    pub fn new(value: f64, lli: u8, snr: u8) -> Self {
        Self { value, lli, snr }
    }
}

/// All [Observation]s of one satellite, at a given epoch
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteObservations {
    /// Satellite
    pub sv: SV,
    /// Observations indexed by code, in the order declared by the header
    pub observations: Vec<(String, Observation)>,
}

impl SatelliteObservations {
    /// Builds an empty set of observations for given satellite
    pub fn new(sv: SV) -> Self {
        Self {
            sv,
            observations: Vec::new(),
        }
    }
    /// Returns [Observation] for given code, if it exists
    pub fn get(&self, code: &str) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, observation)| observation)
    }
    /// Observation codes, in declared order
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.observations.iter().map(|(code, _)| code.as_str())
    }
    pub fn len(&self) -> usize {
        self.observations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// One decoded observation epoch
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObsEpoch {
    /// Sampling instant
    pub epoch: Epoch,
    /// [EpochFlag] attached to this instant
    pub flag: EpochFlag,
    /// Number of satellites this epoch describes
    pub num_sat: u16,
    /// Satellite records, in order of appearance
    pub satellites: Vec<SatelliteObservations>,
}

impl ObsEpoch {
    /// Returns observations of given satellite, if it was observed
    pub fn satellite(&self, sv: SV) -> Option<&SatelliteObservations> {
        self.satellites.iter().find(|sat| sat.sv == sv)
    }

    /// Returns the satellite systems observed at this epoch
    pub fn systems(&self) -> impl Iterator<Item = Constellation> + '_ {
        self.satellites.iter().map(|sat| sat.sv.constellation).unique()
    }

    /// Short description: timestamp, flag and number of satellites
    pub fn summary(&self) -> String {
        format!("{} Flag: {} #prn: {}", self.epoch, self.flag, self.num_sat)
    }

    /// Tabular description, one line per satellite, restricted to given
    /// satellite systems. Values are listed in declared order.
    pub fn tabular(&self, systems: &[Constellation]) -> String {
        self.satellites
            .iter()
            .filter(|sat| systems.contains(&sat.sv.constellation))
            .map(|sat| {
                let values = sat
                    .observations
                    .iter()
                    .map(|(_, obs)| format!("{:14.3}", obs.value))
                    .join(" ");
                format!("{} {} {}", self.epoch, prn_string(sat.sv), values)
            })
            .join("\n")
    }
}

/// Formats a satellite as its RINEX descriptor, "G07" for example
pub(crate) fn prn_string(sv: SV) -> String {
    let code = constellation::code(sv.constellation).unwrap_or('?');
    format!("{}{:02}", code, sv.prn)
}
