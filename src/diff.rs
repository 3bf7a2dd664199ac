//! Epoch to epoch comparison of two Observation RINEX streams
use crate::{
    constellation,
    observation::{prn_string, Observation, SatelliteObservations},
    prelude::{Constellation, Epoch, SV},
    sync::SynchronizedPair,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default comparison tolerance
pub const DEFAULT_TOLERANCE: f64 = 0.005;

/// [DiffOptions] select what is compared, and how
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffOptions {
    /// Compared satellite systems, None meaning all of them
    pub systems: Option<Vec<Constellation>>,
    /// Report signal strength differences
    pub check_snr: bool,
    /// Largest tolerated difference
    pub tolerance: f64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            systems: None,
            check_snr: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl DiffOptions {
    /// Restricts comparison to given satellite systems
    pub fn with_systems(&self, systems: &[Constellation]) -> Self {
        let mut s = self.clone();
        s.systems = Some(systems.to_vec());
        s
    }
    /// Enables or disables signal strength comparison
    pub fn with_snr_check(&self, check_snr: bool) -> Self {
        let mut s = self.clone();
        s.check_snr = check_snr;
        s
    }
    /// Defines the largest tolerated difference
    pub fn with_tolerance(&self, tolerance: f64) -> Self {
        let mut s = self.clone();
        s.tolerance = tolerance;
        s
    }
    /// Builds [DiffOptions] restricted to the systems described by
    /// a code string, like "GRE". Returns the first unknown code on error.
    pub fn from_system_codes(codes: &str) -> Result<Self, char> {
        let systems = constellation::parse_codes(codes)?;
        Ok(Self::default().with_systems(&systems))
    }
    /// True if given system should be compared
    pub fn compares(&self, constellation: Constellation) -> bool {
        match &self.systems {
            Some(systems) => systems.contains(&constellation),
            None => true,
        }
    }
}

/// Why two observations were reported
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mismatch {
    /// Loss of lock indicators differ
    LossOfLock,
    /// Compared values differ by more than the tolerance
    Value,
    /// Signal strength indicators differ
    SignalStrength,
}

/// [Discrepancy] between two synchronized epochs.
/// These are findings, not errors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Discrepancy {
    /// Satellite is missing in the secondary epoch
    MissingSatellite { epoch: Epoch, sv: SV },
    /// Observable is missing in the secondary epoch
    MissingObservable { epoch: Epoch, sv: SV, code: String },
    /// Observations differ. Phase observations are represented
    /// by their fractional part, which is what was compared.
    Observation {
        epoch: Epoch,
        sv: SV,
        code: String,
        mismatch: Mismatch,
        lhs: Observation,
        rhs: Observation,
    },
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::MissingSatellite { epoch, sv } => {
                write!(f, "{} no observations found for {}", epoch, prn_string(*sv))
            },
            Self::MissingObservable { epoch, sv, code } => {
                write!(f, "{} {} key \"{}\" does not exist", epoch, prn_string(*sv), code)
            },
            Self::Observation {
                epoch,
                sv,
                code,
                lhs,
                rhs,
                ..
            } => write!(
                f,
                "{} {} {} {:14.3} {} {} | {:14.3} {} {}",
                epoch,
                prn_string(*sv),
                code,
                lhs.value,
                lhs.lli,
                lhs.snr,
                rhs.value,
                rhs.lli,
                rhs.snr
            ),
        }
    }
}

/// Fractional part of given value, sign is preserved
pub fn fraction(value: f64) -> f64 {
    value.fract()
}

/// True for carrier phase observables
fn is_phase(code: &str) -> bool {
    code.starts_with('L')
}

/// Compares two synchronized epochs. Every satellite of the primary epoch,
/// from a selected system, is searched in the secondary epoch and each of its
/// observations is compared to the secondary one.
pub fn diff_pair(pair: &SynchronizedPair, opts: &DiffOptions) -> Vec<Discrepancy> {
    let epoch = pair.epoch();
    let mut discrepancies = Vec::new();

    for lhs in pair.primary.satellites.iter() {
        if !opts.compares(lhs.sv.constellation) {
            continue;
        }
        match pair.secondary.satellite(lhs.sv) {
            Some(rhs) => diff_satellite(epoch, lhs, rhs, opts, &mut discrepancies),
            None => discrepancies.push(Discrepancy::MissingSatellite {
                epoch,
                sv: lhs.sv,
            }),
        }
    }
    discrepancies
}

fn diff_satellite(
    epoch: Epoch,
    lhs: &SatelliteObservations,
    rhs: &SatelliteObservations,
    opts: &DiffOptions,
    discrepancies: &mut Vec<Discrepancy>,
) {
    for (code, obs_lhs) in lhs.observations.iter() {
        let obs_rhs = match rhs.get(code) {
            Some(obs) => obs,
            None => {
                discrepancies.push(Discrepancy::MissingObservable {
                    epoch,
                    sv: lhs.sv,
                    code: code.clone(),
                });
                continue;
            },
        };

        let (mut compared_lhs, mut compared_rhs) = (*obs_lhs, *obs_rhs);
        if is_phase(code) {
            compared_lhs.value = fraction(obs_lhs.value);
            compared_rhs.value = fraction(obs_rhs.value);
        }

        let mismatch = if compared_lhs.lli != compared_rhs.lli {
            Some(Mismatch::LossOfLock)
        } else if (compared_lhs.value - compared_rhs.value).abs() > opts.tolerance {
            Some(Mismatch::Value)
        } else if opts.check_snr && compared_lhs.snr != compared_rhs.snr {
            Some(Mismatch::SignalStrength)
        } else {
            None
        };

        if let Some(mismatch) = mismatch {
            discrepancies.push(Discrepancy::Observation {
                epoch,
                sv: lhs.sv,
                code: code.clone(),
                mismatch,
                lhs: compared_lhs,
                rhs: compared_rhs,
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{epoch::EpochFlag, observation::ObsEpoch, prelude::TimeScale};

    fn sat(sv: SV, observations: &[(&str, f64, u8, u8)]) -> SatelliteObservations {
        SatelliteObservations {
            sv,
            observations: observations
                .iter()
                .map(|(code, value, lli, snr)| (code.to_string(), Observation::new(*value, *lli, *snr)))
                .collect(),
        }
    }

    fn pair(lhs: Vec<SatelliteObservations>, rhs: Vec<SatelliteObservations>) -> SynchronizedPair {
        let epoch = Epoch::from_gregorian(2018, 11, 6, 19, 0, 0, 0, TimeScale::GPST);
        let obs_epoch = |satellites: Vec<SatelliteObservations>| ObsEpoch {
            epoch,
            flag: EpochFlag::Ok,
            num_sat: satellites.len() as u16,
            satellites,
        };
        SynchronizedPair {
            primary: obs_epoch(lhs),
            secondary: obs_epoch(rhs),
        }
    }

    const G01: SV = SV {
        constellation: Constellation::GPS,
        prn: 1,
    };
    const E05: SV = SV {
        constellation: Constellation::Galileo,
        prn: 5,
    };

    #[test]
    fn options() {
        let opts = DiffOptions::default();
        assert!(opts.compares(Constellation::BeiDou));
        assert!(!opts.check_snr);
        assert_eq!(opts.tolerance, 0.005);

        let opts = DiffOptions::from_system_codes("GE").unwrap();
        assert!(opts.compares(Constellation::GPS));
        assert!(opts.compares(Constellation::Galileo));
        assert!(!opts.compares(Constellation::Glonass));

        assert_eq!(DiffOptions::from_system_codes("GX"), Err('X'));

        let opts = opts.with_snr_check(true).with_tolerance(0.1);
        assert!(opts.check_snr);
        assert_eq!(opts.tolerance, 0.1);
    }

    #[test]
    fn fractions() {
        assert!((fraction(107738728.871) - 0.871).abs() < 1e-6);
        assert!((fraction(-12.25) + 0.25).abs() < 1e-9);
        assert_eq!(fraction(3.0), 0.0);
    }

    #[test]
    fn identical_epochs() {
        let satellites = vec![
            sat(G01, &[("C1C", 20147683.7, 0, 7), ("L1C", 107738728.871, 1, 8)]),
            sat(E05, &[("C1X", 23000000.0, 0, 0)]),
        ];
        let pair = pair(satellites.clone(), satellites);
        let opts = DiffOptions::default().with_snr_check(true);
        assert!(diff_pair(&pair, &opts).is_empty());
    }

    #[test]
    fn phase_tolerance() {
        let pair = pair(
            vec![sat(G01, &[("L1C", 107738728.871, 0, 0), ("L2W", 83952200.250, 0, 0)])],
            vec![sat(G01, &[("L1C", 107738700.873, 0, 0), ("L2W", 83952271.260, 0, 0)])],
        );
        let discrepancies = diff_pair(&pair, &DiffOptions::default());
        assert_eq!(discrepancies.len(), 1);
        match &discrepancies[0] {
            Discrepancy::Observation {
                code, mismatch, lhs, rhs, ..
            } => {
                assert_eq!(code, "L2W");
                assert_eq!(*mismatch, Mismatch::Value);
                assert!((lhs.value - 0.25).abs() < 1e-6);
                assert!((rhs.value - 0.26).abs() < 1e-6);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn raw_values() {
        let pair = pair(
            vec![sat(G01, &[("C1C", 20147683.700, 0, 0), ("D1C", 2178.160, 0, 0)])],
            vec![sat(G01, &[("C1C", 20147684.700, 0, 0), ("D1C", 2178.162, 0, 0)])],
        );
        let discrepancies = diff_pair(&pair, &DiffOptions::default());
        assert_eq!(discrepancies.len(), 1);
        assert!(matches!(
            &discrepancies[0],
            Discrepancy::Observation { code, mismatch: Mismatch::Value, .. } if code == "C1C"
        ));
    }

    #[test]
    fn flags() {
        let lhs = vec![sat(G01, &[("C1C", 20147683.7, 0, 7), ("L1C", 107738728.871, 0, 8)])];
        let rhs = vec![sat(G01, &[("C1C", 20147683.7, 0, 6), ("L1C", 107738728.871, 1, 8)])];
        let pair = pair(lhs, rhs);

        let discrepancies = diff_pair(&pair, &DiffOptions::default());
        assert_eq!(discrepancies.len(), 1);
        assert!(matches!(
            &discrepancies[0],
            Discrepancy::Observation { mismatch: Mismatch::LossOfLock, .. }
        ));

        let discrepancies = diff_pair(&pair, &DiffOptions::default().with_snr_check(true));
        assert_eq!(discrepancies.len(), 2);
        assert!(matches!(
            &discrepancies[0],
            Discrepancy::Observation { mismatch: Mismatch::SignalStrength, .. }
        ));
    }

    #[test]
    fn missing_data() {
        let g02 = SV::new(Constellation::GPS, 2);
        let pair = pair(
            vec![
                sat(G01, &[("C1C", 1.0, 0, 0), ("C2W", 2.0, 0, 0)]),
                sat(g02, &[("C1C", 1.0, 0, 0)]),
                sat(E05, &[("C1X", 1.0, 0, 0)]),
            ],
            vec![sat(G01, &[("C1C", 1.0, 0, 0), ("C5Q", 3.0, 0, 0)])],
        );

        let discrepancies = diff_pair(&pair, &DiffOptions::default());
        assert_eq!(discrepancies.len(), 3);
        assert!(matches!(
            &discrepancies[0],
            Discrepancy::MissingObservable { sv, code, .. } if *sv == G01 && code == "C2W"
        ));
        assert!(matches!(
            &discrepancies[1],
            Discrepancy::MissingSatellite { sv, .. } if *sv == g02
        ));
        assert!(discrepancies[2].to_string().ends_with("no observations found for E05"));

        let opts = DiffOptions::default().with_systems(&[Constellation::Galileo]);
        assert_eq!(diff_pair(&pair, &opts).len(), 1);
    }
}
