//! Synchronization of two Observation RINEX streams
use crate::{
    decoder::{Next, ObsDecoder},
    observation::ObsEpoch,
    prelude::Epoch,
    Error,
};

use std::io::BufRead;

use log::trace;

/// Two epochs sharing the same timestamp, one from each stream
#[derive(Clone, Debug, PartialEq)]
pub struct SynchronizedPair {
    /// Epoch of the primary stream
    pub primary: ObsEpoch,
    /// Epoch of the secondary stream
    pub secondary: ObsEpoch,
}

impl SynchronizedPair {
    /// Common timestamp
    pub fn epoch(&self) -> Epoch {
        self.primary.epoch
    }
}

/// [Synchronizer] drives two [ObsDecoder]s and only emits epochs
/// that both streams have in common. Both streams must be chronological.
/// Synchronization stops as soon as one of the streams is exhausted or failed.
/// A failure of the secondary stream is forwarded to the primary decoder,
/// wrapped as [Error::Secondary], so only the primary needs to be inspected.
pub struct Synchronizer<'a, R1: BufRead, R2: BufRead> {
    primary: &'a mut ObsDecoder<R1>,
    secondary: &'a mut ObsDecoder<R2>,
    pairs: usize,
}

impl<'a, R1: BufRead, R2: BufRead> Synchronizer<'a, R1, R2> {
    /// Creates a new [Synchronizer], which is then the only driver
    /// of both decoders.
    pub fn new(primary: &'a mut ObsDecoder<R1>, secondary: &'a mut ObsDecoder<R2>) -> Self {
        Self {
            primary,
            secondary,
            pairs: 0,
        }
    }

    /// Number of pairs emitted so far
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Error that stopped synchronization, if any.
    /// This is the primary stream's error, which includes forwarded
    /// secondary errors.
    pub fn error(&self) -> Option<&Error> {
        self.primary.error()
    }

    /// Returns the next pair of epochs sharing the same timestamp.
    /// Timestamps that only exist in one of the streams are skipped.
    pub fn next_pair(&mut self) -> Option<SynchronizedPair> {
        let mut t_primary = self.advance_primary()?;
        let mut t_secondary = self.advance_secondary()?;
        loop {
            if t_primary == t_secondary {
                break;
            }
            if t_primary < t_secondary {
                trace!("{} missing in secondary stream", t_primary);
                t_primary = self.advance_primary()?;
            } else {
                trace!("{} missing in primary stream", t_secondary);
                t_secondary = self.advance_secondary()?;
            }
        }

        let primary = self.primary.epoch()?.clone();
        let secondary = self.secondary.epoch()?.clone();
        self.pairs += 1;
        trace!("synchronized on {}", primary.epoch);
        Some(SynchronizedPair { primary, secondary })
    }

    fn advance_primary(&mut self) -> Option<Epoch> {
        match self.primary.next_epoch() {
            Next::Epoch(epoch) => Some(epoch.epoch),
            Next::Exhausted | Next::Failed(_) => None,
        }
    }

    fn advance_secondary(&mut self) -> Option<Epoch> {
        let error = match self.secondary.next_epoch() {
            Next::Epoch(epoch) => return Some(epoch.epoch),
            Next::Exhausted => return None,
            Next::Failed(e) => e.clone(),
        };
        self.primary.fail(Error::Secondary(Box::new(error)));
        None
    }
}

impl<'a, R1: BufRead, R2: BufRead> Iterator for Synchronizer<'a, R1, R2> {
    type Item = SynchronizedPair;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_pair()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{prelude::TimeScale, ErrorKind};
    use std::io::Cursor;

    const HEADER: &str = concat!(
        "     3.04           OBSERVATION DATA    G (GPS)             RINEX VERSION / TYPE\n",
        "G    1 C1C                                                  SYS / # / OBS TYPES \n",
        "                                                            END OF HEADER       \n",
    );

    /// Builds a decoder producing one epoch per given second of 2020-01-01T00:00
    fn decoder(seconds: &[u8]) -> ObsDecoder<Cursor<String>> {
        let mut content = HEADER.to_string();
        for ss in seconds {
            content.push_str(&format!(
                "> 2020 01 01 00 00 {:2}.0000000  0  1\nG01  20000000.000\n",
                ss
            ));
        }
        ObsDecoder::new(Cursor::new(content)).unwrap()
    }

    fn epochs(seconds: &[u8]) -> Vec<Epoch> {
        seconds
            .iter()
            .map(|ss| Epoch::from_gregorian(2020, 1, 1, 0, 0, *ss, 0, TimeScale::GPST))
            .collect()
    }

    #[test]
    fn sorted_intersection() {
        for (lhs, rhs, expected) in [
            (vec![0, 1, 2, 3], vec![0, 1, 2, 3], vec![0, 1, 2, 3]),
            (vec![0, 2, 4, 6, 8], vec![1, 2, 3, 4, 8, 9], vec![2, 4, 8]),
            (vec![5, 6, 7], vec![0, 1, 2], vec![]),
            (vec![], vec![0, 1, 2], vec![]),
            (vec![0, 30], vec![30], vec![30]),
            (vec![1, 3, 5, 7], vec![0, 7], vec![7]),
        ] {
            let mut primary = decoder(&lhs);
            let mut secondary = decoder(&rhs);
            let mut sync = Synchronizer::new(&mut primary, &mut secondary);
            let pairs = sync.by_ref().collect::<Vec<_>>();
            for pair in pairs.iter() {
                assert_eq!(pair.primary.epoch, pair.secondary.epoch);
            }
            assert_eq!(
                pairs.iter().map(|pair| pair.epoch()).collect::<Vec<_>>(),
                epochs(&expected),
                "{:?} / {:?}",
                lhs,
                rhs
            );
            assert_eq!(sync.pairs(), expected.len());
            assert!(sync.error().is_none());
        }
    }

    #[test]
    fn secondary_error_is_forwarded() {
        let mut primary = decoder(&[0, 1, 2]);
        let content = format!(
            "{}> 2020 01 01 00 00  0.0000000  0  1\nG01  20000000.000\n> 2020 01 01 00 00  1.0000000  0  1\nX01\n",
            HEADER
        );
        let mut secondary = ObsDecoder::new(Cursor::new(content)).unwrap();

        let mut sync = Synchronizer::new(&mut primary, &mut secondary);
        assert!(sync.next_pair().is_some());
        assert!(sync.next_pair().is_none());
        assert!(sync.next_pair().is_none());

        match sync.error() {
            Some(Error::Secondary(e)) => {
                assert!(matches!(**e, Error::UnknownSystem { .. }));
            },
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(primary.error().map(|e| e.kind()), Some(ErrorKind::Grammar));
    }
}
