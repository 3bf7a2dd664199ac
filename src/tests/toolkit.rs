use crate::{
    decoder::{Next, ObsDecoder},
    observation::ObsEpoch,
    prelude::{Epoch, TimeScale},
};
use rand::{distributions::Alphanumeric, Rng};
use std::{
    io::{BufRead, Cursor},
    path::PathBuf,
};

/// Primary test file: 10 epochs from 2018-11-06T00:00:00 GPST, every 30s
pub const ACOR_R: &str = "ACOR00ESP_R_20183100000_01D_30S_MO.rnx";

/// Secondary test file: 12 epochs from 2018-11-06T00:01:00 GPST, every 30s
pub const ACOR_S: &str = "ACOR00ESP_S_20183100000_01D_30S_MO.rnx";

/// Path to given Observation RINEX (V3) test resource
pub fn resource(name: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join("OBS")
        .join("V3")
        .join(name)
}

pub fn random_name(size: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}

/// Formats one header line
pub fn header_line(content: &str, label: &str) -> String {
    format!("{:<60}{}\n", content, label)
}

/// Minimal mixed header, declaring given (system, observables) pairs
pub fn header(obs_types: &[(&str, &str)]) -> String {
    let mut content = header_line(
        "     3.04           OBSERVATION DATA    M (MIXED)",
        "RINEX VERSION / TYPE",
    );
    for (system, codes) in obs_types {
        let codes = codes.split_ascii_whitespace().collect::<Vec<_>>();
        content.push_str(&header_line(
            &format!("{}  {:3} {}", system, codes.len(), codes.join(" ")),
            "SYS / # / OBS TYPES",
        ));
    }
    content.push_str(&header_line("", "END OF HEADER"));
    content
}

/// Builds a decoder over in memory content
pub fn decoder(content: &str) -> ObsDecoder<Cursor<String>> {
    ObsDecoder::new(Cursor::new(content.to_string())).unwrap()
}

/// Decodes all epochs, panics on the first error
pub fn decode_all<R: BufRead>(decoder: &mut ObsDecoder<R>) -> Vec<ObsEpoch> {
    let mut epochs = Vec::new();
    loop {
        match decoder.next_epoch() {
            Next::Epoch(epoch) => epochs.push(epoch.clone()),
            Next::Exhausted => return epochs,
            Next::Failed(e) => panic!("decoding error: {}", e),
        }
    }
}

/// Builds a GPST [Epoch] on 2018-11-06
pub fn gpst(hh: u8, mm: u8, ss: u8) -> Epoch {
    Epoch::from_gregorian(2018, 11, 6, hh, mm, ss, 0, TimeScale::GPST)
}
