//! Satellite system identification from RINEX 1 letter codes
use crate::prelude::Constellation;

/// Every satellite system this library can interprate,
/// indexed by its RINEX 1 letter code.
pub const SYSTEM_TABLE: [(char, Constellation); 8] = [
    ('G', Constellation::GPS),
    ('R', Constellation::Glonass),
    ('E', Constellation::Galileo),
    ('J', Constellation::QZSS),
    ('C', Constellation::BeiDou),
    ('I', Constellation::IRNSS),
    ('S', Constellation::SBAS),
    ('M', Constellation::Mixed),
];

/// Identifies the [Constellation] described by given 1 letter code.
/// Codes are case sensitive, as per RINEX standards.
/// Returns None when this code is not known.
pub fn lookup(code: char) -> Option<Constellation> {
    SYSTEM_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, constellation)| *constellation)
}

/// Returns the RINEX 1 letter code of given [Constellation].
/// Augmentation systems all share the SBAS code.
pub fn code(constellation: Constellation) -> Option<char> {
    if constellation.is_sbas() {
        return Some('S');
    }
    SYSTEM_TABLE
        .iter()
        .find(|(_, c)| *c == constellation)
        .map(|(code, _)| *code)
}

/// Parses a list of 1 letter codes, like "GRE", into a list of [Constellation]s.
/// Returns the first unknown code on failure.
pub fn parse_codes(codes: &str) -> Result<Vec<Constellation>, char> {
    codes
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| lookup(c).ok_or(c))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn known_codes() {
        for (code, expected) in [
            ('G', Constellation::GPS),
            ('R', Constellation::Glonass),
            ('E', Constellation::Galileo),
            ('J', Constellation::QZSS),
            ('C', Constellation::BeiDou),
            ('I', Constellation::IRNSS),
            ('S', Constellation::SBAS),
            ('M', Constellation::Mixed),
        ] {
            assert_eq!(lookup(code), Some(expected));
            assert_eq!(super::code(expected), Some(code));
        }
    }
    #[test]
    fn unknown_codes() {
        for code in ['X', 'g', ' ', '0', 'H'] {
            assert!(lookup(code).is_none(), "'{}' should not be known", code);
        }
    }
    #[test]
    fn code_lists() {
        assert_eq!(
            parse_codes("GRE").unwrap(),
            vec![
                Constellation::GPS,
                Constellation::Glonass,
                Constellation::Galileo
            ]
        );
        assert_eq!(parse_codes("G X"), Err('X'));
        assert_eq!(parse_codes("").unwrap(), vec![]);
    }
}
