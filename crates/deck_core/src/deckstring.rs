//! Deck code codec
//!
//! Handles the Hearthstone "deckstring" format:
//! - Base64 text layer
//! - Varint-encoded header (reserved byte, version, format)
//! - Hero list and x1 / x2 / xN card buckets
//! - Optional sideboard section

use crate::types::{DbfId, Deck, FormatType};
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Only version of the binary layout in use
pub const DECKSTRING_VERSION: u32 = 1;

/// Errors raised while decoding a deck code
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("deck code is empty")]
    Empty,
    #[error("deck code is not valid base64: {0}")]
    Base64(String),
    #[error("invalid deck code header byte {0:#04x}")]
    InvalidHeader(u8),
    #[error("unsupported deck code version {0}")]
    UnsupportedVersion(u32),
    #[error("deck code ended unexpectedly while reading {0}")]
    UnexpectedEnd(&'static str),
    #[error("varint too large while reading {0}")]
    VarintOverflow(&'static str),
    #[error("card {0} has zero copies")]
    ZeroCopies(DbfId),
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn read_varint(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self
                .read_byte()
                .ok_or(DecodeError::UnexpectedEnd(field))?;
            if shift >= 35 {
                return Err(DecodeError::VarintOverflow(field));
            }
            result |= u64::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                break;
            }
        }
        u32::try_from(result).map_err(|_| DecodeError::VarintOverflow(field))
    }

    fn read_copies(&mut self, card: DbfId) -> Result<u32, DecodeError> {
        match self.read_varint("card count")? {
            0 => Err(DecodeError::ZeroCopies(card)),
            count => Ok(count),
        }
    }
}

/// Decode a deck code into a [`Deck`]
pub fn decode(code: &str) -> Result<Deck, DecodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = general_purpose::STANDARD
        .decode(code)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let mut reader = Reader::new(&bytes);

    match reader.read_byte() {
        Some(0) => {}
        Some(other) => return Err(DecodeError::InvalidHeader(other)),
        None => return Err(DecodeError::UnexpectedEnd("header")),
    }

    let version = reader.read_varint("version")?;
    if version != DECKSTRING_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let format = FormatType::from_raw(reader.read_varint("format")?);

    let hero_count = reader.read_varint("hero count")?;
    let mut heroes = Vec::new();
    for _ in 0..hero_count {
        heroes.push(reader.read_varint("hero")?);
    }

    let mut cards = Vec::new();
    for copies in [1, 2] {
        let count = reader.read_varint("card count")?;
        for _ in 0..count {
            cards.push((reader.read_varint("card")?, copies));
        }
    }
    let count = reader.read_varint("card count")?;
    for _ in 0..count {
        let card = reader.read_varint("card")?;
        let copies = reader.read_copies(card)?;
        cards.push((card, copies));
    }

    // Older deck codes stop here; newer ones carry a sideboard flag byte
    let mut sideboards = Vec::new();
    if reader.read_byte() == Some(1) {
        for copies in [1, 2] {
            let count = reader.read_varint("sideboard count")?;
            for _ in 0..count {
                let card = reader.read_varint("sideboard card")?;
                let owner = reader.read_varint("sideboard owner")?;
                sideboards.push((card, copies, owner));
            }
        }
        let count = reader.read_varint("sideboard count")?;
        for _ in 0..count {
            let card = reader.read_varint("sideboard card")?;
            let copies = reader.read_copies(card)?;
            let owner = reader.read_varint("sideboard owner")?;
            sideboards.push((card, copies, owner));
        }
    }

    Ok(Deck {
        format,
        heroes,
        cards,
        sideboards,
    })
}

fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Encode a [`Deck`] as a deck code
pub fn encode(deck: &Deck) -> String {
    let mut out = vec![0u8];
    write_varint(&mut out, DECKSTRING_VERSION);
    write_varint(&mut out, deck.format.raw());

    let mut heroes = deck.heroes.clone();
    heroes.sort_unstable();
    write_varint(&mut out, heroes.len() as u32);
    for hero in heroes {
        write_varint(&mut out, hero);
    }

    let mut cards = deck.cards.clone();
    cards.sort_unstable();
    for copies in [1, 2] {
        let bucket: Vec<DbfId> = cards
            .iter()
            .filter(|(_, n)| *n == copies)
            .map(|(id, _)| *id)
            .collect();
        write_varint(&mut out, bucket.len() as u32);
        for id in bucket {
            write_varint(&mut out, id);
        }
    }
    let many: Vec<&(DbfId, u32)> = cards.iter().filter(|(_, n)| *n > 2).collect();
    write_varint(&mut out, many.len() as u32);
    for (id, copies) in many {
        write_varint(&mut out, *id);
        write_varint(&mut out, *copies);
    }

    if deck.sideboards.is_empty() {
        out.push(0);
    } else {
        out.push(1);
        let mut sideboards = deck.sideboards.clone();
        sideboards.sort_unstable_by_key(|&(id, copies, owner)| (id, owner, copies));
        for copies in [1, 2] {
            let bucket: Vec<(DbfId, DbfId)> = sideboards
                .iter()
                .filter(|(_, n, _)| *n == copies)
                .map(|(id, _, owner)| (*id, *owner))
                .collect();
            write_varint(&mut out, bucket.len() as u32);
            for (id, owner) in bucket {
                write_varint(&mut out, id);
                write_varint(&mut out, owner);
            }
        }
        let many: Vec<&(DbfId, u32, DbfId)> =
            sideboards.iter().filter(|(_, n, _)| *n > 2).collect();
        write_varint(&mut out, many.len() as u32);
        for (id, copies, owner) in many {
            write_varint(&mut out, *id);
            write_varint(&mut out, *copies);
            write_varint(&mut out, *owner);
        }
    }

    general_purpose::STANDARD.encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUNTER_DECK: &str = "AAECAR8GxwPJBLsFmQfZB/gIDI0B2AGoArUDhwSSBe0G6wfbCe0JgQr+DAA=";
    const SIDEBOARD_DECK: &str = "AAECAea5AwEFAawCAcekBgMBAQoFAQsFAA==";

    #[test]
    fn test_decode_deck_without_sideboard_flag() {
        let deck = decode(HUNTER_DECK).unwrap();
        assert_eq!(deck.format, FormatType::Standard);
        assert_eq!(deck.heroes, vec![31]);
        assert_eq!(deck.cards.len(), 18);
        assert_eq!(deck.cards[0], (455, 1));
        assert_eq!(deck.cards[6], (141, 2));
        assert_eq!(deck.cards.iter().map(|(_, n)| n).sum::<u32>(), 30);
        assert!(deck.sideboards.is_empty());
    }

    #[test]
    fn test_decode_deck_with_sideboards() {
        let deck = decode(SIDEBOARD_DECK).unwrap();
        assert_eq!(deck.heroes, vec![56550]);
        assert_eq!(deck.cards, vec![(5, 1), (300, 2), (102983, 3)]);
        assert_eq!(deck.sideboards, vec![(10, 1, 5), (11, 2, 5)]);
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let deck = decode(&format!("  {}\n", HUNTER_DECK)).unwrap();
        assert_eq!(deck.heroes, vec![31]);
    }

    #[test]
    fn test_encode_matches_known_code() {
        let deck = decode(SIDEBOARD_DECK).unwrap();
        assert_eq!(encode(&deck), SIDEBOARD_DECK);
    }

    #[test]
    fn test_encode_then_decode_preserves_deck() {
        let deck = Deck {
            format: FormatType::Wild,
            heroes: vec![7],
            cards: vec![(1, 2)],
            sideboards: Vec::new(),
        };
        let code = encode(&deck);
        assert_eq!(code, "AAEBAQcAAQEAAA==");
        assert_eq!(decode(&code).unwrap(), deck);
    }

    #[test]
    fn test_decode_keeps_unknown_format() {
        let deck = Deck {
            format: FormatType::Other(9),
            heroes: vec![7],
            cards: Vec::new(),
            sideboards: Vec::new(),
        };
        let decoded = decode(&encode(&deck)).unwrap();
        assert_eq!(decoded.format, FormatType::Other(9));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(decode("not a deck!"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let code = general_purpose::STANDARD.encode([1u8, 1, 2]);
        assert_eq!(decode(&code), Err(DecodeError::InvalidHeader(1)));
    }

    #[test]
    fn test_decode_rejects_unsupported_version() {
        let code = general_purpose::STANDARD.encode([0u8, 2, 2]);
        assert_eq!(decode(&code), Err(DecodeError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_decode_rejects_truncated_code() {
        let code = general_purpose::STANDARD.encode([0u8, 1, 2, 1]);
        assert_eq!(decode(&code), Err(DecodeError::UnexpectedEnd("hero")));
    }

    #[test]
    fn test_decode_rejects_oversized_varint() {
        let code = general_purpose::STANDARD.encode([0u8, 1, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        assert_eq!(decode(&code), Err(DecodeError::VarintOverflow("format")));
    }

    #[test]
    fn test_decode_rejects_zero_copies() {
        let code = general_purpose::STANDARD.encode([0u8, 1, 2, 1, 7, 0, 0, 1, 5, 0]);
        assert_eq!(decode(&code), Err(DecodeError::ZeroCopies(5)));
    }
}
