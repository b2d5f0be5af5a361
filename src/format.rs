//! Wire format
//!
//! A compressed stream is a sequence of blocks with no header or trailer.
//! Each block is one flag byte followed by up to 8 payload units. Bit `0x80 >> i`
//! of the flag byte is set when slot `i` holds a literal (1 byte) and clear when it
//! holds a match token (2 bytes). Only the last block may have fewer than 8 slots,
//! and its length is implied by the end of the stream.
//!
//! A match token packs `length - 3` into the top nibble of the first byte and
//! `distance - 1` as a big-endian 12-bit value across the rest.

use crate::decompress::DecompressError;

/// Shortest match worth a token
pub const MIN_MATCH: usize = 3;
/// Longest match a token can hold
pub const MAX_MATCH: usize = 15 + MIN_MATCH;
/// Furthest back a token can point
pub const MAX_DISTANCE: usize = 4095 + 1;
/// Emissions sharing one flag byte
pub const BLOCK_SLOTS: usize = 8;
/// Flag byte plus 8 match tokens
pub const MAX_BLOCK_LEN: usize = 1 + 2 * BLOCK_SLOTS;

/// Flag bit for `slot` within a block
#[inline]
pub fn slot_bit(slot: usize) -> u8 {
    debug_assert!(slot < BLOCK_SLOTS);
    0x80 >> slot
}

/// A back-reference; a length of 0 means "no match"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    pub distance: usize,
    pub length: usize,
}

impl Match {
    pub const NONE: Match = Match {
        distance: 0,
        length: 0,
    };

    /// Whether this match beats emitting literals
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.length >= MIN_MATCH
    }

    pub fn pack(&self) -> [u8; 2] {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&self.length));
        debug_assert!((1..=MAX_DISTANCE).contains(&self.distance));

        let len = self.length - MIN_MATCH;
        let disp = self.distance - 1;
        [((len << 4) | (disp >> 8)) as u8, disp as u8]
    }

    pub fn unpack(token: [u8; 2]) -> Self {
        Self {
            length: (token[0] >> 4) as usize + MIN_MATCH,
            distance: (((token[0] & 0x0f) as usize) << 8) + token[1] as usize + 1,
        }
    }
}

/// One slot of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    Literal(u8),
    Match(Match),
}

/// Walks a compressed stream slot by slot
///
/// This does not check backreferences against the output; it only knows the
/// shape of the stream.
pub struct Emissions<'a> {
    inp: &'a [u8],
    flags: u8,
    slot: usize,
}

impl<'a> Emissions<'a> {
    pub fn new(inp: &'a [u8]) -> Self {
        Self {
            inp,
            flags: 0,
            slot: BLOCK_SLOTS,
        }
    }

    /// Compressed bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.inp.len()
    }
}

impl<'a> Iterator for Emissions<'a> {
    type Item = Result<Emission, DecompressError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inp.is_empty() {
            return None;
        }

        if self.slot == BLOCK_SLOTS {
            self.flags = self.inp[0];
            self.inp = &self.inp[1..];
            self.slot = 0;
            // a block always carries at least one slot
            if self.inp.is_empty() {
                return Some(Err(DecompressError::InputTruncated));
            }
        }

        let is_lit = self.flags & slot_bit(self.slot) != 0;
        self.slot += 1;

        if is_lit {
            let lit = self.inp[0];
            self.inp = &self.inp[1..];
            Some(Ok(Emission::Literal(lit)))
        } else {
            let Some(token) = self.inp.first_chunk::<2>() else {
                self.inp = &[];
                return Some(Err(DecompressError::InputTruncated));
            };
            let m = Match::unpack(*token);
            self.inp = &self.inp[2..];
            Some(Ok(Emission::Match(m)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_pack_extremes() {
        let m = Match {
            distance: 1,
            length: 3,
        };
        assert_eq!(m.pack(), [0x00, 0x00]);

        let m = Match {
            distance: 4096,
            length: 18,
        };
        assert_eq!(m.pack(), [0xff, 0xff]);

        let m = Match {
            distance: 0x123 + 1,
            length: 5 + 3,
        };
        assert_eq!(m.pack(), [0x51, 0x23]);
    }

    #[test]
    fn test_unpack() {
        assert_eq!(
            Match::unpack([0xf0, 0x00]),
            Match {
                distance: 1,
                length: 18
            }
        );
        assert_eq!(
            Match::unpack([0x0f, 0xff]),
            Match {
                distance: 4096,
                length: 3
            }
        );
    }

    #[test]
    fn test_slot_bits() {
        assert_eq!(slot_bit(0), 0x80);
        assert_eq!(slot_bit(7), 0x01);
    }

    #[test]
    fn test_emissions_walk() {
        // full block: lit, match, then 6 lits; short block: 1 lit
        let inp = [
            0b1011_1111,
            b'a',
            0x00,
            0x00,
            b'b',
            1,
            2,
            3,
            4,
            5,
            0x80,
            b'c',
        ];

        let got: Vec<Emission> = Emissions::new(&inp).map(|e| e.unwrap()).collect();
        assert_eq!(got.len(), 9);
        assert_eq!(got[0], Emission::Literal(b'a'));
        assert_eq!(
            got[1],
            Emission::Match(Match {
                distance: 1,
                length: 3
            })
        );
        assert_eq!(got[2], Emission::Literal(b'b'));
        assert_eq!(got[7], Emission::Literal(5));
        assert_eq!(got[8], Emission::Literal(b'c'));
    }

    #[test]
    fn test_emissions_truncated() {
        // lone flag byte
        let mut it = Emissions::new(&[0xff]);
        assert_eq!(it.next(), Some(Err(DecompressError::InputTruncated)));
        assert_eq!(it.next(), None);

        // half a match token
        let mut it = Emissions::new(&[0x00, 0x10]);
        assert_eq!(it.next(), Some(Err(DecompressError::InputTruncated)));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_emissions_empty() {
        assert_eq!(Emissions::new(&[]).next(), None);
    }
}
