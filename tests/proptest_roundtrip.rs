//! Property-based tests for the codec.
//!
//! - any input survives compress then expand
//! - every emitted token stays inside the format's length and distance bounds
//! - output never exceeds the all-literal worst case

use proptest::prelude::*;

use lzss::format::{Emission, Emissions, MAX_DISTANCE, MAX_MATCH, MIN_MATCH};
use lzss::{compress, expand, max_compressed_size};

/// Arbitrary bytes, mostly short
fn any_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

/// Bytes from a tiny alphabet, so long and overlapping matches are common
fn low_entropy_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 0..12_000)
}

/// A seed chunk repeated with a few bytes flipped
fn repeated_with_noise() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(any::<u8>(), 1..64),
        1usize..200,
        prop::collection::vec((any::<usize>(), any::<u8>()), 0..32),
    )
        .prop_map(|(seed, times, flips)| {
            let mut v = seed.repeat(times);
            let len = v.len();
            for (pos, b) in flips {
                v[pos % len] = b;
            }
            v
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_roundtrip_any(inp in any_bytes()) {
        let packed = compress(&inp).unwrap();
        prop_assert_eq!(expand(&packed).unwrap(), inp);
    }

    #[test]
    fn prop_roundtrip_low_entropy(inp in low_entropy_bytes()) {
        let packed = compress(&inp).unwrap();
        prop_assert_eq!(expand(&packed).unwrap(), inp);
    }

    #[test]
    fn prop_roundtrip_repeated(inp in repeated_with_noise()) {
        let packed = compress(&inp).unwrap();
        prop_assert_eq!(expand(&packed).unwrap(), inp);
    }

    #[test]
    fn prop_tokens_in_bounds(inp in low_entropy_bytes()) {
        let packed = compress(&inp).unwrap();
        let mut produced = 0usize;
        for e in Emissions::new(&packed) {
            match e.unwrap() {
                Emission::Literal(_) => produced += 1,
                Emission::Match(m) => {
                    prop_assert!((MIN_MATCH..=MAX_MATCH).contains(&m.length));
                    prop_assert!((1..=MAX_DISTANCE).contains(&m.distance));
                    prop_assert!(m.distance <= produced);
                    produced += m.length;
                }
            }
        }
        prop_assert_eq!(produced, inp.len());
    }

    #[test]
    fn prop_size_bound(inp in any_bytes()) {
        let packed = compress(&inp).unwrap();
        prop_assert!(packed.len() <= max_compressed_size(inp.len()));
    }

    #[test]
    fn prop_garbage_never_panics(junk in prop::collection::vec(any::<u8>(), 0..512)) {
        // corrupt streams must fail cleanly or decode to something
        let _ = expand(&junk);
    }
}
