//! LZSS compression with a 4 KiB window
//!
//! Repeated runs of 3 to 18 bytes are replaced by 2-byte back-references up to
//! 4096 bytes back; everything else is stored as literals. Emissions are grouped
//! 8 at a time behind a flag byte. See [format] for the exact layout.
//!
//! ```
//! let data = b"abcabcabcabcabcabc";
//! let packed = lzss::compress(data).unwrap();
//! assert!(packed.len() < data.len());
//! assert_eq!(lzss::expand(&packed).unwrap(), data);
//! ```
#![no_std]

extern crate alloc;

mod chain;
mod compress;
mod decompress;
pub mod format;
mod matcher;
mod util;

pub use compress::{max_compressed_size, CompressError, CompressState};
pub use decompress::{decompress_to_buf, decompress_to_vec, DecompressError};
pub use util::DEFAULT_CAPACITY;

/// Compress a whole buffer
pub fn compress(inp: &[u8]) -> Result<alloc::vec::Vec<u8>, CompressError> {
    CompressState::new().compress_to_vec(inp)
}

/// Expand a whole buffer produced by [compress]
pub fn expand(inp: &[u8]) -> Result<alloc::vec::Vec<u8>, DecompressError> {
    decompress_to_vec(inp, None)
}
