use alloc::vec::Vec;

use crate::format::{Emission, Emissions};
use crate::util::*;

/// Decompression errors
///
/// Streams produced by the compressor never trigger these; they guard against
/// corrupted or truncated input.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecompressError {
    #[error("input was truncated")]
    InputTruncated,
    #[error("invalid backreference")]
    InvalidBackreference,
    #[error("output buffer was insufficient")]
    OutputTooSmall,
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    AllocationFailed { requested_bytes: usize },
}

impl<'a> OutputSink<DecompressError> for BufOutput<'a> {
    fn put_lit(&mut self, lit: u8) -> Result<(), DecompressError> {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = lit;
            self.pos += 1;
            Ok(())
        } else {
            Err(DecompressError::OutputTooSmall)
        }
    }

    fn put_backref(&mut self, distance: usize, mut len: usize) -> Result<(), DecompressError> {
        if distance == 0 || distance > self.pos {
            return Err(DecompressError::InvalidBackreference);
        }

        let mut did_overflow = false;
        if self.pos + len > self.buf.len() {
            did_overflow = true;
            len = self.buf.len() - self.pos;
        }

        for i in 0..len {
            self.buf[self.pos + i] = self.buf[self.pos - distance + i];
        }
        self.pos += len;

        if did_overflow {
            Err(DecompressError::OutputTooSmall)
        } else {
            Ok(())
        }
    }
}

impl OutputSink<DecompressError> for VecOutput {
    fn put_lit(&mut self, lit: u8) -> Result<(), DecompressError> {
        self.grow_for(1)
            .map_err(|requested_bytes| DecompressError::AllocationFailed { requested_bytes })?;
        self.vec.push(lit);
        Ok(())
    }

    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), DecompressError> {
        let pos = self.vec.len();
        if distance == 0 || distance > pos {
            return Err(DecompressError::InvalidBackreference);
        }

        self.grow_for(len)
            .map_err(|requested_bytes| DecompressError::AllocationFailed { requested_bytes })?;
        let start = pos - distance;
        if distance >= len {
            self.vec.extend_from_within(start..start + len);
        } else {
            // overlapping: later bytes of the run copy earlier bytes of the same run
            for i in 0..len {
                let b = self.vec[start + i];
                self.vec.push(b);
            }
        }

        Ok(())
    }
}

fn decompress_impl(
    inp: &[u8],
    outp: &mut impl OutputSink<DecompressError>,
) -> Result<(), DecompressError> {
    for emission in Emissions::new(inp) {
        match emission? {
            Emission::Literal(lit) => outp.put_lit(lit)?,
            Emission::Match(m) => outp.put_backref(m.distance, m.length)?,
        }
    }
    Ok(())
}

/// Decompress the input into a preallocated buffer
///
/// Returns the decompressed size on success. On [DecompressError::OutputTooSmall],
/// the buffer holds as much of the output as fit.
pub fn decompress_to_buf(inp: &[u8], outp: &mut [u8]) -> Result<usize, DecompressError> {
    let mut outp: BufOutput = outp.into();
    decompress_impl(inp, &mut outp)?;
    Ok(outp.pos)
}

/// Decompress the input into a [Vec](alloc::vec::Vec)
///
/// The output starts with `capacity_hint` bytes of room (64 KiB if `None`) and
/// grows by half whenever it fills up.
pub fn decompress_to_vec(
    inp: &[u8],
    capacity_hint: Option<usize>,
) -> Result<Vec<u8>, DecompressError> {
    let requested = capacity_hint.unwrap_or(DEFAULT_CAPACITY);
    let mut ret = VecOutput::with_capacity_hint(capacity_hint).map_err(|_| {
        DecompressError::AllocationFailed {
            requested_bytes: requested,
        }
    })?;
    decompress_impl(inp, &mut ret)?;

    tracing::debug!(
        input_len = inp.len(),
        output_len = ret.vec.len(),
        "expanded"
    );
    Ok(ret.vec)
}
