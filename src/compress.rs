use alloc::vec::Vec;

use crate::chain::MatchIndex;
use crate::format::*;
use crate::matcher::best_match;
use crate::util::*;

/// Compression errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CompressError {
    /// The output buffer was too small to hold all the output.
    ///
    /// The output that has been written *is* valid, but has been truncated.
    #[error("output buffer was insufficient")]
    OutputTooSmall,
    /// A working buffer could not be grown.
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    AllocationFailed { requested_bytes: usize },
}

/// Worst-case compressed size for `len` input bytes (all literals)
pub const fn max_compressed_size(len: usize) -> usize {
    len + len.div_ceil(BLOCK_SLOTS)
}

trait OutputHelper {
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), CompressError>;
}
impl<'a> OutputHelper for BufOutput<'a> {
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), CompressError> {
        let mut len = buf.len();
        let mut did_overflow = false;
        if self.pos + len > self.buf.len() {
            did_overflow = true;
            len = self.buf.len() - self.pos;
        }

        self.buf[self.pos..self.pos + len].copy_from_slice(&buf[..len]);
        self.pos += len;

        if did_overflow {
            Err(CompressError::OutputTooSmall)
        } else {
            Ok(())
        }
    }
}

impl OutputHelper for VecOutput {
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), CompressError> {
        self.grow_for(buf.len())
            .map_err(|requested_bytes| CompressError::AllocationFailed { requested_bytes })?;
        self.vec.extend_from_slice(buf);
        Ok(())
    }
}

/// Packs emissions into flag-byte blocks
///
/// A block is only written out once it has all 8 slots, or by [BlockOutput::finish].
struct BlockOutput<O> {
    out: O,
    blk: [u8; MAX_BLOCK_LEN],
    blk_i: usize,
    blk_n: usize,
}

impl<O: OutputHelper> BlockOutput<O> {
    fn new(out: O) -> Self {
        Self {
            out,
            blk: [0; MAX_BLOCK_LEN],
            blk_i: 1,
            blk_n: 0,
        }
    }

    fn end_slot(&mut self) -> Result<(), CompressError> {
        self.blk_n += 1;
        if self.blk_n == BLOCK_SLOTS {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CompressError> {
        if self.blk_n == 0 {
            return Ok(());
        }
        self.out.put_buf(&self.blk[..self.blk_i])?;
        self.blk[0] = 0;
        self.blk_i = 1;
        self.blk_n = 0;
        Ok(())
    }

    /// Write out a trailing partial block, without padding
    fn finish(mut self) -> Result<O, CompressError> {
        self.flush()?;
        Ok(self.out)
    }
}

impl<O: OutputHelper> OutputSink<CompressError> for BlockOutput<O> {
    fn put_lit(&mut self, lit: u8) -> Result<(), CompressError> {
        self.blk[0] |= slot_bit(self.blk_n);
        self.blk[self.blk_i] = lit;
        self.blk_i += 1;
        self.end_slot()
    }

    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), CompressError> {
        let token = Match {
            distance,
            length: len,
        }
        .pack();
        self.blk[self.blk_i..self.blk_i + 2].copy_from_slice(&token);
        self.blk_i += 2;
        self.end_slot()
    }
}

/// Holds state for performing compression operations
///
/// The prefix table and chain are kept between calls so repeated compression
/// does not reallocate them. Nothing carries over from one input to the next.
pub struct CompressState {
    index: MatchIndex,
}
impl CompressState {
    /// Allocate a new compression state
    pub fn new() -> Self {
        Self {
            index: MatchIndex::new(),
        }
    }

    fn compress_impl<O: OutputHelper>(
        &mut self,
        inp: &[u8],
        outp: &mut BlockOutput<O>,
    ) -> Result<(), CompressError> {
        if inp.is_empty() {
            return Ok(());
        }

        self.index.build(inp)?;
        let offsets = self.index.offsets();

        let mut j = 0;
        while j < inp.len() {
            let m = best_match(inp, offsets, j);
            if m.is_usable() {
                outp.put_backref(m.distance, m.length)?;
                j += m.length;
            } else {
                outp.put_lit(inp[j])?;
                j += 1;
            }
        }

        Ok(())
    }

    /// Compress the input into a preallocated buffer
    ///
    /// Returns the compressed size on success, or an error otherwise.
    /// A buffer of [max_compressed_size] bytes is always enough.
    pub fn compress_to_buf(
        &mut self,
        inp: &[u8],
        outp: &mut [u8],
    ) -> Result<usize, CompressError> {
        let mut blocks = BlockOutput::new(BufOutput::from(outp));
        self.compress_impl(inp, &mut blocks)?;
        let outp = blocks.finish()?;
        Ok(outp.pos)
    }

    /// Compress the input into a [Vec](alloc::vec::Vec)
    ///
    /// Returns the result on success, or an error otherwise
    pub fn compress_to_vec(&mut self, inp: &[u8]) -> Result<Vec<u8>, CompressError> {
        let mut blocks = BlockOutput::new(VecOutput::from(Vec::new()));
        self.compress_impl(inp, &mut blocks)?;
        let ret = blocks.finish()?.vec;

        tracing::debug!(
            input_len = inp.len(),
            output_len = ret.len(),
            "compressed"
        );
        Ok(ret)
    }
}

impl Default for CompressState {
    fn default() -> Self {
        Self::new()
    }
}
