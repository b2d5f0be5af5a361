use alloc::vec::Vec;

use crate::compress::CompressError;

const HTAB_SZ: usize = 1 << 16;
const NO_POS: usize = usize::MAX;

/// Hash of the 2-byte prefix at a position
///
/// This is just the two bytes side by side, so there are no collisions.
#[inline]
fn prefix_hash(b0: u8, b1: u8) -> usize {
    (b0 as usize) << 8 | b1 as usize
}

fn alloc_err(entries: usize) -> CompressError {
    CompressError::AllocationFailed {
        requested_bytes: entries * core::mem::size_of::<usize>(),
    }
}

/// Hash chain over one input, stored as backward distances
///
/// `offsets[i]` is how far back the previous position with the same 2-byte
/// prefix as `i` lies, or 0 if there is none. Walking `i -= offsets[i]` visits
/// every earlier same-prefix position, nearest first.
pub struct MatchIndex {
    last_seen: Vec<usize>,
    offsets: Vec<usize>,
}

impl MatchIndex {
    pub fn new() -> Self {
        Self {
            last_seen: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Rebuild the chain for `inp`, reusing allocations from the previous call
    pub fn build(&mut self, inp: &[u8]) -> Result<(), CompressError> {
        if self.last_seen.is_empty() {
            self.last_seen
                .try_reserve_exact(HTAB_SZ)
                .map_err(|_| alloc_err(HTAB_SZ))?;
            self.last_seen.resize(HTAB_SZ, NO_POS);
        } else {
            self.last_seen.fill(NO_POS);
        }

        self.offsets.clear();
        self.offsets
            .try_reserve_exact(inp.len())
            .map_err(|_| alloc_err(inp.len()))?;
        self.offsets.resize(inp.len(), 0);

        for (i, pair) in inp.windows(2).enumerate() {
            let hash = prefix_hash(pair[0], pair[1]);
            let prev = core::mem::replace(&mut self.last_seen[hash], i);
            if prev != NO_POS {
                debug_assert!(prev < i);
                self.offsets[i] = i - prev;
            }
        }

        tracing::trace!(positions = inp.len(), "linked prefix chain");
        Ok(())
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

impl Default for MatchIndex {
    fn default() -> Self {
        Self::new()
    }
}
