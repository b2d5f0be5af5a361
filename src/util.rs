use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// Capacity a [VecOutput] starts from when the caller gives no hint
pub const DEFAULT_CAPACITY: usize = 1 << 16;

/// Internal abstraction over where emissions go
///
/// The encoder implements this to pack emissions into blocks,
/// the decoder implements it on [BufOutput] and [VecOutput] to rebuild bytes.
pub trait OutputSink<ErrTy> {
    /// Add one literal byte
    fn put_lit(&mut self, lit: u8) -> Result<(), ErrTy>;
    /// Add a backreference
    ///
    /// `distance` counts back from the current end, so 1 means the last byte.
    /// As usual for LZ77, `len` may exceed `distance`.
    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), ErrTy>;
}

/// Output into a caller-provided slice
///
/// Note: writers fill all the way up to the limit before reporting overflow
pub struct BufOutput<'a> {
    pub pos: usize,
    pub buf: &'a mut [u8],
}
impl<'a> From<&'a mut [u8]> for BufOutput<'a> {
    fn from(buf: &'a mut [u8]) -> Self {
        Self { pos: 0, buf }
    }
}

/// Output into a [Vec] that grows by half its capacity whenever it runs out
pub struct VecOutput {
    pub vec: Vec<u8>,
}
impl From<Vec<u8>> for VecOutput {
    fn from(vec: Vec<u8>) -> Self {
        Self { vec }
    }
}
impl VecOutput {
    pub fn with_capacity_hint(capacity_hint: Option<usize>) -> Result<Self, TryReserveError> {
        let mut vec = Vec::new();
        vec.try_reserve_exact(capacity_hint.unwrap_or(DEFAULT_CAPACITY))?;
        Ok(Self { vec })
    }

    /// Make room for `extra` more bytes, growing by 50% steps
    ///
    /// On failure, returns the total capacity that was requested.
    pub fn grow_for(&mut self, extra: usize) -> Result<(), usize> {
        let needed = self.vec.len().saturating_add(extra);
        if needed <= self.vec.capacity() {
            return Ok(());
        }

        let mut cap = self.vec.capacity().max(16);
        while cap < needed {
            cap = cap.saturating_add(cap / 2);
        }
        self.vec
            .try_reserve_exact(cap - self.vec.len())
            .map_err(|_| cap)
    }
}
