//! Target memory access.
//!
//! The inspector never owns the target; it reads through this trait, which
//! the probe adapter implements over a live debug session and the mock
//! implements over an in-process byte map. All access is read-only: the
//! inspector observes target state, it never modifies it.

use anyhow::Result;

/// Read-only view of target memory.
pub trait TargetMemory {
    /// Read a single little-endian 32-bit word.
    fn read_word_32(&mut self, address: u64) -> Result<u32>;

    /// Fill `data` from consecutive bytes starting at `address`.
    fn read_8(&mut self, address: u64, data: &mut [u8]) -> Result<()>;

    /// Read a block of memory.
    fn read_block(&mut self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; size];
        self.read_8(address, &mut data)?;
        Ok(data)
    }
}

impl TargetMemory for &mut dyn TargetMemory {
    fn read_word_32(&mut self, address: u64) -> Result<u32> {
        (**self).read_word_32(address)
    }

    fn read_8(&mut self, address: u64, data: &mut [u8]) -> Result<()> {
        (**self).read_8(address, data)
    }
}
