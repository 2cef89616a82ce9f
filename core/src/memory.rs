//! The flat memory model: a single owning byte array, backed by atomics so
//! the interpreter thread and the peripheral thread can share it without a
//! lock, plus a typed view of the fixed region offsets (§3, §6).
//!
//! Modelling each byte as an `AtomicU8` instead of handing out raw pointers
//! into one buffer (as the reference implementation does for its program,
//! stack, and peripheral "views") removes the aliasing while keeping the
//! same flat layout.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// The fixed offsets and capacity that make up the machine's memory map
/// (§6). `Default` gives the documented defaults; callers that need a
/// non-standard layout can override individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub offset_program: u64,
    pub offset_stack: u64,
    pub offset_console_printc: u64,
    pub offset_console_printcstr: u64,
    pub io_printc_data: u64,
    pub io_printc_enable: u64,
    pub capacity: u64,
}

impl Default for MemoryLayout {
    fn default() -> Self {
        MemoryLayout {
            offset_program: 0,
            offset_stack: 1000,
            offset_console_printc: 2000,
            offset_console_printcstr: 2100,
            io_printc_data: 3000,
            io_printc_enable: 3001,
            capacity: 4000,
        }
    }
}

/// The flat, shared machine memory. Cheaply `Clone`-able: clones share the
/// same backing storage, which is exactly what's needed to hand one handle
/// to the interpreter and another to the peripheral thread.
#[derive(Debug, Clone)]
pub struct Memory {
    cells: Arc<Vec<AtomicU8>>,
}

impl Memory {
    pub fn new(capacity: u64) -> Memory {
        let mut cells = Vec::with_capacity(capacity as usize);
        cells.resize_with(capacity as usize, || AtomicU8::new(0));
        Memory { cells: Arc::new(cells) }
    }

    pub fn len(&self) -> u64 {
        self.cells.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw atomic load at `offset` with caller-chosen ordering. Used
    /// directly only for the `IO_PRINTC_ENABLE` handshake byte (§4.5); all
    /// other memory traffic goes through the `Relaxed` convenience methods
    /// below, since nothing else is shared across threads.
    pub fn load_u8(&self, offset: u64, order: Ordering) -> u8 {
        self.cells[offset as usize].load(order)
    }

    pub fn store_u8(&self, offset: u64, value: u8, order: Ordering) {
        self.cells[offset as usize].store(value, order);
    }

    pub fn read_u8(&self, offset: u64) -> u8 {
        self.load_u8(offset, Ordering::Relaxed)
    }

    pub fn write_u8(&self, offset: u64, value: u8) {
        self.store_u8(offset, value, Ordering::Relaxed);
    }

    pub fn read_u16(&self, offset: u64) -> u16 {
        u16::from_le_bytes([self.read_u8(offset), self.read_u8(offset + 1)])
    }

    pub fn write_u16(&self, offset: u64, value: u16) {
        let bytes = value.to_le_bytes();
        self.write_u8(offset, bytes[0]);
        self.write_u8(offset + 1, bytes[1]);
    }

    pub fn read_u64(&self, offset: u64) -> u64 {
        let mut bytes = [0u8; 8];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_u8(offset + i as u64);
        }
        u64::from_le_bytes(bytes)
    }

    pub fn write_u64(&self, offset: u64, value: u64) {
        let bytes = value.to_le_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            self.write_u8(offset + i as u64, *byte);
        }
    }

    /// Copies `bytes` verbatim starting at `offset`. This is the memory-side
    /// half of the loader (§7): the loader itself, which resolves a path to
    /// a byte vector, lives in the `cli` crate as an external collaborator.
    pub fn load_bytes(&self, bytes: &[u8], offset: u64) {
        for (i, byte) in bytes.iter().enumerate() {
            self.write_u8(offset + i as u64, *byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_memory_is_zeroed() {
        let memory = Memory::new(16);
        for offset in 0..16 {
            assert_eq!(memory.read_u8(offset), 0);
        }
    }

    #[test]
    fn round_trips_little_endian() {
        let memory = Memory::new(16);
        memory.write_u16(0, 0x1234);
        assert_eq!(memory.read_u8(0), 0x34);
        assert_eq!(memory.read_u8(1), 0x12);
        assert_eq!(memory.read_u16(0), 0x1234);

        memory.write_u64(4, 0x0123_4567_89AB_CDEF);
        assert_eq!(memory.read_u8(4), 0xEF);
        assert_eq!(memory.read_u64(4), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn load_bytes_copies_verbatim() {
        let memory = Memory::new(8);
        memory.load_bytes(&[1, 2, 3], 4);
        assert_eq!(memory.read_u8(4), 1);
        assert_eq!(memory.read_u8(5), 2);
        assert_eq!(memory.read_u8(6), 3);
    }

    #[test]
    fn clones_share_backing_storage() {
        let memory = Memory::new(4);
        let handle = memory.clone();
        handle.write_u8(0, 0xFF);
        assert_eq!(memory.read_u8(0), 0xFF);
    }
}
