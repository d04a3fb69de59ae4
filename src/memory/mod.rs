//! Memory model for the Intcode machine
//!
//! Memory maps every non-negative address to a signed 64-bit [`Word`]. It is
//! split in two tiers:
//! - the **dense** tier, a `Vec` seeded from the loaded program and covering
//!   addresses `0..program.len()`
//! - the **extended** tier, an [`FxHashMap`] holding every word written past
//!   the end of the program
//!
//! Reading an extended address that was never written yields `0`. Writing to
//! any address, dense or extended, always succeeds. Negative addresses never
//! reach this module: they are rejected by [`to_address`] when an operand is
//! resolved.

use crate::interpreter::errors::VmError;
use rustc_hash::FxHashMap;

/// A machine word: every value in memory, in the queues and in the registers
pub type Word = i64;

/// Memory address type (64-bit, non-negative)
pub type Address = u64;

/// Validate a word used as an address
pub fn to_address(value: Word) -> Result<Address, VmError> {
    Address::try_from(value).map_err(|_| VmError::NegativeAddress { value })
}

/// Two-tier addressable store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memory {
    dense: Vec<Word>,
    extended: FxHashMap<Address, Word>,
}

impl Memory {
    /// Create memory seeded from a program image
    pub fn new(program: &[Word]) -> Self {
        Memory {
            dense: program.to_vec(),
            extended: FxHashMap::default(),
        }
    }

    /// Discard all contents and re-seed from a program image
    pub fn reseed(&mut self, program: &[Word]) {
        self.dense.clear();
        self.dense.extend_from_slice(program);
        self.extended.clear();
    }

    /// Read the word at `addr`; unwritten extended addresses read as 0
    pub fn read(&self, addr: Address) -> Word {
        match self.dense_index(addr) {
            Some(i) => self.dense[i],
            None => self.extended.get(&addr).copied().unwrap_or(0),
        }
    }

    /// Write `value` at `addr`
    pub fn write(&mut self, addr: Address, value: Word) {
        match self.dense_index(addr) {
            Some(i) => self.dense[i] = value,
            None => {
                self.extended.insert(addr, value);
            }
        }
    }

    fn dense_index(&self, addr: Address) -> Option<usize> {
        usize::try_from(addr).ok().filter(|&i| i < self.dense.len())
    }

    /// The dense tier (the loaded program's footprint)
    pub fn dense(&self) -> &[Word] {
        &self.dense
    }

    /// Number of words written beyond the program image
    pub fn extended_len(&self) -> usize {
        self.extended.len()
    }

    /// Written extended cells, sorted by address
    pub fn extended_cells(&self) -> Vec<(Address, Word)> {
        let mut cells: Vec<_> = self.extended.iter().map(|(&a, &v)| (a, v)).collect();
        cells.sort_unstable_by_key(|&(a, _)| a);
        cells
    }

    /// Estimate the heap footprint of this memory in bytes
    pub fn estimated_size(&self) -> usize {
        let word = std::mem::size_of::<Word>();
        self.dense.len() * word + self.extended.len() * (word + std::mem::size_of::<Address>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_read_write() {
        let mut memory = Memory::new(&[1, 2, 3]);
        assert_eq!(memory.read(1), 2);
        memory.write(1, 42);
        assert_eq!(memory.read(1), 42);
        assert_eq!(memory.extended_len(), 0);
    }

    #[test]
    fn test_extended_defaults_to_zero() {
        let memory = Memory::new(&[1, 2, 3]);
        assert_eq!(memory.read(3), 0);
        assert_eq!(memory.read(1_000_000), 0);
        assert_eq!(memory.extended_len(), 0);
    }

    #[test]
    fn test_extended_write() {
        let mut memory = Memory::new(&[7]);
        memory.write(1000, -5);
        assert_eq!(memory.read(1000), -5);
        assert_eq!(memory.read(999), 0);
        assert_eq!(memory.extended_cells(), vec![(1000, -5)]);
        assert_eq!(memory.dense(), &[7]);
    }

    #[test]
    fn test_far_write_stays_sparse() {
        let mut memory = Memory::new(&[99]);
        memory.write(1 << 40, 1);
        memory.write(3, 2);
        assert_eq!(memory.read(1 << 40), 1);
        assert_eq!(memory.extended_cells(), vec![(3, 2), (1 << 40, 1)]);
        assert_eq!(memory.dense().len(), 1);
        assert!(memory.estimated_size() < 1024);
    }

    #[test]
    fn test_reseed_clears_extended() {
        let mut memory = Memory::new(&[1, 2]);
        memory.write(0, 5);
        memory.write(50, 5);
        memory.reseed(&[1, 2]);
        assert_eq!(memory, Memory::new(&[1, 2]));
    }

    #[test]
    fn test_negative_address_rejected() {
        assert_eq!(to_address(12), Ok(12));
        assert_eq!(to_address(-1), Err(VmError::NegativeAddress { value: -1 }));
    }
}
