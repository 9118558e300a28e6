//! Last-known-value cache for non-volatile registers.
//!
//! One entry per register address. An entry is valid only after a
//! successful read or write of that register; volatile registers are never
//! cached. The cache starts fully invalid because the physical device's
//! power-on register contents are unknown to the core.

use crate::regs::Reg;

/// Sparse per-device store of the last value the device acknowledged for
/// each non-volatile register.
#[derive(Debug)]
pub struct RegisterCache {
    entries: [Option<u8>; Reg::COUNT],
}

impl RegisterCache {
    /// Creates a cache with every entry invalid.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [None; Reg::COUNT],
        }
    }

    /// Returns the cached value of `reg`, or `None` if the entry is
    /// invalid. Always `None` for volatile registers.
    #[must_use]
    pub fn get(&self, reg: Reg) -> Option<u8> {
        if reg.is_volatile() {
            return None;
        }
        self.entries[reg.addr() as usize]
    }

    /// Records `value` as the last value acknowledged for `reg`. A no-op
    /// for volatile registers.
    pub fn store(&mut self, reg: Reg, value: u8) {
        if !reg.is_volatile() {
            self.entries[reg.addr() as usize] = Some(value);
        }
    }

    /// Marks the entry for `reg` invalid.
    pub fn invalidate(&mut self, reg: Reg) {
        self.entries[reg.addr() as usize] = None;
    }

    /// Marks every entry invalid.
    pub fn invalidate_all(&mut self) {
        self.entries = [None; Reg::COUNT];
    }
}

impl Default for RegisterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_invalid() {
        let cache = RegisterCache::new();
        for addr in 0u8..8 {
            assert_eq!(cache.get(Reg::from_addr(addr).unwrap()), None);
        }
    }

    #[test]
    fn store_then_get() {
        let mut cache = RegisterCache::new();
        cache.store(Reg::Output0, 0x5A);
        assert_eq!(cache.get(Reg::Output0), Some(0x5A));
        assert_eq!(cache.get(Reg::Output1), None);
    }

    #[test]
    fn volatile_registers_never_cached() {
        let mut cache = RegisterCache::new();
        cache.store(Reg::Input0, 0x12);
        cache.store(Reg::Input1, 0x34);
        assert_eq!(cache.get(Reg::Input0), None);
        assert_eq!(cache.get(Reg::Input1), None);
    }

    #[test]
    fn invalidate_single_entry() {
        let mut cache = RegisterCache::new();
        cache.store(Reg::Config0, 0xAA);
        cache.store(Reg::Config1, 0xBB);
        cache.invalidate(Reg::Config0);
        assert_eq!(cache.get(Reg::Config0), None);
        assert_eq!(cache.get(Reg::Config1), Some(0xBB));
    }

    #[test]
    fn invalidate_all_clears_everything() {
        let mut cache = RegisterCache::new();
        for addr in 2u8..8 {
            cache.store(Reg::from_addr(addr).unwrap(), addr);
        }
        cache.invalidate_all();
        for addr in 0u8..8 {
            assert_eq!(cache.get(Reg::from_addr(addr).unwrap()), None);
        }
    }
}
