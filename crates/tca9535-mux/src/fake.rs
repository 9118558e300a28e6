//! In-memory transport for tests.
//!
//! [`FakeTransport`] backs the eight registers with an array, journals
//! every completed transaction, and can be told to fail transactions on a
//! given register and direction. No hardware — useful for testing the
//! control core without an I2C adapter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tca9535_regmap::{Reg, RegisterTransport, TransportError};

/// Direction of a bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    /// Register read.
    Read,
    /// Register write.
    Write,
}

/// One completed transaction, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    /// Read or write.
    pub dir: Dir,
    /// Register address on the wire.
    pub addr: u8,
    /// Value returned (read) or applied (write).
    pub value: u8,
}

#[derive(Debug, Default)]
struct Inner {
    regs: [u8; Reg::COUNT],
    journal: Vec<Transaction>,
    failures: Vec<(Dir, u8, i32)>,
}

impl Inner {
    fn failure(&self, dir: Dir, addr: u8) -> Option<TransportError> {
        self.failures
            .iter()
            .find(|(d, a, _)| *d == dir && *a == addr)
            .map(|&(_, _, code)| TransportError(code))
    }
}

/// Shared-state in-memory register file implementing [`RegisterTransport`].
///
/// Clones share state, so a test keeps one handle for inspection while the
/// device under test owns another. Injected failures return their error
/// code without journaling or touching the register file.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<Inner>>,
}

impl FakeTransport {
    /// Creates a fake with every register zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fake preloaded with the TCA9535 power-on defaults:
    /// Output 0xFFFF, Polarity 0x0000, Configuration 0xFFFF.
    #[must_use]
    pub fn with_power_on_defaults() -> Self {
        let fake = Self::new();
        fake.lock().regs = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF];
        fake
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the backing value of `reg` without journaling, the way external
    /// hardware drives an input line.
    pub fn set_reg(&self, reg: Reg, value: u8) {
        self.lock().regs[reg.addr() as usize] = value;
    }

    /// Current backing value of `reg`.
    #[must_use]
    pub fn reg(&self, reg: Reg) -> u8 {
        self.lock().regs[reg.addr() as usize]
    }

    /// Makes every `dir` transaction on `reg` fail with `code` until
    /// [`clear_failures`](Self::clear_failures) is called.
    pub fn fail_on(&self, dir: Dir, reg: Reg, code: i32) {
        self.lock().failures.push((dir, reg.addr(), code));
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Number of completed `dir` transactions on `reg`.
    #[must_use]
    pub fn count(&self, dir: Dir, reg: Reg) -> usize {
        let addr = reg.addr();
        self.lock()
            .journal
            .iter()
            .filter(|t| t.dir == dir && t.addr == addr)
            .count()
    }

    /// Snapshot of the transaction journal in execution order.
    #[must_use]
    pub fn journal(&self) -> Vec<Transaction> {
        self.lock().journal.clone()
    }
}

impl RegisterTransport for FakeTransport {
    fn read_byte(&mut self, _bus_address: u8, reg_addr: u8) -> Result<u8, TransportError> {
        let mut inner = self.lock();
        if let Some(err) = inner.failure(Dir::Read, reg_addr) {
            return Err(err);
        }
        // Addresses outside the register file fail like a NAKed transfer.
        let Some(&value) = inner.regs.get(reg_addr as usize) else {
            return Err(TransportError(-22));
        };
        inner.journal.push(Transaction {
            dir: Dir::Read,
            addr: reg_addr,
            value,
        });
        Ok(value)
    }

    fn write_byte(
        &mut self,
        _bus_address: u8,
        reg_addr: u8,
        value: u8,
    ) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if let Some(err) = inner.failure(Dir::Write, reg_addr) {
            return Err(err);
        }
        let Some(slot) = inner.regs.get_mut(reg_addr as usize) else {
            return Err(TransportError(-22));
        };
        *slot = value;
        inner.journal.push(Transaction {
            dir: Dir::Write,
            addr: reg_addr,
            value,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let fake = FakeTransport::new();
        let mut handle = fake.clone();
        handle.write_byte(0x20, 0x02, 0x5A).unwrap();
        assert_eq!(fake.reg(Reg::Output0), 0x5A);
        assert_eq!(fake.count(Dir::Write, Reg::Output0), 1);
    }

    #[test]
    fn power_on_defaults_match_datasheet() {
        let fake = FakeTransport::with_power_on_defaults();
        assert_eq!(fake.reg(Reg::Output0), 0xFF);
        assert_eq!(fake.reg(Reg::Output1), 0xFF);
        assert_eq!(fake.reg(Reg::Polarity0), 0x00);
        assert_eq!(fake.reg(Reg::Config0), 0xFF);
    }

    #[test]
    fn injected_failure_is_not_journaled() {
        let mut fake = FakeTransport::new();
        fake.fail_on(Dir::Read, Reg::Input0, -121);
        assert_eq!(fake.read_byte(0x20, 0x00), Err(TransportError(-121)));
        assert!(fake.journal().is_empty());

        fake.clear_failures();
        assert_eq!(fake.read_byte(0x20, 0x00), Ok(0x00));
        assert_eq!(fake.count(Dir::Read, Reg::Input0), 1);
    }

    #[test]
    fn out_of_range_address_naks() {
        let mut fake = FakeTransport::new();
        assert_eq!(fake.read_byte(0x20, 0x08), Err(TransportError(-22)));
        assert_eq!(fake.write_byte(0x20, 0xFF, 0x00), Err(TransportError(-22)));
    }
}
