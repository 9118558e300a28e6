//! Single-register bus transactions with caching.
//!
//! [`RegisterBus`] is the only path to the transport. It consults the
//! register classification and the [`RegisterCache`] so that non-volatile
//! registers are read from the wire at most once between writes, while the
//! volatile Input pair always reaches the device.

use crate::cache::RegisterCache;
use crate::error::{BusError, TransportError};
use crate::regs::Reg;

/// Byte-level access to a device behind a register bus (typically I2C).
///
/// Implementations own addressing details, timeouts, and retries; the
/// executor only sees success or a numeric error code. A blocking call may
/// block the calling thread until the transport returns.
pub trait RegisterTransport {
    /// Reads one register byte from the device at `bus_address`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error code if the transaction failed.
    fn read_byte(&mut self, bus_address: u8, reg_addr: u8) -> Result<u8, TransportError>;

    /// Writes one register byte to the device at `bus_address`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error code if the transaction failed.
    fn write_byte(&mut self, bus_address: u8, reg_addr: u8, value: u8)
    -> Result<(), TransportError>;
}

/// Executes single-register transactions against one device.
///
/// Owned exclusively by the device's control core; all access is serialized
/// by the device lock one layer up.
pub struct RegisterBus<T> {
    transport: T,
    bus_address: u8,
    cache: RegisterCache,
}

impl<T: RegisterTransport> RegisterBus<T> {
    /// Creates a bus bound to one device. The cache starts fully invalid:
    /// the device's power-on register contents are unknown here.
    pub fn new(transport: T, bus_address: u8) -> Self {
        Self {
            transport,
            bus_address,
            cache: RegisterCache::new(),
        }
    }

    /// The physical bus address this bus talks to.
    #[must_use]
    pub const fn bus_address(&self) -> u8 {
        self.bus_address
    }

    /// Reads `reg`, serving non-volatile registers from cache when the
    /// last transaction on them succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Io`] if the transport failed; the cache entry is
    /// left untouched (the device state did not change).
    pub fn read(&mut self, reg: Reg) -> Result<u8, BusError> {
        if let Some(value) = self.cache.get(reg) {
            return Ok(value);
        }
        match self.transport.read_byte(self.bus_address, reg.addr()) {
            Ok(value) => {
                self.cache.store(reg, value);
                Ok(value)
            }
            Err(cause) => Err(BusError::Io { reg, cause }),
        }
    }

    /// Writes `value` to `reg`.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::NotWritable`] without touching the transport if
    /// the register is read-only. Returns [`BusError::Io`] if the transport
    /// failed; the cache entry is invalidated, since the device may or may
    /// not have applied the write.
    pub fn write(&mut self, reg: Reg, value: u8) -> Result<(), BusError> {
        if !reg.is_writable() {
            return Err(BusError::NotWritable { reg });
        }
        match self.transport.write_byte(self.bus_address, reg.addr(), value) {
            Ok(()) => {
                self.cache.store(reg, value);
                Ok(())
            }
            Err(cause) => {
                self.cache.invalidate(reg);
                Err(BusError::Io { reg, cause })
            }
        }
    }

    /// Drops every cached value. Called once at attach, and after anything
    /// that may have changed device state behind the core's back.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate_all();
    }
}
