//! Per-device control core.
//!
//! One [`Tca9535`] per attached device, built at attach time from a
//! registry-allocated ID and a transport handle. The device's lock totally
//! orders all 16-bit operations on it: no two pair operations ever
//! interleave their 8-bit sub-transactions. The lock does not make a pair
//! atomic on the wire — external hardware can still change Input bits
//! between the low-byte and high-byte transactions, and callers of
//! [`read_input`](Tca9535::read_input) can observe such torn values.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tca9535_regmap::{PortPair, RegisterBus, RegisterTransport};

use crate::error::{PartialReadError, PartialWriteError, RegistryError};
use crate::registry::{self, InstanceToken};
use crate::{dev_info, dev_warn};

/// Identity of one live device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Registry-allocated instance ID, unique among live devices and
    /// returned to the free pool at detach.
    pub id: u32,
    /// Physical address on the register bus, fixed for the device's
    /// lifetime.
    pub bus_address: u8,
    /// Display name, `"<label>-<id>"`.
    pub name: String,
}

/// Control core for one attached TCA9535.
///
/// Owns the device's identity, its register bus (with the embedded cache),
/// and the exclusive lock serializing all register traffic to the device.
/// Dropping the core releases its instance ID back to the registry.
pub struct Tca9535<T: RegisterTransport> {
    identity: DeviceIdentity,
    bus: Mutex<RegisterBus<T>>,
}

impl<T: RegisterTransport> Tca9535<T> {
    /// Attaches a device: allocates the smallest free instance ID, binds
    /// the transport, and starts with a fully invalid cache (the device's
    /// power-on register contents are unknown).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Exhausted`] if no instance ID is free.
    pub fn attach(transport: T, bus_address: u8, label: &str) -> Result<Self, RegistryError> {
        let token = InstanceToken {
            bus_address,
            label: label.to_string(),
        };
        let id = registry::with_instances(|r| r.allocate(token))?;
        let identity = DeviceIdentity {
            id,
            bus_address,
            name: format!("{label}-{id}"),
        };
        dev_info!(&identity.name, "attached at bus address 0x{:02X}", bus_address);
        Ok(Self {
            identity,
            bus: Mutex::new(RegisterBus::new(transport, bus_address)),
        })
    }

    /// The device's identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    fn lock_bus(&self) -> MutexGuard<'_, RegisterBus<T>> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads a 16-bit logical port as two 8-bit transactions, low byte
    /// first, holding the device lock across both.
    ///
    /// Both halves are attempted even if the first fails, so the error
    /// reports exactly which register(s) to distrust.
    ///
    /// # Errors
    ///
    /// Returns [`PartialReadError`] if either transaction failed.
    pub fn read_pair(&self, pair: PortPair) -> Result<u16, PartialReadError> {
        let mut bus = self.lock_bus();
        let lo = bus.read(pair.lo);
        let hi = bus.read(pair.hi);
        drop(bus);

        if let Err(e) = &lo {
            dev_warn!(&self.identity.name, "cannot read {}: {}", pair.lo, e);
        }
        if let Err(e) = &hi {
            dev_warn!(&self.identity.name, "cannot read {}: {}", pair.hi, e);
        }
        match (lo, hi) {
            (Ok(lo), Ok(hi)) => Ok(PortPair::combine(lo, hi)),
            (lo, hi) => Err(PartialReadError {
                lo: lo.err(),
                hi: hi.err(),
            }),
        }
    }

    /// Writes a 16-bit logical port as two 8-bit transactions, low byte
    /// first, holding the device lock across both.
    ///
    /// Both halves are attempted even if the first fails. On a partial
    /// failure the port holds a mix of old and new bytes until a retry
    /// succeeds; the error says which half went through.
    ///
    /// # Errors
    ///
    /// Returns [`PartialWriteError`] if either transaction failed.
    pub fn write_pair(&self, pair: PortPair, value: u16) -> Result<(), PartialWriteError> {
        let (lo_val, hi_val) = PortPair::split(value);
        let mut bus = self.lock_bus();
        let lo = bus.write(pair.lo, lo_val);
        let hi = bus.write(pair.hi, hi_val);
        drop(bus);

        if let Err(e) = &lo {
            dev_warn!(&self.identity.name, "cannot write {}: {}", pair.lo, e);
        }
        if let Err(e) = &hi {
            dev_warn!(&self.identity.name, "cannot write {}: {}", pair.hi, e);
        }
        match (lo, hi) {
            (Ok(()), Ok(())) => Ok(()),
            (lo, hi) => Err(PartialWriteError {
                lo: lo.err(),
                hi: hi.err(),
            }),
        }
    }

    /// Reads the Input port. Always two bus transactions: Input is
    /// volatile and never cached.
    ///
    /// # Errors
    ///
    /// Returns [`PartialReadError`] if either transaction failed.
    pub fn read_input(&self) -> Result<u16, PartialReadError> {
        self.read_pair(PortPair::INPUT)
    }

    /// Reads the Output port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialReadError`] if either transaction failed.
    pub fn read_output(&self) -> Result<u16, PartialReadError> {
        self.read_pair(PortPair::OUTPUT)
    }

    /// Writes the Output port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialWriteError`] if either transaction failed.
    pub fn write_output(&self, value: u16) -> Result<(), PartialWriteError> {
        self.write_pair(PortPair::OUTPUT, value)
    }

    /// Reads the Polarity Inversion port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialReadError`] if either transaction failed.
    pub fn read_polarity(&self) -> Result<u16, PartialReadError> {
        self.read_pair(PortPair::POLARITY)
    }

    /// Writes the Polarity Inversion port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialWriteError`] if either transaction failed.
    pub fn write_polarity(&self, value: u16) -> Result<(), PartialWriteError> {
        self.write_pair(PortPair::POLARITY, value)
    }

    /// Reads the Configuration port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialReadError`] if either transaction failed.
    pub fn read_configuration(&self) -> Result<u16, PartialReadError> {
        self.read_pair(PortPair::CONFIG)
    }

    /// Writes the Configuration port.
    ///
    /// # Errors
    ///
    /// Returns [`PartialWriteError`] if either transaction failed.
    pub fn write_configuration(&self, value: u16) -> Result<(), PartialWriteError> {
        self.write_pair(PortPair::CONFIG, value)
    }

    /// Drops every cached register value, forcing the next read of each
    /// register to hit the bus.
    pub fn reset_cache(&self) {
        self.lock_bus().invalidate_cache();
    }
}

impl<T: RegisterTransport> Drop for Tca9535<T> {
    fn drop(&mut self) {
        let _ = registry::with_instances(|r| r.release(self.identity.id));
        dev_info!(&self.identity.name, "detached");
    }
}
