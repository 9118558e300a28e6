//! Control core for TCA9535 16-bit I/O expanders on a shared register bus.
//!
//! One [`Tca9535`] instance per physically attached device. Each instance
//! owns a registry-allocated identity, a register bus with its cache, and
//! the exclusive lock that totally orders 16-bit operations on that device.
//! The four logical ports (Input, Output, Polarity, Configuration) are read
//! and written as two 8-bit transactions each, best-effort: if one half
//! fails the other is still attempted, and the error reports exactly which
//! register to distrust.
//!
//! The bus itself is external: callers supply any [`RegisterTransport`]
//! (an I2C adapter in production, [`fake::FakeTransport`] in tests).

pub mod device;
pub mod error;
pub mod fake;
pub mod log;
pub mod registry;
pub mod surface;

pub use device::{DeviceIdentity, Tca9535};
pub use error::{PartialReadError, PartialWriteError, RegistryError};
pub use tca9535_regmap::{
    BusError, PortPair, Reg, RegisterBus, RegisterTransport, TransportError,
};
