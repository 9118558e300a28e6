//! Register-space model for the TCA9535 16-bit I/O expander.
//!
//! The device exposes eight 8-bit registers forming four 16-bit logical
//! ports (Input, Output, Polarity Inversion, Configuration). This crate
//! models that register file: address classification, a last-known-value
//! cache for the non-volatile registers, and a transaction executor that
//! drives a byte-level [`RegisterTransport`] while keeping the cache
//! consistent with what the device actually acknowledged.
//!
//! Everything here is per-register. Assembling register pairs into 16-bit
//! values, locking, and device identity live in `tca9535-mux`.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod cache;
pub mod error;
pub mod regs;

pub use bus::{RegisterBus, RegisterTransport};
pub use cache::RegisterCache;
pub use error::{BusError, TransportError};
pub use regs::{PortPair, Reg};
