//! Register addresses and access classification.
//!
//! The TCA9535 register file is eight addresses, statically partitioned
//! into four low/high pairs. Classification is fixed by the silicon: the
//! Input pair is read-only and volatile (driven by external pins), every
//! other register is writable and holds its value between writes.

use core::fmt;

/// One of the eight TCA9535 register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Reg {
    /// Input Port 0. Read-only, volatile.
    Input0 = 0x00,
    /// Input Port 1. Read-only, volatile.
    Input1 = 0x01,
    /// Output Port 0. Power-on default 0xFF.
    Output0 = 0x02,
    /// Output Port 1. Power-on default 0xFF.
    Output1 = 0x03,
    /// Polarity Inversion Port 0. Power-on default 0x00 (not inverted).
    Polarity0 = 0x04,
    /// Polarity Inversion Port 1. Power-on default 0x00 (not inverted).
    Polarity1 = 0x05,
    /// Configuration Port 0. Power-on default 0xFF (all pins input).
    Config0 = 0x06,
    /// Configuration Port 1. Power-on default 0xFF (all pins input).
    Config1 = 0x07,
}

impl Reg {
    /// Number of registers in the file.
    pub const COUNT: usize = 8;

    /// The register's bus address.
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Maps a raw address back to a register. `None` for anything outside
    /// the 0x00..=0x07 register file.
    #[must_use]
    pub const fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            0x00 => Some(Self::Input0),
            0x01 => Some(Self::Input1),
            0x02 => Some(Self::Output0),
            0x03 => Some(Self::Output1),
            0x04 => Some(Self::Polarity0),
            0x05 => Some(Self::Polarity1),
            0x06 => Some(Self::Config0),
            0x07 => Some(Self::Config1),
            _ => None,
        }
    }

    /// Whether `addr` names a register at all.
    #[must_use]
    pub const fn is_valid_address(addr: u8) -> bool {
        addr < Self::COUNT as u8
    }

    /// Whether the device accepts writes to this register. False only for
    /// the Input pair.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Input0 | Self::Input1)
    }

    /// Whether the register's value can change without a write from us.
    /// Volatile registers must never be served from cache.
    #[must_use]
    pub const fn is_volatile(self) -> bool {
        matches!(self, Self::Input0 | Self::Input1)
    }

    /// Human-readable register name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input0 => "Input 0",
            Self::Input1 => "Input 1",
            Self::Output0 => "Output 0",
            Self::Output1 => "Output 1",
            Self::Polarity0 => "Polarity 0",
            Self::Polarity1 => "Polarity 1",
            Self::Config0 => "Configuration 0",
            Self::Config1 => "Configuration 1",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A low/high register pair forming one 16-bit logical port.
///
/// The logical value is `hi << 8 | lo`. There is no 16-bit bus primitive;
/// a pair is always two independent 8-bit transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPair {
    /// Register holding the low byte.
    pub lo: Reg,
    /// Register holding the high byte.
    pub hi: Reg,
}

impl PortPair {
    /// The Input port pair (read-only).
    pub const INPUT: Self = Self {
        lo: Reg::Input0,
        hi: Reg::Input1,
    };
    /// The Output port pair.
    pub const OUTPUT: Self = Self {
        lo: Reg::Output0,
        hi: Reg::Output1,
    };
    /// The Polarity Inversion port pair.
    pub const POLARITY: Self = Self {
        lo: Reg::Polarity0,
        hi: Reg::Polarity1,
    };
    /// The Configuration port pair.
    pub const CONFIG: Self = Self {
        lo: Reg::Config0,
        hi: Reg::Config1,
    };

    /// Splits a 16-bit port value into its (low, high) bytes.
    #[must_use]
    pub const fn split(value: u16) -> (u8, u8) {
        (value as u8, (value >> 8) as u8)
    }

    /// Combines low and high bytes into the 16-bit port value.
    #[must_use]
    pub const fn combine(lo: u8, hi: u8) -> u16 {
        (hi as u16) << 8 | lo as u16
    }
}
