//! Bus-level error types.

use core::fmt;

use crate::regs::Reg;

/// Numeric error code reported by a [`RegisterTransport`] implementation.
///
/// The code's meaning belongs to the transport (an errno for a Linux I2C
/// adapter, a HAL status elsewhere); the core only carries it upward.
///
/// [`RegisterTransport`]: crate::bus::RegisterTransport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportError(pub i32);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error {}", self.0)
    }
}

/// Errors from a single-register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Write attempted on a register the device does not allow writing.
    /// A programming error in the caller, never retryable.
    NotWritable {
        /// The rejected register.
        reg: Reg,
    },
    /// The transport failed the transaction. Retryable by the caller.
    Io {
        /// The register being accessed when the transport failed.
        reg: Reg,
        /// The transport's error code.
        cause: TransportError,
    },
}

impl BusError {
    /// The register the failed transaction addressed.
    #[must_use]
    pub const fn reg(&self) -> Reg {
        match self {
            Self::NotWritable { reg } | Self::Io { reg, .. } => *reg,
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotWritable { reg } => {
                write!(f, "register {} (0x{:02X}) is not writable", reg, reg.addr())
            }
            Self::Io { reg, cause } => {
                write!(f, "register {} (0x{:02X}): {}", reg, reg.addr(), cause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_writable() {
        let err = BusError::NotWritable { reg: Reg::Input0 };
        assert_eq!(format!("{err}"), "register Input 0 (0x00) is not writable");
    }

    #[test]
    fn display_io() {
        let err = BusError::Io {
            reg: Reg::Config1,
            cause: TransportError(-5),
        };
        assert_eq!(format!("{err}"), "register Configuration 1 (0x07): transport error -5");
    }

    #[test]
    fn reg_accessor() {
        assert_eq!(BusError::NotWritable { reg: Reg::Input1 }.reg(), Reg::Input1);
        let io = BusError::Io {
            reg: Reg::Output0,
            cause: TransportError(-110),
        };
        assert_eq!(io.reg(), Reg::Output0);
    }
}
