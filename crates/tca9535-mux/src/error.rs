//! Device-level error types.
//!
//! A 16-bit port operation is two independent 8-bit transactions, and both
//! are always attempted. The partial-error types carry the per-half
//! outcome so a caller can see exactly which register is trustworthy.

use core::fmt;

use tca9535_regmap::{BusError, Reg};

/// A 16-bit port read in which at least one half failed.
///
/// The surviving half still completed: its value populated the cache (for
/// non-volatile registers) and can be observed on a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialReadError {
    /// Failure on the low-byte register, if any.
    pub lo: Option<BusError>,
    /// Failure on the high-byte register, if any.
    pub hi: Option<BusError>,
}

/// A 16-bit port write in which at least one half failed.
///
/// The surviving half was applied to the device, so the port may hold a
/// mix of old and new bytes until a retry succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialWriteError {
    /// Failure on the low-byte register, if any.
    pub lo: Option<BusError>,
    /// Failure on the high-byte register, if any.
    pub hi: Option<BusError>,
}

impl PartialReadError {
    /// The registers whose transactions failed, low half first.
    pub fn failed_registers(&self) -> impl Iterator<Item = Reg> + '_ {
        self.lo.iter().chain(self.hi.iter()).map(BusError::reg)
    }
}

impl PartialWriteError {
    /// The registers whose transactions failed, low half first.
    pub fn failed_registers(&self) -> impl Iterator<Item = Reg> + '_ {
        self.lo.iter().chain(self.hi.iter()).map(BusError::reg)
    }
}

fn fmt_halves(
    f: &mut fmt::Formatter<'_>,
    what: &str,
    lo: Option<&BusError>,
    hi: Option<&BusError>,
) -> fmt::Result {
    write!(f, "partial 16-bit {what}")?;
    if let Some(e) = lo {
        write!(f, "; low half: {e}")?;
    }
    if let Some(e) = hi {
        write!(f, "; high half: {e}")?;
    }
    Ok(())
}

impl fmt::Display for PartialReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_halves(f, "read", self.lo.as_ref(), self.hi.as_ref())
    }
}

impl fmt::Display for PartialWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_halves(f, "write", self.lo.as_ref(), self.hi.as_ref())
    }
}

/// Errors from the process-wide instance registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Every instance ID is in use.
    Exhausted,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => f.write_str("instance IDs exhausted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tca9535_regmap::TransportError;

    #[test]
    fn read_error_lists_failed_halves() {
        let err = PartialReadError {
            lo: Some(BusError::Io {
                reg: Reg::Input0,
                cause: TransportError(-121),
            }),
            hi: None,
        };
        assert_eq!(
            format!("{err}"),
            "partial 16-bit read; low half: register Input 0 (0x00): transport error -121"
        );
        assert_eq!(err.failed_registers().collect::<Vec<_>>(), vec![Reg::Input0]);
    }

    #[test]
    fn write_error_lists_both_halves() {
        let io = |reg| BusError::Io {
            reg,
            cause: TransportError(-5),
        };
        let err = PartialWriteError {
            lo: Some(io(Reg::Output0)),
            hi: Some(io(Reg::Output1)),
        };
        assert_eq!(
            err.failed_registers().collect::<Vec<_>>(),
            vec![Reg::Output0, Reg::Output1]
        );
        let rendered = format!("{err}");
        assert!(rendered.contains("low half"));
        assert!(rendered.contains("high half"));
    }

    #[test]
    fn registry_error_display() {
        assert_eq!(format!("{}", RegistryError::Exhausted), "instance IDs exhausted");
    }
}
