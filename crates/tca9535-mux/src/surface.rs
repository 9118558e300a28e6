//! Textual control surface.
//!
//! Library form of the externally-visible read/write endpoints: five named
//! attributes, each shown as a base-10 unsigned integer. The write side
//! keeps the forgiving contract of the reference surface: a value above
//! 65535 is accepted and discarded with a warning (never partially
//! applied, never an error to the caller), and a failed bus write is
//! logged but still reported as success — the caller learns the truth by
//! reading the attribute back. A partial read renders the literal `error`
//! marker instead of a number.

use core::fmt;

use bitflags::bitflags;

use tca9535_regmap::{PortPair, RegisterTransport};

use crate::dev_warn;
use crate::device::Tca9535;

bitflags! {
    /// Access modes of a surface attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        /// The attribute can be shown.
        const READ = 1 << 0;
        /// The attribute can be stored.
        const WRITE = 1 << 1;
    }
}

/// A named control-surface endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Physical bus address of the device. Read-only.
    Address,
    /// Input port. Read-only.
    Input,
    /// Output port.
    Output,
    /// Configuration port.
    Configuration,
    /// Polarity Inversion port.
    Polarity,
}

impl Attribute {
    /// All attributes, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Address,
        Self::Input,
        Self::Output,
        Self::Configuration,
        Self::Polarity,
    ];

    /// The endpoint name exposed to callers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Input => "input",
            Self::Output => "out",
            Self::Configuration => "config",
            Self::Polarity => "polarity",
        }
    }

    /// Access modes: `address` and `input` never accept stores.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Address | Self::Input => Access::READ,
            Self::Output | Self::Configuration | Self::Polarity => {
                Access::READ.union(Access::WRITE)
            }
        }
    }
}

/// Errors reported to a caller of [`store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The attribute does not accept writes.
    ReadOnly,
    /// The input was not a base-10 unsigned integer.
    InvalidInput,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("attribute is read-only"),
            Self::InvalidInput => f.write_str("expected a base-10 unsigned integer"),
        }
    }
}

/// Renders `attr` for `dev`: the base-10 value, or the literal `error`
/// marker when any half of the backing register pair could not be read.
pub fn show<T: RegisterTransport>(dev: &Tca9535<T>, attr: Attribute) -> String {
    let pair = match attr {
        Attribute::Address => return dev.identity().bus_address.to_string(),
        Attribute::Input => PortPair::INPUT,
        Attribute::Output => PortPair::OUTPUT,
        Attribute::Configuration => PortPair::CONFIG,
        Attribute::Polarity => PortPair::POLARITY,
    };
    match dev.read_pair(pair) {
        Ok(value) => value.to_string(),
        // The failed halves were already logged by the device core.
        Err(_) => String::from("error"),
    }
}

/// Parses `input` as a base-10 unsigned integer and applies it to `attr`.
///
/// Values above 65535 are accepted and discarded with a warning; the port
/// keeps its previous value and the caller still sees success. A partial
/// bus failure is likewise reported as success — the surface never
/// half-rejects a store the transport already half-applied.
///
/// # Errors
///
/// [`StoreError::ReadOnly`] for `address` and `input`;
/// [`StoreError::InvalidInput`] if `input` does not parse.
pub fn store<T: RegisterTransport>(
    dev: &Tca9535<T>,
    attr: Attribute,
    input: &str,
) -> Result<(), StoreError> {
    let pair = match attr {
        Attribute::Address | Attribute::Input => return Err(StoreError::ReadOnly),
        Attribute::Output => PortPair::OUTPUT,
        Attribute::Configuration => PortPair::CONFIG,
        Attribute::Polarity => PortPair::POLARITY,
    };
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| StoreError::InvalidInput)?;
    match u16::try_from(value) {
        Ok(value) => {
            // Partial failures were logged per half; the caller reads back
            // to find out what actually landed.
            let _ = dev.write_pair(pair, value);
        }
        Err(_) => {
            dev_warn!(
                &dev.identity().name,
                "{} value {} too big, ignoring",
                attr.name(),
                value
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tca9535_regmap::Reg;

    use crate::fake::{Dir, FakeTransport};

    fn attach(fake: &FakeTransport) -> Tca9535<FakeTransport> {
        Tca9535::attach(fake.clone(), 0x21, "tca9535-mux").expect("instance IDs available")
    }

    #[test]
    fn access_modes() {
        assert_eq!(Attribute::Address.access(), Access::READ);
        assert_eq!(Attribute::Input.access(), Access::READ);
        for attr in [Attribute::Output, Attribute::Configuration, Attribute::Polarity] {
            assert_eq!(attr.access(), Access::READ | Access::WRITE);
        }
    }

    #[test]
    fn attribute_names() {
        let names: Vec<_> = Attribute::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["address", "input", "out", "config", "polarity"]);
    }

    #[test]
    fn show_address() {
        let fake = FakeTransport::new();
        let dev = attach(&fake);
        assert_eq!(show(&dev, Attribute::Address), "33");
    }

    #[test]
    fn store_then_show_roundtrip() {
        let fake = FakeTransport::with_power_on_defaults();
        let dev = attach(&fake);
        store(&dev, Attribute::Output, "4660").unwrap();
        assert_eq!(show(&dev, Attribute::Output), "4660");
        assert_eq!(fake.reg(Reg::Output0), 0x34);
        assert_eq!(fake.reg(Reg::Output1), 0x12);
    }

    #[test]
    fn oversized_store_is_discarded_but_accepted() {
        let fake = FakeTransport::with_power_on_defaults();
        let dev = attach(&fake);
        store(&dev, Attribute::Output, "1000").unwrap();

        store(&dev, Attribute::Output, "65536").unwrap();
        store(&dev, Attribute::Output, "4294967295").unwrap();

        // No register was touched by the discarded stores.
        assert_eq!(show(&dev, Attribute::Output), "1000");
        assert_eq!(fake.count(Dir::Write, Reg::Output0), 1);
        assert_eq!(fake.count(Dir::Write, Reg::Output1), 1);
    }

    #[test]
    fn store_rejects_garbage() {
        let fake = FakeTransport::new();
        let dev = attach(&fake);
        assert_eq!(store(&dev, Attribute::Output, "abc"), Err(StoreError::InvalidInput));
        assert_eq!(store(&dev, Attribute::Output, "-1"), Err(StoreError::InvalidInput));
        assert_eq!(store(&dev, Attribute::Output, ""), Err(StoreError::InvalidInput));
        assert_eq!(fake.count(Dir::Write, Reg::Output0), 0);
    }

    #[test]
    fn store_rejects_read_only_attributes() {
        let fake = FakeTransport::new();
        let dev = attach(&fake);
        assert_eq!(store(&dev, Attribute::Input, "1"), Err(StoreError::ReadOnly));
        assert_eq!(store(&dev, Attribute::Address, "1"), Err(StoreError::ReadOnly));
    }

    #[test]
    fn show_renders_error_marker_on_partial_read() {
        let fake = FakeTransport::new();
        let dev = attach(&fake);
        fake.fail_on(Dir::Read, Reg::Input1, -121);
        assert_eq!(show(&dev, Attribute::Input), "error");

        fake.clear_failures();
        fake.set_reg(Reg::Input0, 0x01);
        assert_eq!(show(&dev, Attribute::Input), "1");
    }

    #[test]
    fn failed_store_still_reports_success() {
        let fake = FakeTransport::with_power_on_defaults();
        let dev = attach(&fake);
        fake.fail_on(Dir::Write, Reg::Polarity1, -5);
        // The reference surface swallows bus errors on store.
        store(&dev, Attribute::Polarity, "65535").unwrap();
        assert_eq!(fake.reg(Reg::Polarity0), 0xFF);
        assert_eq!(fake.reg(Reg::Polarity1), 0x00);
    }

    #[test]
    fn store_error_display() {
        assert_eq!(format!("{}", StoreError::ReadOnly), "attribute is read-only");
        assert_eq!(
            format!("{}", StoreError::InvalidInput),
            "expected a base-10 unsigned integer"
        );
    }
}
