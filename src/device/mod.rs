mod access;
mod field;
mod peripheral;
mod register;

pub use self::access::Access;
pub use self::field::{Field, FieldDetail, FieldId};
pub use self::peripheral::Peripheral;
pub use self::register::{Register, DEFAULT_SIZE, MAX_SIZE};
use self::peripheral::SvdPeripheral;
use crate::config::Config;
use crate::error::Tolerance;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use std::num::ParseIntError;

/// Device name used when the document does not carry one.
pub const UNKNOWN_DEVICE: &str = "Unknown";

/// The outermost frame of the description.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    /// The string identifies the device or device series.
    pub name: String,
    /// The name of the device vendor.
    pub vendor: String,
    /// The version of the description.
    pub version: String,
    /// Overview of the device.
    pub description: String,
    pub(crate) peripherals: Vec<Peripheral>,
}

/// `<device>` as it appears in the document. Every element is optional here;
/// defaults are applied by [`SvdDevice::build`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SvdDevice {
    name: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default, with = "PeripheralsWrapper")]
    peripherals: Vec<SvdPeripheral>,
}

#[derive(Deserialize)]
struct PeripheralsWrapper {
    #[serde(rename = "$value", default)]
    values: Vec<SvdPeripheral>,
}

impl Device {
    /// Creates a new empty device definition.
    pub fn new(name: String) -> Self {
        Self {
            name,
            vendor: String::new(),
            version: String::new(),
            description: String::new(),
            peripherals: Vec::new(),
        }
    }

    /// Returns the peripherals in document order.
    pub fn peripherals(&self) -> &[Peripheral] {
        &self.peripherals
    }

    /// Returns the first peripheral named `name`.
    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals.iter().find(|peripheral| peripheral.name == name)
    }

    /// Appends a peripheral `peripheral`.
    pub fn add_periph(&mut self, peripheral: Peripheral) {
        self.peripherals.push(peripheral);
    }

    /// Appends a new peripheral initialized by `f`.
    pub fn new_periph(&mut self, f: impl FnOnce(&mut Peripheral)) {
        let mut peripheral = Peripheral::default();
        f(&mut peripheral);
        self.add_periph(peripheral);
    }

    /// Returns an iterator over every register paired with its peripheral.
    pub fn registers(&self) -> impl Iterator<Item = (&Peripheral, &Register)> + '_ {
        self.peripherals.iter().flat_map(|peripheral| {
            peripheral.registers().iter().map(move |register| (peripheral, register))
        })
    }

    /// Returns the total number of registers across all peripherals.
    pub fn register_count(&self) -> usize {
        self.peripherals.iter().map(|peripheral| peripheral.registers().len()).sum()
    }

    /// Finds the first register named `name`, searching peripherals in
    /// document order.
    pub fn find_register(&self, name: &str) -> Option<(&Peripheral, &Register)> {
        self.registers().find(|(_, register)| register.name == name)
    }

    /// Finds the register named `name` inside the peripheral named
    /// `peripheral`.
    pub fn find_register_in(
        &self,
        peripheral: &str,
        name: &str,
    ) -> Option<(&Peripheral, &Register)> {
        self.registers()
            .find(|(periph, register)| periph.name == peripheral && register.name == name)
    }
}

impl SvdDevice {
    pub(crate) fn build(self, config: &Config) -> Device {
        let name = self.name.map(trimmed).filter(|name| !name.is_empty()).unwrap_or_else(|| {
            debug!(tolerance = Tolerance::MissingOptional.as_str(); "device name missing");
            UNKNOWN_DEVICE.to_owned()
        });
        let mut peripherals =
            self.peripherals.into_iter().filter_map(SvdPeripheral::build).collect::<Vec<_>>();
        if config.inherit_derived {
            inherit_derived(&mut peripherals);
        }
        debug!(
            device = name.as_str(),
            peripherals = peripherals.len();
            "device model built"
        );
        Device {
            name,
            vendor: self.vendor.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            peripherals,
        }
    }
}

/// Copies registers into peripherals that declare `derivedFrom` and have none
/// of their own, rebasing the copies onto the deriving peripheral.
fn inherit_derived(peripherals: &mut [Peripheral]) {
    let mut index = IndexMap::new();
    for (i, peripheral) in peripherals.iter().enumerate() {
        index.entry(peripheral.name.clone()).or_insert(i);
    }
    for i in 0..peripherals.len() {
        let Some(source) = peripherals[i].derived_from.clone() else { continue };
        if !peripherals[i].registers.is_empty() {
            continue;
        }
        let Some(&j) = index.get(&source) else {
            warn!(
                peripheral = peripherals[i].name.as_str(),
                derived_from = source.as_str();
                "peripheral referenced in `derivedFrom` not found"
            );
            continue;
        };
        if i == j {
            continue;
        }
        let base_address = peripherals[i].base_address;
        let registers = peripherals[j]
            .registers
            .iter()
            .map(|register| register.rebased(base_address))
            .collect();
        let description = peripherals[j].description.clone();
        let peripheral = &mut peripherals[i];
        peripheral.registers = registers;
        if peripheral.description.is_empty() {
            peripheral.description = description;
        }
    }
}

impl PeripheralsWrapper {
    fn deserialize<'de, D>(deserializer: D) -> Result<Vec<SvdPeripheral>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(<Self as Deserialize>::deserialize(deserializer)?.values)
    }
}

pub(crate) fn trimmed(src: String) -> String {
    let trimmed = src.trim();
    if trimmed.len() == src.len() {
        src
    } else {
        trimmed.to_owned()
    }
}

/// Parses an integer written either in decimal or with a `0x`/`0X` prefix in
/// hexadecimal.
pub(crate) fn parse_int(src: &str) -> Result<u32, ParseIntError> {
    let src = src.trim();
    match src.strip_prefix("0x").or_else(|| src.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => src.parse(),
    }
}

/// Parses a hexadecimal address with an optional sign and `0x` prefix. The
/// result wraps to the 32-bit address space.
pub(crate) fn parse_hex(src: &str) -> Result<u32, ParseIntError> {
    let src = src.trim();
    let (negative, digits) = match src.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, src.strip_prefix('+').unwrap_or(src)),
    };
    let digits = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")).unwrap_or(digits);
    let value = i64::from_str_radix(digits, 16)?;
    let value = if negative { value.wrapping_neg() } else { value };
    Ok(value as u32)
}

/// Reads an address element, falling back to zero when it is absent or not
/// hexadecimal.
pub(crate) fn read_address(src: Option<&str>, element: &str, owner: &str) -> u32 {
    let Some(src) = src else { return 0 };
    parse_hex(src).unwrap_or_else(|err| {
        warn!(
            tolerance = Tolerance::AddressParseFailure.as_str(),
            element = element,
            owner = owner,
            value = src;
            "unparsable address, using zero: {err}"
        );
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_auto_base() {
        assert_eq!(parse_int("32"), Ok(32));
        assert_eq!(parse_int("0x20"), Ok(32));
        assert_eq!(parse_int(" 0X10 "), Ok(16));
        assert!(parse_int("thirty-two").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn hex_addresses() {
        assert_eq!(parse_hex("0x40000000"), Ok(0x4000_0000));
        assert_eq!(parse_hex("40"), Ok(0x40));
        assert_eq!(parse_hex("0x0040"), Ok(0x40));
        assert_eq!(parse_hex("-0x10"), Ok(0xFFFF_FFF0));
        assert_eq!(parse_hex("0x100000004"), Ok(4));
        assert!(parse_hex("0xZZ").is_err());
    }

    #[test]
    fn address_defaults_to_zero() {
        assert_eq!(read_address(None, "addressOffset", "CTRL"), 0);
        assert_eq!(read_address(Some("n/a"), "addressOffset", "CTRL"), 0);
        assert_eq!(read_address(Some("0x1C"), "addressOffset", "CTRL"), 0x1C);
    }

    #[test]
    fn find_register_is_document_ordered() {
        let mut device = Device::new("DEV".to_owned());
        device.new_periph(|periph| {
            periph.name = "GPIOA".to_owned();
            periph.new_reg(|reg| reg.name = "ODR".to_owned());
        });
        device.new_periph(|periph| {
            periph.name = "GPIOB".to_owned();
            periph.new_reg(|reg| reg.name = "ODR".to_owned());
            periph.new_reg(|reg| reg.name = "IDR".to_owned());
        });
        assert_eq!(device.register_count(), 3);
        let (periph, _) = device.find_register("ODR").unwrap();
        assert_eq!(periph.name, "GPIOA");
        let (periph, _) = device.find_register_in("GPIOB", "ODR").unwrap();
        assert_eq!(periph.name, "GPIOB");
        assert!(device.find_register("MODER").is_none());
    }
}
