use super::register::{Register, SvdRegister};
use super::{read_address, trimmed};
use crate::error::Tolerance;
use log::debug;
use serde::de::{EnumAccess, IgnoredAny, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Peripheral of the device.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Peripheral {
    /// The string identifies the peripheral.
    pub name: String,
    /// The string provides an overview of the purpose and functionality of the
    /// peripheral.
    pub description: String,
    /// Lowest address reserved or used by the peripheral.
    pub base_address: u32,
    /// The peripheral name from which to inherit data.
    pub derived_from: Option<String>,
    pub(crate) registers: Vec<Register>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SvdPeripheral {
    derived_from: Option<String>,
    name: Option<String>,
    description: Option<String>,
    base_address: Option<String>,
    #[serde(default, with = "RegistersWrapper")]
    registers: Vec<RegisterNode>,
}

/// A child of `<registers>`. Elements other than `<register>` and
/// `<cluster>` are kept only by name.
#[derive(Debug)]
enum RegisterNode {
    Register(SvdRegister),
    Cluster(SvdCluster),
    Other(String),
}

/// Registers grouped inside a `<cluster>` are not part of the model. Only the
/// name is read so the skip can be logged.
#[derive(Debug, Deserialize)]
struct SvdCluster {
    name: Option<String>,
}

#[derive(Deserialize)]
struct RegistersWrapper {
    #[serde(rename = "$value", default)]
    values: Vec<RegisterNode>,
}

impl Peripheral {
    /// Returns the registers in document order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Returns the first register named `name`.
    pub fn reg(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|register| register.name == name)
    }

    /// Adds a new register `register`.
    pub fn add_reg(&mut self, register: Register) {
        self.registers.push(register);
    }

    /// Adds a new register initialized by `f`. The register address is
    /// computed from the peripheral base address and the register offset set
    /// by `f`.
    pub fn new_reg(&mut self, f: impl FnOnce(&mut Register)) {
        let mut register = Register::default();
        f(&mut register);
        register.address = self.base_address.wrapping_add(register.address_offset);
        self.add_reg(register);
    }

    /// Returns the base address formatted as `0x` followed by eight uppercase
    /// hexadecimal digits.
    pub fn base_address_hex(&self) -> String {
        format!("0x{:08X}", self.base_address)
    }
}

impl SvdPeripheral {
    pub(crate) fn build(self) -> Option<Peripheral> {
        let Some(name) = self.name.map(trimmed) else {
            debug!(tolerance = Tolerance::MissingOptional.as_str(); "skipping peripheral without name");
            return None;
        };
        let base_address = read_address(self.base_address.as_deref(), "baseAddress", &name);
        let mut registers = Vec::with_capacity(self.registers.len());
        for node in self.registers {
            match node {
                RegisterNode::Register(register) => {
                    registers.extend(register.build(base_address, &name));
                }
                RegisterNode::Cluster(cluster) => {
                    debug!(
                        peripheral = name.as_str(),
                        cluster = cluster.name.as_deref().unwrap_or("");
                        "skipping registers nested in a cluster"
                    );
                }
                RegisterNode::Other(element) => {
                    debug!(
                        peripheral = name.as_str(),
                        element = element.as_str();
                        "ignoring unsupported element in registers"
                    );
                }
            }
        }
        Some(Peripheral {
            description: self.description.unwrap_or_default(),
            base_address,
            derived_from: self.derived_from.map(trimmed),
            registers,
            name,
        })
    }
}

impl<'de> Deserialize<'de> for RegisterNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = RegisterNode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a register, a cluster or another element")
            }

            fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
            where
                A: EnumAccess<'de>,
            {
                let (element, variant): (String, _) = data.variant()?;
                match element.as_str() {
                    "register" => variant.newtype_variant().map(RegisterNode::Register),
                    "cluster" => variant.newtype_variant().map(RegisterNode::Cluster),
                    _ => {
                        variant.newtype_variant::<IgnoredAny>()?;
                        Ok(RegisterNode::Other(element))
                    }
                }
            }
        }

        deserializer.deserialize_enum("RegisterNode", &["register", "cluster"], NodeVisitor)
    }
}

impl RegistersWrapper {
    fn deserialize<'de, D>(deserializer: D) -> Result<Vec<RegisterNode>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(<Self as Deserialize>::deserialize(deserializer)?.values)
    }
}
