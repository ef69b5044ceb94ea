use super::field::{Field, FieldId, SvdField};
use super::{parse_int, read_address, trimmed};
use crate::error::Tolerance;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};

/// Bit-width assumed for registers that do not declare a usable size.
pub const DEFAULT_SIZE: u32 = 32;

/// Largest register bit-width accepted from a document.
pub const MAX_SIZE: u32 = 1024;

/// The description of a register.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    /// String to identify the register.
    pub name: String,
    /// String describing the details of the register.
    pub description: String,
    /// The address offset relative to the enclosing peripheral.
    pub address_offset: u32,
    /// Absolute address, the peripheral base plus the offset, wrapped to the
    /// 32-bit address space.
    pub address: u32,
    /// The bit-width of the register.
    pub size: u32,
    /// The default value for the register at RESET, as written in the source.
    pub reset_value: Option<String>,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SvdRegister {
    name: Option<String>,
    description: Option<String>,
    address_offset: Option<String>,
    size: Option<String>,
    reset_value: Option<String>,
    #[serde(default, with = "FieldsWrapper")]
    fields: Vec<SvdField>,
}

#[derive(Deserialize)]
struct FieldsWrapper {
    #[serde(rename = "$value", default)]
    values: Vec<SvdField>,
}

impl Default for Register {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            address_offset: 0,
            address: 0,
            size: DEFAULT_SIZE,
            reset_value: None,
            fields: Vec::new(),
        }
    }
}

impl Register {
    /// Returns the fields in document order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Resolves a field identifier handed out by a draw plan.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    /// Returns the first field named `name` with its identifier.
    pub fn field_by_name(&self, name: &str) -> Option<(FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
            .map(|(index, field)| (FieldId::new(index), field))
    }

    /// Adds a new field `field`.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Adds a new field initialized by `f`.
    pub fn new_field(&mut self, f: impl FnOnce(&mut Field)) {
        let mut field = Field::default();
        f(&mut field);
        self.add_field(field);
    }

    /// Returns the absolute address formatted as `0x` followed by exactly eight
    /// uppercase hexadecimal digits.
    pub fn address_hex(&self) -> String {
        format!("0x{:08X}", self.address)
    }

    pub(crate) fn rebased(&self, base_address: u32) -> Self {
        Self { address: base_address.wrapping_add(self.address_offset), ..self.clone() }
    }
}

impl SvdRegister {
    pub(crate) fn build(self, base_address: u32, peripheral: &str) -> Option<Register> {
        let Some(name) = self.name.map(trimmed) else {
            debug!(
                tolerance = Tolerance::MissingOptional.as_str(),
                peripheral = peripheral;
                "skipping register without name"
            );
            return None;
        };
        let address_offset = read_address(self.address_offset.as_deref(), "addressOffset", &name);
        let size = match self.size.as_deref().map(parse_int) {
            Some(Ok(size)) if size <= MAX_SIZE => size,
            Some(Ok(size)) => {
                warn!(
                    tolerance = Tolerance::SizeParseFailure.as_str(),
                    register = name.as_str();
                    "register size {size} exceeds {MAX_SIZE} bits, using {DEFAULT_SIZE}"
                );
                DEFAULT_SIZE
            }
            Some(Err(err)) => {
                warn!(
                    tolerance = Tolerance::SizeParseFailure.as_str(),
                    register = name.as_str();
                    "unparsable register size, using {DEFAULT_SIZE}: {err}"
                );
                DEFAULT_SIZE
            }
            None => DEFAULT_SIZE,
        };
        let fields = self.fields.into_iter().filter_map(|field| field.build(&name)).collect();
        Some(Register {
            description: self.description.unwrap_or_default(),
            address_offset,
            address: base_address.wrapping_add(address_offset),
            size,
            reset_value: self.reset_value,
            fields,
            name,
        })
    }
}

impl FieldsWrapper {
    fn deserialize<'de, D>(deserializer: D) -> Result<Vec<SvdField>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(<Self as Deserialize>::deserialize(deserializer)?.values)
    }
}
