//! Plain-text dump of a device model: one section per peripheral with a
//! fixed-width register table.

use crate::device::Device;
use std::fmt::{self, Write};

const RULE_WIDTH: usize = 100;

/// Writes the text dump of `device` to `out`.
pub fn write_text<W: Write>(device: &Device, out: &mut W) -> fmt::Result {
    writeln!(out, "Device: {}", device.name)?;
    if !device.vendor.is_empty() {
        writeln!(out, "Vendor: {}", device.vendor)?;
    }
    if !device.version.is_empty() {
        writeln!(out, "Version: {}", device.version)?;
    }
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    for peripheral in device.peripherals() {
        writeln!(out)?;
        writeln!(out, "Peripheral: {}", peripheral.name)?;
        writeln!(out, "Base address: {}", peripheral.base_address_hex())?;
        writeln!(out, "Description: {}", one_line(&peripheral.description))?;
        writeln!(out, "Registers: {}", peripheral.registers().len())?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        if !peripheral.registers().is_empty() {
            writeln!(out, "{:<30} {:<15} {:<15} Description", "Register", "Address", "Offset")?;
            writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
            for register in peripheral.registers() {
                let offset = format!("0x{:X}", register.address_offset);
                writeln!(
                    out,
                    "{:<30} {:<15} {:<15} {}",
                    register.name,
                    register.address_hex(),
                    offset,
                    one_line(&register.description),
                )?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Returns the text dump of `device`.
pub fn to_text(device: &Device) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    let _ = write_text(device, &mut out);
    out
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_and_columns() {
        let mut device = Device::new("DEV".to_owned());
        device.new_periph(|periph| {
            periph.name = "GPIOA".to_owned();
            periph.base_address = 0x4800_0000;
            periph.description = "General purpose\n    I/O".to_owned();
            periph.new_reg(|reg| {
                reg.name = "ODR".to_owned();
                reg.address_offset = 0x14;
                reg.description = "Output data".to_owned();
            });
        });
        device.new_periph(|periph| periph.name = "EMPTY".to_owned());

        let text = to_text(&device);
        assert!(text.starts_with("Device: DEV\n"));
        assert!(text.contains("Description: General purpose I/O\n"));
        assert!(text.contains("Registers: 1\n"));
        let row = text.lines().find(|line| line.starts_with("ODR")).unwrap();
        assert_eq!(&row[31..41], "0x48000014");
        assert_eq!(&row[47..51], "0x14");
        assert!(row.ends_with("Output data"));
        assert!(text.contains("Peripheral: EMPTY\n"));
        assert!(text.contains("Registers: 0\n"));
    }
}
