//! CMSIS-SVD device model builder and register bit-layout engine.
//!
//! [`parse`] reads an SVD document into a [`Device`] tree of peripherals,
//! registers and fields, resolving absolute register addresses and the three
//! ways SVD files spell a field's bit range. [`layout::layout`] turns one
//! [`Register`] into an ordered [`layout::DrawPlan`] of boxes and labels that a
//! renderer can paint as-is.
//!
//! Vendor SVD files are often imperfect, so the builder is lenient: elements
//! without a name are skipped, unreadable addresses read as zero, unreadable
//! sizes as 32 bits, and fields without a recognizable bit range are dropped.
//! Only a document that is not XML at all is an error.
//!
//! # Usage
//!
//! ```
//! let svd = br#"
//!     <device>
//!       <name>DEMO</name>
//!       <peripherals>
//!         <peripheral>
//!           <name>TIM2</name>
//!           <baseAddress>0x40000000</baseAddress>
//!           <registers>
//!             <register>
//!               <name>PSC</name>
//!               <addressOffset>0x28</addressOffset>
//!               <size>16</size>
//!               <fields>
//!                 <field><name>PSC</name><bitRange>[15:0]</bitRange></field>
//!               </fields>
//!             </register>
//!           </registers>
//!         </peripheral>
//!       </peripherals>
//!     </device>"#;
//! let device = svd_view::parse(svd)?;
//! let (_, register) = device.find_register("PSC").unwrap();
//! assert_eq!(register.address_hex(), "0x40000028");
//! let plan = svd_view::layout::layout(register, 320.0).unwrap();
//! assert!(!plan.primitives().is_empty());
//! # Ok::<(), svd_view::ParseError>(())
//! ```

#![deny(elided_lifetimes_in_paths)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod config;
mod device;
mod error;
pub mod export;
pub mod layout;
mod session;

pub use config::Config;
pub use device::{
    Access, Device, Field, FieldDetail, FieldId, Peripheral, Register, DEFAULT_SIZE, MAX_SIZE,
    UNKNOWN_DEVICE,
};
pub use error::{ErrorKind, ParseError};
pub use session::Session;

use std::path::Path;

/// Builds a device model from the SVD document `document` with default
/// options.
pub fn parse(document: &[u8]) -> Result<Device, ParseError> {
    Config::new().parse(document)
}

/// Reads the SVD file at `path` and builds a device model with default
/// options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Device, ParseError> {
    Config::new().parse_file(path)
}
