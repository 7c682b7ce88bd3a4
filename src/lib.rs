//!
//! # Tech21
//!
//! A reader & writer for the KLayout-PEX ("KPEX") process-technology
//! description format.
//!
//! KPEX describes a fabrication process to a parasitic extractor: the drawn
//! GDS layers, the LVS-computed derived layers, the vertical process stack
//! (substrate through passivation), and the extraction coefficients
//! (sheet and via resistances, area/perimeter/sidewall capacitances).
//! Its root message is `kpex.tech.Technology`, serializable in three
//! interchangeable encodings:
//!
//! * Protobuf binary wire format
//! * Protobuf text format, led by the two comment lines
//!   `# proto-file: tech.proto` and `# proto-message: kpex.tech.Technology`
//! * Pretty-printed JSON, with the schema's snake_case field names and
//!   UPPER_SNAKE enumeration names preserved
//!
//! The primary entry points are [Technology::open] and [Technology::save],
//! parameterized by [TechFormat], plus the string/byte-level codecs on
//! [Technology] and the file-to-file [ser::convert]. The [pdk] module holds
//! the built-in technology data for the SkyWater `sky130A` and IHP
//! `ihp_sg13g2` processes.
//!
//! ```skip
//! use tech21::{TechFormat, Technology};
//!
//! let tech = tech21::pdk::sky130a::tech();
//! tech.save(TechFormat::Json, "sky130A_tech.pb.json")?;
//! let readback = Technology::open("sky130A_tech.pb.json", TechFormat::Json)?;
//! assert_eq!(tech, readback);
//! ```
//!

pub mod data;
pub mod pdk;
pub mod read;
pub mod ser;
pub mod write;

pub use data::*;
pub use ser::TechFormat;

// Unit tests
#[cfg(test)]
mod tests;
