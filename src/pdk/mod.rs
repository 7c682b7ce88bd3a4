//!
//! # Built-In Process Technologies
//!
//! Hard-coded [Technology] data for the supported fabrication processes.
//! Each sub-module exposes a single `tech()` constructor returning the
//! complete technology tree.
//!

use crate::data::Technology;

pub mod ihp_sg13g2;
pub mod sky130a;

/// All built-in technologies, as written out by the generator CLI
pub fn technologies() -> Vec<Technology> {
    vec![sky130a::tech(), ihp_sg13g2::tech()]
}
