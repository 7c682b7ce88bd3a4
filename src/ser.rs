//!
//! # Tech21 Serialization Formats
//!
//! The [TechFormat] enumeration of the three on-disk encodings, and the
//! file-level [write], [read], and [convert] operations over them.
//!

// Std-Lib Imports
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// Local Imports
use crate::data::{TechError, TechResult, Technology};
use crate::{read, write};

/// # Tech File Format
///
/// The three interchangeable encodings of a [Technology].
/// All three carry the same information; [Binary](TechFormat::Binary) is the
/// only one that is not self-describing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TechFormat {
    /// Protobuf binary wire format
    Binary,
    /// Protobuf text format, with the two-line file header
    Textual,
    /// Pretty-printed JSON, schema field names preserved
    Json,
}
impl TechFormat {
    /// Human-readable format name, as printed by the generator CLI
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Binary => "Protobuf Binary",
            Self::Textual => "Protobuf Textual",
            Self::Json => "JSON",
        }
    }
}
impl fmt::Display for TechFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
impl FromStr for TechFormat {
    type Err = TechError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "pb" => Ok(Self::Binary),
            "textual" | "text" | "pbtxt" => Ok(Self::Textual),
            "json" => Ok(Self::Json),
            _ => Err(TechError::Str(format!("Unknown format '{}'", s))),
        }
    }
}

/// Write `tech` to file `fname` in format `fmt`.
/// Creates the file if absent and truncates it if present.
pub fn write(tech: &Technology, fname: impl AsRef<Path>, fmt: TechFormat) -> TechResult<()> {
    match fmt {
        TechFormat::Binary => write::save_binary(tech, fname),
        TechFormat::Textual => write::save_text(tech, fname),
        TechFormat::Json => {
            let json = tech.to_json_string()?;
            std::fs::write(fname, json)?;
            Ok(())
        }
    }
}
/// Read a [Technology] from `fmt`-format file `fname`.
/// Malformed content fails with a [TechError]; no partially populated
/// [Technology] is ever returned.
pub fn read(fname: impl AsRef<Path>, fmt: TechFormat) -> TechResult<Technology> {
    match fmt {
        TechFormat::Binary => read::load_binary(fname),
        TechFormat::Textual => read::parse_file(fname),
        TechFormat::Json => {
            let json = std::fs::read_to_string(fname)?;
            Technology::from_json_str(&json)
        }
    }
}
/// Convert `infmt`-format file `inpath` to `outfmt`-format file `outpath`.
/// A plain read-then-write; the two formats (and paths) may be equal.
pub fn convert(
    inpath: impl AsRef<Path>,
    infmt: TechFormat,
    outpath: impl AsRef<Path>,
    outfmt: TechFormat,
) -> TechResult<()> {
    let tech = read(inpath, infmt)?;
    write(&tech, outpath, outfmt)
}
