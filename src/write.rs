//!
//! # Tech21 Writing & Encoding
//!
//! Two of the three on-disk encodings live here:
//! the textual (proto-text) writer and the binary (proto-wire) encoder.
//! The JSON encoding is handled by [serde_json] from [crate::ser].
//!

// Std-Lib Imports
use std::io::Write;
use std::ops::{AddAssign, SubAssign};
use std::path::Path;

// Crates.io Imports
use byteorder::{LittleEndian, WriteBytesExt};

// Local Imports
use crate::data::*;

/// The two self-description comment lines opening every textual-format file
pub const TEXT_HEADER: &str = "# proto-file: tech.proto\n# proto-message: kpex.tech.Technology\n";

/// Write `tech` in textual format to file `fname`.
/// Fields are written in schema-declared order.
pub fn save_text(tech: &Technology, fname: impl AsRef<Path>) -> TechResult<()> {
    let f = std::fs::File::create(fname)?;
    TechWriter::new(f).write_tech(tech)
}
/// Write `tech` to a textual-format [String], header lines included
pub fn to_text_string(tech: &Technology) -> TechResult<String> {
    let mut buf = Vec::new();
    TechWriter::new(&mut buf).write_tech(tech)?;
    let rv = std::str::from_utf8(buf.as_slice())?.to_string();
    Ok(rv)
}

/// # Tech Textual-Format Writing Helper
pub struct TechWriter<'wr> {
    /// Write Destination
    dest: Box<dyn Write + 'wr>,
    /// Indentation Helper
    indent: Indent,
}
impl<'wr> TechWriter<'wr> {
    /// Create a new [TechWriter] to destination `dest`.
    /// Destination is boxed internally.
    pub fn new(dest: impl Write + 'wr) -> Self {
        Self {
            dest: Box::new(dest),
            indent: Indent::new("  "),
        }
    }
    /// Write a [Technology] to the destination,
    /// preceded by the two-line self-description header.
    pub fn write_tech(&mut self, tech: &Technology) -> TechResult<()> {
        write!(self.dest, "{}", TEXT_HEADER)?;
        writeln!(self.dest)?;
        self.str_field("name", &tech.name)?;
        for layer in tech.layers.iter() {
            self.begin("layers")?;
            self.write_layer_info(layer)?;
            self.end()?;
        }
        for computed in tech.lvs_computed_layers.iter() {
            self.begin("lvs_computed_layers")?;
            self.enum_field("kind", computed.kind.as_str())?;
            self.begin("layer_info")?;
            self.write_layer_info(&computed.layer_info)?;
            self.end()?;
            self.end()?;
        }
        self.begin("process_stack")?;
        for layer in tech.process_stack.layers.iter() {
            self.begin("layers")?;
            self.write_stack_layer(layer)?;
            self.end()?;
        }
        self.end()?;
        self.begin("extraction")?;
        self.write_extraction(&tech.extraction)?;
        self.end()?;
        Ok(())
    }
    /// Write the fields of a [LayerInfo]
    fn write_layer_info(&mut self, layer: &LayerInfo) -> TechResult<()> {
        self.str_field("name", &layer.name)?;
        self.str_field("description", &layer.description)?;
        self.u32_field("gds_layer", layer.gds_layer)?;
        self.u32_field("gds_datatype", layer.gds_datatype)
    }
    /// Write the fields of a [StackLayer], type tag included
    fn write_stack_layer(&mut self, layer: &StackLayer) -> TechResult<()> {
        self.str_field("name", &layer.name)?;
        self.enum_field("layer_type", layer.layer_type().as_str())?;
        match &layer.params {
            StackLayerParams::Substrate { substrate_layer: s } => {
                self.begin("substrate_layer")?;
                self.f64_field("height", s.height)?;
                self.f64_field("thickness", s.thickness)?;
                self.str_field("reference", &s.reference)?;
                self.end()
            }
            StackLayerParams::NWell { nwell_layer: w } => {
                self.begin("nwell_layer")?;
                self.f64_field("height", w.height)?;
                self.str_field("reference", &w.reference)?;
                self.opt_contact(&w.contact_above)?;
                self.end()
            }
            StackLayerParams::Diffusion { diffusion_layer: d } => {
                self.begin("diffusion_layer")?;
                self.f64_field("height", d.height)?;
                self.str_field("reference", &d.reference)?;
                self.opt_contact(&d.contact_above)?;
                self.end()
            }
            StackLayerParams::FieldOxide {
                field_oxide_layer: f,
            } => {
                self.begin("field_oxide_layer")?;
                self.f64_field("dielectric_k", f.dielectric_k)?;
                self.end()
            }
            StackLayerParams::Metal { metal_layer: m } => {
                self.begin("metal_layer")?;
                self.f64_field("height", m.height)?;
                self.f64_field("thickness", m.thickness)?;
                self.str_field("reference_below", &m.reference_below)?;
                self.str_field("reference_above", &m.reference_above)?;
                self.opt_contact(&m.contact_above)?;
                self.end()
            }
            StackLayerParams::SimpleDielectric {
                simple_dielectric_layer: s,
            } => {
                self.begin("simple_dielectric_layer")?;
                self.f64_field("dielectric_k", s.dielectric_k)?;
                self.str_field("reference", &s.reference)?;
                self.end()
            }
            StackLayerParams::ConformalDielectric {
                conformal_dielectric_layer: c,
            } => {
                self.begin("conformal_dielectric_layer")?;
                self.f64_field("dielectric_k", c.dielectric_k)?;
                self.f64_field("thickness_over_metal", c.thickness_over_metal)?;
                self.f64_field("thickness_where_no_metal", c.thickness_where_no_metal)?;
                self.f64_field("thickness_sidewall", c.thickness_sidewall)?;
                self.str_field("reference", &c.reference)?;
                self.end()
            }
            StackLayerParams::SidewallDielectric {
                sidewall_dielectric_layer: s,
            } => {
                self.begin("sidewall_dielectric_layer")?;
                self.f64_field("dielectric_k", s.dielectric_k)?;
                self.f64_field("height_above_metal", s.height_above_metal)?;
                self.f64_field("width_outside_sidewall", s.width_outside_sidewall)?;
                self.str_field("reference", &s.reference)?;
                self.end()
            }
        }
    }
    /// Write an optional contact_above sub-record
    fn opt_contact(&mut self, contact: &Option<Contact>) -> TechResult<()> {
        if let Some(ref c) = contact {
            self.begin("contact_above")?;
            self.str_field("name", &c.name)?;
            self.str_field("metal_above", &c.metal_above)?;
            self.f64_field("thickness", c.thickness)?;
            self.end()?;
        }
        Ok(())
    }
    /// Write the fields of an [ExtractionInfo]
    fn write_extraction(&mut self, ex: &ExtractionInfo) -> TechResult<()> {
        self.f64_field("side_halo", ex.side_halo)?;
        self.f64_field("fringe_shield_halo", ex.fringe_shield_halo)?;
        self.begin("resistance")?;
        for lr in ex.resistance.layers.iter() {
            self.begin("layers")?;
            self.str_field("layer_name", &lr.layer_name)?;
            self.f64_field("resistance", lr.resistance)?;
            if let Some(f) = lr.corner_adjustment_fraction {
                self.f64_field("corner_adjustment_fraction", f)?;
            }
            self.end()?;
        }
        for vr in ex.resistance.vias.iter() {
            self.begin("vias")?;
            self.str_field("via_name", &vr.via_name)?;
            self.f64_field("resistance", vr.resistance)?;
            self.end()?;
        }
        self.end()?;
        self.begin("capacitance")?;
        for sc in ex.capacitance.substrates.iter() {
            self.begin("substrates")?;
            self.str_field("layer_name", &sc.layer_name)?;
            self.f64_field("area_capacitance", sc.area_capacitance)?;
            self.f64_field("perimeter_capacitance", sc.perimeter_capacitance)?;
            self.end()?;
        }
        for oc in ex.capacitance.overlaps.iter() {
            self.begin("overlaps")?;
            self.str_field("top_layer_name", &oc.top_layer_name)?;
            self.str_field("bottom_layer_name", &oc.bottom_layer_name)?;
            self.f64_field("capacitance", oc.capacitance)?;
            self.end()?;
        }
        for swc in ex.capacitance.sidewalls.iter() {
            self.begin("sidewalls")?;
            self.str_field("layer_name", &swc.layer_name)?;
            self.f64_field("capacitance", swc.capacitance)?;
            self.f64_field("offset", swc.offset)?;
            self.end()?;
        }
        for soc in ex.capacitance.sideoverlaps.iter() {
            self.begin("sideoverlaps")?;
            self.str_field("in_layer_name", &soc.in_layer_name)?;
            self.str_field("out_layer_name", &soc.out_layer_name)?;
            self.f64_field("capacitance", soc.capacitance)?;
            self.end()?;
        }
        self.end()
    }
    /// Open a sub-message block `name { ... }`, increasing indentation
    fn begin(&mut self, name: &str) -> TechResult<()> {
        writeln!(self.dest, "{}{} {{", self.indent.state, name)?;
        self.indent += 1;
        Ok(())
    }
    /// Close the current sub-message block
    fn end(&mut self) -> TechResult<()> {
        self.indent -= 1;
        writeln!(self.dest, "{}}}", self.indent.state)?;
        Ok(())
    }
    /// Write a string-valued field. Empty strings are elided,
    /// matching proto-text's treatment of default values.
    fn str_field(&mut self, name: &str, val: &str) -> TechResult<()> {
        if val.is_empty() {
            return Ok(());
        }
        writeln!(
            self.dest,
            "{}{}: \"{}\"",
            self.indent.state,
            name,
            escape(val)
        )?;
        Ok(())
    }
    /// Write a double-valued field.
    /// Rust's [std::fmt::Display] for `f64` is shortest-round-trip,
    /// so full double precision survives a print/parse cycle.
    fn f64_field(&mut self, name: &str, val: f64) -> TechResult<()> {
        writeln!(self.dest, "{}{}: {}", self.indent.state, name, val)?;
        Ok(())
    }
    /// Write an unsigned-integer field
    fn u32_field(&mut self, name: &str, val: u32) -> TechResult<()> {
        writeln!(self.dest, "{}{}: {}", self.indent.state, name, val)?;
        Ok(())
    }
    /// Write an enumerated field as its bare wire-format name
    fn enum_field(&mut self, name: &str, val: &'static str) -> TechResult<()> {
        writeln!(self.dest, "{}{}: {}", self.indent.state, name, val)?;
        Ok(())
    }
}

/// Escape a string for quoting in the textual format
fn escape(s: &str) -> String {
    let mut rv = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => rv.push_str("\\\\"),
            '"' => rv.push_str("\\\""),
            '\n' => rv.push_str("\\n"),
            '\t' => rv.push_str("\\t"),
            '\r' => rv.push_str("\\r"),
            _ => rv.push(c),
        }
    }
    rv
}

/// Indentation Helper
struct Indent {
    unit: String,
    level: usize,
    state: String,
}
impl Indent {
    /// Create a new [Indent], initially at level 0
    fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            level: 0,
            state: String::new(),
        }
    }
}
impl AddAssign<usize> for Indent {
    fn add_assign(&mut self, rhs: usize) {
        self.level += rhs;
        self.state = self.unit.repeat(self.level);
    }
}
impl SubAssign<usize> for Indent {
    fn sub_assign(&mut self, rhs: usize) {
        self.level -= rhs;
        self.state = self.unit.repeat(self.level);
    }
}

// Protobuf wire types. Only three turn up in this schema:
// varints (enums, uint32), 64-bit doubles, and length-delimited data.
pub(crate) const WIRE_VARINT: u8 = 0;
pub(crate) const WIRE_I64: u8 = 1;
pub(crate) const WIRE_LEN: u8 = 2;

/// Encode `tech` into protobuf-binary wire format,
/// in a newly allocated byte-[Vec].
pub fn to_bytes(tech: &Technology) -> Vec<u8> {
    let mut buf = Vec::new();
    str_field(&mut buf, 1, &tech.name);
    for layer in tech.layers.iter() {
        msg_field(&mut buf, 2, &layer_info_bytes(layer));
    }
    for computed in tech.lvs_computed_layers.iter() {
        let mut sub = Vec::new();
        enum_field(&mut sub, 1, computed.kind.to_i32());
        msg_field(&mut sub, 2, &layer_info_bytes(&computed.layer_info));
        msg_field(&mut buf, 3, &sub);
    }
    let mut stack = Vec::new();
    for layer in tech.process_stack.layers.iter() {
        msg_field(&mut stack, 1, &stack_layer_bytes(layer));
    }
    msg_field(&mut buf, 4, &stack);
    msg_field(&mut buf, 5, &extraction_bytes(&tech.extraction));
    buf
}
/// Write `tech` in binary format to file `fname`
pub fn save_binary(tech: &Technology, fname: impl AsRef<Path>) -> TechResult<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(fname)?);
    file.write_all(&to_bytes(tech))?;
    Ok(())
}

fn layer_info_bytes(layer: &LayerInfo) -> Vec<u8> {
    let mut buf = Vec::new();
    str_field(&mut buf, 1, &layer.name);
    str_field(&mut buf, 2, &layer.description);
    u32_field(&mut buf, 3, layer.gds_layer);
    u32_field(&mut buf, 4, layer.gds_datatype);
    buf
}
fn contact_bytes(contact: &Contact) -> Vec<u8> {
    let mut buf = Vec::new();
    str_field(&mut buf, 1, &contact.name);
    str_field(&mut buf, 2, &contact.metal_above);
    f64_field(&mut buf, 3, contact.thickness);
    buf
}
fn stack_layer_bytes(layer: &StackLayer) -> Vec<u8> {
    let mut buf = Vec::new();
    str_field(&mut buf, 1, &layer.name);
    enum_field(&mut buf, 2, layer.layer_type().to_i32());
    let mut sub = Vec::new();
    // Parameter sub-messages sit at tags 10-17, in [LayerType] order
    let tag = 9 + layer.layer_type().to_i32() as u32;
    match &layer.params {
        StackLayerParams::Substrate { substrate_layer: s } => {
            f64_field(&mut sub, 1, s.height);
            f64_field(&mut sub, 2, s.thickness);
            str_field(&mut sub, 3, &s.reference);
        }
        StackLayerParams::NWell { nwell_layer: w } => {
            f64_field(&mut sub, 1, w.height);
            str_field(&mut sub, 2, &w.reference);
            if let Some(ref c) = w.contact_above {
                msg_field(&mut sub, 3, &contact_bytes(c));
            }
        }
        StackLayerParams::Diffusion { diffusion_layer: d } => {
            f64_field(&mut sub, 1, d.height);
            str_field(&mut sub, 2, &d.reference);
            if let Some(ref c) = d.contact_above {
                msg_field(&mut sub, 3, &contact_bytes(c));
            }
        }
        StackLayerParams::FieldOxide {
            field_oxide_layer: f,
        } => {
            f64_field(&mut sub, 1, f.dielectric_k);
        }
        StackLayerParams::Metal { metal_layer: m } => {
            f64_field(&mut sub, 1, m.height);
            f64_field(&mut sub, 2, m.thickness);
            str_field(&mut sub, 3, &m.reference_below);
            str_field(&mut sub, 4, &m.reference_above);
            if let Some(ref c) = m.contact_above {
                msg_field(&mut sub, 5, &contact_bytes(c));
            }
        }
        StackLayerParams::SimpleDielectric {
            simple_dielectric_layer: s,
        } => {
            f64_field(&mut sub, 1, s.dielectric_k);
            str_field(&mut sub, 2, &s.reference);
        }
        StackLayerParams::ConformalDielectric {
            conformal_dielectric_layer: c,
        } => {
            f64_field(&mut sub, 1, c.dielectric_k);
            f64_field(&mut sub, 2, c.thickness_over_metal);
            f64_field(&mut sub, 3, c.thickness_where_no_metal);
            f64_field(&mut sub, 4, c.thickness_sidewall);
            str_field(&mut sub, 5, &c.reference);
        }
        StackLayerParams::SidewallDielectric {
            sidewall_dielectric_layer: s,
        } => {
            f64_field(&mut sub, 1, s.dielectric_k);
            f64_field(&mut sub, 2, s.height_above_metal);
            f64_field(&mut sub, 3, s.width_outside_sidewall);
            str_field(&mut sub, 4, &s.reference);
        }
    }
    msg_field(&mut buf, tag, &sub);
    buf
}
fn extraction_bytes(ex: &ExtractionInfo) -> Vec<u8> {
    let mut buf = Vec::new();
    f64_field(&mut buf, 1, ex.side_halo);
    f64_field(&mut buf, 2, ex.fringe_shield_halo);
    let mut res = Vec::new();
    for lr in ex.resistance.layers.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &lr.layer_name);
        f64_field(&mut sub, 2, lr.resistance);
        if let Some(f) = lr.corner_adjustment_fraction {
            f64_field(&mut sub, 3, f);
        }
        msg_field(&mut res, 1, &sub);
    }
    for vr in ex.resistance.vias.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &vr.via_name);
        f64_field(&mut sub, 2, vr.resistance);
        msg_field(&mut res, 2, &sub);
    }
    msg_field(&mut buf, 3, &res);
    let mut cap = Vec::new();
    for sc in ex.capacitance.substrates.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &sc.layer_name);
        f64_field(&mut sub, 2, sc.area_capacitance);
        f64_field(&mut sub, 3, sc.perimeter_capacitance);
        msg_field(&mut cap, 1, &sub);
    }
    for oc in ex.capacitance.overlaps.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &oc.top_layer_name);
        str_field(&mut sub, 2, &oc.bottom_layer_name);
        f64_field(&mut sub, 3, oc.capacitance);
        msg_field(&mut cap, 2, &sub);
    }
    for swc in ex.capacitance.sidewalls.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &swc.layer_name);
        f64_field(&mut sub, 2, swc.capacitance);
        f64_field(&mut sub, 3, swc.offset);
        msg_field(&mut cap, 3, &sub);
    }
    for soc in ex.capacitance.sideoverlaps.iter() {
        let mut sub = Vec::new();
        str_field(&mut sub, 1, &soc.in_layer_name);
        str_field(&mut sub, 2, &soc.out_layer_name);
        f64_field(&mut sub, 3, soc.capacitance);
        msg_field(&mut cap, 4, &sub);
    }
    msg_field(&mut buf, 4, &cap);
    buf
}

/// Append a base-128 varint
fn varint(buf: &mut Vec<u8>, mut v: u64) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}
/// Append a field key: tag number plus wire type
fn key(buf: &mut Vec<u8>, tag: u32, wire: u8) {
    varint(buf, ((tag as u64) << 3) | wire as u64);
}
/// Append a string field. Empty strings are written with zero length,
/// keeping every field present on the wire.
fn str_field(buf: &mut Vec<u8>, tag: u32, val: &str) {
    key(buf, tag, WIRE_LEN);
    varint(buf, val.len() as u64);
    buf.extend_from_slice(val.as_bytes());
}
/// Append a double field as its little-endian IEEE-754 bits
fn f64_field(buf: &mut Vec<u8>, tag: u32, val: f64) {
    key(buf, tag, WIRE_I64);
    buf.write_f64::<LittleEndian>(val)
        .expect("Vec write is infallible");
}
/// Append a uint32 field as a varint
fn u32_field(buf: &mut Vec<u8>, tag: u32, val: u32) {
    key(buf, tag, WIRE_VARINT);
    varint(buf, val as u64);
}
/// Append an enumeration field as a varint
fn enum_field(buf: &mut Vec<u8>, tag: u32, val: i32) {
    key(buf, tag, WIRE_VARINT);
    varint(buf, val as u64);
}
/// Append a length-delimited sub-message field
fn msg_field(buf: &mut Vec<u8>, tag: u32, bytes: &[u8]) {
    key(buf, tag, WIRE_LEN);
    varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}
