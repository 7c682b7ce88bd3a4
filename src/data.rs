//!
//! # Tech21 Data Model
//!
//! Rust representations of the `kpex.tech.Technology` message tree:
//! drawn and LVS-computed GDS layers, the vertical process stack,
//! and parasitic-extraction coefficients.
//!
//! Every type is a plain data record. Construction and field-twiddling are
//! unvalidated by design; physical plausibility is the business of whatever
//! produced the numbers, not of this crate.
//!

// Std-Lib Imports
use std::path::Path;

// Crates.io Imports
use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::ser::{self, TechFormat};

/// # Technology
///
/// Root of the technology-description tree.
/// Binary field tags: name=1, layers=2, lvs_computed_layers=3,
/// process_stack=4, extraction=5.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct Technology {
    /// Technology / PDK name, e.g. "sky130A"
    pub name: String,
    /// Drawn mask layers, in GDS-database order.
    /// Names may repeat; each (gds_layer, gds_datatype) pair denotes one mask layer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub layers: Vec<LayerInfo>,
    /// Layers computed by boolean / LVS operations rather than drawn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub lvs_computed_layers: Vec<ComputedLayerInfo>,
    /// Vertical process stack, bottom-to-top
    #[serde(default)]
    #[builder(default)]
    pub process_stack: ProcessStackInfo,
    /// Parasitic-extraction coefficients
    #[serde(default)]
    #[builder(default)]
    pub extraction: ExtractionInfo,
}
impl Technology {
    /// Create a new and empty [Technology] named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Save in `fmt`-format to file `fname`
    pub fn save(&self, fmt: TechFormat, fname: impl AsRef<Path>) -> TechResult<()> {
        ser::write(self, fname, fmt)
    }
    /// Open from `fmt`-format file `fname`
    pub fn open(fname: impl AsRef<Path>, fmt: TechFormat) -> TechResult<Self> {
        ser::read(fname, fmt)
    }
    /// Encode to protobuf-binary bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::write::to_bytes(self)
    }
    /// Decode from protobuf-binary bytes
    pub fn from_bytes(bytes: &[u8]) -> TechResult<Self> {
        crate::read::from_bytes(bytes)
    }
    /// Encode to the textual (proto-text) format, header lines included
    pub fn to_text_string(&self) -> TechResult<String> {
        crate::write::to_text_string(self)
    }
    /// Parse from textual (proto-text) content `src`
    pub fn from_text_str(src: &str) -> TechResult<Self> {
        crate::read::parse_str(src)
    }
    /// Encode to pretty-printed JSON.
    /// Field names are the schema's snake_case names, verbatim.
    pub fn to_json_string(&self) -> TechResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    /// Parse from JSON content `src`
    pub fn from_json_str(src: &str) -> TechResult<Self> {
        Ok(serde_json::from_str(src)?)
    }
}

/// # Layer Info
///
/// A drawn mask layer as addressed in the GDS layout database.
/// Binary field tags: name=1, description=2, gds_layer=3, gds_datatype=4.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[builder(pattern = "owned", setter(into))]
pub struct LayerInfo {
    /// Layer name
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[builder(default)]
    pub description: String,
    /// GDS layer number
    pub gds_layer: u32,
    /// GDS datatype number
    pub gds_datatype: u32,
}
impl LayerInfo {
    /// Create a new [LayerInfo]
    pub fn new(
        name: impl Into<String>,
        gds_layer: u32,
        gds_datatype: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            gds_layer,
            gds_datatype,
        }
    }
}

/// # Computed-Layer Kind
///
/// Classifies an LVS-computed layer. A closed set; out-of-range wire values
/// fail decoding rather than wrapping to a default.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ComputedLayerKind {
    #[serde(rename = "KIND_REGULAR")]
    Regular,
    #[serde(rename = "KIND_DEVICE_CAPACITOR")]
    DeviceCapacitor,
    #[serde(rename = "KIND_DEVICE_RESISTOR")]
    DeviceResistor,
}
impl ComputedLayerKind {
    /// The wire-format name, as used in the textual and JSON encodings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "KIND_REGULAR",
            Self::DeviceCapacitor => "KIND_DEVICE_CAPACITOR",
            Self::DeviceResistor => "KIND_DEVICE_RESISTOR",
        }
    }
    /// Match a wire-format name. Returns `None` for anything outside the set.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "KIND_REGULAR" => Some(Self::Regular),
            "KIND_DEVICE_CAPACITOR" => Some(Self::DeviceCapacitor),
            "KIND_DEVICE_RESISTOR" => Some(Self::DeviceResistor),
            _ => None,
        }
    }
    /// The binary wire value
    pub fn to_i32(&self) -> i32 {
        match self {
            Self::Regular => 1,
            Self::DeviceCapacitor => 2,
            Self::DeviceResistor => 3,
        }
    }
    /// Match a binary wire value. Returns `None` for anything outside the set.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Regular),
            2 => Some(Self::DeviceCapacitor),
            3 => Some(Self::DeviceResistor),
            _ => None,
        }
    }
}

/// # Computed Layer Info
///
/// An LVS-computed (derived) layer and its classification.
/// Binary field tags: kind=1, layer_info=2.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ComputedLayerInfo {
    /// Classification of the computed layer
    pub kind: ComputedLayerKind,
    /// The layer itself
    pub layer_info: LayerInfo,
}
impl ComputedLayerInfo {
    /// Create a new [ComputedLayerInfo] of `kind`
    pub fn new(kind: ComputedLayerKind, layer_info: LayerInfo) -> Self {
        Self { kind, layer_info }
    }
}

/// # Process Stack Info
///
/// The vertical sequence of physical layers composing the technology,
/// ordered bottom-to-top. Binary field tags: layers=1.
#[derive(Default, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ProcessStackInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<StackLayer>,
}
impl ProcessStackInfo {
    /// Find the first stack entry named `name`.
    ///
    /// The `reference` fields of stack entries are stored as plain names;
    /// this lookup is provided for consumers which resolve them, e.g. to
    /// reconstruct absolute stacking heights. The codec itself never does.
    pub fn layer(&self, name: &str) -> Option<&StackLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// # Layer Type
///
/// The wire tag distinguishing the eight process-stack layer types.
/// A closed set; out-of-range wire values fail decoding.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum LayerType {
    #[serde(rename = "LAYER_TYPE_SUBSTRATE")]
    Substrate,
    #[serde(rename = "LAYER_TYPE_NWELL")]
    NWell,
    #[serde(rename = "LAYER_TYPE_DIFFUSION")]
    Diffusion,
    #[serde(rename = "LAYER_TYPE_FIELD_OXIDE")]
    FieldOxide,
    #[serde(rename = "LAYER_TYPE_METAL")]
    Metal,
    #[serde(rename = "LAYER_TYPE_SIMPLE_DIELECTRIC")]
    SimpleDielectric,
    #[serde(rename = "LAYER_TYPE_CONFORMAL_DIELECTRIC")]
    ConformalDielectric,
    #[serde(rename = "LAYER_TYPE_SIDEWALL_DIELECTRIC")]
    SidewallDielectric,
}
impl LayerType {
    /// The wire-format name, as used in the textual and JSON encodings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substrate => "LAYER_TYPE_SUBSTRATE",
            Self::NWell => "LAYER_TYPE_NWELL",
            Self::Diffusion => "LAYER_TYPE_DIFFUSION",
            Self::FieldOxide => "LAYER_TYPE_FIELD_OXIDE",
            Self::Metal => "LAYER_TYPE_METAL",
            Self::SimpleDielectric => "LAYER_TYPE_SIMPLE_DIELECTRIC",
            Self::ConformalDielectric => "LAYER_TYPE_CONFORMAL_DIELECTRIC",
            Self::SidewallDielectric => "LAYER_TYPE_SIDEWALL_DIELECTRIC",
        }
    }
    /// Match a wire-format name. Returns `None` for anything outside the set.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "LAYER_TYPE_SUBSTRATE" => Some(Self::Substrate),
            "LAYER_TYPE_NWELL" => Some(Self::NWell),
            "LAYER_TYPE_DIFFUSION" => Some(Self::Diffusion),
            "LAYER_TYPE_FIELD_OXIDE" => Some(Self::FieldOxide),
            "LAYER_TYPE_METAL" => Some(Self::Metal),
            "LAYER_TYPE_SIMPLE_DIELECTRIC" => Some(Self::SimpleDielectric),
            "LAYER_TYPE_CONFORMAL_DIELECTRIC" => Some(Self::ConformalDielectric),
            "LAYER_TYPE_SIDEWALL_DIELECTRIC" => Some(Self::SidewallDielectric),
            _ => None,
        }
    }
    /// The binary wire value
    pub fn to_i32(&self) -> i32 {
        match self {
            Self::Substrate => 1,
            Self::NWell => 2,
            Self::Diffusion => 3,
            Self::FieldOxide => 4,
            Self::Metal => 5,
            Self::SimpleDielectric => 6,
            Self::ConformalDielectric => 7,
            Self::SidewallDielectric => 8,
        }
    }
    /// Match a binary wire value. Returns `None` for anything outside the set.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::Substrate),
            2 => Some(Self::NWell),
            3 => Some(Self::Diffusion),
            4 => Some(Self::FieldOxide),
            5 => Some(Self::Metal),
            6 => Some(Self::SimpleDielectric),
            7 => Some(Self::ConformalDielectric),
            8 => Some(Self::SidewallDielectric),
            _ => None,
        }
    }
}

/// # Process-Stack Layer
///
/// One entry in the vertical process stack: a name plus the
/// type-discriminated parameter record.
/// Binary field tags: name=1, layer_type=2, and the per-type parameter
/// sub-message at tags 10-17 in [LayerType] order.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct StackLayer {
    /// Stack-entry name, e.g. "met1" or "nild2"
    pub name: String,
    /// Type tag plus type-specific parameters
    #[serde(flatten)]
    pub params: StackLayerParams,
}
impl StackLayer {
    /// Create a new [StackLayer] from anything convertible into [StackLayerParams]
    pub fn new(name: impl Into<String>, params: impl Into<StackLayerParams>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
        }
    }
    /// This entry's [LayerType] tag
    pub fn layer_type(&self) -> LayerType {
        self.params.layer_type()
    }
}

/// # Stack-Layer Parameters
///
/// Sum type over the eight process-stack layer types.
/// Serializes with the `layer_type` tag plus one type-named sub-record,
/// matching the wire schema, e.g.
/// `{ "layer_type": "LAYER_TYPE_METAL", "metal_layer": { ... } }`.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(tag = "layer_type")]
pub enum StackLayerParams {
    #[serde(rename = "LAYER_TYPE_SUBSTRATE")]
    Substrate { substrate_layer: SubstrateLayer },
    #[serde(rename = "LAYER_TYPE_NWELL")]
    NWell { nwell_layer: NWellLayer },
    #[serde(rename = "LAYER_TYPE_DIFFUSION")]
    Diffusion { diffusion_layer: DiffusionLayer },
    #[serde(rename = "LAYER_TYPE_FIELD_OXIDE")]
    FieldOxide { field_oxide_layer: FieldOxideLayer },
    #[serde(rename = "LAYER_TYPE_METAL")]
    Metal { metal_layer: MetalLayer },
    #[serde(rename = "LAYER_TYPE_SIMPLE_DIELECTRIC")]
    SimpleDielectric {
        simple_dielectric_layer: SimpleDielectricLayer,
    },
    #[serde(rename = "LAYER_TYPE_CONFORMAL_DIELECTRIC")]
    ConformalDielectric {
        conformal_dielectric_layer: ConformalDielectricLayer,
    },
    #[serde(rename = "LAYER_TYPE_SIDEWALL_DIELECTRIC")]
    SidewallDielectric {
        sidewall_dielectric_layer: SidewallDielectricLayer,
    },
}
impl StackLayerParams {
    /// This parameter-record's [LayerType] tag
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Substrate { .. } => LayerType::Substrate,
            Self::NWell { .. } => LayerType::NWell,
            Self::Diffusion { .. } => LayerType::Diffusion,
            Self::FieldOxide { .. } => LayerType::FieldOxide,
            Self::Metal { .. } => LayerType::Metal,
            Self::SimpleDielectric { .. } => LayerType::SimpleDielectric,
            Self::ConformalDielectric { .. } => LayerType::ConformalDielectric,
            Self::SidewallDielectric { .. } => LayerType::SidewallDielectric,
        }
    }
}
impl From<SubstrateLayer> for StackLayerParams {
    fn from(substrate_layer: SubstrateLayer) -> Self {
        Self::Substrate { substrate_layer }
    }
}
impl From<NWellLayer> for StackLayerParams {
    fn from(nwell_layer: NWellLayer) -> Self {
        Self::NWell { nwell_layer }
    }
}
impl From<DiffusionLayer> for StackLayerParams {
    fn from(diffusion_layer: DiffusionLayer) -> Self {
        Self::Diffusion { diffusion_layer }
    }
}
impl From<FieldOxideLayer> for StackLayerParams {
    fn from(field_oxide_layer: FieldOxideLayer) -> Self {
        Self::FieldOxide { field_oxide_layer }
    }
}
impl From<MetalLayer> for StackLayerParams {
    fn from(metal_layer: MetalLayer) -> Self {
        Self::Metal { metal_layer }
    }
}
impl From<SimpleDielectricLayer> for StackLayerParams {
    fn from(simple_dielectric_layer: SimpleDielectricLayer) -> Self {
        Self::SimpleDielectric {
            simple_dielectric_layer,
        }
    }
}
impl From<ConformalDielectricLayer> for StackLayerParams {
    fn from(conformal_dielectric_layer: ConformalDielectricLayer) -> Self {
        Self::ConformalDielectric {
            conformal_dielectric_layer,
        }
    }
}
impl From<SidewallDielectricLayer> for StackLayerParams {
    fn from(sidewall_dielectric_layer: SidewallDielectricLayer) -> Self {
        Self::SidewallDielectric {
            sidewall_dielectric_layer,
        }
    }
}

/// # Substrate Layer
/// Binary field tags: height=1, thickness=2, reference=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SubstrateLayer {
    /// Height above the reference plane (µm)
    pub height: f64,
    /// Thickness (µm)
    pub thickness: f64,
    /// Name of the stack entry establishing this layer's vertical reference
    pub reference: String,
}

/// # NWell Layer
/// Binary field tags: height=1, reference=2, contact_above=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct NWellLayer {
    pub height: f64,
    pub reference: String,
    /// Contact connecting this layer to the next conductor above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub contact_above: Option<Contact>,
}

/// # Diffusion Layer
/// Binary field tags: height=1, reference=2, contact_above=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct DiffusionLayer {
    pub height: f64,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub contact_above: Option<Contact>,
}

/// # Field-Oxide Layer
/// Binary field tags: dielectric_k=1.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct FieldOxideLayer {
    /// Relative dielectric constant
    pub dielectric_k: f64,
}

/// # Metal Layer
/// Binary field tags: height=1, thickness=2, reference_below=3,
/// reference_above=4, contact_above=5.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct MetalLayer {
    pub height: f64,
    pub thickness: f64,
    /// Name of the dielectric directly below
    pub reference_below: String,
    /// Name of the dielectric directly above
    pub reference_above: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub contact_above: Option<Contact>,
}

/// # Simple Dielectric Layer
/// Binary field tags: dielectric_k=1, reference=2.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SimpleDielectricLayer {
    pub dielectric_k: f64,
    pub reference: String,
}

/// # Conformal Dielectric Layer
/// Binary field tags: dielectric_k=1, thickness_over_metal=2,
/// thickness_where_no_metal=3, thickness_sidewall=4, reference=5.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct ConformalDielectricLayer {
    pub dielectric_k: f64,
    pub thickness_over_metal: f64,
    pub thickness_where_no_metal: f64,
    pub thickness_sidewall: f64,
    pub reference: String,
}

/// # Sidewall Dielectric Layer
/// Binary field tags: dielectric_k=1, height_above_metal=2,
/// width_outside_sidewall=3, reference=4.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SidewallDielectricLayer {
    pub dielectric_k: f64,
    pub height_above_metal: f64,
    pub width_outside_sidewall: f64,
    pub reference: String,
}

/// # Contact
///
/// The via/contact connecting a conductor to the next metal above it.
/// Binary field tags: name=1, metal_above=2, thickness=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct Contact {
    pub name: String,
    /// Name of the metal layer above
    pub metal_above: String,
    /// Contact thickness (µm)
    pub thickness: f64,
}
impl Contact {
    /// Create a new [Contact]
    pub fn new(name: impl Into<String>, metal_above: impl Into<String>, thickness: f64) -> Self {
        Self {
            name: name.into(),
            metal_above: metal_above.into(),
            thickness,
        }
    }
}

/// # Extraction Info
///
/// Halo distances plus per-layer resistance and capacitance coefficients.
/// Binary field tags: side_halo=1, fringe_shield_halo=2, resistance=3,
/// capacitance=4.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct ExtractionInfo {
    /// Lateral search halo (µm)
    pub side_halo: f64,
    /// Fringe-shielding halo (µm)
    pub fringe_shield_halo: f64,
    #[serde(default)]
    #[builder(default)]
    pub resistance: ResistanceInfo,
    #[serde(default)]
    #[builder(default)]
    pub capacitance: CapacitanceInfo,
}

/// # Resistance Info
/// Binary field tags: layers=1, vias=2.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct ResistanceInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub layers: Vec<LayerResistance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub vias: Vec<ViaResistance>,
}

/// # Layer (Sheet) Resistance
/// Binary field tags: layer_name=1, resistance=2, corner_adjustment_fraction=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct LayerResistance {
    pub layer_name: String,
    /// Sheet resistance (mΩ/sq)
    pub resistance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub corner_adjustment_fraction: Option<f64>,
}

/// # Via Resistance
/// Binary field tags: via_name=1, resistance=2.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct ViaResistance {
    pub via_name: String,
    /// Resistance per single cut (mΩ)
    pub resistance: f64,
}

/// # Capacitance Info
/// Binary field tags: substrates=1, overlaps=2, sidewalls=3, sideoverlaps=4.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct CapacitanceInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub substrates: Vec<SubstrateCapacitance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub overlaps: Vec<OverlapCapacitance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub sidewalls: Vec<SidewallCapacitance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub sideoverlaps: Vec<SideOverlapCapacitance>,
}

/// # Substrate (Area/Perimeter) Capacitance
/// Binary field tags: layer_name=1, area_capacitance=2, perimeter_capacitance=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SubstrateCapacitance {
    pub layer_name: String,
    /// aF/µm²
    pub area_capacitance: f64,
    /// aF/µm
    pub perimeter_capacitance: f64,
}

/// # Overlap Capacitance
/// Binary field tags: top_layer_name=1, bottom_layer_name=2, capacitance=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct OverlapCapacitance {
    pub top_layer_name: String,
    pub bottom_layer_name: String,
    /// aF/µm²
    pub capacitance: f64,
}

/// # Sidewall Capacitance
/// Binary field tags: layer_name=1, capacitance=2, offset=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SidewallCapacitance {
    pub layer_name: String,
    /// aF/µm
    pub capacitance: f64,
    /// µm
    pub offset: f64,
}

/// # Side-Overlap Capacitance
/// Binary field tags: in_layer_name=1, out_layer_name=2, capacitance=3.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SideOverlapCapacitance {
    pub in_layer_name: String,
    pub out_layer_name: String,
    /// aF/µm
    pub capacitance: f64,
}

/// # Tech21 Error Enumeration
#[derive(Debug)]
pub enum TechError {
    /// Textual-format parse errors
    Parse { msg: String, line: usize },
    /// Binary-format decode errors
    Decode { msg: String, pos: usize },
    /// Boxed (external) errors, generally from other crates
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// String message-valued errors
    Str(String),
}
impl std::fmt::Display for TechError {
    /// Display a [TechError].
    /// Functionally delegates to the (derived) [std::fmt::Debug] implementation.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl std::error::Error for TechError {}
impl From<std::io::Error> for TechError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<serde_json::Error> for TechError {
    fn from(e: serde_json::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::str::Utf8Error> for TechError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<String> for TechError {
    fn from(e: String) -> Self {
        Self::Str(e)
    }
}
impl From<&str> for TechError {
    fn from(e: &str) -> Self {
        Self::Str(e.to_string())
    }
}

/// Tech21's Result type alias
pub type TechResult<T> = Result<T, TechError>;
