// Std-Lib Imports
use std::path::PathBuf;

// Local Imports
use crate::data::*;
use crate::read::{TechLexer, TokenType};
use crate::ser::{self, TechFormat};
use crate::write::TEXT_HEADER;

/// A small demonstration [Technology]: one drawn layer, one stack metal,
/// and the extraction halo
fn demo() -> Technology {
    let mut tech = Technology::new("demo");
    tech.layers.push(LayerInfo::new("met1", 68, 20, ""));
    tech.process_stack.layers.push(StackLayer::new(
        "met1",
        MetalLayer {
            height: 1.3761,
            thickness: 0.36,
            reference_below: "nild2".into(),
            reference_above: "nild3".into(),
            contact_above: Some(Contact::new("via", "met2", 0.27)),
        },
    ));
    tech.extraction.side_halo = 8.0;
    tech
}
/// Scratch-directory path for file-based test cases
fn scratch() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn json_round_trip() -> TechResult<()> {
    let tech = demo();
    let json = tech.to_json_string()?;
    let readback = Technology::from_json_str(&json)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn binary_round_trip() -> TechResult<()> {
    let tech = demo();
    let bytes = tech.to_bytes();
    let readback = Technology::from_bytes(&bytes)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn text_round_trip() -> TechResult<()> {
    let tech = demo();
    let txt = tech.to_text_string()?;
    let readback = Technology::from_text_str(&txt)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn file_round_trips() -> TechResult<()> {
    // Save and re-open the demo technology in each of the three formats
    let tech = demo();
    let dir = scratch();
    for (fmt, fname) in [
        (TechFormat::Binary, "demo_tech.pb"),
        (TechFormat::Textual, "demo_tech.pb.txt"),
        (TechFormat::Json, "demo_tech.pb.json"),
    ] {
        let path = dir.path().join(fname);
        tech.save(fmt, &path)?;
        let readback = Technology::open(&path, fmt)?;
        assert_eq!(tech, readback);
    }
    Ok(())
}
#[test]
fn convert_chain() -> TechResult<()> {
    // JSON -> TEXTUAL -> BINARY, final read equals the original
    let tech = demo();
    let dir = scratch();
    let p1 = dir.path().join("demo.pb.json");
    let p2 = dir.path().join("demo.pb.txt");
    let p3 = dir.path().join("demo.pb");
    tech.save(TechFormat::Json, &p1)?;
    ser::convert(&p1, TechFormat::Json, &p2, TechFormat::Textual)?;
    ser::convert(&p2, TechFormat::Textual, &p3, TechFormat::Binary)?;
    let readback = Technology::open(&p3, TechFormat::Binary)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn convert_idempotent() -> TechResult<()> {
    // Converting a file to its own format preserves content
    let tech = demo();
    let dir = scratch();
    let p1 = dir.path().join("a.pb.json");
    let p2 = dir.path().join("b.pb.json");
    tech.save(TechFormat::Json, &p1)?;
    ser::convert(&p1, TechFormat::Json, &p2, TechFormat::Json)?;
    assert_eq!(Technology::open(&p2, TechFormat::Json)?, tech);
    Ok(())
}
#[test]
fn text_header() -> TechResult<()> {
    // Textual output always leads with the two fixed comment lines
    assert_eq!(
        TEXT_HEADER,
        "# proto-file: tech.proto\n# proto-message: kpex.tech.Technology\n"
    );
    let txt = demo().to_text_string()?;
    assert!(txt.starts_with(TEXT_HEADER));
    let txt = Technology::new("empty").to_text_string()?;
    assert!(txt.starts_with(TEXT_HEADER));
    Ok(())
}
#[test]
fn json_field_names() -> TechResult<()> {
    // Field names are the schema's snake_case names, never camelCased
    let json = demo().to_json_string()?;
    assert!(json.contains("\"gds_layer\""));
    assert!(json.contains("\"gds_datatype\""));
    assert!(json.contains("\"side_halo\""));
    assert!(json.contains("\"layer_type\": \"LAYER_TYPE_METAL\""));
    assert!(json.contains("\"metal_layer\""));
    assert!(!json.contains("gdsLayer"));
    assert!(!json.contains("sideHalo"));
    Ok(())
}
#[test]
fn json_parse_stack_layer() -> TechResult<()> {
    let json = r#"{
        "name": "t",
        "process_stack": {
            "layers": [
                {
                    "name": "fox",
                    "layer_type": "LAYER_TYPE_FIELD_OXIDE",
                    "field_oxide_layer": { "dielectric_k": 0.39 }
                }
            ]
        },
        "extraction": {
            "side_halo": 8.0,
            "fringe_shield_halo": 8.0,
            "resistance": {},
            "capacitance": {}
        }
    }"#;
    let tech = Technology::from_json_str(json)?;
    let layer = tech.process_stack.layer("fox").unwrap();
    assert_eq!(layer.layer_type(), LayerType::FieldOxide);
    match &layer.params {
        StackLayerParams::FieldOxide { field_oxide_layer } => {
            assert_eq!(field_oxide_layer.dielectric_k, 0.39)
        }
        other => panic!("Wrong params: {:?}", other),
    }
    Ok(())
}
#[test]
fn enum_names() {
    assert_eq!(ComputedLayerKind::Regular.as_str(), "KIND_REGULAR");
    assert_eq!(
        ComputedLayerKind::from_str_name("KIND_DEVICE_RESISTOR"),
        Some(ComputedLayerKind::DeviceResistor)
    );
    assert_eq!(ComputedLayerKind::from_str_name("KIND_UNSPECIFIED"), None);
    assert_eq!(LayerType::SidewallDielectric.to_i32(), 8);
    assert_eq!(LayerType::from_i32(1), Some(LayerType::Substrate));
    assert_eq!(LayerType::from_i32(0), None);
    assert_eq!(LayerType::from_i32(9), None);
}
#[test]
fn binary_rejects_bad_kind() {
    // Technology { lvs_computed_layers { kind: 7 } }
    let bytes = vec![0x1A, 0x02, 0x08, 0x07];
    match Technology::from_bytes(&bytes) {
        Err(TechError::Decode { .. }) => (),
        other => panic!("Expected decode error, got {:?}", other),
    }
}
#[test]
fn binary_rejects_bad_layer_type() {
    // Technology { process_stack { layers { layer_type: 99 } } }
    let bytes = vec![0x22, 0x04, 0x0A, 0x02, 0x10, 0x63];
    match Technology::from_bytes(&bytes) {
        Err(TechError::Decode { .. }) => (),
        other => panic!("Expected decode error, got {:?}", other),
    }
}
#[test]
fn binary_rejects_missing_params() {
    // A stack layer with a name but no parameter record
    // Technology { process_stack { layers { name: "x" } } }
    let bytes = vec![0x22, 0x05, 0x0A, 0x03, 0x0A, 0x01, b'x'];
    assert!(Technology::from_bytes(&bytes).is_err());
}
#[test]
fn binary_rejects_overflowing_length() {
    // A length-delimited field declaring a length near u64::MAX must fail
    // cleanly, not wrap the bounds arithmetic
    let bytes = vec![
        0x0A, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01,
    ];
    match Technology::from_bytes(&bytes) {
        Err(TechError::Decode { .. }) => (),
        other => panic!("Expected decode error, got {:?}", other),
    }
    // Same declared-length hostility one level down, inside a sub-message
    let bytes = vec![0x22, 0x03, 0x0A, 0xFF, 0x7F];
    match Technology::from_bytes(&bytes) {
        Err(TechError::Decode { .. }) => (),
        other => panic!("Expected decode error, got {:?}", other),
    }
}
#[test]
fn binary_rejects_truncation() {
    let tech = demo();
    let bytes = tech.to_bytes();
    assert!(Technology::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}
#[test]
fn binary_skips_unknown_fields() -> TechResult<()> {
    // An unknown varint field appended at top level is skipped on decode
    let tech = demo();
    let mut bytes = tech.to_bytes();
    bytes.extend([0x78, 0x01]); // field 15, varint, value 1
    let readback = Technology::from_bytes(&bytes)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn lexer() -> TechResult<()> {
    let src = "# a comment\nname: \"sky130A\"\nlayers {\n  gds_layer: 68\n}\n";
    let toks = TechLexer::new(src).lex_all()?;
    let ttypes: Vec<TokenType> = toks.iter().map(|t| t.ttype).collect();
    assert_eq!(
        ttypes,
        vec![
            TokenType::Ident,
            TokenType::Colon,
            TokenType::StrLit,
            TokenType::Ident,
            TokenType::OpenBrace,
            TokenType::Ident,
            TokenType::Colon,
            TokenType::Number,
            TokenType::CloseBrace,
        ]
    );
    assert_eq!(toks[2].substr(src), "\"sky130A\"");
    Ok(())
}
#[test]
fn text_parse_errors() {
    // Unknown field name
    assert!(Technology::from_text_str("nonsense: 1\n").is_err());
    // Unterminated string literal
    assert!(Technology::from_text_str("name: \"oops\n").is_err());
    // Missing parameter record
    let src = "process_stack {\n  layers {\n    name: \"x\"\n  }\n}\n";
    assert!(Technology::from_text_str(src).is_err());
    // Declared layer_type inconsistent with the parameter record
    let src = "process_stack {\n  layers {\n    name: \"x\"\n    layer_type: LAYER_TYPE_METAL\n    field_oxide_layer {\n      dielectric_k: 0.39\n    }\n  }\n}\n";
    assert!(Technology::from_text_str(src).is_err());
    // Invalid enum value name
    let src = "lvs_computed_layers {\n  kind: KIND_BOGUS\n  layer_info {\n    name: \"x\"\n  }\n}\n";
    assert!(Technology::from_text_str(src).is_err());
}
#[test]
fn text_escapes() -> TechResult<()> {
    // Names with quotes, backslashes, and newlines survive the text format
    let mut tech = Technology::new("esc");
    tech.layers
        .push(LayerInfo::new("we\"ird\\name", 1, 2, "line1\nline2\ttabbed"));
    let txt = tech.to_text_string()?;
    let readback = Technology::from_text_str(&txt)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn text_non_ascii() -> TechResult<()> {
    // Multi-byte characters in string content must not shift later
    // token spans; the textual round-trip holds
    let mut tech = Technology::new("µtech");
    tech.layers
        .push(LayerInfo::new("met1", 68, 20, "thickness in µm"));
    tech.layers
        .push(LayerInfo::new("met2", 69, 20, "κ≈4.2 dielectric"));
    let txt = tech.to_text_string()?;
    let readback = Technology::from_text_str(&txt)?;
    assert_eq!(tech, readback);
    Ok(())
}
#[test]
fn f64_precision() -> TechResult<()> {
    // Full double precision survives each encoding
    let mut tech = Technology::new("precise");
    tech.extraction.side_halo = 0.1 + 0.2;
    tech.extraction.fringe_shield_halo = 1e-11;
    assert_eq!(Technology::from_bytes(&tech.to_bytes())?, tech);
    assert_eq!(Technology::from_text_str(&tech.to_text_string()?)?, tech);
    assert_eq!(Technology::from_json_str(&tech.to_json_string()?)?, tech);
    Ok(())
}
#[test]
fn formats() {
    assert_eq!(TechFormat::Binary.describe(), "Protobuf Binary");
    assert_eq!(TechFormat::Textual.describe(), "Protobuf Textual");
    assert_eq!(TechFormat::Json.describe(), "JSON");
    assert_eq!("json".parse::<TechFormat>().unwrap(), TechFormat::Json);
    assert_eq!("textual".parse::<TechFormat>().unwrap(), TechFormat::Textual);
    assert_eq!("binary".parse::<TechFormat>().unwrap(), TechFormat::Binary);
    assert!("yaml".parse::<TechFormat>().is_err());
}
#[test]
fn sky130a_data() {
    let tech = crate::pdk::sky130a::tech();
    assert_eq!(tech.name, "sky130A");
    assert_eq!(tech.layers.len(), 23);
    assert_eq!(tech.lvs_computed_layers.len(), 38);
    assert_eq!(tech.layers[0].name, "diff");
    assert_eq!(tech.layers[0].gds_layer, 65);
    assert_eq!(tech.layers[0].gds_datatype, 20);

    let met1 = tech.process_stack.layer("met1").unwrap();
    match &met1.params {
        StackLayerParams::Metal { metal_layer } => {
            assert_eq!(metal_layer.height, 1.3761);
            assert_eq!(metal_layer.thickness, 0.36);
            let contact = metal_layer.contact_above.as_ref().unwrap();
            assert_eq!(contact.name, "via");
            assert_eq!(contact.metal_above, "met2");
        }
        other => panic!("Wrong params: {:?}", other),
    }
    assert_eq!(tech.process_stack.layers.first().unwrap().name, "subs");
    assert_eq!(tech.process_stack.layers.last().unwrap().name, "air");
    assert_eq!(tech.extraction.side_halo, 8.0);
    assert_eq!(tech.extraction.fringe_shield_halo, 8.0);
    assert_eq!(
        tech.extraction.resistance.layers[0].corner_adjustment_fraction,
        Some(0.5)
    );
}
#[test]
fn ihp_sg13g2_data() {
    let tech = crate::pdk::ihp_sg13g2::tech();
    assert_eq!(tech.name, "ihp_sg13g2");
    let m1 = tech
        .layers
        .iter()
        .find(|l| l.name == "Metal1")
        .unwrap();
    assert_eq!((m1.gds_layer, m1.gds_datatype), (8, 0));
    assert_eq!(tech.process_stack.layers.first().unwrap().name, "subs");
    assert_eq!(tech.process_stack.layers.last().unwrap().name, "air");
}
#[test]
fn pdk_round_trips() -> TechResult<()> {
    // The full built-in data sets survive every encoding
    let dir = scratch();
    for tech in crate::pdk::technologies() {
        for (fmt, ext) in [
            (TechFormat::Binary, "pb"),
            (TechFormat::Textual, "pb.txt"),
            (TechFormat::Json, "pb.json"),
        ] {
            let path = dir.path().join(format!("{}_tech.{}", tech.name, ext));
            tech.save(fmt, &path)?;
            assert_eq!(Technology::open(&path, fmt)?, tech);
        }
    }
    Ok(())
}
#[test]
fn builders() -> TechResult<()> {
    // The derive_builder construction path
    let layer = LayerInfoBuilder::default()
        .name("met1")
        .gds_layer(68u32)
        .gds_datatype(20u32)
        .build()
        .map_err(|e| TechError::Str(e.to_string()))?;
    assert_eq!(layer, LayerInfo::new("met1", 68, 20, ""));
    Ok(())
}
#[test]
fn open_missing_file() {
    let dir = scratch();
    let path = dir.path().join("nope.pb.json");
    assert!(Technology::open(path, TechFormat::Json).is_err());
}
#[test]
fn writes_expected_file_names() -> TechResult<()> {
    // The generator's per-process JSON outputs
    let dir = scratch();
    for tech in crate::pdk::technologies() {
        let path = dir.path().join(format!("{}_tech.pb.json", tech.name));
        tech.save(TechFormat::Json, &path)?;
        assert!(path.exists());
    }
    let mut names: Vec<PathBuf> = std::fs::read_dir(dir.path())?
        .map(|e| e.unwrap().path())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2);
    Ok(())
}
