//!
//! # IHP SG13G2
//!
//! Technology data for the IHP 130nm SiGe BiCMOS open process.
//! Layer map and metal stack per the IHP-Open-PDK documentation:
//! <https://github.com/IHP-GmbH/IHP-Open-PDK>.
//!

use crate::data::*;

/// Build the complete ihp_sg13g2 [Technology]
pub fn tech() -> Technology {
    let mut tech = Technology::new("ihp_sg13g2");
    tech.layers = layers();
    tech.lvs_computed_layers = lvs_computed_layers();
    tech.process_stack = process_stack();
    tech.extraction = extraction();
    tech
}

/// The drawn GDS layers
fn layers() -> Vec<LayerInfo> {
    vec![
        LayerInfo::new("Activ", 1, 0, "Active (diffusion) area"),
        LayerInfo::new("NWell", 31, 0, "N-well region"),
        LayerInfo::new("nSD", 7, 0, "N+ source/drain implant"),
        LayerInfo::new("pSD", 14, 0, "P+ source/drain implant"),
        LayerInfo::new("GatPoly", 5, 0, "Polysilicon gate"),
        LayerInfo::new("Cont", 6, 0, "Contact from Activ/GatPoly to Metal1"),
        LayerInfo::new("Metal1", 8, 0, "Metal 1"),
        LayerInfo::new("Via1", 19, 0, "Contact from Metal1 to Metal2"),
        LayerInfo::new("Metal2", 10, 0, "Metal 2"),
        LayerInfo::new("Via2", 29, 0, "Contact from Metal2 to Metal3"),
        LayerInfo::new("Metal3", 30, 0, "Metal 3"),
        LayerInfo::new("Via3", 49, 0, "Contact from Metal3 to Metal4"),
        LayerInfo::new("Metal4", 50, 0, "Metal 4"),
        LayerInfo::new("Via4", 66, 0, "Contact from Metal4 to Metal5"),
        LayerInfo::new("Metal5", 67, 0, "Metal 5"),
        LayerInfo::new("MIM", 36, 0, "MiM capacitor plate over Metal5"),
        LayerInfo::new("TopVia1", 125, 0, "Contact from Metal5 (or MIM) to TopMetal1"),
        LayerInfo::new("TopMetal1", 126, 0, "Thick top metal 1"),
        LayerInfo::new("TopVia2", 133, 0, "Contact from TopMetal1 to TopMetal2"),
        LayerInfo::new("TopMetal2", 134, 0, "Thick top metal 2"),
    ]
}

/// The LVS-computed derived layers
fn lvs_computed_layers() -> Vec<ComputedLayerInfo> {
    use ComputedLayerKind::{DeviceCapacitor, Regular};
    let reg = |name: &str, layer: u32, dt: u32, desc: &str| {
        ComputedLayerInfo::new(Regular, LayerInfo::new(name, layer, dt, desc))
    };
    let cap = |name: &str, layer: u32, dt: u32, desc: &str| {
        ComputedLayerInfo::new(DeviceCapacitor, LayerInfo::new(name, layer, dt, desc))
    };
    vec![
        reg("nwell_conn", 31, 100, "Connected n-well"),
        reg("ntap_conn", 1, 101, "Separate ntap, split from Activ"),
        reg("ptap_conn", 1, 102, "Separate ptap, split from Activ"),
        reg("poly_con", 5, 0, ""),
        reg("cont", 6, 0, ""),
        reg("metal1_con", 8, 0, ""),
        reg("via1", 19, 0, ""),
        reg("metal2_con", 10, 0, ""),
        reg("via2", 29, 0, ""),
        reg("metal3_con", 30, 0, ""),
        reg("via3", 49, 0, ""),
        reg("metal4_con", 50, 0, ""),
        reg("via4", 66, 0, ""),
        reg("metal5_ncap", 67, 100, "Metal5 outside the MiM cap region"),
        reg("topvia1_ncap", 125, 100, "TopVia1 outside the MiM cap region"),
        reg("topmetal1_con", 126, 0, ""),
        reg("topvia2", 133, 0, ""),
        reg("topmetal2_con", 134, 0, ""),
        cap("metal5_cap", 67, 200, "Metal5 bottom plate of MiM cap"),
        cap("mim", 36, 0, "MiM cap above Metal5"),
        cap("topvia1_cap", 125, 200, "TopVia1 above the MiM plate"),
    ]
}

/// The vertical process stack, substrate up to air
fn process_stack() -> ProcessStackInfo {
    // MiM plate sits on a thin dielectric over Metal5.
    let mim_thickness = 0.15;
    let mimild_k = 6.7;
    let mimild_thickness = 0.04;

    let layers = vec![
        StackLayer::new(
            "subs",
            SubstrateLayer {
                height: 0.1,
                thickness: 0.28,
                reference: "fox".into(),
            },
        ),
        StackLayer::new(
            "nwell",
            NWellLayer {
                height: 0.0,
                reference: "fox".into(),
                contact_above: Some(Contact::new("Cont", "Metal1", 0.64)),
            },
        ),
        StackLayer::new(
            "activ",
            DiffusionLayer {
                height: 0.4,
                reference: "fox".into(),
                contact_above: Some(Contact::new("Cont", "Metal1", 0.64)),
            },
        ),
        StackLayer::new("fox", FieldOxideLayer { dielectric_k: 3.95 }),
        StackLayer::new(
            "gatpoly",
            MetalLayer {
                height: 0.4,
                thickness: 0.16,
                reference_below: "fox".into(),
                reference_above: "ild0".into(),
                contact_above: Some(Contact::new("Cont", "Metal1", 0.48)),
            },
        ),
        StackLayer::new(
            "spacer",
            SidewallDielectricLayer {
                dielectric_k: 7.0,
                height_above_metal: 0.0,
                width_outside_sidewall: 0.06,
                reference: "gatpoly".into(),
            },
        ),
        StackLayer::new(
            "ild0",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "fox".into(),
            },
        ),
        StackLayer::new(
            "metal1",
            MetalLayer {
                height: 1.04,
                thickness: 0.42,
                reference_below: "ild0".into(),
                reference_above: "ild1".into(),
                contact_above: Some(Contact::new("Via1", "Metal2", 0.54)),
            },
        ),
        StackLayer::new(
            "ild1",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild0".into(),
            },
        ),
        StackLayer::new(
            "metal2",
            MetalLayer {
                height: 2.0,
                thickness: 0.49,
                reference_below: "ild1".into(),
                reference_above: "ild2".into(),
                contact_above: Some(Contact::new("Via2", "Metal3", 0.54)),
            },
        ),
        StackLayer::new(
            "ild2",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild1".into(),
            },
        ),
        StackLayer::new(
            "metal3",
            MetalLayer {
                height: 3.03,
                thickness: 0.49,
                reference_below: "ild2".into(),
                reference_above: "ild3".into(),
                contact_above: Some(Contact::new("Via3", "Metal4", 0.54)),
            },
        ),
        StackLayer::new(
            "ild3",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild2".into(),
            },
        ),
        StackLayer::new(
            "metal4",
            MetalLayer {
                height: 4.06,
                thickness: 0.49,
                reference_below: "ild3".into(),
                reference_above: "ild4".into(),
                contact_above: Some(Contact::new("Via4", "Metal5", 0.54)),
            },
        ),
        StackLayer::new(
            "ild4",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild3".into(),
            },
        ),
        StackLayer::new(
            "metal5_ncap",
            MetalLayer {
                height: 5.09,
                thickness: 0.49,
                reference_below: "ild4".into(),
                reference_above: "ild5".into(),
                contact_above: Some(Contact::new("TopVia1", "TopMetal1", 0.85)),
            },
        ),
        StackLayer::new(
            "metal5_cap",
            MetalLayer {
                height: 5.09,
                thickness: 0.49,
                reference_below: "ild4".into(),
                reference_above: "ild5".into(),
                contact_above: None,
            },
        ),
        StackLayer::new(
            "mimild",
            ConformalDielectricLayer {
                dielectric_k: mimild_k,
                thickness_over_metal: mimild_thickness,
                thickness_where_no_metal: 0.0,
                thickness_sidewall: 0.0,
                reference: "metal5_cap".into(),
            },
        ),
        StackLayer::new(
            "ild5",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild4".into(),
            },
        ),
        StackLayer::new(
            "mim",
            MetalLayer {
                height: 5.09 + 0.49 + mimild_thickness,
                thickness: mim_thickness,
                reference_below: "ild5".into(),
                reference_above: "ild5".into(),
                contact_above: Some(Contact::new("TopVia1", "TopMetal1", 0.85 - mimild_thickness - mim_thickness)),
            },
        ),
        StackLayer::new(
            "topmetal1",
            MetalLayer {
                height: 6.43,
                thickness: 2.0,
                reference_below: "ild5".into(),
                reference_above: "ild6".into(),
                contact_above: Some(Contact::new("TopVia2", "TopMetal2", 2.8)),
            },
        ),
        StackLayer::new(
            "ild6",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "ild5".into(),
            },
        ),
        StackLayer::new(
            "topmetal2",
            MetalLayer {
                height: 11.23,
                thickness: 3.0,
                reference_below: "ild6".into(),
                reference_above: "passiv".into(),
                contact_above: None,
            },
        ),
        StackLayer::new(
            "passiv",
            ConformalDielectricLayer {
                dielectric_k: 6.6,
                thickness_over_metal: 0.4,
                thickness_where_no_metal: 0.4,
                thickness_sidewall: 0.4,
                reference: "topmetal2".into(),
            },
        ),
        StackLayer::new(
            "air",
            SimpleDielectricLayer {
                dielectric_k: 1.0,
                reference: "passiv".into(),
            },
        ),
    ];
    ProcessStackInfo { layers }
}

/// The extraction coefficients
fn extraction() -> ExtractionInfo {
    ExtractionInfo {
        side_halo: 8.0,
        fringe_shield_halo: 8.0,
        resistance: ResistanceInfo {
            layers: vec![
                LayerResistance {
                    layer_name: "rppd".into(),
                    resistance: 260000.0,
                    corner_adjustment_fraction: Some(0.5),
                },
                LayerResistance {
                    layer_name: "gatpoly".into(),
                    resistance: 7000.0,
                    corner_adjustment_fraction: None,
                },
            ],
            vias: vec![ViaResistance {
                via_name: "cont".into(),
                resistance: 15000.0,
            }],
        },
        capacitance: CapacitanceInfo {
            substrates: vec![SubstrateCapacitance {
                layer_name: "gatpoly".into(),
                area_capacitance: 83.7,
                perimeter_capacitance: 48.1,
            }],
            overlaps: vec![
                OverlapCapacitance {
                    top_layer_name: "gatpoly".into(),
                    bottom_layer_name: "activ".into(),
                    capacitance: 83.7,
                },
                OverlapCapacitance {
                    top_layer_name: "metal1".into(),
                    bottom_layer_name: "gatpoly".into(),
                    capacitance: 49.6,
                },
            ],
            sidewalls: vec![SidewallCapacitance {
                layer_name: "metal1".into(),
                capacitance: 52.0,
                offset: 0.21,
            }],
            sideoverlaps: vec![SideOverlapCapacitance {
                in_layer_name: "metal1".into(),
                out_layer_name: "gatpoly".into(),
                capacitance: 41.3,
            }],
        },
    }
}
