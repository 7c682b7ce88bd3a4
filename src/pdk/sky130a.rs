//!
//! # SkyWater sky130A
//!
//! Technology data for the SkyWater 130nm open process.
//! Metal stack per
//! <https://skywater-pdk.readthedocs.io/en/main/_images/metal_stack.svg>.
//!

use crate::data::*;

/// Build the complete sky130A [Technology]
pub fn tech() -> Technology {
    let mut tech = Technology::new("sky130A");
    tech.layers = layers();
    tech.lvs_computed_layers = lvs_computed_layers();
    tech.process_stack = process_stack();
    tech.extraction = extraction();
    tech
}

/// The drawn GDS layers
fn layers() -> Vec<LayerInfo> {
    vec![
        LayerInfo::new("diff", 65, 20, "Active (diffusion) area"),
        LayerInfo::new("tap", 65, 44, "Active (diffusion) area (type equal to the well/substrate underneath) (i.e., N+ and P+)"),
        LayerInfo::new("diff", 65, 20, "Active (diffusion) area"),
        LayerInfo::new("diff", 65, 144, "KLayout computed layer: ntap_conn"),
        LayerInfo::new("diff", 65, 244, "KLayout computed layer: ptap_conn"),
        LayerInfo::new("nwell", 64, 20, "N-well region"),
        LayerInfo::new("poly", 66, 20, "Poly"),
        LayerInfo::new("licon1", 66, 44, "Contact to local interconnect"),
        LayerInfo::new("li1", 67, 20, "Local interconnect"),
        LayerInfo::new("mcon", 67, 44, "Contact from local interconnect to met1"),
        LayerInfo::new("met1", 68, 20, "Metal 1"),
        LayerInfo::new("via", 68, 44, "Contact from met1 to met2"),
        LayerInfo::new("met2", 69, 20, "Metal 2"),
        LayerInfo::new("via2", 69, 44, "Contact from met2 to met3"),
        LayerInfo::new("met3", 70, 20, "Metal 3"),
        LayerInfo::new("via3_ncap", 70, 144, "Contact from met3 to met4 (no MiM cap)"),
        LayerInfo::new("via3_cap", 70, 244, "Contact from cap above met3 to met4 (MiM cap)"),
        LayerInfo::new("capm", 89, 44, "MiM capacitor plate over metal 3"),
        LayerInfo::new("met4", 71, 20, "Metal 4"),
        LayerInfo::new("capm2", 97, 44, "MiM capacitor plate over metal 4"),
        LayerInfo::new("via4_ncap", 71, 144, "Contact from met4 to met5 (no MiM cap)"),
        LayerInfo::new("via4_cap", 71, 244, "Contact from cap above met4 to met5 (MiM cap)"),
        LayerInfo::new("met5", 72, 20, "Metal 5"),
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
        reg("dnwell", 64, 18, "Deep NWell"),
        reg("li_con", 67, 20, "Computed layer for li"),
        reg("licon", 66, 44, "Computed layer for contact to li"),
        reg("mcon", 67, 44, ""),
        reg("met1_con", 68, 20, ""),
        reg("met2_con", 69, 20, ""),
        reg("met3_ncap", 70, 20, ""),
        reg("met4_ncap", 71, 20, ""),
        reg("met5_con", 72, 20, ""),
        reg("nsd", 93, 44, "borrow from nsdm"),
        reg("ntap_conn", 65, 144, "Separate ntap, original tap is 65,44, we need seperate ntap/ptap"),
        reg("nwell", 64, 20, ""),
        reg("poly_con", 66, 20, ""),
        reg("psd", 94, 20, "borrow from psdm"),
        reg("ptap_conn", 65, 244, "Separate ptap, original tap is 65,44, we need seperate ntap/ptap"),
        reg("via1", 68, 44, ""),
        reg("via2", 69, 44, ""),
        reg("via3_ncap", 70, 144, "Original via3 is 70,44, case where no MiM cap"),
        reg("via4_ncap", 71, 144, "Original via4 is 71,44, case where no MiM cap"),
        reg("via3_cap", 70, 244, "Original via3 is 70,44, via above metal 3 MIM cap"),
        reg("via4_cap", 71, 244, "Original via3 is 71,44, via above metal 4 MIM cap"),
        cap("poly_vpp", 66, 20, "Capacitor device metal"),
        cap("li_vpp", 67, 20, "Capacitor device metal"),
        cap("met1_vpp", 68, 20, "Capacitor device metal"),
        cap("met2_vpp", 69, 20, "Capacitor device metal"),
        cap("met3_vpp", 70, 20, "Capacitor device metal"),
        cap("met4_vpp", 71, 20, "Capacitor device metal"),
        cap("met5_vpp", 72, 20, "Capacitor device metal"),
        cap("licon_vpp", 66, 44, "Capacitor device contact"),
        cap("mcon_vpp", 67, 44, "Capacitor device contact"),
        cap("via1_vpp", 68, 44, "Capacitor device contact"),
        cap("via2_vpp", 69, 44, "Capacitor device contact"),
        cap("via3_vpp", 70, 44, "Capacitor device contact"),
        cap("via4_vpp", 71, 44, "Capacitor device contact"),
        cap("met3_cap", 70, 220, "metal3 part of MiM cap"),
        cap("met4_cap", 71, 220, "metal4 part of MiM cap"),
        cap("capm", 89, 44, "MiM cap above metal3"),
        cap("capm2", 97, 44, "MiM cap above metal4"),
    ]
}

/// The vertical process stack, substrate up to air
fn process_stack() -> ProcessStackInfo {
    // MiM capacitor plate geometry, per the PDK cross-section.
    // capild_k tuned to match design cap_mim_m3_w18p9_l5p1_no_interconnect to 200fF.
    let capm_thickness = 0.1;
    let capild_k = 4.52;
    let capild_thickness = 0.02;

    let layers = vec![
        StackLayer::new(
            "subs",
            SubstrateLayer {
                height: 0.1,
                thickness: 0.33,
                reference: "fox".into(),
            },
        ),
        StackLayer::new(
            "nwell",
            NWellLayer {
                height: 0.0,
                reference: "fox".into(),
                contact_above: Some(Contact::new("licon1", "li1", 0.9361)),
            },
        ),
        StackLayer::new(
            "diff",
            DiffusionLayer {
                height: 0.323,
                reference: "fox".into(),
                contact_above: Some(Contact::new("licon1", "li1", 0.9361)),
            },
        ),
        StackLayer::new("fox", FieldOxideLayer { dielectric_k: 0.39 }),
        StackLayer::new(
            "poly",
            MetalLayer {
                height: 0.3262,
                thickness: 0.18,
                reference_below: "fox".into(),
                reference_above: "psg".into(),
                contact_above: Some(Contact::new("licon1", "li1", 0.4299)),
            },
        ),
        StackLayer::new(
            "iox",
            SidewallDielectricLayer {
                dielectric_k: 0.39,
                height_above_metal: 0.18,
                width_outside_sidewall: 0.006,
                reference: "poly".into(),
            },
        ),
        StackLayer::new(
            "spnit",
            SidewallDielectricLayer {
                dielectric_k: 7.5,
                height_above_metal: 0.121,
                width_outside_sidewall: 0.0431,
                reference: "iox".into(),
            },
        ),
        StackLayer::new(
            "psg",
            SimpleDielectricLayer {
                dielectric_k: 3.9,
                reference: "fox".into(),
            },
        ),
        StackLayer::new(
            "li1",
            MetalLayer {
                height: 0.9361,
                thickness: 0.1,
                reference_below: "psg".into(),
                reference_above: "lint".into(),
                contact_above: Some(Contact::new("mcon", "met1", 1.3761 - (0.9361 + 0.1))),
            },
        ),
        StackLayer::new(
            "lint",
            ConformalDielectricLayer {
                dielectric_k: 7.3,
                thickness_over_metal: 0.075,
                thickness_where_no_metal: 0.075,
                thickness_sidewall: 0.075,
                reference: "li1".into(),
            },
        ),
        StackLayer::new(
            "nild2",
            SimpleDielectricLayer {
                dielectric_k: 4.05,
                reference: "lint".into(),
            },
        ),
        StackLayer::new(
            "met1",
            MetalLayer {
                height: 1.3761,
                thickness: 0.36,
                reference_below: "nild2".into(),
                reference_above: "nild3".into(),
                contact_above: Some(Contact::new("via", "met2", 0.27)),
            },
        ),
        StackLayer::new(
            "nild3c",
            SidewallDielectricLayer {
                dielectric_k: 3.5,
                height_above_metal: 0.0,
                width_outside_sidewall: 0.03,
                reference: "met1".into(),
            },
        ),
        StackLayer::new(
            "nild3",
            SimpleDielectricLayer {
                dielectric_k: 4.5,
                reference: "nild2".into(),
            },
        ),
        StackLayer::new(
            "met2",
            MetalLayer {
                height: 2.0061,
                thickness: 0.36,
                reference_below: "nild3".into(),
                reference_above: "nild4".into(),
                contact_above: Some(Contact::new("via2", "met3", 0.42)),
            },
        ),
        StackLayer::new(
            "nild4c",
            SidewallDielectricLayer {
                dielectric_k: 3.5,
                height_above_metal: 0.0,
                width_outside_sidewall: 0.03,
                reference: "met2".into(),
            },
        ),
        StackLayer::new(
            "nild4",
            SimpleDielectricLayer {
                dielectric_k: 4.2,
                reference: "nild3".into(),
            },
        ),
        StackLayer::new(
            "met3_ncap",
            MetalLayer {
                height: 2.7861,
                thickness: 0.845,
                reference_below: "nild4".into(),
                reference_above: "nild5".into(),
                contact_above: Some(Contact::new("via3_ncap", "met4", 0.39)),
            },
        ),
        StackLayer::new(
            "met3_cap",
            MetalLayer {
                height: 2.7861,
                thickness: 0.845,
                reference_below: "nild4".into(),
                reference_above: "nild5".into(),
                contact_above: None,
            },
        ),
        StackLayer::new(
            "capild",
            ConformalDielectricLayer {
                dielectric_k: capild_k,
                thickness_over_metal: capild_thickness,
                thickness_where_no_metal: 0.0,
                thickness_sidewall: 0.0,
                reference: "met3_cap".into(),
            },
        ),
        StackLayer::new(
            "nild5",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "nild4".into(),
            },
        ),
        StackLayer::new(
            "capm",
            MetalLayer {
                height: 2.7861 + 0.845 + capild_thickness,
                thickness: capm_thickness,
                reference_below: "nild5".into(),
                reference_above: "nild5".into(),
                contact_above: Some(Contact::new("via3_cap", "met4", 0.29)),
            },
        ),
        StackLayer::new(
            "nild5",
            SimpleDielectricLayer {
                dielectric_k: 4.1,
                reference: "nild4".into(),
            },
        ),
        StackLayer::new(
            "met4_ncap",
            MetalLayer {
                height: 4.0211,
                thickness: 0.845,
                reference_below: "nild5".into(),
                reference_above: "nild6".into(),
                contact_above: Some(Contact::new("via4_ncap", "met5", 0.505)),
            },
        ),
        StackLayer::new(
            "capild",
            ConformalDielectricLayer {
                dielectric_k: capild_k,
                thickness_over_metal: capild_thickness,
                thickness_where_no_metal: 0.0,
                thickness_sidewall: 0.0,
                reference: "met4_cap".into(),
            },
        ),
        StackLayer::new(
            "met4_cap",
            MetalLayer {
                height: 4.0211,
                thickness: 0.845,
                reference_below: "nild5".into(),
                reference_above: "nild6".into(),
                contact_above: None,
            },
        ),
        StackLayer::new(
            "nild6",
            SimpleDielectricLayer {
                dielectric_k: 4.0,
                reference: "nild5".into(),
            },
        ),
        StackLayer::new(
            "capm2",
            MetalLayer {
                height: 4.0211 + 0.845 + capild_thickness,
                thickness: capm_thickness,
                reference_below: "nild6".into(),
                reference_above: "nild6".into(),
                contact_above: Some(Contact::new("via4_cap", "met5", 0.505 - 0.1)),
            },
        ),
        StackLayer::new(
            "nild6",
            SimpleDielectricLayer {
                dielectric_k: 4.0,
                reference: "nild5".into(),
            },
        ),
        StackLayer::new(
            "met5",
            MetalLayer {
                height: 5.3711,
                thickness: 1.26,
                reference_below: "nild6".into(),
                reference_above: "topox".into(),
                contact_above: None,
            },
        ),
        StackLayer::new(
            "topox",
            SidewallDielectricLayer {
                dielectric_k: 3.9,
                height_above_metal: 0.09,
                width_outside_sidewall: 0.07,
                reference: "met5".into(),
            },
        ),
        StackLayer::new(
            "topnit",
            ConformalDielectricLayer {
                dielectric_k: 7.5,
                thickness_over_metal: 0.54,
                thickness_where_no_metal: 0.4223,
                thickness_sidewall: 0.3777,
                reference: "topox".into(),
            },
        ),
        StackLayer::new(
            "air",
            SimpleDielectricLayer {
                dielectric_k: 3.0,
                reference: "topnit".into(),
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
                    layer_name: "ndiffres".into(),
                    resistance: 120000.0,
                    corner_adjustment_fraction: Some(0.5),
                },
                LayerResistance {
                    layer_name: "poly".into(),
                    resistance: 48200.0,
                    corner_adjustment_fraction: None,
                },
            ],
            vias: vec![ViaResistance {
                via_name: "mcon".into(),
                resistance: 9300.0,
            }],
        },
        capacitance: CapacitanceInfo {
            substrates: vec![SubstrateCapacitance {
                layer_name: "poly".into(),
                area_capacitance: 106.13,
                perimeter_capacitance: 55.27,
            }],
            overlaps: vec![
                OverlapCapacitance {
                    top_layer_name: "poly".into(),
                    bottom_layer_name: "active".into(),
                    capacitance: 106.13,
                },
                OverlapCapacitance {
                    top_layer_name: "met1".into(),
                    bottom_layer_name: "poly".into(),
                    capacitance: 44.81,
                },
            ],
            sidewalls: vec![SidewallCapacitance {
                layer_name: "met1".into(),
                capacitance: 44.0,
                offset: 0.25,
            }],
            sideoverlaps: vec![SideOverlapCapacitance {
                in_layer_name: "met1".into(),
                out_layer_name: "poly".into(),
                capacitance: 46.72,
            }],
        },
    }
}
