use std::io::Cursor;

use super::*;
use crate::flame::DrawMode;

fn parse(json: &str) -> FlameResult<Flame> {
    Flame::from_json_reader(Cursor::new(json))
}

const MINIMAL: &str = r#"{ "layers": [ { "xforms": [ { "variations": [ { "name": "linear" } ] } ] } ] }"#;

#[test]
fn minimal_definition_fills_defaults() {
    let flame = parse(MINIMAL).unwrap();
    assert_eq!(flame.layers().len(), 1);
    let layer = &flame.layers()[0];
    assert_eq!(layer.weight(), 1.0);
    assert!(layer.is_visible());
    assert_eq!(*layer.palette(), Palette::grayscale());
    let xf = &layer.xforms()[0];
    assert_eq!(xf.weight(), 1.0);
    assert_eq!(xf.opacity(), 1.0);
    assert_eq!(xf.affine(), Affine::IDENTITY);
    assert_eq!(xf.variations()[0].amount(), 1.0);
    assert_eq!(*flame.camera(), Camera::default());
    assert_eq!(*flame.quality(), Quality::default());
    assert!(!flame.preserve_z());
}

#[test]
fn parameters_and_draw_mode_are_loaded() {
    let flame = parse(
        r#"{ "preserve_z": true, "layers": [ { "xforms": [ {
            "draw_mode": "hidden", "post_affine": [1, 0, 0, 1, 0.5, 0],
            "variations": [ { "name": "julia3Dq", "amount": 0.5, "params": { "POWER": 4 } } ]
        } ] } ] }"#,
    )
    .unwrap();
    let xf = &flame.layers()[0].xforms()[0];
    assert_eq!(xf.draw_mode(), DrawMode::Hidden);
    assert!(xf.post_affine().is_some());
    assert_eq!(xf.variations()[0].parameters()[0], ("power", 4.0));
    assert!(flame.preserve_z());
}

#[test]
fn empty_flame_is_rejected() {
    assert!(matches!(parse(r#"{ "layers": [] }"#), Err(FlameError::Validation(_))));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(parse("{ nope"), Err(FlameError::Serde(_))));
}

#[test]
fn unknown_variation_is_rejected() {
    let err = parse(r#"{ "layers": [ { "xforms": [ { "variations": [ { "name": "Linear" } ] } ] } ] }"#)
        .unwrap_err();
    assert!(matches!(err, FlameError::UnknownVariation(ref n) if n == "Linear"));
}

#[test]
fn unknown_parameter_is_rejected() {
    let err = parse(
        r#"{ "layers": [ { "xforms": [ { "variations": [
            { "name": "linear", "params": { "__bogus__": 1 } } ] } ] } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, FlameError::InvalidParameter(_)));
}

#[test]
fn validation_errors_carry_location() {
    let err = parse(
        r#"{ "layers": [ { "xforms": [ {}, { "weight": -1 } ] } ] }"#,
    )
    .unwrap_err();
    match err {
        FlameError::Validation(msg) => assert!(msg.starts_with("layer 0: xform 1: weight"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = parse(r#"{ "layers": [ { "xforms": [ { "opacity": 1.5 } ] } ] }"#).unwrap_err();
    assert!(matches!(err, FlameError::Validation(ref m) if m.contains("opacity")));

    let err = parse(r#"{ "layers": [ { "palette": [ { "r": 0, "g": 0, "b": 0 } ], "xforms": [] } ] }"#)
        .unwrap_err();
    assert!(matches!(err, FlameError::Validation(ref m) if m.contains("palette")));

    let err = parse(r#"{ "quality": { "spatial_oversample": 0 }, "layers": [ { "xforms": [] } ] }"#)
        .unwrap_err();
    assert!(matches!(err, FlameError::Validation(_)));
}

#[test]
fn definition_round_trips_through_runtime_model() {
    let flame = parse(
        r#"{ "name": "rt", "layers": [ { "weight": 2, "xforms": [
            { "weight": 0.5, "color": 0.3, "modified_weights": [1, 0],
              "variations": [ { "name": "lazysusan", "params": { "spin": 0.7 } }, { "name": "blur", "amount": 0.1 } ] },
            { "draw_mode": "opaque", "opacity": 0.4, "variations": [ { "name": "linear" } ] }
        ], "final_xforms": [ { "variations": [ { "name": "post_zscale_wf" } ] } ] } ] }"#,
    )
    .unwrap();
    let def = flame.to_def();
    assert_eq!(Flame::from_def(&def).unwrap().to_def(), def);

    let json = flame.to_json_string().unwrap();
    let again = parse(&json).unwrap();
    assert_eq!(again.to_def(), def);
}

#[test]
fn variation_names_are_sorted_and_distinct() {
    let flame = parse(
        r#"{ "layers": [ { "xforms": [
            { "variations": [ { "name": "linear" }, { "name": "blur" } ] },
            { "variations": [ { "name": "linear" } ] }
        ], "final_xforms": [ { "variations": [ { "name": "ePush" } ] } ] } ] }"#,
    )
    .unwrap();
    assert_eq!(flame.variation_names(), vec!["blur", "ePush", "linear"]);
}

#[test]
fn init_pass_publishes_preserve_z() {
    let mut flame = parse(MINIMAL).unwrap();
    flame.set_preserve_z(true);
    let mut ctx = Context::seeded(0);
    flame.init_pass(&mut ctx);
    assert!(ctx.is_preserve_z());
}

#[test]
fn clone_is_a_deep_copy() {
    let mut a = parse(
        r#"{ "layers": [ { "xforms": [ { "variations": [ { "name": "lazysusan" } ] } ] } ] }"#,
    )
    .unwrap();
    let b = a.clone();
    a.layers_mut()[0].xforms_mut()[0].variations_mut()[0]
        .set_parameter("spin", 2.0)
        .unwrap();
    let spin = |f: &Flame| {
        f.layers()[0].xforms()[0].variations()[0]
            .parameters()
            .into_iter()
            .find(|(n, _)| *n == "spin")
            .map(|(_, v)| v)
    };
    assert_eq!(spin(&a), Some(2.0));
    assert_eq!(spin(&b), Some(0.1));
}
