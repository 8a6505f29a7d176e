use super::*;
use crate::flame::{Layer, XForm};
use crate::kernel::check_source;

fn var(name: &str, amount: f64) -> Variation {
    Variation::by_name(name, amount).unwrap()
}

fn sample_flame() -> Flame {
    let mut layer = Layer::new()
        .with_xform(XForm::new().with_variation(var("linear", 1.0)).with_variation(var("ePush", 0.5)))
        .with_xform(XForm::new().with_variation(var("blur", 0.1)));
    layer.add_final_xform(XForm::new().with_variation(var("lazysusan", 1.0)).with_variation(var("ePush", 1.0)));
    Flame::new().with_layer(layer)
}

#[test]
fn varset_id_has_uuid_shape() {
    let id = varset_id(["linear", "blur"]);
    let groups: Vec<&str> = id.split('-').collect();
    assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
    assert!(id.chars().all(|c| c == '-' || c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[test]
fn varset_id_ignores_order_and_duplicates() {
    assert_eq!(
        varset_id(["linear", "blur"]),
        varset_id(["blur", "linear", "blur"])
    );
    assert_ne!(varset_id(["linear"]), varset_id(["linear3D"]));
}

#[test]
fn wrapped_fragment_declares_bindings_and_checks() {
    let mut v = var("lazysusan", 0.75);
    v.set_parameter("spin", 0.3).unwrap();
    let src = v.func().kernel_source(&Context::seeded(0)).unwrap();
    let wrapped = wrap_fragment(&v, &src);
    assert!(wrapped.starts_with("// lazysusan\n{\n"));
    assert!(wrapped.contains("  float __lazysusan = 0.75;\n"));
    assert!(wrapped.contains("  float __lazysusan_spin = 0.3;\n"));
    assert!(wrapped.ends_with("}\n"));
    check_source(&wrapped, &[]).unwrap();
}

#[test]
fn export_collects_entries_in_order() {
    let bundle = export_kernels(&sample_flame(), &Context::seeded(0));
    let order: Vec<(usize, bool, &str)> = bundle
        .entries
        .iter()
        .map(|e| (e.xform, e.final_xform, e.name))
        .collect();
    assert_eq!(
        order,
        vec![(0, false, "linear"), (1, false, "blur"), (0, true, "lazysusan")]
    );
    assert!(bundle.entries.iter().all(|e| e.layer == 0));
    assert_eq!(bundle.unsupported, vec!["ePush"]);
    assert_eq!(bundle.varset_id, varset_id(["blur", "ePush", "lazysusan", "linear"]));
}

#[test]
fn require_complete_names_the_missing_function() {
    let bundle = export_kernels(&sample_flame(), &Context::seeded(0));
    let err = bundle.require_complete().unwrap_err();
    assert!(matches!(err, FlameError::UnsupportedCapability { ref name, .. } if name == "ePush"));

    let complete = Flame::new().with_layer(
        Layer::new().with_xform(XForm::new().with_variation(var("linear", 1.0))),
    );
    export_kernels(&complete, &Context::seeded(0))
        .require_complete()
        .unwrap();
}

#[test]
fn preserve_z_changes_generated_source() {
    let flame = Flame::new().with_layer(
        Layer::new().with_xform(XForm::new().with_variation(var("linear", 1.0))),
    );
    let flat = export_kernels(&flame, &Context::seeded(0));
    let carried = export_kernels(&flame, &Context::seeded(0).with_preserve_z(true));
    assert!(!flat.entries[0].source.contains("__pz"));
    assert!(carried.entries[0].source.contains("__pz += __linear*__z;"));
}
