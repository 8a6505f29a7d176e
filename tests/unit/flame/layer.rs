use super::*;
use crate::foundation::core::Affine;
use crate::variation::Variation;

fn linear(amount: f64) -> Variation {
    Variation::by_name("linear", amount).unwrap()
}

#[test]
fn transforms_are_indexed_in_insertion_order() {
    let mut layer = Layer::new()
        .with_xform(XForm::new())
        .with_xform(XForm::new());
    layer.add_final_xform(XForm::new());
    assert_eq!(
        layer.xforms().iter().map(XForm::index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(layer.final_xforms()[0].index(), 0);
    assert_eq!(layer.view().xform_count, 2);
}

#[test]
fn table_is_invalidated_by_edits() {
    let mut layer = Layer::new().with_xform(XForm::new().with_weight(1.0));
    assert_eq!(layer.selection_table().total(None), 1.0);
    layer.add_xform(XForm::new().with_weight(3.0));
    assert!(layer.table.is_none());
    assert_eq!(layer.selection_table().total(None), 4.0);
    layer.xforms_mut()[0].set_weight(0.0);
    assert_eq!(layer.selection_table().total(None), 3.0);
}

#[test]
fn init_rebuilds_table_and_inits_variations() {
    let mut layer = Layer::new().with_xform(XForm::new().with_variation(linear(1.0)));
    let mut ctx = Context::seeded(0);
    layer.init(&mut ctx);
    assert!(layer.table.is_some());
    assert_eq!(
        layer.xforms()[0].variations()[0].state(),
        crate::variation::VariationState::Initialized
    );
}

#[test]
fn select_follows_weights() {
    let mut layer = Layer::new()
        .with_xform(XForm::new().with_weight(1.0))
        .with_xform(XForm::new().with_weight(3.0));
    let mut ctx = Context::seeded(11);
    let n = 20_000;
    let ones = (0..n)
        .filter(|_| layer.select(None, &mut ctx) == Some(1))
        .count();
    let frac = ones as f64 / n as f64;
    assert!((frac - 0.75).abs() < 0.02, "frac={frac}");
}

#[test]
fn select_with_no_weight_returns_none() {
    let mut layer = Layer::new().with_xform(XForm::new().with_weight(0.0));
    let mut ctx = Context::seeded(0);
    assert_eq!(layer.select(None, &mut ctx), None);
}

#[test]
fn finals_run_in_order() {
    let mut layer = Layer::new();
    layer.add_final_xform(
        XForm::new()
            .with_affine(Affine::scale(2.0))
            .with_variation(linear(1.0)),
    );
    layer.add_final_xform(
        XForm::new()
            .with_affine(Affine::translate((1.0, 0.0)))
            .with_variation(linear(1.0)),
    );
    let mut ctx = Context::seeded(0);
    let mut p = XyzPoint::new(1.0, 0.0, 0.0);
    layer.apply_finals(&mut ctx, &mut p);
    assert_eq!((p.x, p.y), (3.0, 0.0));
}

#[test]
fn apply_xform_ignores_out_of_range_index() {
    let mut layer = Layer::new().with_xform(XForm::new().with_variation(linear(0.5)));
    let mut ctx = Context::seeded(0);
    let mut p = XyzPoint::new(2.0, 2.0, 0.0);
    layer.apply_xform(3, &mut ctx, &mut p);
    assert_eq!((p.x, p.y), (2.0, 2.0));
    layer.apply_xform(0, &mut ctx, &mut p);
    assert_eq!((p.x, p.y), (1.0, 1.0));
}
