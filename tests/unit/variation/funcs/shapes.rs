use super::*;

fn apply(func: &mut dyn VariationFunc, ctx: &mut Context, p: XyzPoint, amount: f64) -> XyzPoint {
    func.init(ctx, &LayerView::default(), &XFormView::default(), amount);
    let mut input = p;
    let mut out = XyzPoint::default();
    func.transform(ctx, &XFormView::default(), &mut input, &mut out, amount);
    out
}

#[test]
fn asteria_keeps_points_outside_both_regions() {
    // r >= 1 and r2 >= 1: in1 flips to true and the point passes through scaled.
    let out = apply(
        &mut Asteria::default(),
        &mut Context::seeded(0),
        XyzPoint::new(-1.5, 2.5, 0.0),
        1.0,
    );
    assert_eq!((out.x, out.y), (-1.5, 2.5));
}

#[test]
fn blocky_is_odd_in_x() {
    let mut ctx = Context::seeded(0);
    let a = apply(&mut Blocky::default(), &mut ctx, XyzPoint::new(0.4, 0.2, 0.0), 1.0);
    let b = apply(&mut Blocky::default(), &mut ctx, XyzPoint::new(-0.4, 0.2, 0.0), 1.0);
    assert!((a.x + b.x).abs() < 1e-12);
    assert!((a.y - b.y).abs() < 1e-12);
}

#[test]
fn hole2_shape_is_clamped_to_declared_range() {
    let mut f = Hole2::default();
    f.set_parameter("shape", 42.0).unwrap();
    assert_eq!(f.get_parameter("shape").unwrap(), 9.0);
    f.set_parameter("inside", 0.6).unwrap();
    assert_eq!(f.get_parameter("inside").unwrap(), 1.0);
}

#[test]
fn hole2_inside_inverts_radius() {
    let p = XyzPoint::new(0.5, 0.5, 0.0);
    let mut ctx = Context::seeded(0);
    let outer = apply(&mut Hole2::default(), &mut ctx, p, 1.0);
    let mut inner = Hole2::default();
    inner.set_parameter("inside", 1.0).unwrap();
    let inner = apply(&mut inner, &mut ctx, p, 1.0);
    let ro = outer.x.hypot(outer.y);
    let ri = inner.x.hypot(inner.y);
    assert!((ro * ri - 1.0).abs() < 1e-9);
}

#[test]
fn square_perimeter_wraps_into_eight_sides() {
    let (s, p) = square_perimeter(1.0, 0.0, 0.0);
    assert_eq!((s, p), (1.0, 1.0));
    let (s, p) = square_perimeter(0.0, -2.0, 1.0);
    assert_eq!(s, 2.0);
    assert!((0.0..16.0).contains(&p));
}

#[test]
fn lazy_travis_params_round_trip() {
    let mut f = LazyTravis::default();
    f.set_parameter("spin_out", 0.25).unwrap();
    f.set_parameter("SPACE", 2.0).unwrap();
    assert_eq!(f.parameter_values(), vec![1.0, 0.25, 2.0]);
}

#[test]
fn lazysusan_spins_inside_and_pushes_outside() {
    let mut f = LazySusan::default();
    f.set_parameter("x", 0.0).unwrap();
    f.set_parameter("y", 0.0).unwrap();
    f.set_parameter("twist", 0.0).unwrap();
    f.set_parameter("spin", PI).unwrap();
    let mut ctx = Context::seeded(0);
    let inside = apply(&mut f, &mut ctx, XyzPoint::new(0.5, 0.0, 0.0), 1.0);
    assert!((inside.x + 0.5).abs() < 1e-12);
    assert!(inside.y.abs() < 1e-12);

    let outside = apply(&mut f, &mut ctx, XyzPoint::new(2.0, 0.0, 0.0), 1.0);
    assert!((outside.x - 2.0 * (1.0 + 0.4 / 2.0)).abs() < 1e-12);
}

#[test]
fn sym_ng17_picks_one_of_24_isometries() {
    let mut f = SymNg17::default();
    f.set_parameter("Prop. Sep.", 0.0).unwrap();
    let mut ctx = Context::seeded(3);
    for _ in 0..200 {
        let out = apply(&mut f, &mut ctx, XyzPoint::new(1.0, 0.0, 0.0), 1.0);
        // All base rows are rotations or reflections; step is zero.
        assert!((out.x.hypot(out.y) - 1.0).abs() < 1e-3, "{out:?}");
    }
    assert!(f.get_parameter("stepx").is_ok());
}

#[test]
fn truchet_keeps_authored_values_until_init() {
    let mut f = Truchet::default();
    f.set_parameter("exponent", 3.0).unwrap();
    f.set_parameter("arc_width", -1.0).unwrap();
    f.set_parameter("size", 25.0).unwrap();
    assert_eq!(f.get_parameter("exponent").unwrap(), 3.0);
    assert_eq!(f.get_parameter("arc_width").unwrap(), -1.0);
    assert_eq!(f.get_parameter("size").unwrap(), 25.0);

    let mut ctx = Context::seeded(0);
    f.init(&mut ctx, &LayerView::default(), &XFormView::default(), 1.0);
    assert_eq!(f.get_parameter("exponent").unwrap(), 2.0);
    assert_eq!(f.get_parameter("arc_width").unwrap(), 0.001);
    assert_eq!(f.get_parameter("size").unwrap(), 10.0);
}

#[test]
fn truchet_fixed_seeds_pick_fixed_tiles() {
    let mut f = Truchet::default();
    f.set_parameter("seed", 0.0).unwrap();
    assert_eq!(f.tile_type(3.0, 7.0), 0.0);
    f.set_parameter("seed", -1.0).unwrap();
    assert_eq!(f.tile_type(3.0, 7.0), 1.0);
}

#[test]
fn truchet_direct_color_writes_color() {
    let mut f = Truchet::default();
    f.set_parameter("direct_color", 1.0).unwrap();
    f.set_parameter("arc_width", 1.0).unwrap();
    let mut ctx = Context::seeded(0);
    let mut hit = false;
    for i in 0..100 {
        let p = XyzPoint::new(0.013 * i as f64, 0.5, 0.0);
        let mut input = p;
        let mut out = XyzPoint::default().with_color(-1.0);
        f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 1.0);
        if out.color != -1.0 {
            assert!((0.0..=1.0).contains(&out.color));
            hit = true;
        }
    }
    assert!(hit);
}
