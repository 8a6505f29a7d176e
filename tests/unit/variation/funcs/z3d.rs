use super::*;

fn apply(func: &mut dyn VariationFunc, ctx: &mut Context, p: XyzPoint, amount: f64) -> XyzPoint {
    func.init(ctx, &LayerView::default(), &XFormView::default(), amount);
    let mut input = p;
    let mut out = XyzPoint::default();
    func.transform(ctx, &XFormView::default(), &mut input, &mut out, amount);
    out
}

#[test]
fn crop3d_hides_outside_points_when_zeroing() {
    let mut f = Crop3D::default();
    f.set_parameter("zero", 1.0).unwrap();
    let out = apply(&mut f, &mut Context::seeded(0), XyzPoint::new(2.0, 0.0, 0.0), 1.0);
    assert!(out.hide);
    assert_eq!((out.x, out.y, out.z), (0.0, 0.0, 0.0));
}

#[test]
fn crop3d_scatters_back_inside() {
    let mut f = Crop3D::default();
    f.set_parameter("scatter_area", 0.5).unwrap();
    let mut ctx = Context::seeded(1);
    for _ in 0..100 {
        let out = apply(&mut f, &mut ctx, XyzPoint::new(5.0, -5.0, 0.25), 1.0);
        assert!(!out.hide);
        assert!((0.5..=1.0).contains(&out.x), "{out:?}");
        assert!((-1.0..=-0.5).contains(&out.y), "{out:?}");
        assert_eq!(out.z, 0.25);
    }
}

#[test]
fn crop3d_normalizes_swapped_bounds() {
    let mut f = Crop3D::default();
    f.set_parameter("left", 2.0).unwrap();
    f.set_parameter("right", -2.0).unwrap();
    let out = apply(&mut f, &mut Context::seeded(0), XyzPoint::new(1.5, 0.0, 0.0), 1.0);
    assert_eq!(out.x, 1.5);
}

#[test]
fn disc3d_writes_z() {
    let out = apply(
        &mut Disc3D::default(),
        &mut Context::seeded(0),
        XyzPoint::new(0.3, 0.4, 0.0),
        1.0,
    );
    assert!(out.z != 0.0);
}

#[test]
fn inflate_z2_only_touches_z() {
    let out = apply(&mut InflateZ2, &mut Context::seeded(0), XyzPoint::new(0.0, 0.0, 9.0), 2.0);
    assert_eq!((out.x, out.y), (0.0, 0.0));
    assert!((out.z - 0.5).abs() < 1e-12);
}

#[test]
fn julia3dq_zero_power_is_guarded() {
    let mut f = Julia3Dq::default();
    f.set_parameter("power", 0.0).unwrap();
    let mut ctx = Context::seeded(2);
    let out = apply(&mut f, &mut ctx, XyzPoint::new(0.5, 0.5, 0.1), 1.0);
    assert!(out.is_finite());
}

#[test]
fn julia3dq_power_is_rounded() {
    let mut f = Julia3Dq::default();
    f.set_parameter("power", 2.6).unwrap();
    f.set_parameter("divisor", -1.4).unwrap();
    assert_eq!(f.parameter_values(), vec![3.0, -1.0]);
}

#[test]
fn julia3dq_divisor_equal_to_power_preserves_radius() {
    let mut f = Julia3Dq::default();
    f.set_parameter("divisor", 3.0).unwrap();
    let mut ctx = Context::seeded(4);
    let out = apply(&mut f, &mut ctx, XyzPoint::new(0.6, 0.8, 0.0), 1.0);
    assert!((out.x.hypot(out.y) - 1.0).abs() < 1e-9);
}

#[test]
fn scry3d_uses_angle_when_z_is_zero() {
    let out = apply(&mut Scry3D, &mut Context::seeded(0), XyzPoint::new(0.0, 1.0, 0.0), 1.0);
    assert!(out.z > 0.0);
}

#[test]
fn swirl3d_n_truncates_toward_zero() {
    let mut f = Swirl3D::default();
    f.set_parameter("n", 2.7).unwrap();
    assert_eq!(f.get_parameter("n").unwrap(), 2.0);
    f.set_parameter("n", -2.7).unwrap();
    assert_eq!(f.get_parameter("n").unwrap(), -2.0);
}

#[test]
fn swirl3d_sets_color_from_phase() {
    let mut f = Swirl3D::default();
    f.set_parameter("n", 2.4).unwrap();
    assert_eq!(f.get_parameter("n").unwrap(), 2.0);
    let out = apply(&mut f, &mut Context::seeded(0), XyzPoint::new(0.2, 0.1, 0.0), 1.0);
    assert!((0.0..=1.0).contains(&out.color));
    assert!((out.z.abs() - out.color).abs() < 1e-12);
}
