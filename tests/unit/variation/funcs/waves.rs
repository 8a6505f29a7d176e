use super::*;

fn apply(func: &mut dyn VariationFunc, p: XyzPoint, amount: f64) -> XyzPoint {
    let mut ctx = Context::seeded(0);
    func.init(&mut ctx, &LayerView::default(), &XFormView::default(), amount);
    let mut input = p;
    let mut out = XyzPoint::default();
    func.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, amount);
    out
}

#[test]
fn waves42_with_zero_scale_is_linear() {
    let mut f = Waves42::default();
    f.set_parameter("scalex", 0.0).unwrap();
    f.set_parameter("scaley", 0.0).unwrap();
    let out = apply(&mut f, XyzPoint::new(0.3, -0.7, 0.0), 2.0);
    assert!((out.x - 0.6).abs() < 1e-12);
    assert!((out.y + 1.4).abs() < 1e-12);
}

#[test]
fn waves42_cont_is_integer_flag() {
    let mut f = Waves42::default();
    f.set_parameter("cont", 3.0).unwrap();
    assert_eq!(f.get_parameter("cont").unwrap(), 1.0);
    f.set_parameter("cont", 0.7).unwrap();
    assert_eq!(f.get_parameter("cont").unwrap(), 0.0);
}

#[test]
fn waves4_use_cos_params_are_clamped_flags() {
    let mut f = Waves4::default();
    f.set_parameter("use_cos_x", -4.0).unwrap();
    f.set_parameter("use_cos_y", 0.7).unwrap();
    assert_eq!(f.get_parameter("use_cos_x").unwrap(), 0.0);
    assert_eq!(f.get_parameter("use_cos_y").unwrap(), 1.0);
}

#[test]
fn damping_near_zero_is_neutral() {
    assert_eq!(damping(0.0), 1.0);
    assert_eq!(damping(1e-12), 1.0);
    assert!((damping(-1.0) - (-1.0f64).exp()).abs() < 1e-15);
}

#[test]
fn waves4_damping_scales_output() {
    let mut f = Waves4::default();
    f.set_parameter("scalex", 0.0).unwrap();
    f.set_parameter("scaley", 0.0).unwrap();
    f.set_parameter("dampx", -1.0).unwrap();
    let out = apply(&mut f, XyzPoint::new(1.0, 1.0, 0.0), 1.0);
    assert!((out.x - (-1.0f64).exp()).abs() < 1e-12);
    assert!((out.y - 1.0).abs() < 1e-12);
}

#[test]
fn wave_shapes() {
    let t = 0.3f64;
    assert!((wave(t, true) - t.cos() * t.sin() * t.cos()).abs() < 1e-15);
    assert!((wave(t, false) - t.sin() * t.cos() * t.sin()).abs() < 1e-15);
}
