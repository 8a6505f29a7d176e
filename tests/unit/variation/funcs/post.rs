use super::*;

fn post(func: &mut PostAxisSymmetry, ctx: &mut Context, p: XyzPoint, amount: f64) -> XyzPoint {
    func.init(ctx, &LayerView::default(), &XFormView::default(), amount);
    let mut input = XyzPoint::default();
    let mut out = p;
    func.transform(ctx, &XFormView::default(), &mut input, &mut out, amount);
    out
}

#[test]
fn zero_amount_is_a_no_op() {
    let p = XyzPoint::new(0.3, 0.2, 0.1).with_color(0.4);
    let out = post(&mut PostAxisSymmetry::default(), &mut Context::seeded(0), p, 0.0);
    assert_eq!(out, p);
}

#[test]
fn x_axis_mirrors_about_centre_without_rotation() {
    let mut f = PostAxisSymmetry::default();
    f.set_parameter("rotation", 0.0).unwrap();
    f.set_parameter("centre_x", 0.0).unwrap();
    let mut ctx = Context::seeded(1);
    let mut sides = [false; 2];
    for _ in 0..64 {
        let out = post(&mut f, &mut ctx, XyzPoint::new(0.25, 0.5, 0.0), 1.0);
        assert_eq!(out.y, 0.5);
        if (out.x - 0.75).abs() < 1e-12 {
            sides[0] = true;
        } else {
            assert!((out.x + 0.75).abs() < 1e-12, "{out:?}");
            sides[1] = true;
        }
    }
    assert_eq!(sides, [true, true]);
}

#[test]
fn y_axis_second_branch_shifts_color_only_when_rotating() {
    let mut f = PostAxisSymmetry::default();
    f.set_parameter("axis", 1.0).unwrap();
    f.set_parameter("rotation", 0.0).unwrap();
    f.set_parameter("y2colorshift", 0.25).unwrap();
    let mut ctx = Context::seeded(2);
    for _ in 0..64 {
        let out = post(&mut f, &mut ctx, XyzPoint::new(0.0, 0.5, 0.0).with_color(0.5), 1.0);
        // Branch one has a zero shift, branch two skips its shift without rotation.
        assert_eq!(out.color, 0.5);
    }

    f.set_parameter("rotation", 30.0).unwrap();
    let mut shifted = false;
    for _ in 0..64 {
        let out = post(&mut f, &mut ctx, XyzPoint::new(0.0, 0.5, 0.0).with_color(0.5), 1.0);
        shifted |= (out.color - 0.75).abs() < 1e-12;
    }
    assert!(shifted);
}

#[test]
fn axis_is_clamped() {
    let mut f = PostAxisSymmetry::default();
    f.set_parameter("axis", 7.0).unwrap();
    assert_eq!(f.get_parameter("axis").unwrap(), 2.0);
    assert_eq!(f.priority(), 1);
}

#[test]
fn zscale_overwrites_z() {
    let mut f = PostZScale::default();
    f.set_parameter("ztranslate", 0.5).unwrap();
    let mut ctx = Context::seeded(0);
    let mut input = XyzPoint::default();
    let mut out = XyzPoint::new(1.0, 2.0, 3.0);
    f.transform(&mut ctx, &XFormView::default(), &mut input, &mut out, 2.0);
    assert_eq!((out.x, out.y, out.z), (1.0, 2.0, 6.5));
    assert!(f.capabilities().defines_z());
}
