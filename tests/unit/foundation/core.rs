use super::*;

#[test]
fn polar_matches_flame_convention() {
    let p = XyzPoint::new(3.0, 4.0, 0.0).polar();
    assert_eq!(p.sumsq, 25.0);
    assert_eq!(p.sqrt, 5.0);
    assert!((p.sin_a - 0.6).abs() < 1e-12);
    assert!((p.cos_a - 0.8).abs() < 1e-12);
    assert!((p.atan_yx - 4.0f64.atan2(3.0)).abs() < 1e-12);
    assert!((p.atan_xy - 3.0f64.atan2(4.0)).abs() < 1e-12);
}

#[test]
fn polar_at_origin_does_not_divide_by_zero() {
    let p = Polar::of(0.0, 0.0);
    assert_eq!(p.sqrt, 0.0);
    assert_eq!(p.sin_a, 0.0);
    assert_eq!(p.cos_a, 1.0);
}

#[test]
fn clear_xyz_keeps_color_and_hide() {
    let mut p = XyzPoint::new(1.0, 2.0, 3.0).with_color(0.4);
    p.hide = true;
    p.clear_xyz();
    assert_eq!((p.x, p.y, p.z), (0.0, 0.0, 0.0));
    assert_eq!(p.color, 0.4);
    assert!(p.hide);
}

#[test]
fn is_finite_checks_all_axes() {
    assert!(XyzPoint::new(1.0, 2.0, 3.0).is_finite());
    assert!(!XyzPoint::new(f64::NAN, 0.0, 0.0).is_finite());
    assert!(!XyzPoint::new(0.0, 0.0, f64::INFINITY).is_finite());
}

#[test]
fn palette_requires_exact_size() {
    assert!(Palette::from_entries(&[Rgb::default(); 3]).is_err());
    let p = Palette::from_entries(&[Rgb { r: 1, g: 2, b: 3 }; PALETTE_SIZE]).unwrap();
    assert_eq!(p.entries().len(), PALETTE_SIZE);
}

#[test]
fn palette_lookup_clamps() {
    let p = Palette::grayscale();
    assert_eq!(p.lookup(0.0), Rgb { r: 0, g: 0, b: 0 });
    assert_eq!(p.lookup(1.0), Rgb { r: 255, g: 255, b: 255 });
    assert_eq!(p.lookup(7.0), Rgb { r: 255, g: 255, b: 255 });
    assert_eq!(p.lookup(-1.0), Rgb { r: 0, g: 0, b: 0 });
    assert_eq!(p.lookup(f64::NAN), Rgb { r: 0, g: 0, b: 0 });
}
