use super::*;

#[test]
fn float_passes_through() {
    assert_eq!(ParamKind::Float.clamp(-1e9), -1e9);
}

#[test]
fn float_range_clamps() {
    let k = ParamKind::FloatRange { min: 0.0, max: 1.0 };
    assert_eq!(k.clamp(2.0), 1.0);
    assert_eq!(k.clamp(-2.0), 0.0);
    assert_eq!(k.clamp(0.25), 0.25);
}

#[test]
fn int_rounds_half_away_from_zero() {
    assert_eq!(ParamKind::Int.clamp(2.5), 3.0);
    assert_eq!(ParamKind::Int.clamp(-2.5), -3.0);
    assert_eq!(ParamKind::Int.clamp(f64::NAN), 0.0);
    assert_eq!(ParamKind::Int.clamp(1e20), f64::from(i32::MAX));
}

#[test]
fn int_range_rounds_then_clamps() {
    let k = ParamKind::IntRange { min: 0, max: 9 };
    assert_eq!(k.clamp(8.6), 9.0);
    assert_eq!(k.clamp(12.0), 9.0);
    assert_eq!(k.clamp(-0.4), 0.0);
    assert!(k.is_integer());
    assert!(!ParamKind::Float.is_integer());
}

#[test]
fn trunc_kinds_drop_the_fraction() {
    assert_eq!(ParamKind::IntTrunc.clamp(2.7), 2.0);
    assert_eq!(ParamKind::IntTrunc.clamp(-2.7), -2.0);
    assert_eq!(ParamKind::IntTrunc.clamp(f64::NAN), 0.0);
    let k = ParamKind::IntTruncRange { min: 0, max: 1 };
    assert_eq!(k.clamp(0.99), 0.0);
    assert_eq!(k.clamp(5.0), 1.0);
    assert!(k.is_integer());
    assert_eq!(k.bounds(), Some((0.0, 1.0)));
    assert_eq!(ParamKind::Int.bounds(), None);
}

#[test]
fn find_param_is_case_insensitive_and_honours_aliases() {
    let specs = [
        ParamSpec::float("powX").with_alias("lT_powX"),
        ParamSpec::int("power"),
    ];
    assert_eq!(find_param(&specs, "POWX"), Some(0));
    assert_eq!(find_param(&specs, "lt_powx"), Some(0));
    assert_eq!(find_param(&specs, "Power"), Some(1));
    assert_eq!(find_param(&specs, "__bogus__"), None);
}
