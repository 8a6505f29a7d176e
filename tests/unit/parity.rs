use super::*;

#[test]
fn relative_error_floors_small_magnitudes() {
    assert_eq!(relative_error(1.0, 1.0), Some(0.0));
    assert_eq!(relative_error(0.0, 1.0e-5), Some(1.0e-5));
    assert_eq!(relative_error(1000.0, 1001.0), Some(1.0 / 1001.0));
}

#[test]
fn relative_error_handles_non_finite_values() {
    assert_eq!(relative_error(f64::NAN, f64::NAN), Some(0.0));
    assert_eq!(relative_error(f64::INFINITY, f64::INFINITY), Some(0.0));
    assert_eq!(relative_error(f64::NAN, 1.0), None);
    assert_eq!(relative_error(f64::INFINITY, f64::NEG_INFINITY), None);
    assert_eq!(relative_error(1.0, f64::INFINITY), None);
}

#[test]
fn support_bound_rejects_far_or_non_finite_points() {
    let input = XyzPoint::new(1.0, 1.0, 0.0);
    let start = XyzPoint::default();
    let near = XyzPoint::new(0.5, -0.5, 0.0);
    assert!(within_support(&input, &start, &input, &near, 1.0));
    let far = XyzPoint::new(5.0, 0.0, 0.0);
    assert!(!within_support(&input, &start, &input, &far, 1.0));
    let nan = XyzPoint::new(f64::NAN, 0.0, 0.0);
    assert!(!within_support(&input, &start, &input, &nan, 1.0));
}

#[test]
fn linear_agrees_exactly() {
    let report = check_function("linear", 200, 1).unwrap();
    assert_eq!(report.mode, ParityMode::Exact);
    assert_eq!(report.samples, 200);
    assert!(report.is_ok(), "{report:?}");
    assert!(report.max_error <= PARITY_TOLERANCE);
}

#[test]
fn ring_buffered_blur_uses_support_bound() {
    let report = check_function("pre_blur", 200, 3).unwrap();
    assert_eq!(report.mode, ParityMode::SupportBound);
    assert!(report.is_ok(), "{report:?}");
    assert!(report.first_mismatch.is_none());
}

#[test]
fn sampled_mode_draws_amounts_and_parameters() {
    let report = check_function_sampled("lazysusan", 200, 5).unwrap();
    assert!(report.sampled_params);
    assert_eq!(report.mode, ParityMode::Exact);
    assert!(report.is_ok(), "{report:?}");

    let fixed = check_function("lazysusan", 10, 5).unwrap();
    assert!(!fixed.sampled_params);
}

#[test]
fn sampled_blur_support_scales_with_drawn_amount() {
    let report = check_function_sampled("blur3D", 300, 9).unwrap();
    assert_eq!(report.mode, ParityMode::SupportBound);
    assert!(report.is_ok(), "{report:?}");
}

#[test]
fn sampled_parameters_stay_inside_their_domain() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..500 {
        let v = sample_param(ParamKind::FloatRange { min: -0.5, max: 0.25 }, 0.0, &mut rng);
        assert!((-0.5..=0.25).contains(&v));
        let v = sample_param(ParamKind::IntTruncRange { min: 0, max: 1 }, 0.0, &mut rng);
        assert!(v == 0.0 || v == 1.0);
        let v = sample_param(ParamKind::Int, 3.0, &mut rng);
        assert_eq!(v.fract(), 0.0);
        assert!((1.0..=5.0).contains(&v));
        let v = sample_param(ParamKind::Float, 10.0, &mut rng);
        assert!((9.0..=11.0).contains(&v));
    }
}

#[test]
fn scalar_only_and_unknown_functions_are_errors() {
    assert!(matches!(
        check_function("sym_ng17", 10, 0),
        Err(FlameError::UnsupportedCapability { .. })
    ));
    assert!(matches!(
        check_function("no_such_thing", 10, 0),
        Err(FlameError::UnknownVariation(_))
    ));
    assert!(matches!(
        check_function_sampled("sym_ng17", 10, 0),
        Err(FlameError::UnsupportedCapability { .. })
    ));
}
