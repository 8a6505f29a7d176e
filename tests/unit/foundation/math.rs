use super::*;

#[test]
fn sqrt_safe_clamps_non_positive() {
    assert_eq!(sqrt_safe(-4.0), 0.0);
    assert_eq!(sqrt_safe(0.0), 0.0);
    assert_eq!(sqrt_safe(9.0), 3.0);
}

#[test]
fn fmod_keeps_dividend_sign() {
    assert_eq!(fmod(5.5, 2.0), 1.5);
    assert_eq!(fmod(-5.5, 2.0), -1.5);
}

#[test]
fn sign_nonneg_treats_zero_as_positive() {
    assert_eq!(sign_nonneg(0.0), 1.0);
    assert_eq!(sign_nonneg(-0.5), -1.0);
    assert_eq!(sign_nonneg(2.0), 1.0);
}

#[test]
fn complex_sqrt_squares_back() {
    let z = Complex::new(-3.0, 4.0);
    let s = z.sqrt();
    let re = s.re * s.re - s.im * s.im;
    let im = 2.0 * s.re * s.im;
    assert!((re - z.re).abs() < 1e-12);
    assert!((im - z.im).abs() < 1e-12);
}

#[test]
fn complex_asinh_of_real_matches_f64() {
    let z = Complex::new(0.75, 0.0).asinh();
    assert!((z.re - 0.75f64.asinh()).abs() < 1e-12);
    assert!(z.im.abs() < 1e-12);
}
