use super::*;

fn bind(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
    pairs.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect()
}

#[test]
fn linear_fragment_accumulates_into_output() {
    let k = CompiledKernel::compile(
        "__px += __linear*__x;\n__py += __linear*__y;\n",
        &bind(&[("__linear", 0.5)]),
    )
    .unwrap();
    let mut ctx = Context::seeded(1);
    let mut input = XyzPoint::new(2.0, 4.0, 1.0);
    let mut output = XyzPoint::new(1.0, 1.0, 0.0);
    k.run(&mut ctx, &mut input, &mut output).unwrap();
    assert_eq!((output.x, output.y, output.z), (2.0, 3.0, 0.0));
    assert_eq!((input.x, input.y, input.z), (2.0, 4.0, 1.0));
}

#[test]
fn env_exposes_polar_quantities() {
    let k = CompiledKernel::compile("__px = __r; __py = __r2; __pz = __sinA;", &[]).unwrap();
    let mut ctx = Context::seeded(1);
    let mut input = XyzPoint::new(3.0, 4.0, 0.0);
    let mut output = XyzPoint::default();
    k.run(&mut ctx, &mut input, &mut output).unwrap();
    assert!((output.x - 5.0).abs() < 1e-12);
    assert!((output.y - 25.0).abs() < 1e-12);
    assert!((output.z - 0.6).abs() < 1e-12);
}

#[test]
fn for_variation_binds_amount() {
    let v = Variation::by_name("linear", 0.25).unwrap();
    let ctx = Context::seeded(0);
    let k = CompiledKernel::for_variation(&v, &ctx).unwrap();
    assert!(k.slot_count() > ENV_SYMBOLS.len());

    let mut run_ctx = Context::seeded(0);
    let mut input = XyzPoint::new(4.0, -8.0, 0.0);
    let mut output = XyzPoint::default();
    k.run(&mut run_ctx, &mut input, &mut output).unwrap();
    assert_eq!((output.x, output.y), (1.0, -2.0));
}

#[test]
fn scalar_only_functions_have_no_kernel() {
    let v = Variation::by_name("ePush", 1.0).unwrap();
    let err = CompiledKernel::for_variation(&v, &Context::seeded(0)).unwrap_err();
    assert!(matches!(
        err,
        FlameError::UnsupportedCapability { ref name, ref capability }
            if name == "ePush" && capability == "SUPPORTS_GPU"
    ));
}

#[test]
fn compile_errors_map_to_kernel_errors() {
    let err = CompiledKernel::compile("__px += ;", &[]).unwrap_err();
    assert!(matches!(err, FlameError::Kernel(_)));
}

#[test]
fn check_source_reports_offset() {
    assert!(check_source("__px += __x;", &[]).is_ok());
    let err = check_source("__px += nope;", &[]).unwrap_err();
    assert_eq!(err.offset, 8);
    assert!(err.to_string().starts_with("kernel error at byte 8"));
}

#[test]
fn pre_blur_fragment_moves_the_input() {
    let v = Variation::by_name("pre_blur", 1.0).unwrap();
    let k = CompiledKernel::for_variation(&v, &Context::seeded(0)).unwrap();
    let mut ctx = Context::seeded(9);
    let mut input = XyzPoint::new(0.5, 0.5, 0.0);
    let mut output = XyzPoint::default();
    k.run(&mut ctx, &mut input, &mut output).unwrap();
    assert!(input.x != 0.5 || input.y != 0.5);
    assert_eq!((output.x, output.y), (0.0, 0.0));
}
