use super::*;

#[test]
fn roles_follow_priority() {
    assert_eq!(Role::from_priority(-3), Role::Pre);
    assert_eq!(Role::from_priority(0), Role::Regular);
    assert_eq!(Role::from_priority(2), Role::Post);
    assert_eq!(Variation::by_name("pre_blur", 1.0).unwrap().role(), Role::Pre);
    assert_eq!(
        Variation::by_name("post_zscale_wf", 1.0).unwrap().role(),
        Role::Post
    );
    assert_eq!(Variation::by_name("linear", 1.0).unwrap().role(), Role::Regular);
}

#[test]
fn capability_helpers() {
    assert!(Capabilities::D3.defines_z());
    assert!(Capabilities::Z_TRANSFORM.defines_z());
    assert!(!(Capabilities::D2 | Capabilities::BLUR).defines_z());
    assert_eq!(
        (Capabilities::D2 | Capabilities::SUPPORTS_GPU).labels(),
        vec!["D2", "SUPPORTS_GPU"]
    );
}

#[test]
fn unknown_parameter_is_rejected_and_state_kept() {
    let mut v = Variation::by_name("linearT", 1.0).unwrap();
    let mut ctx = Context::seeded(0);
    v.init(&mut ctx, &LayerView::default(), &XFormView::default());
    assert!(matches!(
        v.set_parameter("__bogus__", 1.0),
        Err(FlameError::InvalidParameter(_))
    ));
    assert_eq!(v.state(), VariationState::Initialized);
}

#[test]
fn parameters_report_names_and_values() {
    let mut v = Variation::by_name("linearT", 1.0).unwrap();
    v.set_parameter("lT_powX", 2.0).unwrap();
    assert_eq!(v.parameters(), vec![("powX", 2.0), ("powY", 1.2)]);
    assert!(v.func().get_parameter("nope").is_err());
}

#[test]
fn lifecycle_moves_through_states() {
    let mut v = Variation::by_name("idisc", 1.0).unwrap();
    assert_eq!(v.state(), VariationState::Constructed);

    let mut ctx = Context::seeded(0);
    let layer = LayerView::default();
    let xf = XFormView::default();
    v.init(&mut ctx, &layer, &xf);
    assert_eq!(v.state(), VariationState::Initialized);

    let mut input = XyzPoint::new(0.5, 0.5, 0.0);
    let mut out = XyzPoint::default();
    v.apply(&mut ctx, &layer, &xf, &mut input, &mut out);
    assert_eq!(v.state(), VariationState::Active);

    v.set_amount(2.0);
    assert_eq!(v.state(), VariationState::Constructed);
}

#[test]
fn apply_reinitializes_after_edit() {
    let mut v = Variation::by_name("idisc", 1.0).unwrap();
    let mut ctx = Context::seeded(0);
    let layer = LayerView::default();
    let xf = XFormView::default();
    let p = XyzPoint::new(0.0, 1.0, 0.0);

    let mut input = p;
    let mut a = XyzPoint::default();
    v.apply(&mut ctx, &layer, &xf, &mut input, &mut a);

    v.set_amount(2.0);
    let mut input = p;
    let mut b = XyzPoint::default();
    v.apply(&mut ctx, &layer, &xf, &mut input, &mut b);
    assert!((b.y - 2.0 * a.y).abs() < 1e-12);
}

#[test]
fn clone_is_deep() {
    let mut a = Variation::by_name("linearT", 1.0).unwrap();
    let b = a.clone();
    a.set_parameter("powX", 4.0).unwrap();
    assert_eq!(b.func().get_parameter("powX").unwrap(), 1.2);
}
