use super::*;

#[test]
fn env_slot_constants_match_symbol_table() {
    assert_eq!(ENV_SYMBOLS[SLOT_X as usize], "__x");
    assert_eq!(ENV_SYMBOLS[SLOT_Y as usize], "__y");
    assert_eq!(ENV_SYMBOLS[SLOT_Z as usize], "__z");
    assert_eq!(ENV_SYMBOLS[SLOT_PX as usize], "__px");
    assert_eq!(ENV_SYMBOLS[SLOT_PY as usize], "__py");
    assert_eq!(ENV_SYMBOLS[SLOT_PZ as usize], "__pz");
    assert_eq!(ENV_SYMBOLS[SLOT_PAL as usize], "__pal");
}

#[test]
fn symbols_are_sanitized() {
    assert_eq!(amount_symbol("julia3Dq"), "__julia3Dq");
    assert_eq!(param_symbol("sym_ng17", "Prop. Sep."), "__sym_ng17_Prop__Sep_");
}

#[test]
fn constants_resolve() {
    assert_eq!(constant("M_PI_F"), Some(PI));
    assert_eq!(constant("epsilon"), Some(EPSILON));
    assert_eq!(constant("pi"), None);
}

#[test]
fn bindings_list_amount_then_params() {
    let mut v = Variation::by_name("linearT", 0.5).unwrap();
    v.set_parameter("powY", 3.0).unwrap();
    assert_eq!(
        bindings(&v),
        vec![
            ("__linearT".to_owned(), 0.5),
            ("__linearT_powX".to_owned(), 1.2),
            ("__linearT_powY".to_owned(), 3.0),
        ]
    );
}
