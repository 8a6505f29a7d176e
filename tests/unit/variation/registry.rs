use super::*;

#[test]
fn names_are_unique_ignoring_case() {
    let names: Vec<&str> = names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable_by_key(|n| n.to_ascii_lowercase());
    sorted.dedup();
    assert_eq!(names.len(), sorted.len());
}

#[test]
fn lookup_is_case_sensitive() {
    assert!(contains("julia3Dq"));
    assert!(!contains("julia3dq"));
    assert!(matches!(
        create("LINEAR"),
        Err(FlameError::UnknownVariation(name)) if name == "LINEAR"
    ));
}

#[test]
fn every_entry_reports_its_registry_name() {
    for name in names() {
        let f = create(name).unwrap();
        assert_eq!(f.name(), name);
    }
    assert_eq!(all().len(), names().count());
}

#[test]
fn kernel_capable_functions_provide_source() {
    let ctx = crate::context::Context::seeded(0);
    for f in all() {
        let has_gpu = f
            .capabilities()
            .contains(crate::variation::Capabilities::SUPPORTS_GPU);
        assert_eq!(f.kernel_source(&ctx).is_some(), has_gpu, "{}", f.name());
    }
}
