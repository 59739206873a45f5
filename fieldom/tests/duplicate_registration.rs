use fieldom::{
    FieldError, FieldKind, FieldRegistration, FieldResult, Params, TextOptions, construct_field, is_registered,
    registered_field_types,
};

fn build_shadow_text(_params: &mut Params) -> FieldResult<FieldKind> {
    Ok(FieldKind::Text(TextOptions::default()))
}

fieldom::inventory::submit! { FieldRegistration::new("text", build_shadow_text) }

#[test]
fn a_name_claimed_twice_cannot_be_resolved() {
    let err = construct_field("text").unwrap_err();
    assert!(matches!(err, FieldError::Config { .. }));
    assert!(err.to_string().contains("registered more than once"));

    assert!(!is_registered("text"));
    assert_eq!(registered_field_types().filter(|registration| registration.name == "text").count(), 2);

    assert!(is_registered("keyword"));
    assert_eq!(construct_field("keyword").unwrap().name(), "keyword");
}
