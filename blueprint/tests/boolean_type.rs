use podeng::{Boolean, BlueprintError, HandlerRef, Schema, SetupError, types};
use serde_json::json;

#[test]
fn test_valid_list_with_case_folding() {
    let obj = podeng::object(
        Schema::new()
            .field("active", types::boolean(&[json!(["Yes", "Y"]), json!({ "caseSensitive": false })]).unwrap())
            .field("strict", types::boolean(&[json!(["Yes"])]).unwrap()),
    )
    .unwrap();

    let outcome = obj.normalize(&json!({ "active": "yes", "strict": "yes" })).unwrap();
    assert!(!outcome.has_error);
    assert_eq!(outcome.value, json!({ "active": true, "strict": false }));

    assert_eq!(
        obj.call(&json!({ "active": "Y", "strict": true })).unwrap(),
        json!({ "active": true, "strict": true })
    );
}

#[test]
fn test_valid_and_invalid_lists() {
    let obj = podeng::object(
        Schema::new().field("flag", types::boolean(&[json!(["on"]), json!(["off"])]).unwrap()),
    )
    .unwrap();
    assert_eq!(obj.call(&json!({ "flag": "on" })).unwrap(), json!({ "flag": true }));
    assert_eq!(obj.call(&json!({ "flag": "off" })).unwrap(), json!({ "flag": false }));
    assert_eq!(obj.call(&json!({ "flag": "maybe" })).unwrap(), json!({ "flag": false }));
}

#[test]
fn test_invalid_list_only() {
    let obj = podeng::object(
        Schema::new().field("flag", types::boolean(&[json!({ "invalidList": ["no", 0] })]).unwrap()),
    )
    .unwrap();
    assert_eq!(obj.call(&json!({ "flag": "no" })).unwrap(), json!({ "flag": false }));
    assert_eq!(obj.call(&json!({ "flag": "sure" })).unwrap(), json!({ "flag": true }));
}

#[test]
fn test_without_lists_non_booleans_fail() {
    let obj = podeng::object(Schema::new().field("flag", HandlerRef::factory(Boolean::new))).unwrap();
    let outcome = obj.normalize(&json!({ "flag": "true" })).unwrap();
    assert!(outcome.has_error);
    assert_eq!(outcome.value, json!({ "flag": null }));
    assert_eq!(
        outcome.errors.as_object().and_then(|e| e.get("flag")).map(String::as_str),
        Some("failed to parse flag as a bool type")
    );
}

#[test]
fn test_normalize_nil_without_lists() {
    let obj = podeng::object(
        Schema::new().field("flag", types::boolean(&[json!({ "normalizeNil": true })]).unwrap()),
    )
    .unwrap();

    let outcome = obj.normalize(&json!({ "flag": "anything" })).unwrap();
    assert!(!outcome.has_error);
    assert_eq!(outcome.value, json!({ "flag": true }));

    let outcome = obj.normalize(&json!({ "flag": false })).unwrap();
    assert!(!outcome.has_error);
    assert_eq!(outcome.value, json!({ "flag": false }));

    let outcome = obj.normalize(&json!({ "flag": null })).unwrap();
    assert!(outcome.has_error);
    assert_eq!(outcome.value, json!({ "flag": false }));
}

#[test]
fn test_bad_setups() {
    for params in [vec![json!([])], vec![json!({ "unknown": 1 })], vec![json!(["a"]), json!([])]] {
        let result = podeng::object(Schema::new().field(
            "flag",
            HandlerRef::try_factory(move || types::boolean(&params)),
        ));
        match result {
            Err(err @ BlueprintError::Setup(SetupError::InvalidSetup("bool"))) => {
                assert_eq!(err.to_string(), "Invalid setup for \"bool\" type");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[test]
fn test_validate_messages() {
    let obj = podeng::object(
        Schema::new()
            .field("listed", types::boolean(&[json!(["yes"])]).unwrap())
            .field("nil", types::boolean(&[json!({ "normalizeNil": true })]).unwrap()),
    )
    .unwrap();

    let report = obj.validate(&json!({ "listed": "nope" })).unwrap();
    assert!(!report.valid);
    let errors = report.errors.as_object().unwrap();
    assert_eq!(
        errors.get("listed").unwrap(),
        &vec!["Value of \"listed\" is not an accepted value".to_string()]
    );
    assert_eq!(errors.get("nil").unwrap(), &vec!["Nil value identified for \"nil\"".to_string()]);

    let report = obj.validate(&json!({ "listed": false, "nil": true })).unwrap();
    assert!(report.valid);
    assert!(report.errors.is_empty());
}
