//! Attribute characteristics tests.
//!
//! Covers `required`, `canonicalValues`, and how `mutability` and `returned`
//! decide whether an attribute is rendered for a client or a server.

use crate::common::{attribute, attribute_with};
use scim_kit::{AttributeValue, DataType, Mode, Mutability, Returned, ValidationError};
use serde_json::json;

#[test]
fn test_required_attribute_blank_is_invalid() {
    let mut user_name = attribute_with("userName", DataType::String, |t| t.set_required(true));
    assert!(!user_name.is_valid());
    assert_eq!(user_name.errors().get("userName"), &[ValidationError::Required]);
    assert_eq!(user_name.errors().full_messages(), vec!["userName is required"]);
}

#[test]
fn test_required_multi_valued_empty_list_is_invalid() {
    let mut emails = attribute_with("emails", DataType::String, |t| {
        t.set_multi_valued(true);
        t.set_required(true);
    });
    assert!(!emails.is_valid());

    emails.assign(vec!["a@x.com"]);
    assert!(emails.is_valid());

    emails.assign(AttributeValue::Null);
    assert!(!emails.is_valid());
    assert_eq!(emails.errors().get("emails"), &[ValidationError::Required]);
}

#[test]
fn test_validate_returns_errors() {
    let mut user_name = attribute_with("userName", DataType::String, |t| t.set_required(true));
    let errors = user_name.validate().expect_err("blank required attribute");
    assert!(errors.contains("userName"));

    user_name.assign("bjensen");
    assert!(user_name.validate().is_ok());
}

#[test]
fn test_canonical_values_accept_exact_members() {
    let mut kind = attribute_with("type", DataType::String, |t| {
        t.set_canonical_values(["work", "home", "other"]);
    });
    for member in ["work", "home", "other"] {
        kind.assign(member);
        assert!(kind.is_valid(), "{} should be canonical", member);
    }
}

#[test]
fn test_canonical_values_reject_other_strings() {
    let mut kind = attribute_with("type", DataType::String, |t| {
        t.set_canonical_values(["work", "home", "other"]);
    });
    for text in ["Work", "office", "", " home"] {
        kind.assign(text);
        assert!(!kind.is_valid(), "{:?} should not be canonical", text);
        assert!(matches!(
            kind.errors().get("type"),
            [ValidationError::NotCanonical { .. }]
        ));
    }
}

#[test]
fn test_canonical_values_apply_to_each_item() {
    let mut kinds = attribute_with("types", DataType::String, |t| {
        t.set_multi_valued(true);
        t.set_canonical_values(["work", "home"]);
    });
    kinds.assign(vec!["work", "mars", "venus"]);
    assert!(!kinds.is_valid());
    assert_eq!(kinds.errors().get("types").len(), 2);
}

#[test]
fn test_unconstrained_string_accepts_anything() {
    let mut nick_name = attribute("nickName", DataType::String);
    nick_name.assign("Babs");
    assert!(nick_name.is_valid());
}

#[test]
fn test_read_write_rendered_in_both_modes() {
    let mut display_name = attribute("displayName", DataType::String);
    assert!(display_name.is_renderable(Mode::Server));
    assert!(display_name.is_renderable(Mode::Client));

    display_name.assign("Babs Jensen");
    assert_eq!(display_name.render(Mode::Client), Some(json!("Babs Jensen")));
}

#[test]
fn test_read_only_hidden_from_client() {
    let mut id = attribute_with("id", DataType::String, |t| {
        t.set_mutability(Mutability::ReadOnly).unwrap();
    });
    id.assign("2819c223");

    assert!(id.is_renderable(Mode::Server));
    assert!(!id.is_renderable(Mode::Client));
    assert_eq!(id.render(Mode::Client), None);
    assert_eq!(id.as_json(Mode::Client), json!({}));
}

#[test]
fn test_write_only_sent_by_client_only_when_assigned() {
    let mut password = attribute_with("password", DataType::String, |t| {
        t.set_mutability("writeOnly").unwrap();
    });
    assert!(!password.is_renderable(Mode::Client));

    password.assign("t1meMa$heen");
    assert!(password.is_renderable(Mode::Client));
    assert_eq!(password.as_json(Mode::Client), json!({"password": "t1meMa$heen"}));
    assert!(!password.is_renderable(Mode::Server));
}

#[test]
fn test_immutable_rendered_in_both_modes() {
    let immutable = attribute_with("userType", DataType::String, |t| {
        t.set_mutability(Mutability::Immutable).unwrap();
    });
    assert!(immutable.is_renderable(Mode::Server));
    assert!(immutable.is_renderable(Mode::Client));
}

#[test]
fn test_returned_never_hidden_regardless_of_mode() {
    for mutability in [
        Mutability::ReadOnly,
        Mutability::ReadWrite,
        Mutability::Immutable,
        Mutability::WriteOnly,
    ] {
        let mut secret = attribute_with("secret", DataType::String, |t| {
            t.set_mutability(mutability).unwrap();
            t.set_returned(Returned::Never).unwrap();
        });
        secret.assign("hunter2");
        assert!(!secret.is_renderable(Mode::Server), "{} on server", mutability);
        assert!(!secret.is_renderable(Mode::Client), "{} on client", mutability);
    }
}

#[test]
fn test_returned_always_and_request_follow_mutability() {
    let always = attribute_with("id", DataType::String, |t| {
        t.set_returned("always").unwrap();
    });
    assert!(always.is_renderable(Mode::Server));

    let request = attribute_with("photo", DataType::Reference, |t| {
        t.set_returned(Returned::Request).unwrap();
    });
    assert!(request.is_renderable(Mode::Server));
    assert!(request.is_renderable(Mode::Client));
}
