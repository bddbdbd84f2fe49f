//! Tests for range separator validation.

use timespan_core::{validate_separator, Separator, TimespanError};

#[test]
fn every_reserved_character_is_rejected() {
    for c in ['Y', 'y', 'M', 'D', 'd', 'H', 'h', 'm', 'S', 's', '-', '+', 'P', 'p', 'T', 't'] {
        let sep = c.to_string();
        assert_eq!(
            validate_separator(&sep),
            Err(TimespanError::InvalidSeparator(sep.clone())),
            "{sep} should be rejected"
        );
    }
}

#[test]
fn reserved_characters_inside_other_separators_are_rejected() {
    for sep in ["/T", "ms", "<M>", "..d", "x+", "--", "|-|", "PT", "::s"] {
        assert!(validate_separator(sep).is_err(), "{sep} should be rejected");
    }
}

#[test]
fn digits_and_blank_separators_are_rejected() {
    for sep in ["1", "/0/", "", " "] {
        assert!(validate_separator(sep).is_err(), "{sep:?} should be rejected");
    }
}

#[test]
fn plain_separators_are_accepted() {
    for sep in ["/", "TO", "to", "..", "|", " until ", "~"] {
        assert!(validate_separator(sep).is_ok(), "{sep:?} should be accepted");
    }
}

#[test]
fn separator_type_validates_on_construction() {
    assert_eq!("TO".parse::<Separator>().unwrap().as_str(), "TO");
    assert!("T".parse::<Separator>().is_err());
    assert_eq!(Separator::default().to_string(), "/");
}

#[test]
fn error_message_names_the_separator() {
    let err = validate_separator("d").unwrap_err().to_string();
    assert!(err.contains("'d'"), "got: {err}");
}
