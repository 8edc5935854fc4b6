use super::*;

#[test]
fn detail_prefers_field_messages() {
    let mut fields = BTreeMap::new();
    fields.insert(
        "audio_file".to_string(),
        vec!["The audio file must be a file of type: mp3.".to_string()],
    );
    fields.insert("title".to_string(), vec!["The title field is required.".to_string()]);
    let err = ApiError::Validation {
        message: Some("The given data was invalid.".to_string()),
        fields,
    };
    assert_eq!(
        err.detail(),
        "The audio file must be a file of type: mp3., The title field is required."
    );
}

#[test]
fn detail_falls_back_in_order() {
    let err = ApiError::Validation {
        message: Some("Too big".to_string()),
        fields: BTreeMap::new(),
    };
    assert_eq!(err.detail(), "Too big");

    let err = ApiError::Network("connection refused".to_string());
    assert_eq!(err.detail(), "connection refused");

    let err = ApiError::Unknown {
        status: Some(500),
        message: None,
    };
    assert_eq!(err.detail(), UNKNOWN_ERROR);

    let err = ApiError::Unknown {
        status: Some(500),
        message: Some("  ".to_string()),
    };
    assert_eq!(err.detail(), UNKNOWN_ERROR);
}
