//! Validation helpers for DTOs.

use serde::{Deserialize, Deserializer, de::Error as _};
use validator::{ValidationError, ValidationErrors};

use crate::util::parse_timestamp;

/// Rejects empty or whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Accepts a blank value (treated as absent) or an RFC 3339 timestamp.
pub fn validate_optional_timestamp(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || parse_timestamp(value).is_ok() {
        return Ok(());
    }

    let mut err = ValidationError::new("timestamp_format");
    err.message = Some(format!("`{value}` is not an RFC 3339 timestamp").into());
    Err(err)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept a JSON number or a numeric string; `null` and blank strings count as absent.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("`{raw}` is not a number")))
        }
    }
}

/// Flatten every field error into one message, fields sorted by name so the
/// output is stable.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for err in field_errors.iter() {
            let message = match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", err.code),
            };
            entries.push((field.to_string(), message));
        }
    }
    entries.sort();

    if entries.is_empty() {
        return "Invalid request".into();
    }

    entries
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("abc").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn optional_timestamp_accepts_blank_or_rfc3339() {
        assert!(validate_optional_timestamp("").is_ok());
        assert!(validate_optional_timestamp("2024-05-01T20:00:00Z").is_ok());
        assert!(validate_optional_timestamp("2024-05-01T20:00:00+02:00").is_ok());
        assert!(validate_optional_timestamp("next friday").is_err());
    }

    #[test]
    fn every_field_is_listed_in_field_order() {
        let mut errors = ValidationErrors::new();
        let mut item = ValidationError::new("blank");
        item.message = Some("Missing itemId".into());
        let mut voter = ValidationError::new("blank");
        voter.message = Some("Missing voterId".into());
        errors.add("voterId", voter);
        errors.add("itemId", item);

        assert_eq!(
            describe_validation_errors(&errors),
            "Missing itemId; Missing voterId"
        );
    }

    #[derive(Debug, Deserialize)]
    struct Amount {
        #[serde(default, deserialize_with = "lenient_number")]
        value: Option<f64>,
    }

    fn amount(json: &str) -> Result<Option<f64>, serde_json::Error> {
        serde_json::from_str::<Amount>(json).map(|amount| amount.value)
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        assert_eq!(amount(r#"{"value": 20}"#).unwrap(), Some(20.0));
        assert_eq!(amount(r#"{"value": 12.5}"#).unwrap(), Some(12.5));
        assert_eq!(amount(r#"{"value": " 20 "}"#).unwrap(), Some(20.0));
        assert_eq!(amount(r#"{"value": ""}"#).unwrap(), None);
        assert_eq!(amount(r#"{"value": null}"#).unwrap(), None);
        assert_eq!(amount("{}").unwrap(), None);
        assert!(amount(r#"{"value": "twenty"}"#).is_err());
        assert!(amount(r#"{"value": true}"#).is_err());
    }

    #[test]
    fn errors_without_message_name_the_field() {
        let mut errors = ValidationErrors::new();
        errors.add("count", ValidationError::new("range"));
        assert_eq!(describe_validation_errors(&errors), "count is invalid (range)");
    }
}
