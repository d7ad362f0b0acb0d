//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// A body that is not valid JSON for `T` is a bad request (400); a body that
/// parses but breaks a field rule is a validation error (422).
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Format validation errors as `field: message`, sorted by field name
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(custom(function = "not_blank"))]
        title: String,
        #[validate(length(max = 5, message = "too long"))]
        code: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   \t").is_err());
    }

    #[test]
    fn test_errors_name_their_fields() {
        let form = Form {
            title: " ".to_string(),
            code: "toolong".to_string(),
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "code: too long, title: This field cannot be blank"
        );
    }
}
