use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidateUrl, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// One violated field, addressed by its dotted path in the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accepts a well-formed email address or the empty string.
pub fn email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Accepts an absolute URL or the empty string.
pub fn url_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

pub fn template_reference(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid"))
}

/// Flattens nested validator output into a sorted list of dotted paths,
/// e.g. `content.personal.email`. Every violation is kept.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = child_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(issues) => {
                out.extend(issues.iter().map(|issue| FieldError {
                    field: path.clone(),
                    message: issue
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", issue.code)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}.{index}"), out);
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Body shape
// ────────────────────────────────────────────────────────────────────────────

/// Request bodies whose JSON shape is checked before deserialization.
///
/// `check_shape` records every missing or wrongly typed field at its dotted
/// path and rewrites the offending entry so the body still deserializes,
/// letting the content rules run over everything else in the same pass.
pub trait BodyShape {
    fn check_shape(body: &mut Map<String, Value>, errors: &mut Vec<FieldError>);
}

fn report(errors: &mut Vec<FieldError>, path: &str, message: &str) {
    errors.push(FieldError {
        field: path.to_string(),
        message: message.to_string(),
    });
}

/// Nested path under `prefix`, e.g. `content.personal` + `email`.
pub fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// A string that must be present. A bad entry becomes `""`.
pub fn required_string(
    body: &mut Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
) {
    let message = match body.get(key) {
        Some(Value::String(_)) => return,
        None => "Required",
        Some(_) => "Expected a string",
    };
    report(errors, path, message);
    body.insert(key.to_string(), Value::String(String::new()));
}

/// An optional entry that must satisfy `accepts` when present.
/// `null` counts as absent; a bad entry is dropped.
fn optional(
    body: &mut Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
    accepts: fn(&Value) -> bool,
    message: &str,
) {
    match body.get(key) {
        None => return,
        Some(Value::Null) => {}
        Some(value) if accepts(value) => return,
        Some(_) => report(errors, path, message),
    }
    body.remove(key);
}

pub fn optional_string(body: &mut Map<String, Value>, key: &str, path: &str, errors: &mut Vec<FieldError>) {
    optional(body, key, path, errors, Value::is_string, "Expected a string");
}

pub fn optional_bool(body: &mut Map<String, Value>, key: &str, path: &str, errors: &mut Vec<FieldError>) {
    optional(body, key, path, errors, Value::is_boolean, "Expected a boolean");
}

pub fn optional_list(body: &mut Map<String, Value>, key: &str, path: &str, errors: &mut Vec<FieldError>) {
    optional(body, key, path, errors, Value::is_array, "Expected a list");
}

/// An object that must be present. A bad entry is reported once and replaced
/// by `placeholder`; its children are then not checked, so `None` is returned.
pub fn required_object<'b>(
    body: &'b mut Map<String, Value>,
    key: &str,
    path: &str,
    placeholder: Value,
    errors: &mut Vec<FieldError>,
) -> Option<&'b mut Map<String, Value>> {
    let message = match body.get(key) {
        Some(Value::Object(_)) => None,
        None => Some("Required"),
        Some(_) => Some("Expected an object"),
    };
    if let Some(message) = message {
        report(errors, path, message);
        body.insert(key.to_string(), placeholder);
        return None;
    }
    body.get_mut(key).and_then(Value::as_object_mut)
}

/// An object that may be absent or `null`. A bad entry is reported and dropped.
pub fn optional_object<'b>(
    body: &'b mut Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'b mut Map<String, Value>> {
    optional(body, key, path, errors, Value::is_object, "Expected an object");
    body.get_mut(key).and_then(Value::as_object_mut)
}

/// JSON body extractor that checks shape, deserializes and runs `Validate`
/// before the handler sees the value.
///
/// A body that is not JSON, or not a JSON object, is a `BadRequest`. Every
/// shape and content violation is gathered into one `Validation` error; when a
/// field has both, only the shape violation is kept.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + BodyShape,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let Value::Object(mut body) = raw else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let mut errors = Vec::new();
        T::check_shape(&mut body, &mut errors);

        let value: T = serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if let Err(invalid) = value.validate() {
            for error in flatten_errors(&invalid) {
                if !errors.iter().any(|seen| seen.field == error.field) {
                    errors.push(error);
                }
            }
        }

        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(AppError::Validation(errors));
        }
        Ok(ValidJson(value))
    }
}
