//! Wire types for the AgriGuide backend.
//!
//! Requests are plain `Serialize` structs. Responses arrive as loosely
//! shaped JSON objects (`{crop, description}` vs `{error}`), so each response
//! type is decoded explicitly from a [`serde_json::Value`] into a tagged enum,
//! and a payload matching neither shape is rejected with a [`DecodeError`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/crop-prediction/`.
///
/// Every field is the raw text of its input control. Nothing is trimmed,
/// parsed or range-checked on this side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub temperature: String,
    pub humidity: String,
    pub ph: String,
    pub rainfall: String,
}

impl PredictionRequest {
    /// A field by its input id.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "nitrogen" => &self.nitrogen,
            "phosphorus" => &self.phosphorus,
            "potassium" => &self.potassium,
            "temperature" => &self.temperature,
            "humidity" => &self.humidity,
            "ph" => &self.ph,
            "rainfall" => &self.rainfall,
            _ => return None,
        };
        Some(value)
    }

    /// Mutable access to a field by its input id.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "nitrogen" => Some(&mut self.nitrogen),
            "phosphorus" => Some(&mut self.phosphorus),
            "potassium" => Some(&mut self.potassium),
            "temperature" => Some(&mut self.temperature),
            "humidity" => Some(&mut self.humidity),
            "ph" => Some(&mut self.ph),
            "rainfall" => Some(&mut self.rainfall),
            _ => None,
        }
    }
}

/// Body of `POST /api/chatbot/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub language: String,
}

/// Body of `POST /api/translate/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Decoded reply of the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionResponse {
    Recommendation { crop: String, description: String },
    Failure { error: String },
}

impl PredictionResponse {
    /// Decode a payload: `crop` wins over `error`; neither is malformed.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let object = expect_object(value)?;
        if let Some(crop) = field_text(object, "crop") {
            return Ok(Self::Recommendation {
                crop,
                description: field_text(object, "description").unwrap_or_default(),
            });
        }
        if let Some(error) = field_text(object, "error") {
            return Ok(Self::Failure { error });
        }
        Err(DecodeError::MissingFields {
            expected: "crop or error",
        })
    }
}

/// Decoded reply of the chatbot endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatResponse {
    Reply { response: String },
    Failure { error: String },
}

impl ChatResponse {
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let object = expect_object(value)?;
        if let Some(response) = field_text(object, "response") {
            return Ok(Self::Reply { response });
        }
        if let Some(error) = field_text(object, "error") {
            return Ok(Self::Failure { error });
        }
        Err(DecodeError::MissingFields {
            expected: "response or error",
        })
    }
}

/// Decoded reply of `GET /api/languages/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguagesResponse {
    Languages(BTreeMap<String, String>),
    Failure { error: String },
}

impl LanguagesResponse {
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let object = expect_object(value)?;
        if let Some(languages) = object.get("languages").and_then(Value::as_object) {
            let map = languages
                .iter()
                .filter_map(|(code, name)| Some((code.clone(), name.as_str()?.to_string())))
                .collect();
            return Ok(Self::Languages(map));
        }
        if let Some(error) = field_text(object, "error") {
            return Ok(Self::Failure { error });
        }
        Err(DecodeError::MissingFields {
            expected: "languages or error",
        })
    }
}

/// Successful translation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub original_text: String,
    pub translated_text: String,
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
}

/// Decoded reply of `POST /api/translate/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateResponse {
    Translated(Translation),
    Failure { error: String },
}

impl TranslateResponse {
    /// A payload with `success: false` (or only an `error`) is a failure even
    /// though the backend still echoes `translated_text`.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let object = expect_object(value)?;
        let succeeded = object
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if succeeded && object.contains_key("translated_text") {
            let translation: Translation = serde_json::from_value(value.clone())
                .map_err(|e| DecodeError::InvalidField(e.to_string()))?;
            return Ok(Self::Translated(translation));
        }
        if let Some(error) = field_text(object, "error") {
            return Ok(Self::Failure { error });
        }
        Err(DecodeError::MissingFields {
            expected: "translated_text or error",
        })
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

/// A response body that matches none of the endpoint's shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    NotAnObject,
    MissingFields { expected: &'static str },
    InvalidField(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "response is not a JSON object"),
            Self::MissingFields { expected } => {
                write!(f, "unexpected response: expected {expected}")
            }
            Self::InvalidField(msg) => write!(f, "invalid response field: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

fn expect_object(value: &Value) -> Result<&serde_json::Map<String, Value>, DecodeError> {
    value.as_object().ok_or(DecodeError::NotAnObject)
}

/// Text of a field that counts as "present".
///
/// Missing, `null`, `false`, zero and empty-string fields are absent. Strings are
/// taken verbatim; other JSON values use their compact JSON text.
fn field_text(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
