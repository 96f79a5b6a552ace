//! Client for the AgriGuide backend endpoints.
//!
//! [`BackendClient`] wraps a [`Transport`] and knows the endpoint paths, the
//! JSON content type and the anti-forgery header. Every call returns either a
//! decoded response (which may itself be a server-reported failure) or an
//! [`ApiError`] for transport and decoding problems.

pub mod models;
pub mod transport;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::cookies::{self, CSRF_HEADER};

pub use models::{
    ChatRequest, ChatResponse, DecodeError, LanguagesResponse, PredictionRequest,
    PredictionResponse, TranslateRequest, TranslateResponse,
};
pub use transport::{HttpTransport, Transport, TransportError};

pub const PREDICTION_ENDPOINT: &str = "/api/crop-prediction/";
pub const CHATBOT_ENDPOINT: &str = "/api/chatbot/";
pub const LANGUAGES_ENDPOINT: &str = "/api/languages/";
pub const TRANSLATE_ENDPOINT: &str = "/api/translate/";

/// Why a request produced no usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Transport(TransportError),
    Decode(DecodeError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{e}"),
            Self::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// Typed access to the backend over an arbitrary [`Transport`].
#[derive(Debug)]
pub struct BackendClient<T> {
    transport: T,
    cookies: String,
    csrf_cookie: String,
}

impl<T: Transport> BackendClient<T> {
    /// `cookies` is the session's cookie string (`a=1; csrftoken=...`).
    pub fn new(transport: T, cookies: impl Into<String>) -> Self {
        Self {
            transport,
            cookies: cookies.into(),
            csrf_cookie: cookies::CSRF_COOKIE.to_string(),
        }
    }

    /// Use a different cookie name for the anti-forgery token.
    pub fn with_csrf_cookie(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie = name.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Headers sent with every state-changing request.
    ///
    /// The anti-forgery header is omitted when the cookie is absent.
    pub fn request_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(token) = cookies::get_cookie(&self.cookies, &self.csrf_cookie) {
            headers.push((CSRF_HEADER, token));
        }
        headers
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| TransportError::Network(format!("failed to encode request: {e}")))?;
        let headers = self.request_headers();
        Ok(self.transport.post_json(path, &headers, &body)?)
    }

    /// `POST /api/crop-prediction/`.
    pub fn predict_crop(&self, request: &PredictionRequest) -> Result<PredictionResponse, ApiError> {
        let value = self.post(PREDICTION_ENDPOINT, request)?;
        Ok(PredictionResponse::from_value(&value)?)
    }

    /// `POST /api/chatbot/`.
    pub fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let value = self.post(CHATBOT_ENDPOINT, request)?;
        Ok(ChatResponse::from_value(&value)?)
    }

    /// `GET /api/languages/`.
    pub fn languages(&self) -> Result<LanguagesResponse, ApiError> {
        let value = self.transport.get_json(LANGUAGES_ENDPOINT)?;
        Ok(LanguagesResponse::from_value(&value)?)
    }

    /// `POST /api/translate/`.
    pub fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError> {
        let value = self.post(TRANSLATE_ENDPOINT, request)?;
        Ok(TranslateResponse::from_value(&value)?)
    }
}
