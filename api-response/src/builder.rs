//! Fluent builder for JSON response envelopes
//!
//! Every response produced by this crate shares one shape:
//!
//! ```json
//! { "message": "...", "body": { ... }, "errors": { ... } }
//! ```
//!
//! Keys whose value is absent are left out of the output entirely rather than
//! written as `null`. When no explicit message is set, the message is taken
//! from the first entry of `errors`. That keeps validation failures readable
//! by clients that only look at `message`.
//!
//! ## Example
//!
//! ```rust
//! use api_response::builder::ResponseBuilder;
//! use axum::http::StatusCode;
//! use serde_json::json;
//!
//! let response = ResponseBuilder::new()
//!     .errors(json!({ "email": ["The email field is required."] }))
//!     .as_error()
//!     .send();
//!
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//! assert_eq!(
//!     response.envelope().message.as_deref(),
//!     Some("The email field is required.")
//! );
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Envelope
// ============================================================================

/// The JSON object returned to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Human-readable summary of the outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Error details or validation messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl Envelope {
    /// Check if no key would be serialized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.body.is_none() && self.errors.is_none()
    }
}

/// A finished envelope paired with its HTTP status code
///
/// Returned by [`ResponseBuilder::send`]. Implements `IntoResponse`, so it can
/// be returned straight from an axum handler.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeResponse {
    envelope: Envelope,
    status: StatusCode,
}

impl EnvelopeResponse {
    /// HTTP status code of the response
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The envelope that will be serialized as the body
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Split into the envelope and the status code
    #[must_use]
    pub fn into_parts(self) -> (Envelope, StatusCode) {
        (self.envelope, self.status)
    }
}

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates data, message, errors and status for a single response
///
/// Setters take and return the builder by value so calls chain. [`send`]
/// consumes the builder, so one builder yields exactly one envelope.
///
/// [`send`]: ResponseBuilder::send
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a response builder does nothing until `send` is called"]
pub struct ResponseBuilder {
    data: Option<Value>,
    message: Option<String>,
    errors: Option<Value>,
    status: StatusCode,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
            errors: None,
            status: StatusCode::OK,
        }
    }
}

impl ResponseBuilder {
    /// Create a builder with no data, no message, no errors and status 200
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response data. JSON `null` clears it.
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = non_null(data.into());
        self
    }

    /// Serialize `data` and set it as the response data
    pub fn try_data<T>(self, data: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data)?;
        Ok(self.data(value))
    }

    /// Set the response message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set or clear the response message
    pub fn message_opt(mut self, message: Option<impl Into<String>>) -> Self {
        self.message = message.map(Into::into);
        self
    }

    /// Set error details or validation messages. JSON `null` clears them.
    pub fn errors(mut self, errors: impl Into<Value>) -> Self {
        self.errors = non_null(errors.into());
        self
    }

    /// Set the response status code
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Mark this as a client error response
    ///
    /// Moves a 200 status to 400. Any other status was chosen on purpose and
    /// is kept.
    pub fn as_error(mut self) -> Self {
        if self.status == StatusCode::OK {
            self.status = StatusCode::BAD_REQUEST;
        }
        self
    }

    /// Mark this as a server error response
    pub fn as_server_error(mut self) -> Self {
        self.status = StatusCode::INTERNAL_SERVER_ERROR;
        self
    }

    /// Status code the response will be sent with
    #[must_use]
    pub fn current_status(&self) -> StatusCode {
        self.status
    }

    /// Resolve the message that will be sent
    ///
    /// An explicit message always wins, even when errors are present.
    /// Otherwise the first error is used. `errors` is read as a list, where an
    /// object yields its values in insertion order and a scalar is a list of
    /// one. If that first entry is itself a list (several messages for one
    /// field), its first element is taken.
    #[must_use]
    pub fn first_message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }

        let field_error = first_of(self.errors.as_ref()?)?;

        match field_error {
            Value::Array(_) | Value::Object(_) => first_of(field_error).and_then(scalar_text),
            scalar => scalar_text(scalar),
        }
    }

    /// Build the envelope and pair it with the status code
    pub fn send(self) -> EnvelopeResponse {
        let message = self.first_message();
        let envelope = Envelope {
            message,
            body: self.data,
            errors: self.errors,
        };

        tracing::debug!(
            status = self.status.as_u16(),
            has_message = envelope.message.is_some(),
            has_body = envelope.body.is_some(),
            has_errors = envelope.errors.is_some(),
            "Sending response envelope"
        );

        EnvelopeResponse {
            envelope,
            status: self.status,
        }
    }
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

/// First element of `value` read as a list; a scalar is its own first element
fn first_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        Value::Object(fields) => fields.values().next(),
        scalar => Some(scalar),
    }
}

/// Text form of a scalar error; `true` reads as `"1"` and `false` as `""`
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
