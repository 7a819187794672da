//! Response helpers for common API outcomes
//!
//! [`ApiResponse`] wraps [`ResponseBuilder`] for the cases almost every
//! endpoint needs:
//!
//! - **success** - data and/or message, 200 by default
//! - **error** - errors and/or message, 400 by default
//! - **pagination** - a page of mapped items plus its metadata
//! - **created** / **updated** / **destroyed** - resource lifecycle
//!   responses with a generated, localized message
//!
//! `success`, `error` and `builder` need nothing but their arguments. The
//! other helpers read the translator and transformer registry held by an
//! `ApiResponse` value. That value is cheap to clone and is meant to live in
//! axum state.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use api_response::prelude::*;
//!
//! async fn create_user(
//!     State(api): State<ApiResponse>,
//!     Json(input): Json<NewUser>,
//! ) -> Result<EnvelopeResponse> {
//!     let user = store_user(input).await?;
//!     Ok(api.created(Some(serde_json::to_value(user)?), Some("User"), None, false))
//! }
//!
//! async fn list_users(State(api): State<ApiResponse>) -> Result<EnvelopeResponse> {
//!     let page = LengthAwarePaginator::new(load_users().await, 42, 20, 1);
//!     api.pagination(&page, Mapper::named("UserResource"))
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Map, Value};

use crate::builder::{EnvelopeResponse, ResponseBuilder};
use crate::config::Config;
use crate::error::Result;
use crate::messages::{MessageCatalog, MessageTemplates, Translator};
use crate::pagination::Paginated;
use crate::resources::{Mapper, Resource, TransformerRegistry};

/// Entry points for building envelope responses
#[derive(Clone)]
pub struct ApiResponse {
    translator: Arc<dyn Translator>,
    transformers: TransformerRegistry,
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self::new(Arc::new(MessageCatalog::from_templates(
            &MessageTemplates::default(),
        )))
    }
}

impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("transformers", &self.transformers)
            .finish_non_exhaustive()
    }
}

impl ApiResponse {
    /// Create helpers that phrase messages with `translator`
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            transformers: TransformerRegistry::new(),
        }
    }

    /// Create helpers using the message templates from `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(MessageCatalog::from_templates(&config.messages)))
    }

    /// Replace the translator
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Replace the transformer registry used by [`Mapper::Named`]
    #[must_use]
    pub fn with_transformers(mut self, transformers: TransformerRegistry) -> Self {
        self.transformers = transformers;
        self
    }

    /// Register a [`Resource`] for [`Mapper::Named`] lookups
    #[must_use]
    pub fn with_resource<R: Resource + 'static>(mut self) -> Self {
        self.transformers.register::<R>();
        self
    }

    /// Transformers available to [`Mapper::Named`]
    #[must_use]
    pub fn transformers(&self) -> &TransformerRegistry {
        &self.transformers
    }

    /// Start a fresh response builder
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Successful response carrying `data` and/or `message`
    ///
    /// Pass `StatusCode::OK` for the conventional status.
    pub fn success(
        data: Option<Value>,
        message: Option<&str>,
        status: StatusCode,
    ) -> EnvelopeResponse {
        Self::builder()
            .message_opt(message)
            .data(data.unwrap_or(Value::Null))
            .status(status)
            .send()
    }

    /// Error response carrying `errors` and/or `message`
    ///
    /// Pass `StatusCode::BAD_REQUEST` for the conventional status. Without a
    /// message, the first error becomes the message.
    pub fn error(
        errors: Option<Value>,
        message: Option<&str>,
        status: StatusCode,
    ) -> EnvelopeResponse {
        Self::builder()
            .message_opt(message)
            .errors(errors.unwrap_or(Value::Null))
            .status(status)
            .send()
    }

    /// Paginated response
    ///
    /// The body is `{ "data": [...], "pagination": {...} }`. `data` holds the
    /// page items after `mapper` is applied. `pagination` holds every
    /// metadata field except `data`. The status is always 200 and no message
    /// is set.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMapper`](crate::error::Error::InvalidMapper) when a
    /// named mapper is not registered.
    /// [`Error::Serialization`](crate::error::Error::Serialization) when
    /// items cannot be serialized.
    pub fn pagination<P>(
        &self,
        paginated: &P,
        mapper: Mapper<P::Item>,
    ) -> Result<EnvelopeResponse>
    where
        P: Paginated,
    {
        let items = mapper.apply(paginated.items(), &self.transformers)?;

        let meta: Map<String, Value> = paginated
            .to_map()?
            .into_iter()
            .filter(|(key, _)| key != "data")
            .collect();

        tracing::debug!(items = items.len(), "Building paginated response");

        let mut body = Map::new();
        body.insert("data".into(), Value::Array(items));
        body.insert("pagination".into(), Value::Object(meta));

        Ok(Self::builder().data(body).send())
    }

    /// 201 response for a newly created resource
    ///
    /// Without a message, one is generated from `attribute`, e.g. "User created".
    pub fn created(
        &self,
        data: Option<Value>,
        attribute: Option<&str>,
        message: Option<&str>,
        plural: bool,
    ) -> EnvelopeResponse {
        let message = self.message_or("created", attribute, message, plural);
        Self::success(data, Some(&message), StatusCode::CREATED)
    }

    /// 200 response for an updated resource
    ///
    /// Without a message, one is generated from `attribute`, e.g. "User updated".
    pub fn updated(
        &self,
        data: Option<Value>,
        attribute: Option<&str>,
        message: Option<&str>,
        plural: bool,
    ) -> EnvelopeResponse {
        let message = self.message_or("updated", attribute, message, plural);
        Self::success(data, Some(&message), StatusCode::OK)
    }

    /// Response for a delete operation
    ///
    /// When `condition` holds, this is a 200 with `message` or a generated
    /// "deleted" phrase. Otherwise it is a 400 saying the resource was not
    /// found. The custom message only applies to the success case.
    pub fn destroyed(
        &self,
        condition: bool,
        attribute: Option<&str>,
        message: Option<&str>,
        plural: bool,
    ) -> EnvelopeResponse {
        if condition {
            let message = self.message_or("deleted", attribute, message, plural);
            return Self::success(None, Some(&message), StatusCode::OK);
        }

        let message = self.resource_message("not_found", attribute, plural);
        Self::error(None, Some(&message), StatusCode::BAD_REQUEST)
    }

    /// Localized phrase for `action` applied to `attribute`
    ///
    /// Looks up `"{action}.singular"` or `"{action}.plural"` and substitutes
    /// `:attribute`. Without an attribute, the translated
    /// `"attribute.singular"` / `"attribute.plural"` is used.
    #[must_use]
    pub fn resource_message(&self, action: &str, attribute: Option<&str>, plural: bool) -> String {
        let number = if plural { "plural" } else { "singular" };

        let attribute = match attribute {
            Some(attribute) => attribute.to_string(),
            None => self
                .translator
                .translate(&format!("attribute.{number}"), &[]),
        };

        self.translator
            .translate(&format!("{action}.{number}"), &[("attribute", &attribute)])
    }

    fn message_or(
        &self,
        action: &str,
        attribute: Option<&str>,
        message: Option<&str>,
        plural: bool,
    ) -> String {
        match message {
            Some(message) => message.to_string(),
            None => self.resource_message(action, attribute, plural),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pagination::{CursorPaginator, LengthAwarePaginator, SimplePaginator};
    use axum::{
        body::Body,
        extract::{Path, State},
        http::Request,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    struct FooResource;

    impl Resource for FooResource {
        const NAME: &'static str = "FooResource";

        fn to_value(_item: Value) -> Value {
            json!({
                "id": 1,
                "name": "John Doe",
                "email": "john@example.com",
                "created_at": "2024-01-01 00:00:00",
            })
        }
    }

    fn body_json(response: &EnvelopeResponse) -> Value {
        serde_json::to_value(response.envelope()).unwrap()
    }

    // --- success ---

    #[test]
    fn test_success_with_message_only() {
        let response = ApiResponse::success(None, Some("SuccessFeature message"), StatusCode::OK);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response), json!({ "message": "SuccessFeature message" }));
    }

    #[test]
    fn test_success_with_data_only() {
        let response = ApiResponse::success(Some(json!({ "key": "value" })), None, StatusCode::OK);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response), json!({ "body": { "key": "value" } }));
    }

    #[test]
    fn test_success_with_data_and_message() {
        let response = ApiResponse::success(
            Some(json!({ "key": "value" })),
            Some("SuccessFeature message"),
            StatusCode::OK,
        );
        assert_eq!(
            body_json(&response),
            json!({ "message": "SuccessFeature message", "body": { "key": "value" } })
        );
    }

    #[test]
    fn test_success_with_custom_status() {
        let response =
            ApiResponse::success(None, Some("Created successfully"), StatusCode::CREATED);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(&response), json!({ "message": "Created successfully" }));
    }

    // --- error ---

    #[test]
    fn test_error_with_message_only() {
        let response = ApiResponse::error(None, Some("Error message"), StatusCode::BAD_REQUEST);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&response), json!({ "message": "Error message" }));
    }

    #[test]
    fn test_error_with_validation_errors() {
        let errors = json!({
            "email": ["The email field is required."],
            "password": ["The password field is required."],
        });
        let response = ApiResponse::error(Some(errors.clone()), None, StatusCode::BAD_REQUEST);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response),
            json!({ "message": "The email field is required.", "errors": errors })
        );
    }

    #[test]
    fn test_error_with_scalar_field_errors() {
        let errors = json!({
            "email": "The email field is required.",
            "password": "The password field is required.",
        });
        let response = ApiResponse::error(Some(errors.clone()), None, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response),
            json!({ "message": "The email field is required.", "errors": errors })
        );
    }

    #[test]
    fn test_error_with_custom_status() {
        let response = ApiResponse::error(None, Some("Not Found"), StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&response), json!({ "message": "Not Found" }));
    }

    #[test]
    fn test_error_message_wins_over_errors() {
        let response = ApiResponse::error(
            Some(json!({ "email": ["required"] })),
            Some("Check your input"),
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(response.envelope().message.as_deref(), Some("Check your input"));
        assert!(response.envelope().errors.is_some());
    }

    // --- pagination ---

    #[test]
    fn test_pagination_length_aware() {
        let page = LengthAwarePaginator::new(vec!["item1", "item2"], 2, 1, 1);
        let response = ApiResponse::default().pagination(&page, Mapper::None).unwrap();

        let body = response.envelope().body.clone().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.envelope().message.is_none());
        assert_eq!(body["data"], json!(["item1", "item2"]));
        assert_eq!(body["pagination"]["total"], 2);
        assert!(body["pagination"].get("data").is_none());
    }

    #[test]
    fn test_pagination_cursor() {
        let page = CursorPaginator::new(vec!["item1", "item2"], 2).with_next_cursor("abc");
        let response = ApiResponse::default().pagination(&page, Mapper::None).unwrap();

        let body = response.envelope().body.clone().unwrap();
        assert_eq!(body["data"], json!(["item1", "item2"]));
        assert_eq!(body["pagination"]["next_cursor"], "abc");
        assert!(body["pagination"].get("data").is_none());
    }

    #[test]
    fn test_pagination_callable_mapper() {
        let page = SimplePaginator::new(vec!["item1".to_string(), "item2".to_string()], 2);
        let mapper = Mapper::callable(|item: &String| item.to_uppercase());
        let response = ApiResponse::default().pagination(&page, mapper).unwrap();

        let body = response.envelope().body.clone().unwrap();
        assert_eq!(body["data"], json!(["ITEM1", "ITEM2"]));
    }

    #[test]
    fn test_pagination_invalid_mapper() {
        let page = SimplePaginator::new(vec!["item1", "item2"], 2);
        let err = ApiResponse::default()
            .pagination(&page, Mapper::named("InvalidMapper"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMapper(_)));
        assert_eq!(err.to_string(), "Invalid mapper provided: InvalidMapper");
    }

    #[test]
    fn test_pagination_with_resource() {
        let page = LengthAwarePaginator::new(vec!["item1", "item2"], 2, 2, 1);
        let api = ApiResponse::default().with_resource::<FooResource>();
        assert!(api.transformers().contains("FooResource"));

        let by_name = api.pagination(&page, Mapper::named("FooResource")).unwrap();
        let by_type = api.pagination(&page, Mapper::resource::<FooResource>()).unwrap();
        assert_eq!(by_name, by_type);

        let body = by_name.envelope().body.clone().unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["email"], "john@example.com");
    }

    #[test]
    fn test_pagination_metadata_order_without_data() {
        let page = LengthAwarePaginator::new(vec![1, 2], 2, 2, 1);
        let response = ApiResponse::default().pagination(&page, Mapper::None).unwrap();
        let body = response.envelope().body.clone().unwrap();
        let keys: Vec<&String> = body["pagination"].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "current_page");
        assert_eq!(keys[1], "first_page_url");
        assert_eq!(keys.len(), 12);
    }

    // --- resource lifecycle ---

    #[test]
    fn test_created_generates_message() {
        let api = ApiResponse::default();
        let response = api.created(Some(json!({ "id": 1 })), Some("User"), None, false);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(&response),
            json!({ "message": "User created", "body": { "id": 1 } })
        );
    }

    #[test]
    fn test_created_custom_message() {
        let api = ApiResponse::default();
        let response = api.created(None, Some("User"), Some("Welcome aboard"), false);
        assert_eq!(response.envelope().message.as_deref(), Some("Welcome aboard"));
    }

    #[test]
    fn test_updated_defaults_attribute() {
        let api = ApiResponse::default();
        let response = api.updated(None, None, None, false);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.envelope().message.as_deref(), Some("Resource updated"));

        let response = api.updated(None, None, None, true);
        assert_eq!(response.envelope().message.as_deref(), Some("Resources updated"));
    }

    #[test]
    fn test_destroyed_success() {
        let api = ApiResponse::default();
        let response = api.destroyed(true, Some("Posts"), None, true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response), json!({ "message": "Posts deleted" }));
    }

    #[test]
    fn test_destroyed_not_found() {
        let api = ApiResponse::default();
        let response = api.destroyed(false, Some("User"), Some("ignored"), false);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&response), json!({ "message": "User not found" }));
    }

    #[test]
    fn test_resource_message_uses_translator() {
        let catalog = MessageCatalog::new()
            .with_entry("created.singular", ":attribute a été créé")
            .with_entry("attribute.singular", "La ressource");
        let api = ApiResponse::default().with_translator(Arc::new(catalog));

        assert_eq!(
            api.resource_message("created", Some("L'utilisateur"), false),
            "L'utilisateur a été créé"
        );
        assert_eq!(
            api.resource_message("created", None, false),
            "La ressource a été créé"
        );
        assert_eq!(api.resource_message("created", None, true), "created.plural");
    }

    #[test]
    fn test_from_config_templates() {
        let mut config = Config::default();
        config.messages.not_found.singular = "No :attribute here".to_string();

        let api = ApiResponse::from_config(&config);
        let response = api.destroyed(false, Some("user"), None, false);
        assert_eq!(response.envelope().message.as_deref(), Some("No user here"));
    }

    // --- axum round trip ---

    async fn list_items(State(api): State<ApiResponse>) -> Result<EnvelopeResponse> {
        let page = LengthAwarePaginator::new(vec!["a", "b"], 2, 10, 1).with_path("/items");
        api.pagination(&page, Mapper::callable(|item: &&str| item.to_uppercase()))
    }

    async fn broken_items(State(api): State<ApiResponse>) -> Result<EnvelopeResponse> {
        let page = SimplePaginator::new(vec!["a"], 10);
        api.pagination(&page, Mapper::named("Missing"))
    }

    async fn delete_item(State(api): State<ApiResponse>, Path(id): Path<u32>) -> EnvelopeResponse {
        api.destroyed(id == 1, Some("Item"), None, false)
    }

    fn app() -> Router {
        Router::new()
            .route("/items", get(list_items))
            .route("/broken", get(broken_items))
            .route("/items/{id}", get(delete_item).delete(delete_item))
            .with_state(ApiResponse::default())
    }

    async fn call(uri: &str, method: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_router_paginated_envelope() {
        let (status, body) = call("/items", "GET").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["body"]["data"], json!(["A", "B"]));
        assert_eq!(body["body"]["pagination"]["path"], "/items");
        assert!(body.get("message").is_none());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_router_invalid_mapper_is_server_error() {
        let (status, body) = call("/broken", "GET").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_router_destroyed() {
        let (status, body) = call("/items/1", "DELETE").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Item deleted" }));

        let (status, body) = call("/items/2", "DELETE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Item not found" }));
    }
}
