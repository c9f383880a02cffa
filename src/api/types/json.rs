//! JSON extractor that rejects with the shared error envelope

use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Drop-in replacement for `axum::Json` whose deserialization failures
/// come back as an [`ApiError`] body instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: rejection::JsonRejection) -> ApiError {
    use rejection::JsonRejection::*;

    let status = rejection.status();
    let message = match &rejection {
        JsonDataError(e) => format!("Invalid JSON data: {}", e.body_text()),
        JsonSyntaxError(e) => format!("Invalid JSON syntax: {}", e.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(e) => format!("Failed to read request body: {}", e.body_text()),
        _ => "Invalid JSON request".to_string(),
    };

    ApiError::new(status, ApiErrorType::InvalidRequestError, message)
        .with_code("json_parse_error")
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_syntax_error_rejects_with_envelope() {
        let request = Request::builder()
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let error = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error.response.error.code.as_deref(),
            Some("json_parse_error")
        );
        assert!(error.response.error.message.starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_missing_content_type_rejects() {
        let request = Request::builder()
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let error = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_json_deref_and_into_inner() {
        let json = Json("hello".to_string());
        assert_eq!(*json, "hello");
        assert_eq!(Json(42).into_inner(), 42);
    }
}
