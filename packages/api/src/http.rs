//! Single-shot JSON request helpers.
//!
//! Bodies are read as text first so that a decode failure can log what
//! the backend actually sent.

use serde::de::DeserializeOwned;

use accident_map_api_models::ApiErrorBody;

use crate::ApiError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends `request` and decodes the JSON response body as `T`.
///
/// # Errors
///
/// Returns [`ApiError::Http`] on transport failure, [`ApiError::Status`] on
/// a non-2xx status and [`ApiError::Shape`] if the body does not decode.
#[allow(clippy::future_not_send)]
pub async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();
    log::debug!("{endpoint}: HTTP {status} from {url}");

    let text = response.text().await?;
    decode(endpoint, status, &text)
}

/// Decodes a response body received with `status`.
pub fn decode<T: DeserializeOwned>(
    endpoint: &str,
    status: reqwest::StatusCode,
    text: &str,
) -> Result<T, ApiError> {
    if !status.is_success() {
        let body: ApiErrorBody = serde_json::from_str(text).unwrap_or_default();
        let message = body.best_message().map_or_else(
            || {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("error")
                )
            },
            ToString::to_string,
        );
        log::warn!("{endpoint}: HTTP {status}: {message}");
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(text).map_err(|e| {
        log::error!(
            "{endpoint}: JSON decode failed\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {}",
            text.len(),
            preview(text),
        );
        ApiError::Shape {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    })
}

fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use accident_map_api_models::LocationStats;
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn decodes_success_body() {
        let cities: Vec<LocationStats> = decode(
            "/analysis/cities",
            StatusCode::OK,
            r#"[{"name": "Dayton", "accidents": 12, "avgSeverity": 2.25}]"#,
        )
        .unwrap();
        assert_eq!(cities[0].name, "Dayton");
    }

    #[test]
    fn error_status_uses_body_message() {
        let err = decode::<Vec<LocationStats>>(
            "/state/details",
            StatusCode::BAD_REQUEST,
            r#"{"error": "State parameter is required"}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Status {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "State parameter is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_body_uses_reason() {
        let err = decode::<Vec<LocationStats>>(
            "/spatial/states",
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn malformed_body_is_shape_error() {
        let err =
            decode::<Vec<LocationStats>>("/analysis/cities", StatusCode::OK, r#"{"name": 1}"#)
                .unwrap_err();
        assert!(matches!(err, ApiError::Shape { .. }));
        assert_eq!(err.user_message(), "Invalid data format received from server");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(400);
        let short = preview(&text);
        assert!(short.ends_with("..."));
        assert!(short.len() <= BODY_PREVIEW_LEN + 3);
    }
}
