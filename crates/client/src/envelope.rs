//! Classification of HTTP outcomes into the uniform `{code, message}` contract.
//!
//! Pure functions over `(status, body)`; no I/O happens here.

use serde_json::Value;
use storefront_types::{
    ApiError, Envelope,
    error::{DEFAULT_ENVELOPE_MESSAGE, DEFAULT_FORBIDDEN_MESSAGE, DEFAULT_NETWORK_MESSAGE},
};

/// Outcome of one HTTP exchange after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// A 2xx response whose envelope reported `status == "success"`.
    /// Carries the envelope's `data`, or `null` when absent.
    Success(Value),
    /// Any failure surfaced to the caller.
    Failure(ApiError),
    /// A 401 that the refresh coordinator should handle.
    Unauthenticated,
}

impl Normalized {
    /// Converts into a result, treating [`Normalized::Unauthenticated`] as a
    /// final failure (used once a refresh has already been attempted).
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any non-success outcome.
    pub fn into_final(self, body: Option<&Value>) -> Result<Value, ApiError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
            Self::Unauthenticated => Err(ApiError::new(
                401,
                server_message(body).unwrap_or(DEFAULT_NETWORK_MESSAGE),
            )),
        }
    }
}

/// The failure handed back when a 401 ends the session: the server's own
/// `code` and `message` when the body carries them, otherwise the
/// session-expired rejection.
#[must_use]
pub fn unauthorized(body: Option<&Value>) -> ApiError {
    let Some(message) = server_message(body) else {
        return ApiError::session_expired();
    };
    let code = body
        .and_then(Envelope::from_value)
        .and_then(|e| e.code)
        .unwrap_or(401);
    ApiError::new(code, message)
}

/// Classifies a response.
///
/// * 2xx: the body must be a success envelope; anything else is a failure
///   using the envelope's code (falling back to the HTTP status) and message.
/// * 401: left for the refresh coordinator.
/// * 403: `{403, message or "Access denied"}`.
/// * other: `{status, message or "Network error occurred"}`.
#[must_use]
pub fn normalize(status: u16, body: Option<&Value>) -> Normalized {
    match status {
        200..=299 => normalize_success(status, body),
        401 => Normalized::Unauthenticated,
        403 => Normalized::Failure(ApiError::new(
            403,
            server_message(body).unwrap_or(DEFAULT_FORBIDDEN_MESSAGE),
        )),
        _ => Normalized::Failure(ApiError::new(
            i64::from(status),
            server_message(body).unwrap_or(DEFAULT_NETWORK_MESSAGE),
        )),
    }
}

fn normalize_success(status: u16, body: Option<&Value>) -> Normalized {
    let Some(envelope) = body.and_then(Envelope::from_value) else {
        return Normalized::Failure(ApiError::new(i64::from(status), DEFAULT_ENVELOPE_MESSAGE));
    };
    if envelope.is_success() {
        return Normalized::Success(envelope.data.unwrap_or(Value::Null));
    }
    let message = envelope
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_ENVELOPE_MESSAGE.to_string());
    Normalized::Failure(ApiError::new(
        envelope.code.unwrap_or_else(|| i64::from(status)),
        message,
    ))
}

/// Server-supplied `message` field of an error body, if any.
fn server_message(body: Option<&Value>) -> Option<&str> {
    body?
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_unwraps_data() {
        let body = json!({"status": "success", "code": 200, "message": "ok", "data": [1, 2]});
        assert_eq!(normalize(200, Some(&body)), Normalized::Success(json!([1, 2])));
    }

    #[test]
    fn test_success_without_data_is_null() {
        let body = json!({"status": "success"});
        assert_eq!(normalize(201, Some(&body)), Normalized::Success(Value::Null));
    }

    #[test]
    fn test_error_envelope_on_200() {
        let body = json!({"status": "error", "code": 409, "message": "Email taken"});
        assert_eq!(
            normalize(200, Some(&body)),
            Normalized::Failure(ApiError::new(409, "Email taken"))
        );
    }

    #[test]
    fn test_error_envelope_defaults() {
        let body = json!({"status": "fail"});
        assert_eq!(
            normalize(200, Some(&body)),
            Normalized::Failure(ApiError::new(200, "An error occurred"))
        );
    }

    #[test]
    fn test_status_match_is_exact() {
        let body = json!({"status": "SUCCESS", "data": 1});
        assert!(matches!(normalize(200, Some(&body)), Normalized::Failure(_)));
    }

    #[test]
    fn test_non_envelope_2xx_is_failure() {
        assert_eq!(
            normalize(200, Some(&json!([1, 2, 3]))),
            Normalized::Failure(ApiError::new(200, "An error occurred"))
        );
        assert_eq!(
            normalize(204, None),
            Normalized::Failure(ApiError::new(204, "An error occurred"))
        );
    }

    #[test]
    fn test_401_is_left_to_the_coordinator() {
        assert_eq!(
            normalize(401, Some(&json!({"message": "expired"}))),
            Normalized::Unauthenticated
        );
    }

    #[test]
    fn test_403_message_and_default() {
        assert_eq!(
            normalize(403, Some(&json!({"message": "Admins only"}))),
            Normalized::Failure(ApiError::new(403, "Admins only"))
        );
        assert_eq!(
            normalize(403, None),
            Normalized::Failure(ApiError::new(403, "Access denied"))
        );
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(
            normalize(404, Some(&json!({"status": "error", "message": "No such product"}))),
            Normalized::Failure(ApiError::new(404, "No such product"))
        );
        assert_eq!(
            normalize(502, Some(&Value::String("Bad Gateway".into()))),
            Normalized::Failure(ApiError::new(502, "Network error occurred"))
        );
    }

    #[test]
    fn test_unauthorized_keeps_server_rejection() {
        let body = json!({"status": "error", "code": 401, "message": "Invalid email or password"});
        assert_eq!(
            unauthorized(Some(&body)),
            ApiError::new(401, "Invalid email or password")
        );
        assert_eq!(
            unauthorized(Some(&json!({"message": "token revoked"}))),
            ApiError::new(401, "token revoked")
        );
        assert_eq!(unauthorized(None), ApiError::session_expired());
        assert_eq!(
            unauthorized(Some(&json!({"message": ""}))),
            ApiError::session_expired()
        );
    }

    #[test]
    fn test_into_final_turns_401_into_failure() {
        let body = json!({"message": "token revoked"});
        let err = normalize(401, Some(&body)).into_final(Some(&body)).unwrap_err();
        assert_eq!(err, ApiError::new(401, "token revoked"));

        let err = Normalized::Unauthenticated.into_final(None).unwrap_err();
        assert_eq!(err.code, 401);
        assert_eq!(err.message, "Network error occurred");
    }
}
