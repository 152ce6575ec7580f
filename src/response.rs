//! Uniform response envelope returned by every action

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Usage accounting record. This addon consumes no model tokens, so both
/// counters are always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensSchema {
    pub step_amount: u64,
    pub total_current_amount: u64,
}

/// Response envelope: `{output, tokens, message, code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse<O> {
    pub output: O,
    pub tokens: TokensSchema,
    pub message: String,
    pub code: u16,
}

impl<O> ActionResponse<O> {
    fn new(output: O, message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            output,
            tokens: TokensSchema::default(),
            message: message.into(),
            code: code.as_u16(),
        }
    }

    /// 500 envelope for a failed invocation
    pub fn internal_error(output: O, message: impl Into<String>) -> Self {
        Self::new(output, message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::OK.as_u16()
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<O: Serialize> ActionResponse<O> {
    /// Erase the output type for hosts that speak JSON
    pub fn erase(self) -> ActionResponse<serde_json::Value> {
        ActionResponse {
            output: serde_json::to_value(&self.output).unwrap_or(serde_json::Value::Null),
            tokens: self.tokens,
            message: self.message,
            code: self.code,
        }
    }
}

/// Non-failure result classes an action can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Ok,
    Conflict,
}

impl ActionStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionStatus::Ok => StatusCode::OK,
            ActionStatus::Conflict => StatusCode::CONFLICT,
        }
    }
}

/// What an action produced when it ran to completion. Failures travel as
/// `Err(AddonError)` and are turned into 500 envelopes by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<O> {
    pub output: O,
    pub message: String,
    pub status: ActionStatus,
}

impl<O> Outcome<O> {
    pub fn ok(output: O, message: impl Into<String>) -> Self {
        Self {
            output,
            message: message.into(),
            status: ActionStatus::Ok,
        }
    }

    pub fn conflict(output: O, message: impl Into<String>) -> Self {
        Self {
            output,
            message: message.into(),
            status: ActionStatus::Conflict,
        }
    }

    pub fn into_response(self) -> ActionResponse<O> {
        ActionResponse::new(self.output, self.message, self.status.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokens_serialize_camel_case() {
        let value = serde_json::to_value(TokensSchema::default()).unwrap();
        assert_eq!(value, json!({"stepAmount": 0, "totalCurrentAmount": 0}));
    }

    #[test]
    fn test_outcome_codes() {
        let ok = Outcome::ok("out", "done").into_response();
        assert_eq!(ok.code, 200);
        assert!(ok.is_success());

        let conflict = Outcome::conflict("out", "exists").into_response();
        assert_eq!(conflict.code, 409);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert!(!conflict.is_success());

        let failed = ActionResponse::internal_error("out", "boom");
        assert_eq!(failed.code, 500);
        assert_eq!(failed.tokens, TokensSchema::default());
    }

    #[test]
    fn test_erased_envelope_shape() {
        let response = Outcome::ok(json!({"success": true}), "fine").into_response();
        assert_eq!(
            serde_json::to_value(response.erase()).unwrap(),
            json!({
                "output": {"success": true},
                "tokens": {"stepAmount": 0, "totalCurrentAmount": 0},
                "message": "fine",
                "code": 200
            })
        );
    }
}
