//! The grading service: validating an assignment before the check and
//! submitting the finished result afterwards.

mod http;

pub use http::HttpTransport;

use serde_json::{Value, json};
use tracing::debug;

use crate::error::{CheckError, Result};

/// Status code and raw body of a finished request. Error statuses are data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Pretty JSON dump attached to errors for support diagnostics.
    pub fn diagnostics(&self) -> String {
        let result = serde_json::from_str::<Value>(&self.body)
            .unwrap_or_else(|_| Value::String(self.body.clone()));
        let dump = json!({ "statusCode": self.status, "result": result });
        serde_json::to_string_pretty(&dump).unwrap_or_else(|_| dump.to_string())
    }

    fn unrecognized(&self) -> CheckError {
        CheckError::UnrecognizedResponse {
            details: self.diagnostics(),
        }
    }
}

/// Capability to POST a JSON body with the service credentials attached.
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse>;
}

/// Ask the service whether `assignment` exists and which checking image
/// version to use.
pub fn validate(transport: &dyn Transport, url: &str, assignment: &str) -> Result<String> {
    let response = transport.post_json(url, &json!({}))?;
    match response.status {
        200 => {}
        404 => {
            return Err(CheckError::AssignmentNotFound {
                path: assignment.to_string(),
            });
        }
        _ => return Err(response.unrecognized()),
    }

    let body: Value = serde_json::from_str(&response.body).map_err(|_| response.unrecognized())?;
    let version = extract_version(&body).ok_or_else(|| response.unrecognized())?;
    debug!(assignment, version = %version, "assignment validated");
    Ok(version)
}

/// Deliver the finished check. Only `201 Created` counts as success.
pub fn submit(transport: &dyn Transport, url: &str, body: &Value) -> Result<()> {
    let response = transport.post_json(url, body)?;
    if response.status != 201 {
        return Err(response.unrecognized());
    }
    Ok(())
}

// The service has answered both `{"version": ..}` and `{"result": {"version": ..}}`.
fn extract_version(body: &Value) -> Option<String> {
    let version = body
        .get("version")
        .or_else(|| body.pointer("/result/version"))?;
    match version {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    pub struct FakeTransport {
        responses: RefCell<VecDeque<RawResponse>>,
        pub requests: RefCell<Vec<(String, Value)>>,
    }

    impl FakeTransport {
        pub fn with(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
            Self {
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| RawResponse {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                requests: RefCell::default(),
            }
        }
    }

    impl Transport for FakeTransport {
        fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), body.clone()));
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("unexpected request"))
        }
    }
}
