//! Stub Adapter
//!
//! Adapter that answers from a script without network calls.
//! Used for offline runs (`provider = "stub"`) and tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::adapters::{LlmAdapter, ModelError};

/// Canned response for offline runs
pub const DEFAULT_STUB_RESPONSE: &str = "SELECT WAREHOUSE_NAME, SUM(CREDITS_USED) AS TOTAL_CREDITS
FROM warehouse_metering_history
GROUP BY WAREHOUSE_NAME
ORDER BY TOTAL_CREDITS DESC";

/// One completion request seen by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub system: String,
    pub user: Option<String>,
}

/// Stub adapter (returns scripted responses)
///
/// Scripted entries are consumed in order; afterwards every call gets the
/// fallback (a fixed response, or a fixed error).
#[derive(Debug)]
pub struct StubAdapter {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    fallback: Result<String, ModelError>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubAdapter {
    /// Stub that always answers with the canned offline query
    pub fn new() -> Self {
        Self::with_response(DEFAULT_STUB_RESPONSE.to_string())
    }

    /// Stub that always answers with `response`
    pub fn with_response(response: String) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stub whose every call fails
    pub fn failing(message: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(ModelError::InvalidResponse(message.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stub replaying `script` in order, then failing
    pub fn with_script(script: Vec<Result<String, ModelError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err(ModelError::InvalidResponse(
                "stub script exhausted".to_string(),
            )),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmAdapter for StubAdapter {
    fn complete(&self, system: &str, user: Option<&str>) -> Result<String, ModelError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(StubCall {
                system: system.to_string(),
                user: user.map(str::to_string),
            });

        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
            .map(|text| text.trim().to_string())
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
