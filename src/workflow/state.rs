//! Workflow status values

use serde::{Deserialize, Serialize};

/// Lifecycle of one form submission.
///
/// `Idle -> Validating -> (ValidationFailed | Submitting) -> (Succeeded | Failed)`,
/// and back to `Idle` on reset or any input edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum WorkflowState<R> {
    /// Waiting for input
    Idle,
    /// Checking the form (transient, never observed between calls)
    Validating,
    /// Form rejected before any request; holds the message
    ValidationFailed(String),
    /// Request in flight
    Submitting,
    /// Prediction received
    Succeeded(R),
    /// Request failed; holds the user-visible message
    Failed(String),
}

impl<R> Default for WorkflowState<R> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<R> WorkflowState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Submitting => "submitting",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn result(&self) -> Option<&R> {
        match self {
            Self::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    /// Message to show in the error alert, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed(msg) | Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Whether the view offers a reset button (result or error on screen).
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::Succeeded(_) | Self::Failed(_) | Self::ValidationFailed(_)
        )
    }
}

impl<R> std::fmt::Display for WorkflowState<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_with_status_tag() {
        let v = serde_json::to_value(WorkflowState::<u32>::Failed("boom".to_string())).unwrap();
        assert_eq!(v, serde_json::json!({"status": "failed", "detail": "boom"}));

        let v = serde_json::to_value(WorkflowState::<u32>::Idle).unwrap();
        assert_eq!(v, serde_json::json!({"status": "idle"}));
    }

    #[test]
    fn test_accessors() {
        let s = WorkflowState::Succeeded(7_u32);
        assert_eq!(s.result(), Some(&7));
        assert!(s.error().is_none());
        assert!(s.is_settled());
        assert_eq!(s.to_string(), "succeeded");
        assert!(!WorkflowState::<u32>::Submitting.is_settled());
    }
}
