use serde::{Deserialize, Serialize};

/// What a visitor sees after submitting any of the public forms.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl SubmissionOutcome {
    pub fn accepted(message: &str, reference_id: String) -> Self {
        Self { success: true, message: message.to_string(), reference_id: Some(reference_id) }
    }

    pub fn rejected(message: String) -> Self {
        Self { success: false, message, reference_id: None }
    }
}
