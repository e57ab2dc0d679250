use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub mod store;

/// A single accepted blessing. `timestamp` is assigned server-side in
/// milliseconds since the Unix epoch and doubles as the record id; the
/// wall keeps timestamps strictly decreasing from index 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlessingRecord {
    pub name: String,
    pub blessing: String,
    pub timestamp: i64,
}

/// Submission payload. Both fields are optional on the wire; validation
/// rejects anything that is missing or blank after trimming.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlessingInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub blessing: Option<String>,
}

/// Policy knobs for the wall: retention cap and field limits.
/// `max_records = 0` disables the cap.
#[derive(Clone, Copy, Debug)]
pub struct WallPolicy {
    pub max_records: usize,
    pub max_name_chars: usize,
    pub max_blessing_chars: usize,
}

impl Default for WallPolicy {
    fn default() -> Self {
        Self { max_records: 100, max_name_chars: 50, max_blessing_chars: 500 }
    }
}

impl BlessingInput {
    /// Trim both fields, reject blanks, and truncate to the policy limits.
    /// Returns the normalized `(name, blessing)` pair.
    pub fn validate(&self, policy: &WallPolicy) -> Result<(String, String), ServiceError> {
        let name = self.name.as_deref().unwrap_or("").trim();
        let blessing = self.blessing.as_deref().unwrap_or("").trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("name must not be empty".into()));
        }
        if blessing.is_empty() {
            return Err(ServiceError::Validation("blessing must not be empty".into()));
        }
        Ok((
            truncate_chars(name, policy.max_name_chars),
            truncate_chars(blessing, policy.max_blessing_chars),
        ))
    }
}

/// Cut after `max` chars. Counts chars, never bytes, so multi-byte text
/// is never split inside a code point.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
