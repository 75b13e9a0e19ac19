//! Snapshot encoding
//!
//! Encodes scored results into the durable snapshot shape consumed by
//! external storage, stamping each record with an id, producer metadata, and
//! a creation timestamp. The clock stays out of the scoring engine; it is
//! read only here, at the encoding boundary.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ComputeError;
use crate::types::{EiResult, EiSnapshot, SnapshotProducer};
use crate::{EI_VERSION, PRODUCER_NAME};

/// Snapshot encoder carrying a stable producer instance id.
pub struct SnapshotEncoder {
    instance_id: String,
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode a scored result into a snapshot for the given user.
    pub fn encode(&self, user_id: &str, result: &EiResult) -> EiSnapshot {
        EiSnapshot {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            score: result.score,
            focus_efficiency: result.focus_efficiency,
            recovery_latency: result.recovery_latency,
            decision_clarity: result.decision_clarity,
            emotion_regulation: result.emotion_regulation,
            support_utilization: result.support_utilization,
            strategic_momentum: result.strategic_momentum,
            state: result.state,
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: EI_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            created_at: Utc::now().to_rfc3339(),
            trend: None,
        }
    }

    /// Encode to a pretty-printed JSON string.
    pub fn encode_to_json(&self, user_id: &str, result: &EiResult) -> Result<String, ComputeError> {
        let snapshot = self.encode(user_id, result);
        serde_json::to_string_pretty(&snapshot).map_err(ComputeError::JsonError)
    }
}
