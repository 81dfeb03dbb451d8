//! Append-only shipment timeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::core::identity::{ShipmentId, UserId};

/// Timeline action label for automatic status advances.
pub const ACTION_STATUS_AUTO: &str = "STATUS_AUTO";

/// Timeline action label for manual status changes by a privileged actor.
pub const ACTION_STATUS_MANUAL: &str = "STATUS_MANUAL";

/// An immutable audit record on a shipment's timeline.
///
/// Created exactly once per successful status change; the store exposes no
/// update or delete for timeline rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: Ulid,
    pub shipment_id: ShipmentId,
    pub action: String,
    pub description: String,
    pub actor_id: UserId,
    pub actor_name: String,
    pub timestamp: DateTime<Utc>,
}

impl TimelineEvent {
    pub fn new(
        shipment_id: ShipmentId,
        action: impl Into<String>,
        description: impl Into<String>,
        actor_id: UserId,
        actor_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            shipment_id,
            action: action.into(),
            description: description.into(),
            actor_id,
            actor_name: actor_name.into(),
            timestamp: Utc::now(),
        }
    }
}
