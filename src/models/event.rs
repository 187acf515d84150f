use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::transition::ConfirmOutcome;
use crate::models::location::DeviceLocation;
use crate::models::request::RequestRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    Refreshed {
        count: usize,
    },
    ConfirmAttempted {
        request_id: String,
        outcome: ConfirmOutcome,
        request: Option<RequestRecord>,
    },
    SelectionChanged {
        request_id: Option<String>,
    },
    LocationUpdated {
        location: DeviceLocation,
    },
    LocationFailed {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: RequestEvent,
}

impl EventEnvelope {
    pub fn new(event: RequestEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted_at: Utc::now(),
            event,
        }
    }
}
