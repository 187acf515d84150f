use serde::{Deserialize, Serialize};

use crate::models::request::{RequestRecord, RequestStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    Confirmed,
    Unchanged(RequestStatus),
    NotFound,
}

impl ConfirmOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ConfirmOutcome::Confirmed => "confirmed",
            ConfirmOutcome::Unchanged(_) => "unchanged",
            ConfirmOutcome::NotFound => "not_found",
        }
    }
}

/// Returns `requests` with the record `id` moved from unconfirmed to
/// confirmed. Unknown ids and records in any other status are a silent no-op.
pub fn confirm(requests: &[RequestRecord], id: &str) -> Vec<RequestRecord> {
    confirm_with_outcome(requests, id).0
}

pub fn confirm_with_outcome(
    requests: &[RequestRecord],
    id: &str,
) -> (Vec<RequestRecord>, ConfirmOutcome) {
    let outcome = match requests.iter().find(|request| request.id == id) {
        None => ConfirmOutcome::NotFound,
        Some(request) if request.status == RequestStatus::Unconfirmed => {
            ConfirmOutcome::Confirmed
        }
        Some(request) => ConfirmOutcome::Unchanged(request.status),
    };

    if outcome != ConfirmOutcome::Confirmed {
        return (requests.to_vec(), outcome);
    }

    let updated = requests
        .iter()
        .map(|request| {
            if request.id == id && request.status == RequestStatus::Unconfirmed {
                request.with_status(RequestStatus::Confirmed)
            } else {
                request.clone()
            }
        })
        .collect();

    (updated, outcome)
}
