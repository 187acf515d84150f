use std::sync::{Mutex, PoisonError};

use chrono::{FixedOffset, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::config::Config;
use crate::engine::filter::RequestFilter;
use crate::engine::generator::generate;
use crate::engine::transition::{ConfirmOutcome, confirm_with_outcome};
use crate::error::AppError;
use crate::models::event::{EventEnvelope, RequestEvent};
use crate::models::location::DeviceLocation;
use crate::models::request::{RequestRecord, RequestStatus};
use crate::observability::metrics::Metrics;
use crate::projection::list::{ListView, project_list};
use crate::projection::map::{MapView, project_map};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub requests: Vec<RequestRecord>,
    pub filter: RequestFilter,
    pub selected_id: Option<String>,
    pub device_location: Option<DeviceLocation>,
    pub location_error: Option<String>,
}

impl ScreenState {
    pub fn new(requests: Vec<RequestRecord>) -> Self {
        Self {
            requests,
            ..Self::default()
        }
    }

    pub fn find(&self, id: &str) -> Option<&RequestRecord> {
        self.requests.iter().find(|request| request.id == id)
    }

    /// Replaces the collection; confirmations and selection are discarded.
    pub fn refreshed(&self, requests: Vec<RequestRecord>) -> Self {
        Self {
            requests,
            selected_id: None,
            ..self.clone()
        }
    }

    pub fn confirmed(&self, id: &str) -> (Self, ConfirmOutcome) {
        let (requests, outcome) = confirm_with_outcome(&self.requests, id);
        (
            Self {
                requests,
                ..self.clone()
            },
            outcome,
        )
    }

    pub fn filtered_by(&self, filter: RequestFilter) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    pub fn selecting(&self, id: &str) -> Result<Self, AppError> {
        let request = self
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("request {id} not found")))?;

        if request.status == RequestStatus::Completed {
            return Err(AppError::Conflict(format!(
                "request {id} is completed and not shown on the map"
            )));
        }

        Ok(Self {
            selected_id: Some(id.to_string()),
            ..self.clone()
        })
    }

    pub fn deselected(&self) -> Self {
        Self {
            selected_id: None,
            ..self.clone()
        }
    }

    pub fn located(&self, location: DeviceLocation) -> Self {
        Self {
            device_location: Some(location),
            location_error: None,
            ..self.clone()
        }
    }

    pub fn location_failed(&self, message: impl Into<String>) -> Self {
        Self {
            location_error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn list_view(&self, offset: FixedOffset) -> ListView {
        project_list(&self.requests, &self.filter, offset)
    }

    pub fn map_view(&self, offset: FixedOffset) -> MapView {
        project_map(
            &self.requests,
            self.selected_id.as_deref(),
            self.device_location.as_ref(),
            self.location_error.as_deref(),
            offset,
        )
    }
}

pub struct AppState {
    pub screen: RwLock<ScreenState>,
    pub events_tx: broadcast::Sender<EventEnvelope>,
    pub metrics: Metrics,
    pub display_offset: FixedOffset,
    pub default_request_count: usize,
    pub max_request_count: usize,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut rng = match config.mock_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let requests = generate(config.mock_request_count, Utc::now(), &mut rng);

        info!(
            count = requests.len(),
            seeded = config.mock_seed.is_some(),
            "generated startup requests"
        );

        let state = Self::with_requests(config, requests, rng)?;
        state
            .metrics
            .requests_generated_total
            .inc_by(config.mock_request_count as u64);
        Ok(state)
    }

    pub fn with_requests(
        config: &Config,
        requests: Vec<RequestRecord>,
        rng: StdRng,
    ) -> Result<Self, AppError> {
        let (events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size.max(1));
        let metrics = Metrics::new();
        metrics.record_collection(&requests);

        Ok(Self {
            screen: RwLock::new(ScreenState::new(requests)),
            events_tx,
            metrics,
            display_offset: config.display_offset()?,
            default_request_count: config.mock_request_count,
            max_request_count: config.max_request_count,
            rng: Mutex::new(rng),
        })
    }

    pub fn generate(&self, count: usize) -> Result<Vec<RequestRecord>, AppError> {
        if count > self.max_request_count {
            return Err(AppError::BadRequest(format!(
                "count {count} exceeds the maximum of {}",
                self.max_request_count
            )));
        }

        // A panic mid-generation cannot leave the rng in an unusable state.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let requests = generate(count, Utc::now(), &mut *rng);
        self.metrics.requests_generated_total.inc_by(count as u64);
        Ok(requests)
    }

    pub fn commit(&self, screen: &mut ScreenState, next: ScreenState) {
        self.metrics.record_collection(&next.requests);
        *screen = next;
    }

    pub fn publish(&self, event: RequestEvent) {
        let _ = self.events_tx.send(EventEnvelope::new(event));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{AppState, ScreenState};
    use crate::config::Config;
    use crate::engine::filter::RequestFilter;
    use crate::engine::generator::generate;
    use crate::engine::transition::ConfirmOutcome;
    use crate::error::AppError;
    use crate::models::location::{DeviceLocation, GeoPoint};
    use crate::models::request::{RequestLocation, RequestRecord, RequestStatus};

    fn request(id: &str, status: RequestStatus) -> RequestRecord {
        RequestRecord {
            id: id.to_string(),
            guest_name: format!("Guest {id}"),
            pickup_address: "40.7100, -74.0000".to_string(),
            dropoff_address: "40.7500, -73.9700".to_string(),
            request_time: Utc::now(),
            phone_number: "+10000000000".to_string(),
            status,
            location: RequestLocation {
                pickup: GeoPoint::new(40.71, -74.0),
                dropoff: GeoPoint::new(40.75, -73.97),
            },
        }
    }

    fn screen() -> ScreenState {
        ScreenState::new(vec![
            request("r1", RequestStatus::Unconfirmed),
            request("r2", RequestStatus::Completed),
        ])
    }

    #[test]
    fn confirming_returns_new_value_and_leaves_old_one() {
        let before = screen();
        let (after, outcome) = before.confirmed("r1");

        assert_eq!(outcome, ConfirmOutcome::Confirmed);
        assert_eq!(before.requests[0].status, RequestStatus::Unconfirmed);
        assert_eq!(after.requests[0].status, RequestStatus::Confirmed);
    }

    #[test]
    fn selecting_unknown_or_completed_fails() {
        let state = screen();
        assert!(matches!(state.selecting("nope"), Err(AppError::NotFound(_))));
        assert!(matches!(state.selecting("r2"), Err(AppError::Conflict(_))));

        let selected = state.selecting("r1").unwrap();
        assert_eq!(selected.selected_id.as_deref(), Some("r1"));
        assert_eq!(selected.deselected().selected_id, None);
    }

    #[test]
    fn refresh_drops_selection_but_keeps_filter() {
        let state = screen()
            .filtered_by(RequestFilter::new("guest", true))
            .selecting("r1")
            .unwrap();

        let fresh = generate(3, Utc::now(), &mut StdRng::seed_from_u64(1));
        let next = state.refreshed(fresh.clone());

        assert_eq!(next.requests, fresh);
        assert_eq!(next.selected_id, None);
        assert_eq!(next.filter, RequestFilter::new("guest", true));
    }

    #[test]
    fn app_state_with_seed_is_reproducible() {
        let config = Config {
            mock_seed: Some(5),
            mock_request_count: 8,
            ..Config::default()
        };

        let a = AppState::new(&config).unwrap();
        let b = AppState::new(&config).unwrap();
        let requests_a = a.screen.blocking_read().requests.clone();
        let requests_b = b.screen.blocking_read().requests.clone();
        assert_eq!(requests_a.len(), 8);

        // `now` differs between the two calls; everything else must match.
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let without_time = |requests: &[RequestRecord]| -> Vec<RequestRecord> {
            requests
                .iter()
                .map(|r| RequestRecord {
                    request_time: epoch,
                    ..r.clone()
                })
                .collect()
        };
        assert_eq!(without_time(&requests_a), without_time(&requests_b));

        let gaps = |requests: &[RequestRecord]| -> Vec<Duration> {
            requests
                .windows(2)
                .map(|pair| pair[0].request_time - pair[1].request_time)
                .collect()
        };
        assert_eq!(gaps(&requests_a), gaps(&requests_b));
    }

    #[test]
    fn oversized_count_is_rejected_before_generation() {
        let config = Config {
            max_request_count: 10,
            ..Config::default()
        };
        let state = AppState::with_requests(&config, Vec::new(), StdRng::seed_from_u64(1)).unwrap();

        assert!(matches!(state.generate(usize::MAX), Err(AppError::BadRequest(_))));
        assert!(matches!(state.generate(11), Err(AppError::BadRequest(_))));
        assert_eq!(state.generate(10).unwrap().len(), 10);
    }

    #[test]
    fn generation_survives_a_poisoned_rng_lock() {
        let config = Config::default();
        let state = AppState::with_requests(&config, Vec::new(), StdRng::seed_from_u64(1)).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = state.rng.lock().unwrap();
            panic!("generator blew up");
        }));
        assert!(result.is_err());
        assert!(state.rng.is_poisoned());

        assert_eq!(state.generate(3).unwrap().len(), 3);
    }

    #[test]
    fn location_error_is_cleared_by_next_fix() {
        let failed = screen().location_failed("Permission to access location was denied");
        assert_eq!(
            failed.location_error.as_deref(),
            Some("Permission to access location was denied")
        );

        let fixed = failed.located(DeviceLocation {
            point: GeoPoint::new(40.74, -73.99),
            accuracy_m: None,
            recorded_at: Utc::now(),
        });
        assert_eq!(fixed.location_error, None);
        assert!(fixed.device_location.is_some());
    }
}
