use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::geo::{NYC_BOUNDS, format_coordinates};
use crate::models::request::{RequestLocation, RequestRecord, RequestStatus};

const UNCONFIRMED_SHARE: f64 = 0.4;
const CONFIRMED_SHARE_OF_REST: f64 = 0.7;
const MAX_AGE_MS: i64 = 24 * 60 * 60 * 1000;
const PHONE_RANGE: u64 = 1_000_000_000;

pub fn generate<R: Rng + ?Sized>(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<RequestRecord> {
    let mut requests: Vec<RequestRecord> = (0..count)
        .map(|index| generate_one(index, now, rng))
        .collect();

    requests.sort_by(|a, b| b.request_time.cmp(&a.request_time));
    requests
}

fn generate_one<R: Rng + ?Sized>(index: usize, now: DateTime<Utc>, rng: &mut R) -> RequestRecord {
    let pickup = NYC_BOUNDS.random_point(rng);
    let dropoff = NYC_BOUNDS.random_point(rng);
    let status = draw_status(rng);
    let age = Duration::milliseconds(rng.gen_range(0..MAX_AGE_MS));

    RequestRecord {
        id: format!("request-{index}"),
        guest_name: format!("Guest {}", index + 1),
        pickup_address: format_coordinates(&pickup),
        dropoff_address: format_coordinates(&dropoff),
        request_time: now - age,
        phone_number: format!("+1{:010}", rng.gen_range(0..PHONE_RANGE)),
        status,
        location: RequestLocation { pickup, dropoff },
    }
}

fn draw_status<R: Rng + ?Sized>(rng: &mut R) -> RequestStatus {
    if rng.gen_range(0.0..1.0) < UNCONFIRMED_SHARE {
        return RequestStatus::Unconfirmed;
    }

    if rng.gen_range(0.0..1.0) < CONFIRMED_SHARE_OF_REST {
        RequestStatus::Confirmed
    } else {
        RequestStatus::Completed
    }
}
