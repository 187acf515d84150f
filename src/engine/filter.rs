use serde::{Deserialize, Serialize};

use crate::models::request::{RequestRecord, RequestStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub unconfirmed_only: bool,
}

impl RequestFilter {
    pub fn new(query: impl Into<String>, unconfirmed_only: bool) -> Self {
        Self {
            query: query.into(),
            unconfirmed_only,
        }
    }

    pub fn matches(&self, request: &RequestRecord) -> bool {
        matches_query(request, &self.query.to_lowercase())
            && (!self.unconfirmed_only || request.status == RequestStatus::Unconfirmed)
    }

    pub fn apply<'a>(&self, requests: &'a [RequestRecord]) -> Vec<&'a RequestRecord> {
        filter(requests, &self.query, self.unconfirmed_only)
    }
}

pub fn filter<'a>(
    requests: &'a [RequestRecord],
    query: &str,
    unconfirmed_only: bool,
) -> Vec<&'a RequestRecord> {
    let needle = query.to_lowercase();

    requests
        .iter()
        .filter(|request| matches_query(request, &needle))
        .filter(|request| !unconfirmed_only || request.status == RequestStatus::Unconfirmed)
        .collect()
}

pub fn unconfirmed_count(requests: &[RequestRecord]) -> usize {
    requests
        .iter()
        .filter(|request| request.status == RequestStatus::Unconfirmed)
        .count()
}

// `needle` must already be lowercased.
fn matches_query(request: &RequestRecord, needle: &str) -> bool {
    needle.is_empty()
        || request.guest_name.to_lowercase().contains(needle)
        || request.pickup_address.to_lowercase().contains(needle)
        || request.dropoff_address.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{RequestFilter, filter, unconfirmed_count};
    use crate::engine::generator::generate;
    use crate::models::location::GeoPoint;
    use crate::models::request::{RequestLocation, RequestRecord, RequestStatus};

    fn request(id: &str, guest: &str, pickup: &str, status: RequestStatus) -> RequestRecord {
        RequestRecord {
            id: id.to_string(),
            guest_name: guest.to_string(),
            pickup_address: pickup.to_string(),
            dropoff_address: "40.7500, -73.9700".to_string(),
            request_time: Utc::now(),
            phone_number: "+10000000001".to_string(),
            status,
            location: RequestLocation {
                pickup: GeoPoint::new(40.71, -74.0),
                dropoff: GeoPoint::new(40.75, -73.97),
            },
        }
    }

    fn sample() -> Vec<RequestRecord> {
        vec![
            request("a", "Alice Smith", "Pier 17", RequestStatus::Unconfirmed),
            request("b", "Bob Jones", "40.7100, -74.0000", RequestStatus::Confirmed),
            request("c", "Carol ALICE", "Hudson Yards", RequestStatus::Completed),
            request("d", "Dan", "alice street", RequestStatus::Unconfirmed),
        ]
    }

    fn ids(view: &[&RequestRecord]) -> Vec<String> {
        view.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_query_without_flag_returns_everything_in_order() {
        let requests = sample();
        let view = filter(&requests, "", false);
        let expected: Vec<&RequestRecord> = requests.iter().collect();
        assert_eq!(view, expected);
    }

    #[test]
    fn query_matches_any_text_field_case_insensitively() {
        let requests = sample();
        assert_eq!(ids(&filter(&requests, "aLiCe", false)), ["a", "c", "d"]);
    }

    #[test]
    fn query_matches_coordinate_addresses() {
        let requests = sample();
        assert_eq!(ids(&filter(&requests, "-74.0000", false)), ["b"]);
        assert_eq!(
            ids(&filter(&requests, "-73.97", false)),
            ["a", "b", "c", "d"]
        );
    }

    #[test]
    fn unconfirmed_only_narrows_the_query_result() {
        let requests = sample();
        let all = filter(&requests, "alice", false);
        let narrowed = filter(&requests, "alice", true);

        assert_eq!(ids(&narrowed), ["a", "d"]);
        assert!(narrowed.iter().all(|r| all.contains(r)));
        assert!(
            narrowed
                .iter()
                .all(|r| r.status == RequestStatus::Unconfirmed)
        );
    }

    #[test]
    fn no_match_gives_empty_view() {
        let requests = sample();
        assert!(filter(&requests, "zzz", false).is_empty());
    }

    #[test]
    fn guest_one_prefix_matches_teens() {
        let mut rng = StdRng::seed_from_u64(10);
        let requests = generate(25, Utc::now(), &mut rng);

        let mut names: Vec<String> = filter(&requests, "guest 1", false)
            .iter()
            .map(|r| r.guest_name.clone())
            .collect();
        names.sort();

        let mut expected: Vec<String> = std::iter::once(1)
            .chain(10..=19)
            .map(|n| format!("Guest {n}"))
            .collect();
        expected.sort();

        assert_eq!(names, expected);
    }

    #[test]
    fn request_filter_value_agrees_with_free_function() {
        let requests = sample();
        let f = RequestFilter::new("ALICE", true);

        assert_eq!(f.apply(&requests), filter(&requests, "ALICE", true));
        assert!(f.matches(&requests[0]));
        assert!(!f.matches(&requests[2]));
    }

    #[test]
    fn counts_unconfirmed_over_whole_collection() {
        assert_eq!(unconfirmed_count(&sample()), 2);
        assert_eq!(unconfirmed_count(&[]), 0);
    }
}
