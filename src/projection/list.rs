use chrono::FixedOffset;
use serde::Serialize;

use crate::engine::filter::{RequestFilter, unconfirmed_count};
use crate::models::request::{RequestRecord, RequestStatus};
use crate::projection::format_time_of_day;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub id: String,
    pub guest_name: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub request_time: String,
    pub phone_number: String,
    pub status: RequestStatus,
    pub background_color: &'static str,
    pub confirmed_badge: bool,
    pub show_on_map: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub filter: RequestFilter,
    pub total: usize,
    pub visible: usize,
    pub unconfirmed_count: usize,
    pub rows: Vec<ListRow>,
}

pub fn background_color(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Unconfirmed => "#e8f5e9",
        RequestStatus::Confirmed => "#ffebee",
        RequestStatus::Completed => "#f5f5f5",
    }
}

pub fn list_row(request: &RequestRecord, offset: FixedOffset) -> ListRow {
    ListRow {
        id: request.id.clone(),
        guest_name: request.guest_name.clone(),
        pickup_address: request.pickup_address.clone(),
        dropoff_address: request.dropoff_address.clone(),
        request_time: format_time_of_day(request.request_time, offset),
        phone_number: request.phone_number.clone(),
        status: request.status,
        background_color: background_color(request.status),
        confirmed_badge: request.status == RequestStatus::Confirmed,
        show_on_map: request.status != RequestStatus::Completed,
    }
}

pub fn project_list(
    requests: &[RequestRecord],
    filter: &RequestFilter,
    offset: FixedOffset,
) -> ListView {
    let rows: Vec<ListRow> = filter
        .apply(requests)
        .into_iter()
        .map(|request| list_row(request, offset))
        .collect();

    ListView {
        filter: filter.clone(),
        total: requests.len(),
        visible: rows.len(),
        unconfirmed_count: unconfirmed_count(requests),
        rows,
    }
}
