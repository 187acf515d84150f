use chrono::FixedOffset;
use serde::Serialize;
use tracing::warn;

use crate::geo::MapRegion;
use crate::models::location::{DeviceLocation, GeoPoint};
use crate::models::request::{RequestRecord, RequestStatus};
use crate::projection::format_time_of_day;

const DROPOFF_COLOR: &str = "#ff6d00";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub request_id: String,
    pub kind: MarkerKind,
    pub point: GeoPoint,
    pub color: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRequest {
    pub id: String,
    pub guest_name: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub request_time: String,
    pub phone_number: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub region: MapRegion,
    pub markers: Vec<MapMarker>,
    pub selected: Option<SelectedRequest>,
    pub current_location: Option<DeviceLocation>,
    pub location_error: Option<String>,
}

pub fn marker_color(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Unconfirmed => "green",
        RequestStatus::Confirmed => "#1a237e",
        _ => "gray",
    }
}

pub fn is_mappable(request: &RequestRecord) -> bool {
    request.status != RequestStatus::Completed
}

pub fn project_map(
    requests: &[RequestRecord],
    selected_id: Option<&str>,
    current_location: Option<&DeviceLocation>,
    location_error: Option<&str>,
    offset: FixedOffset,
) -> MapView {
    let mut markers = Vec::new();
    let mut selected = None;

    for request in requests.iter().filter(|request| is_mappable(request)) {
        let is_selected = selected_id == Some(request.id.as_str());

        markers.push(marker(
            request,
            MarkerKind::Pickup,
            request.location.pickup,
            marker_color(request.status),
            is_selected,
        ));

        if is_selected {
            markers.push(marker(
                request,
                MarkerKind::Dropoff,
                request.location.dropoff,
                DROPOFF_COLOR,
                true,
            ));
            selected = Some(request);
        }
    }

    let region = match (selected, current_location) {
        (Some(request), _) => MapRegion::around(&request.location.pickup),
        (None, Some(location)) => MapRegion::around(&location.point),
        (None, None) => MapRegion::DEFAULT,
    };

    MapView {
        region,
        markers,
        selected: selected.map(|request| selected_card(request, offset)),
        current_location: current_location.cloned(),
        location_error: location_error.map(str::to_string),
    }
}

fn marker(
    request: &RequestRecord,
    kind: MarkerKind,
    point: GeoPoint,
    color: &'static str,
    selected: bool,
) -> MapMarker {
    if !point.is_physical() {
        warn!(
            request_id = %request.id,
            latitude = point.latitude,
            longitude = point.longitude,
            "marker outside physical coordinate range"
        );
    }

    MapMarker {
        request_id: request.id.clone(),
        kind,
        point,
        color,
        selected,
    }
}

fn selected_card(request: &RequestRecord, offset: FixedOffset) -> SelectedRequest {
    SelectedRequest {
        id: request.id.clone(),
        guest_name: request.guest_name.clone(),
        pickup_address: request.pickup_address.clone(),
        dropoff_address: request.dropoff_address.clone(),
        request_time: format_time_of_day(request.request_time, offset),
        phone_number: request.phone_number.clone(),
        status: request.status,
    }
}
