use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::engine::transition::ConfirmOutcome;
use crate::models::request::{RequestRecord, RequestStatus};

const STATUSES: [RequestStatus; 3] = [
    RequestStatus::Unconfirmed,
    RequestStatus::Confirmed,
    RequestStatus::Completed,
];

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub requests_generated_total: IntCounter,
    pub confirmations_total: IntCounterVec,
    pub requests_by_status: IntGaugeVec,
    pub ws_clients: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_generated_total = IntCounter::new(
            "requests_generated_total",
            "Total mock requests generated",
        )
        .expect("valid requests_generated_total metric");

        let confirmations_total = IntCounterVec::new(
            Opts::new("confirmations_total", "Confirm attempts by outcome"),
            &["outcome"],
        )
        .expect("valid confirmations_total metric");

        let requests_by_status = IntGaugeVec::new(
            Opts::new("requests_by_status", "Requests in the current collection by status"),
            &["status"],
        )
        .expect("valid requests_by_status metric");

        let ws_clients = IntGauge::new("ws_clients", "Connected websocket clients")
            .expect("valid ws_clients metric");

        registry
            .register(Box::new(requests_generated_total.clone()))
            .expect("register requests_generated_total");
        registry
            .register(Box::new(confirmations_total.clone()))
            .expect("register confirmations_total");
        registry
            .register(Box::new(requests_by_status.clone()))
            .expect("register requests_by_status");
        registry
            .register(Box::new(ws_clients.clone()))
            .expect("register ws_clients");

        Self {
            registry,
            requests_generated_total,
            confirmations_total,
            requests_by_status,
            ws_clients,
        }
    }

    pub fn record_confirm(&self, outcome: &ConfirmOutcome) {
        self.confirmations_total
            .with_label_values(&[outcome.label()])
            .inc();
    }

    pub fn record_collection(&self, requests: &[RequestRecord]) {
        for status in STATUSES {
            let count = requests.iter().filter(|r| r.status == status).count();
            self.requests_by_status
                .with_label_values(&[status.as_str()])
                .set(count as i64);
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
