use serde::Serialize;
use ts_rs::TS;

/// Health status of one backing dependency.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/health-dependency-status.ts")]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub detail: Option<String>,
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/health-response.ts")]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Service index payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/service-index-response.ts")]
pub struct ServiceIndexResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}
