mod service;
mod tasks;

pub use service::{HealthDependencyStatus, HealthResponse, ServiceIndexResponse};
pub use tasks::{
    GroupPermissionResponse, TaskAccessResponse, TaskOwnerResponse, TaskOwnershipListResponse,
    TaskOwnershipQuery, TaskOwnershipResponse, TaskStatusResponse,
};
