//! Application services and ports.

#![forbid(unsafe_code)]

mod ownership_ports;
mod ownership_service;

pub use ownership_ports::{MAX_TASK_PAGE_SIZE, OwnershipRepository, TaskListQuery};
pub use ownership_service::{
    OwnershipService, TaskAccessReport, TaskOwnerReport, TaskOwnershipPage,
};
