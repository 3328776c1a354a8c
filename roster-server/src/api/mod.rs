//! HTTP API handlers for roster-server

pub mod employees;
pub mod health;
pub mod sync;

pub use employees::{
    active_employees, create_employee, delete_employee, employees_by_level, get_employee,
    list_employees, page_employees, search_employees, update_employee,
};
pub use health::health_routes;
pub use sync::{sync_employees, truncate_employees};
