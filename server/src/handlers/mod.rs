pub mod applications;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod jobs;

pub use applications::{apply_to_job, list_applied_jobs};
pub use auth::{issue_token, logout};
pub use catalog::{list_categories, list_clients, list_hiring, list_job_services};
pub use health::{health_check, liveness};
pub use jobs::{
    create_job, delete_job, get_job, jobs_by_category, my_jobs, record_application, search_jobs,
    upsert_job,
};
