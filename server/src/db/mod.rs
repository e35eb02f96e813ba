pub mod filters;
pub mod memory;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::error::Result;

pub use filters::{AppliedJobFilter, JobFilter, ALL_JOBS};
pub use memory::InMemoryStore;
pub use models::{
    AppliedJob, Category, DeleteAck, InsertAck, Job, JobFields, ReferenceCollection, UpdateAck,
    APPLICANTS_FIELD,
};
pub use repository::MongoDbContext;

/// Everything the HTTP handlers need from the document store.
///
/// Each method maps to exactly one store operation; nothing here spans two
/// calls, so combined operations (apply, then bump the counter) are not atomic.
#[async_trait]
pub trait JobBoardStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn categories(&self) -> Result<Vec<Category>>;

    async fn reference_rows(&self, collection: ReferenceCollection) -> Result<Vec<Document>>;

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;

    async fn find_job(&self, id: &ObjectId) -> Result<Option<Job>>;

    async fn insert_job(&self, job: Job) -> Result<InsertAck>;

    /// Sets the given fields on job `id`, creating the job when it does not exist.
    async fn upsert_job(&self, id: &ObjectId, fields: &JobFields) -> Result<UpdateAck>;

    /// Adds one to `NumberOfApplicants`. A missing job yields `matched_count == 0`.
    async fn increment_applicants(&self, id: &ObjectId) -> Result<UpdateAck>;

    async fn delete_job(&self, id: &ObjectId) -> Result<DeleteAck>;

    async fn find_applied_jobs(&self, filter: &AppliedJobFilter) -> Result<Vec<AppliedJob>>;

    async fn insert_applied_job(&self, applied: AppliedJob) -> Result<InsertAck>;

    async fn close(&self) {}
}
