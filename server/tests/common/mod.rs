#![allow(dead_code)]

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use work_atlas::app::AppState;
use work_atlas::auth_token::{now_ms, AuthTokenService, SessionIdentity, SESSION_TTL};
use work_atlas::config::CookiePolicy;
use work_atlas::db::{
    AppliedJob, AppliedJobFilter, Category, DeleteAck, InMemoryStore, InsertAck, Job,
    JobBoardStore, JobFields, JobFilter, ReferenceCollection, UpdateAck,
};
use work_atlas::error::Result;

pub const TEST_SECRET: &[u8] = b"work-atlas-test-secret-0123456789abcdef";

pub fn auth_tokens() -> AuthTokenService {
    AuthTokenService::new(TEST_SECRET.to_vec(), SESSION_TTL).expect("auth tokens")
}

pub fn state_with(store: Arc<dyn JobBoardStore>) -> AppState {
    AppState::new(store, auth_tokens(), CookiePolicy::for_environment(false))
}

/// A currently valid session token for `email`.
pub fn session_token(email: &str) -> String {
    auth_tokens()
        .issue(&SessionIdentity::new(email), now_ms())
        .expect("issue token")
}

/// A token that expired an hour ago.
pub fn expired_token(email: &str) -> String {
    let issued_at = now_ms() - Duration::from_secs(2 * 3600).as_millis() as u64;
    auth_tokens()
        .issue(&SessionIdentity::new(email), issued_at)
        .expect("issue token")
}

/// Wraps the in-memory store and counts every store call that reaches it.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobBoardStore for CountingStore {
    async fn ping(&self) -> Result<()> {
        self.hit();
        self.inner.ping().await
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.hit();
        self.inner.categories().await
    }

    async fn reference_rows(&self, collection: ReferenceCollection) -> Result<Vec<Document>> {
        self.hit();
        self.inner.reference_rows(collection).await
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        self.hit();
        self.inner.find_jobs(filter).await
    }

    async fn find_job(&self, id: &ObjectId) -> Result<Option<Job>> {
        self.hit();
        self.inner.find_job(id).await
    }

    async fn insert_job(&self, job: Job) -> Result<InsertAck> {
        self.hit();
        self.inner.insert_job(job).await
    }

    async fn upsert_job(&self, id: &ObjectId, fields: &JobFields) -> Result<UpdateAck> {
        self.hit();
        self.inner.upsert_job(id, fields).await
    }

    async fn increment_applicants(&self, id: &ObjectId) -> Result<UpdateAck> {
        self.hit();
        self.inner.increment_applicants(id).await
    }

    async fn delete_job(&self, id: &ObjectId) -> Result<DeleteAck> {
        self.hit();
        self.inner.delete_job(id).await
    }

    async fn find_applied_jobs(&self, filter: &AppliedJobFilter) -> Result<Vec<AppliedJob>> {
        self.hit();
        self.inner.find_applied_jobs(filter).await
    }

    async fn insert_applied_job(&self, applied: AppliedJob) -> Result<InsertAck> {
        self.hit();
        self.inner.insert_applied_job(applied).await
    }
}
