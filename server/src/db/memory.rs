use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{oid::ObjectId, Document};
use std::sync::Arc;

use super::filters::{AppliedJobFilter, JobFilter};
use super::models::{
    AppliedJob, Category, DeleteAck, InsertAck, Job, JobFields, ReferenceCollection, UpdateAck,
    APPLICANTS_FIELD,
};
use super::JobBoardStore;
use crate::error::Result;

/// Process-local store with the same observable behaviour as the MongoDB backend.
///
/// Listings come back in insertion order (ObjectIds minted by one process sort
/// chronologically).
#[derive(Clone, Default)]
pub struct InMemoryStore {
    categories: Arc<DashMap<ObjectId, Category>>,
    reference: Arc<DashMap<ReferenceCollection, Vec<Document>>>,
    jobs: Arc<DashMap<ObjectId, Job>>,
    applied_jobs: Arc<DashMap<ObjectId, AppliedJob>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_category(&self, mut category: Category) -> ObjectId {
        let id = *category.id.get_or_insert_with(ObjectId::new);
        self.categories.insert(id, category);
        id
    }

    pub fn seed_reference_row(&self, collection: ReferenceCollection, mut row: Document) {
        if !row.contains_key("_id") {
            row.insert("_id", ObjectId::new());
        }
        self.reference.entry(collection).or_default().push(row);
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

fn sorted_by_id<T: Clone>(map: &DashMap<ObjectId, T>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    let mut rows: Vec<(ObjectId, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, row)| row).collect()
}

#[async_trait]
impl JobBoardStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(sorted_by_id(&self.categories, |_| true))
    }

    async fn reference_rows(&self, collection: ReferenceCollection) -> Result<Vec<Document>> {
        Ok(self
            .reference
            .get(&collection)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        Ok(sorted_by_id(&self.jobs, |job| filter.matches(job)))
    }

    async fn find_job(&self, id: &ObjectId) -> Result<Option<Job>> {
        Ok(self.jobs.get(id).map(|job| job.clone()))
    }

    async fn insert_job(&self, mut job: Job) -> Result<InsertAck> {
        let id = ObjectId::new();
        job.set_id(id);
        self.jobs.insert(id, job);
        Ok(InsertAck::new(&id))
    }

    async fn upsert_job(&self, id: &ObjectId, fields: &JobFields) -> Result<UpdateAck> {
        if let Some(mut job) = self.jobs.get_mut(id) {
            let modified = job.apply(fields);
            return Ok(UpdateAck::matched(modified));
        }

        let mut job = Job::default()
            .with("_id", *id)
            .with(APPLICANTS_FIELD, 0_i64);
        job.apply(fields);
        self.jobs.insert(*id, job);
        log::debug!("Upsert created job {}", id.to_hex());
        Ok(UpdateAck::upserted(id))
    }

    async fn increment_applicants(&self, id: &ObjectId) -> Result<UpdateAck> {
        match self.jobs.get_mut(id) {
            Some(mut job) => {
                job.increment_applicants()?;
                Ok(UpdateAck::matched(true))
            }
            None => Ok(UpdateAck::unmatched()),
        }
    }

    async fn delete_job(&self, id: &ObjectId) -> Result<DeleteAck> {
        let deleted = self.jobs.remove(id).is_some();
        Ok(DeleteAck::new(u64::from(deleted)))
    }

    async fn find_applied_jobs(&self, filter: &AppliedJobFilter) -> Result<Vec<AppliedJob>> {
        Ok(sorted_by_id(&self.applied_jobs, |applied| {
            filter.matches(applied)
        }))
    }

    async fn insert_applied_job(&self, mut applied: AppliedJob) -> Result<InsertAck> {
        let id = ObjectId::new();
        applied.set_id(id);
        self.applied_jobs.insert(id, applied);
        Ok(InsertAck::new(&id))
    }
}
