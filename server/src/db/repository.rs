use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{ClientOptions, Credential},
    results::UpdateResult,
    Client, Collection, Database,
};

use super::filters::{AppliedJobFilter, JobFilter};
use super::models::{
    AppliedJob, Category, DeleteAck, InsertAck, Job, JobFields, ReferenceCollection, UpdateAck,
};
use super::JobBoardStore;
use crate::config::AppConfig;
use crate::error::{JobBoardError, Result};

#[derive(Clone)]
pub struct MongoDbContext {
    client: Client,
    db: Database,
}

impl MongoDbContext {
    pub fn new(client: Client, database_name: &str) -> Self {
        Self {
            db: client.database(database_name),
            client,
        }
    }

    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        if let (Some(user), Some(pass)) = (&config.db_user, &config.db_pass) {
            options.credential = Some(
                Credential::builder()
                    .username(user.clone())
                    .password(pass.clone())
                    .build(),
            );
        }
        options.app_name = Some("work-atlas".to_string());

        let client = Client::with_options(options)?;
        Ok(Self::new(client, &config.database_name))
    }

    pub fn catalog(&self) -> CategoryRepository {
        CategoryRepository {
            collection: self.db.collection("categories"),
        }
    }

    pub fn reference(&self, collection: ReferenceCollection) -> Collection<Document> {
        self.db.collection(collection.collection_name())
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository {
            collection: self.db.collection("allJobs"),
        }
    }

    pub fn applied_jobs(&self) -> AppliedJobRepository {
        AppliedJobRepository {
            collection: self.db.collection("appliedJobs"),
        }
    }
}

fn inserted_id(id: Bson) -> Result<ObjectId> {
    id.as_object_id()
        .ok_or_else(|| JobBoardError::Store(format!("unexpected inserted id: {}", id)))
}

fn update_ack(result: UpdateResult) -> UpdateAck {
    let upserted_id = result.upserted_id.map(|id| match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    });

    UpdateAck {
        acknowledged: true,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_count: u64::from(upserted_id.is_some()),
        upserted_id,
    }
}

#[derive(Clone)]
pub struct CategoryRepository {
    collection: Collection<Category>,
}

impl CategoryRepository {
    pub async fn find_all(&self) -> Result<Vec<Category>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[derive(Clone)]
pub struct JobRepository {
    collection: Collection<Job>,
}

impl JobRepository {
    pub async fn find(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let cursor = self.collection.find(filter.to_document()).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Job>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn insert(&self, job: &Job) -> Result<ObjectId> {
        let result = self.collection.insert_one(job).await?;
        inserted_id(result.inserted_id)
    }

    pub async fn upsert(&self, id: &ObjectId, fields: &JobFields) -> Result<UpdateResult> {
        let mut update = doc! { "$setOnInsert": { "NumberOfApplicants": 0_i64 } };
        if !fields.is_empty() {
            update.insert("$set", fields.to_set_document());
        }

        Ok(self
            .collection
            .update_one(doc! { "_id": id }, update)
            .upsert(true)
            .await?)
    }

    pub async fn increment_applicants(&self, id: &ObjectId) -> Result<UpdateResult> {
        Ok(self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "NumberOfApplicants": 1 } },
            )
            .await?)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }
}

#[derive(Clone)]
pub struct AppliedJobRepository {
    collection: Collection<AppliedJob>,
}

impl AppliedJobRepository {
    pub async fn find(&self, filter: &AppliedJobFilter) -> Result<Vec<AppliedJob>> {
        let cursor = self.collection.find(filter.to_document()).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn insert(&self, applied: &AppliedJob) -> Result<ObjectId> {
        let result = self.collection.insert_one(applied).await?;
        inserted_id(result.inserted_id)
    }
}

#[async_trait]
impl JobBoardStore for MongoDbContext {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.catalog().find_all().await
    }

    async fn reference_rows(&self, collection: ReferenceCollection) -> Result<Vec<Document>> {
        let cursor = self.reference(collection).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        self.jobs().find(filter).await
    }

    async fn find_job(&self, id: &ObjectId) -> Result<Option<Job>> {
        self.jobs().find_by_id(id).await
    }

    async fn insert_job(&self, job: Job) -> Result<InsertAck> {
        let id = self.jobs().insert(&job).await?;
        Ok(InsertAck::new(&id))
    }

    async fn upsert_job(&self, id: &ObjectId, fields: &JobFields) -> Result<UpdateAck> {
        let result = self.jobs().upsert(id, fields).await?;
        Ok(update_ack(result))
    }

    async fn increment_applicants(&self, id: &ObjectId) -> Result<UpdateAck> {
        let result = self.jobs().increment_applicants(id).await?;
        Ok(update_ack(result))
    }

    async fn delete_job(&self, id: &ObjectId) -> Result<DeleteAck> {
        let deleted = self.jobs().delete(id).await?;
        Ok(DeleteAck::new(deleted))
    }

    async fn find_applied_jobs(&self, filter: &AppliedJobFilter) -> Result<Vec<AppliedJob>> {
        self.applied_jobs().find(filter).await
    }

    async fn insert_applied_job(&self, applied: AppliedJob) -> Result<InsertAck> {
        let id = self.applied_jobs().insert(&applied).await?;
        Ok(InsertAck::new(&id))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        log::info!("MongoDB client shut down");
    }
}
