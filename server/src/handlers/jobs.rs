use actix_web::{delete, get, middleware::from_fn, patch, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    auth_token::SessionIdentity,
    db::{
        models::{parse_object_id, render, render_all},
        Job, JobBoardStore, JobFields, JobFilter,
    },
    error::Result,
    middleware::auth_middleware,
};

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyJobsQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

async fn list_jobs(store: &dyn JobBoardStore, filter: JobFilter) -> Result<HttpResponse> {
    let jobs = store.find_jobs(&filter).await?;
    log::debug!("Found {} jobs for {:?}", jobs.len(), filter);
    Ok(HttpResponse::Ok().json(render_all(&jobs)?))
}

#[get("/jobsByCategory")]
pub async fn jobs_by_category(
    store: web::Data<dyn JobBoardStore>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse> {
    let filter = JobFilter::by_category(query.category.as_deref());
    list_jobs(store.get_ref(), filter).await
}

#[get("/allJobs")]
pub async fn search_jobs(
    store: web::Data<dyn JobBoardStore>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let filter = JobFilter::by_search(query.search.as_deref());
    list_jobs(store.get_ref(), filter).await
}

#[get("/job/{id}")]
pub async fn get_job(
    store: web::Data<dyn JobBoardStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_object_id(&path)?;
    let job = store.find_job(&id).await?;
    let body = job.as_ref().map(render).transpose()?;
    Ok(HttpResponse::Ok().json(body))
}

#[get("/myJobs", wrap = "from_fn(auth_middleware)")]
pub async fn my_jobs(
    store: web::Data<dyn JobBoardStore>,
    query: web::Query<MyJobsQuery>,
    identity: web::ReqData<SessionIdentity>,
) -> Result<HttpResponse> {
    log::debug!(
        "{} listing jobs created by {}",
        identity.email,
        query.user_id
    );
    list_jobs(store.get_ref(), JobFilter::by_creator(&query.user_id)).await
}

#[post("/allJobs")]
pub async fn create_job(
    store: web::Data<dyn JobBoardStore>,
    job: web::Json<Job>,
) -> Result<HttpResponse> {
    let job = job.into_inner().into_new_record();
    let title = job.job_title().unwrap_or_default().to_string();
    let ack = store.insert_job(job).await?;

    log::info!("Created job '{}' ({})", title, ack.inserted_id);

    Ok(HttpResponse::Ok().json(ack))
}

#[put("/job/{id}")]
pub async fn upsert_job(
    store: web::Data<dyn JobBoardStore>,
    path: web::Path<String>,
    fields: web::Json<JobFields>,
) -> Result<HttpResponse> {
    let id = parse_object_id(&path)?;
    let ack = store.upsert_job(&id, &fields).await?;

    if ack.upserted_id.is_some() {
        log::info!("Upsert created job {}", id.to_hex());
    } else {
        log::info!(
            "Updated job {} (modified: {})",
            id.to_hex(),
            ack.modified_count
        );
    }

    Ok(HttpResponse::Ok().json(ack))
}

#[patch("/applied/{id}")]
pub async fn record_application(
    store: web::Data<dyn JobBoardStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_object_id(&path)?;
    let ack = store.increment_applicants(&id).await?;

    if ack.matched_count == 0 {
        log::warn!("Applicant count not incremented: job {} not found", id.to_hex());
    }

    Ok(HttpResponse::Ok().json(ack))
}

#[delete("/allJobs/{id}")]
pub async fn delete_job(
    store: web::Data<dyn JobBoardStore>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_object_id(&path)?;
    let ack = store.delete_job(&id).await?;

    log::info!("Deleted job {} (count: {})", id.to_hex(), ack.deleted_count);

    Ok(HttpResponse::Ok().json(ack))
}
