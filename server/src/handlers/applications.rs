use actix_web::{get, middleware::from_fn, post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    auth_token::SessionIdentity,
    db::{models::render_all, AppliedJob, AppliedJobFilter, JobBoardStore},
    error::Result,
    middleware::auth_middleware,
};

#[derive(Debug, Deserialize)]
pub struct AppliedJobsQuery {
    pub email: String,
    pub category: Option<String>,
}

#[get("/appliedJobs", wrap = "from_fn(auth_middleware)")]
pub async fn list_applied_jobs(
    store: web::Data<dyn JobBoardStore>,
    query: web::Query<AppliedJobsQuery>,
    identity: web::ReqData<SessionIdentity>,
) -> Result<HttpResponse> {
    let filter = AppliedJobFilter::new(&query.email, query.category.as_deref());
    let applied = store.find_applied_jobs(&filter).await?;

    log::debug!(
        "{} listed {} applications for {}",
        identity.email,
        applied.len(),
        filter.email
    );

    Ok(HttpResponse::Ok().json(render_all(&applied)?))
}

#[post("/appliedJobs")]
pub async fn apply_to_job(
    store: web::Data<dyn JobBoardStore>,
    applied: web::Json<AppliedJob>,
) -> Result<HttpResponse> {
    let applied = applied.into_inner().into_new_record();
    let email = applied.email().unwrap_or_default().to_string();
    let ack = store.insert_applied_job(applied).await?;

    log::info!("Recorded application {} for {}", ack.inserted_id, email);

    Ok(HttpResponse::Ok().json(ack))
}
