use actix_web::{get, web, HttpResponse};

use crate::{
    db::{
        models::{render_all, render_document},
        JobBoardStore, ReferenceCollection,
    },
    error::Result,
};

#[get("/categories")]
pub async fn list_categories(store: web::Data<dyn JobBoardStore>) -> Result<HttpResponse> {
    let categories = store.categories().await?;
    Ok(HttpResponse::Ok().json(render_all(&categories)?))
}

async fn list_reference(
    store: &dyn JobBoardStore,
    collection: ReferenceCollection,
) -> Result<HttpResponse> {
    let rows: Vec<serde_json::Value> = store
        .reference_rows(collection)
        .await?
        .into_iter()
        .map(render_document)
        .collect();

    log::debug!(
        "Listed {} rows from {}",
        rows.len(),
        collection.collection_name()
    );

    Ok(HttpResponse::Ok().json(rows))
}

#[get("/jobServices")]
pub async fn list_job_services(store: web::Data<dyn JobBoardStore>) -> Result<HttpResponse> {
    list_reference(store.get_ref(), ReferenceCollection::JobServices).await
}

#[get("/hiring")]
pub async fn list_hiring(store: web::Data<dyn JobBoardStore>) -> Result<HttpResponse> {
    list_reference(store.get_ref(), ReferenceCollection::Hiring).await
}

#[get("/clients")]
pub async fn list_clients(store: web::Data<dyn JobBoardStore>) -> Result<HttpResponse> {
    list_reference(store.get_ref(), ReferenceCollection::Clients).await
}
