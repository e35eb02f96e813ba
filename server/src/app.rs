use actix_cors::Cors;
use actix_web::{http::header, web};
use std::{net::TcpListener, sync::Arc};

use crate::{
    auth_token::AuthTokenService,
    config::CookiePolicy,
    db::JobBoardStore,
    error::{JobBoardError, Result},
    handlers,
};

const JSON_BODY_LIMIT: usize = 256 * 1024;

/// Shared state handed to every worker: the store client, token service and
/// cookie policy are built once in `main` and cloned into each `App`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobBoardStore>,
    pub auth_tokens: AuthTokenService,
    pub cookie_policy: CookiePolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn JobBoardStore>,
        auth_tokens: AuthTokenService,
        cookie_policy: CookiePolicy,
    ) -> Self {
        Self {
            store,
            auth_tokens,
            cookie_policy,
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.store.clone()))
            .app_data(web::Data::new(self.auth_tokens.clone()))
            .app_data(web::Data::new(self.cookie_policy))
            .app_data(json_config())
            .app_data(query_config());
        routes(cfg);
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::liveness)
        .service(handlers::health_check)
        // Reference data
        .service(handlers::list_categories)
        .service(handlers::list_job_services)
        .service(handlers::list_hiring)
        .service(handlers::list_clients)
        // Jobs
        .service(handlers::jobs_by_category)
        .service(handlers::search_jobs)
        .service(handlers::get_job)
        .service(handlers::my_jobs)
        .service(handlers::create_job)
        .service(handlers::upsert_job)
        .service(handlers::record_application)
        .service(handlers::delete_job)
        // Applications
        .service(handlers::list_applied_jobs)
        .service(handlers::apply_to_job)
        // Session
        .service(handlers::issue_token)
        .service(handlers::logout);
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| JobBoardError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| JobBoardError::BadRequest(err.to_string()).into())
}

pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

/// Binds the HTTP listener up front so a taken or invalid address is reported
/// as a startup error.
pub fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .map_err(|e| JobBoardError::Config(format!("cannot bind {}:{}: {}", host, port, e)))
}
