use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};

use crate::auth_token::{now_ms, AuthTokenService, SESSION_COOKIE};
use crate::error::JobBoardError;

/// Rejects requests without a valid `token` cookie before the handler (and its
/// store query) runs. On success the caller's `SessionIdentity` is available to
/// handlers as `web::ReqData<SessionIdentity>`.
pub async fn auth_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let Some(token) = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        log::debug!("Rejected {}: no session cookie", req.path());
        return Ok(req
            .error_response(JobBoardError::Unauthorized)
            .map_into_right_body());
    };

    let Some(tokens) = req.app_data::<web::Data<AuthTokenService>>() else {
        log::error!("Session token service not configured");
        return Ok(req
            .error_response(JobBoardError::Unauthorized)
            .map_into_right_body());
    };

    match tokens.verify(&token, now_ms()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims.identity);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err) => {
            log::debug!("Rejected {}: {}", req.path(), err);
            Ok(req
                .error_response(JobBoardError::Unauthorized)
                .map_into_right_body())
        }
    }
}
