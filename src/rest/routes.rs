use actix_web::{web, HttpResponse};
use log::error;
use super::super::errors::ServiceError;
use super::super::models::Pagination;
use super::super::operations;
use super::super::AppState;

#[actix_web::get("/leaderboard")]
pub async fn get_leaderboard(
    query: web::Query<Pagination>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let page = query.into_inner();

    match operations::leaderboard(state.store.as_ref(), page, state.config.leaderboard_max_page).await {
        Ok(tests) => Ok(HttpResponse::Ok().json(tests)),
        Err(e @ (ServiceError::Pagination(_) | ServiceError::Validation(_))) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string(), "code": e.code() })))
        }
        Err(e) => {
            error!("Leaderboard query failed: {:?}", e);
            Err(actix_web::error::ErrorInternalServerError(e))
        }
    }
}
