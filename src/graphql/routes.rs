use actix_web::{http::header, web, get, post, HttpRequest, HttpResponse};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{ErrorExtensions, Pos, Response};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use log::error;
use super::AppState;
use super::super::auth::resolve_identity;
use super::super::errors::ServiceError;
use super::super::metrics::REQUEST_TIME;
use super::super::utils::bearer_token;

// Handles POST /graphql requests for executing GraphQL queries and mutations
#[post("/graphql")]
pub async fn graphql(state: web::Data<AppState>, http: HttpRequest, request: GraphQLRequest) -> GraphQLResponse {
    let timer = REQUEST_TIME.start_timer();

    // Resolve the caller from the bearer token before any resolver runs
    let authorization = http.headers().get(header::AUTHORIZATION).and_then(|value| value.to_str().ok());
    let identity = match resolve_identity(state.store.as_ref(), bearer_token(authorization)).await {
        Ok(identity) => identity,
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            timer.observe_duration();
            let failure = ServiceError::from(e).extend().into_server_error(Pos::default());
            return Response::from_errors(vec![failure]).into();
        }
    };

    // Execute the GraphQL request with the resolved identity attached
    let response = state.schema.execute(request.into_inner().data(identity)).await;
    timer.observe_duration();
    response.into()
}

// Handles GET /graphql requests to serve the GraphQL playground
#[get("/graphql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
