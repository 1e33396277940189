use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use shareit::core::controller::AppState;
use shareit::core::domain::Configuration;
use shareit::core::repository::RepositoryStore;
use shareit::requests::controller::{add_request, get_request, list_other_requests, list_own_requests};
use shareit::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let state = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        AppState::new(Configuration::from_env(), RepositoryStore::LocalDynamoDB)
    } else {
        AppState::new(Configuration::from_env(), RepositoryStore::DynamoDB)
    };

    let app = Router::new()
        .route("/requests", post(add_request).get(list_own_requests))
        .route("/requests/all", get(list_other_requests))
        .route("/requests/:id", get(get_request))
        .with_state(state);

    run(app).await
}
