use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use shareit::comments::controller::add_comment;
use shareit::core::controller::AppState;
use shareit::core::domain::Configuration;
use shareit::core::repository::RepositoryStore;
use shareit::items::controller::{add_item, get_item, list_owner_items, search_items, update_item};
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
        .route("/items", post(add_item).get(list_owner_items))
        .route("/items/search", get(search_items))
        .route("/items/:id", get(get_item).patch(update_item))
        .route("/items/:id/comment", post(add_comment))
        .with_state(state);

    run(app).await
}
