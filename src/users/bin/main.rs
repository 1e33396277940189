use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use shareit::core::controller::AppState;
use shareit::core::domain::Configuration;
use shareit::core::repository::RepositoryStore;
use shareit::users::controller::{add_user, delete_user, find_user_by_id, list_users, update_user};
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
        .route("/users", post(add_user).get(list_users))
        .route("/users/:id", get(find_user_by_id).patch(update_user).delete(delete_user))
        .with_state(state);

    run(app).await
}
