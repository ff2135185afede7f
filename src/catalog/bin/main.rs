use lambda_http::{run, Error};
use library_catalog::catalog::controller::router;
use library_catalog::core::controller::AppState;
use library_catalog::core::repository::RepositoryStore;
use library_catalog::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let store = RepositoryStore::from(std::env::var("CATALOG_STORE").unwrap_or_default());
    let branch = std::env::var("CATALOG_BRANCH").unwrap_or_else(|_| "dev".to_string());

    if store != RepositoryStore::DynamoDB && std::env::var("AWS_LAMBDA_RUNTIME_API").is_err() {
        // local runs go through the lambda runtime emulator
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }

    tracing::info!(%store, %branch, "starting catalog");
    let state = AppState::new(branch.as_str(), store).await;

    run(router(state)).await
}
