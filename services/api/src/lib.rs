mod cli;
mod controller;
mod infra;
mod routes;
mod server;

use jobs_intel::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
