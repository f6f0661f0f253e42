mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use madison_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
