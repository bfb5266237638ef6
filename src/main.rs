use anyhow::Result;
use std::sync::Arc;

use lotto_checker::api::LottoApi;
use lotto_checker::config;
use lotto_checker::mcp_handler::{MCPHandler, stdio};
use lotto_checker::use_cases::{CheckUseCase, DrawUseCase, TicketUseCase};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(config::env_log_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Checking tickets against {}", config.api_base);

    let api = Arc::new(LottoApi::new(&config.api_base, config.http_timeout())?);

    let check_use_case = CheckUseCase::new(Arc::clone(&api));
    let ticket_use_case = TicketUseCase::new();
    let draw_use_case = DrawUseCase::new(Arc::clone(&api));

    let handler = MCPHandler::new(
        Arc::new(check_use_case),
        Arc::new(ticket_use_case),
        Arc::new(draw_use_case),
    );

    let (reader, writer) = stdio();

    handler.serve(reader, writer).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
