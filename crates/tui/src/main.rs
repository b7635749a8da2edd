use duckvault_tui::{app::App, config, error::Result, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    info!(base_url = %config.base_url, "starting duckvault");

    let mut app = App::new(config)?;
    if let Err(err) = app.run().await {
        error!(%err, "terminal ui stopped");
        return Err(err);
    }
    Ok(())
}
