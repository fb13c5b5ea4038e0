use std::fs::File;
use std::sync::Mutex;

use rackio_admin::app::App;
use rackio_admin::config::DashboardConfig;
use rackio_admin::util::log;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config_path = DashboardConfig::resolve_path(std::env::args().nth(1));
    let config = DashboardConfig::load(&config_path)?;

    log::init(&config.log_dir, config.debug)?;
    let trace_file = File::create(config.log_dir.join("trace.log"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(trace_file))
        .with_ansi(false)
        .with_max_level(if log::debug_enabled() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let terminal = ratatui::init();
    let result = match App::new(config) {
        Ok(app) => app.run(terminal).await,
        Err(e) => Err(e),
    };
    ratatui::restore();
    result
}
