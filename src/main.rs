use anyhow::{Context, Result};
use tracing::{error, info};

use colly_inventory::app_state::build_app_state;
use colly_inventory::config::AppConfig;
use colly_inventory::logging::init_logging;
use colly_inventory::scheduler::run_scheduler;
use colly_inventory::scheduler::trigger::{CronTrigger, StartupTrigger};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(config.log_dir.as_deref());

    info!(
        "Starting inventory refresh (schedule '{}', data dir {:?})",
        config.cron_schedule, config.data_dir
    );

    let cron = CronTrigger::parse(&config.cron_schedule)?;
    let run_on_startup = config.run_on_startup;
    let state = build_app_state(config).context("failed to build application state")?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    };

    let summary = if run_on_startup {
        run_scheduler(state.inventory_service.clone(), StartupTrigger::new(cron), shutdown).await
    } else {
        run_scheduler(state.inventory_service.clone(), cron, shutdown).await
    };

    info!(
        "Stopped: {} completed, {} failed, {} skipped cycle(s)",
        summary.completed, summary.failed, summary.skipped
    );
    Ok(())
}
