#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use trendcast::{config, logger, ui};

fn main() -> anyhow::Result<()> {
    // Init logger first; the guard flushes log.txt on exit
    let _log_guard = logger::init();
    tracing::info!("app starting");

    let cfg = config::Config::load();
    tracing::info!(
        model = %cfg.gemini_model,
        base_url = %cfg.base_url,
        timeout_secs = cfg.request_timeout_secs,
        "config loaded"
    );

    // Run UI on main thread (blocks)
    if let Err(e) = ui::run_ui_main_thread(cfg) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
