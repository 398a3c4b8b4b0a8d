mod bootstrap;

use anyhow::Result;
use dashboard_core::models::DataSource;
use dashboard_core::settings::Settings;
use dashboard_runtime::dataset_cache::{CachePolicy, DatasetCache};
use dashboard_runtime::orchestrator::LoadOrchestrator;
use dashboard_runtime::session::{DashboardSession, SessionConfig};
use dashboard_ui::app::App;
use dashboard_ui::labels::Language;
use dashboard_ui::report::render_report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bike Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, View: {}, Theme: {}, Language: {}",
        settings.source,
        settings.view,
        settings.theme,
        settings.lang
    );

    let source = settings.data_source();
    let policy = CachePolicy::from_ttl(settings.cache_ttl());
    let language = Language::from_code(&settings.lang);
    let config = SessionConfig {
        target_column: settings.target.clone(),
        weekend_codes: settings.weekend_codes.clone(),
        ..SessionConfig::default()
    };

    if settings.is_report_view() {
        return run_report(&settings, source, policy, language, config).await;
    }

    tracing::info!("Starting interactive dashboard...");
    let (rx, handle) = LoadOrchestrator::new(source, policy).start();

    let app = App::new(
        &settings.theme,
        language,
        settings.weekday_convention(),
        settings.source.clone(),
        config,
    );

    // The loop exits on 'q' / Ctrl+C inside the TUI. We also listen for
    // Ctrl+C at the OS level so that signals received while the terminal is
    // in raw mode are handled cleanly.
    tokio::select! {
        result = app.run(rx, handle) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    Ok(())
}

/// Load once, print every section as plain text and exit.
///
/// A failed load is printed like any other report and then returned as the
/// process error.
async fn run_report(
    settings: &Settings,
    source: DataSource,
    policy: CachePolicy,
    language: Language,
    config: SessionConfig,
) -> Result<()> {
    tracing::info!("Rendering text report...");

    // The reader blocks on network and file IO.
    let loaded = tokio::task::spawn_blocking(move || DatasetCache::new(policy).get(&source)).await?;

    let mut session = DashboardSession::new(config);
    let failure = match loaded {
        Ok(table) => {
            session.attach_table(table);
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "report load failed");
            session.record_load_failure(e.to_string());
            Some(e)
        }
    };

    print!(
        "{}",
        render_report(
            &session,
            &settings.source,
            settings.weekday_convention(),
            language.labels(),
        )
    );

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
