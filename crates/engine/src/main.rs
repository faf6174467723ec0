//! DNA Forge Engine - headless entry point.
//!
//! Wires the engine from environment configuration, opens one player
//! session and replays a script against it when one is configured.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dnaforge_domain::{PlayerId, TemplateId};
use dnaforge_engine::infrastructure::{
    catalog_loader::{load_catalog, starter_catalog},
    clock::SystemClock,
    config::EngineConfig,
    confirm::AutoConfirm,
    http_persistence::HttpPersistenceClient,
    memory_persistence::InMemoryPersistence,
    ports::PersistencePort,
    render::LoggingRenderer,
    script_loader::load_script,
};
use dnaforge_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnaforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DNA Forge Engine");

    let config = EngineConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => load_catalog(path).await?,
        None => starter_catalog()?,
    };

    let persistence: Arc<dyn PersistencePort> = match &config.persistence_url {
        Some(url) => {
            tracing::info!(url = %url, "Using HTTP persistence backend");
            Arc::new(HttpPersistenceClient::with_timeout(url, config.flush_timeout))
        }
        None => {
            tracing::warn!("DNAFORGE_PERSISTENCE_URL not set, flushes stay in memory");
            Arc::new(InMemoryPersistence::new())
        }
    };

    let script_path = config.script_path.clone();
    let app = App::new(
        config,
        catalog,
        persistence,
        Arc::new(LoggingRenderer::new()),
        Arc::new(AutoConfirm::accepting()),
        Arc::new(SystemClock::new()),
    );

    let mut session = app.open_session(PlayerId::new());

    match script_path {
        Some(path) => {
            for (i, step) in load_script(&path).await?.into_iter().enumerate() {
                match session.run_step(step).await {
                    Ok(events) => {
                        for event in events {
                            tracing::info!(step = i, event = ?event, "Session event");
                        }
                    }
                    // A failed step is reported and the script carries on.
                    Err(e) => tracing::warn!(step = i, error = %e, "Script step failed"),
                }
            }
        }
        None => {
            // Seed a handful of DNA so the containers have something to show.
            let mut templates: Vec<TemplateId> =
                app.catalog.templates().map(|t| t.id.clone()).collect();
            templates.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            templates.truncate(3);
            for template_id in &templates {
                let event = session.acquire(template_id).await?;
                tracing::info!(event = ?event, "Seeded DNA");
            }
        }
    }

    for result in session.settle_flushes().await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Background flush failed");
        }
    }
    let outcome = session.flush_now().await?;
    tracing::info!(
        player_id = %session.state().player_id(),
        outcome = ?outcome,
        instances = session.state().total_instances(),
        "Final state flushed"
    );

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
