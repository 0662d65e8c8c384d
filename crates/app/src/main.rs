//! `marquee` -- terminal driver for the movie search.
//!
//! Each line read from stdin replaces the search-box value. Settled
//! values are searched against the catalog and the resulting movie list
//! and trending searches are rendered to stdout. Logs go to stderr.
//!
//! Configuration is read from the environment (and a `.env` file if
//! present); see [`AppConfig::from_env`] for the variables.

use std::sync::Arc;

use marquee_app::{view, AppConfig, SearchCoordinator, SearchState, TrendingLoader};
use marquee_catalog::MovieCatalog;
use marquee_core::search::TRENDING_LIMIT;
use marquee_core::{SearchDebouncer, SearchEntry};
use marquee_trending::TrendingStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "marquee_app=info,marquee_catalog=info,marquee_trending=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        catalog = %config.catalog_base_url,
        backend = ?config.trending_backend,
        "Starting marquee",
    );

    let catalog: Arc<dyn MovieCatalog> = Arc::new(config.catalog());
    let store = TrendingStore::new(config.trending_collection(), config.image_base_url.clone());
    let coordinator = Arc::new(SearchCoordinator::new(catalog, store.clone()));
    let loader = Arc::new(TrendingLoader::new(store, TRENDING_LIMIT));

    let view_task = tokio::spawn(render_loop(
        coordinator.subscribe(),
        loader.subscribe(),
        config.image_base_url.clone(),
    ));
    tokio::spawn({
        let loader = Arc::clone(&loader);
        async move {
            loader.load().await;
        }
    });

    let (input_tx, input_rx) = watch::channel(String::new());
    let (settled_rx, _debouncer) = SearchDebouncer::default().spawn(input_rx);
    let searches = tokio::spawn(Arc::clone(&coordinator).run(settled_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        input_tx.send_replace(line);
    }

    tracing::info!("Input closed, finishing outstanding searches");
    drop(input_tx);
    searches.await?;

    drop(coordinator);
    drop(loader);
    let _ = view_task.await;
    Ok(())
}

/// Print every published state until the search state channel closes.
async fn render_loop(
    mut search: watch::Receiver<SearchState>,
    mut trending: watch::Receiver<Vec<SearchEntry>>,
    image_base: String,
) {
    loop {
        tokio::select! {
            biased;
            changed = search.changed() => {
                if changed.is_err() {
                    return;
                }
                let text = view::render_search(&search.borrow_and_update(), &image_base);
                println!("{text}");
            }
            changed = trending.changed() => {
                if changed.is_err() {
                    return;
                }
                let text = view::render_trending(&trending.borrow_and_update());
                if !text.is_empty() {
                    println!("{text}");
                }
            }
        }
    }
}
