use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use article_mirror::{
    article::{ArticleStore, CategoryImages},
    http::{self, AppState},
    mirror::{GitHubConfig, GitHubMirror, Mirror, RecordingMirror},
};

#[derive(Parser)]
#[command(name = "article-mirror")]
#[command(about = "Article service backed by a local JSON file mirrored to GitHub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "ARTICLES_FILE", default_value = "data/articles.json")]
    data_file: PathBuf,

    /// JSON object of category -> default image URL, merged over the built-ins
    #[arg(long, env = "CATEGORY_IMAGES_FILE")]
    category_images: Option<PathBuf>,

    #[arg(long, default_value = "50")]
    body_limit_mb: usize,

    /// Keep the mirror in memory instead of pushing to GitHub
    #[arg(long)]
    offline: bool,

    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("article_mirror={filter_level},tower_http=info").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mirror: Arc<dyn Mirror> = if args.offline {
        warn!("offline mode: changes are kept local and images are not published");
        Arc::new(RecordingMirror::new())
    } else {
        let config = GitHubConfig::from_env()
            .context("failed to load GitHub configuration from environment")?;
        info!(
            "mirroring to {}/{} on branch {}",
            config.owner, config.repo, config.branch
        );
        Arc::new(GitHubMirror::new(config)?)
    };

    let images = match &args.category_images {
        Some(path) => CategoryImages::from_file(path)
            .with_context(|| format!("failed to load category images from {}", path.display()))?,
        None => CategoryImages::default(),
    };

    let store = ArticleStore::new(&args.data_file, Arc::clone(&mirror));
    info!("article file: {}", store.path().display());

    let state = AppState::new(store, mirror, images);
    let app = http::router(state, args.body_limit_mb * 1024 * 1024);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;

    info!("article server started on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("article server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "article-mirror",
            "--port",
            "9000",
            "--data-file",
            "/tmp/articles.json",
            "--offline",
        ])
        .unwrap();

        assert_eq!(args.port, 9000);
        assert_eq!(args.data_file, PathBuf::from("/tmp/articles.json"));
        assert!(args.offline);
        assert!(!args.debug);
    }
}
