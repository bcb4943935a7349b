mod cli;

use clap::Parser;
use cli::Cli;
use colored::*;
use plugin_gallery::{GalleryConfig, GalleryController, GalleryPage, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = GalleryConfig {
        topic: cli.topic,
        api_base_url: cli.api_url,
        raw_base_url: cli.raw_url,
        mode: cli.mode.into(),
        ..Default::default()
    };

    eprintln!("{}", "Plugin Gallery".bold().green());
    eprintln!("Topic: {} ({:?} entries)\n", config.topic.as_str().cyan(), config.mode);

    let mut controller = GalleryController::new(&config)?;
    let mut page = GalleryPage::new();

    for summary in page.load_pages(&mut controller, cli.pages).await {
        if cli.json {
            eprintln!("{}", serde_json::to_string(&summary)?);
        } else {
            eprintln!(
                "✅ Page {}: {} repositories ({} with README)",
                summary.page, summary.rendered, summary.with_readme
            );
        }
    }
    if let Some(status) = page.status() {
        eprintln!("{} {}", "⚠️".yellow(), status.red());
    }

    let html = page.to_html();
    match cli.output {
        Some(path) => {
            std::fs::write(&path, html)?;
            eprintln!("📄 Wrote {} entries to {}", page.container().entries().len(), path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}
