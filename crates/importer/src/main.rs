//! `docportal-import` -- import a web page into a seeded portal.
//!
//! Seeds the sample portal, imports the given source as a new page, and
//! prints the page that was created.
//!
//! # Environment variables
//!
//! | Variable                    | Default                        | Description                         |
//! |-----------------------------|--------------------------------|-------------------------------------|
//! | `IMPORT_FETCH_TIMEOUT_SECS` | `15`                           | Per-request timeout                 |
//! | `IMPORT_USER_AGENT`         | `docportal-importer/<version>` | `User-Agent` header                 |
//! | `IMPORT_PROXIES`            | allorigins, corsproxy.io       | `json:`/`raw:` templates with `{url}` |
//! | `IMPORT_AUTHOR`             | `Current User`                 | Author of imported pages            |
//! | `RUST_LOG`                  | `docportal_importer=info,...`  | Log filter                          |

use clap::Parser;
use docportal_core::portal::Portal;
use docportal_importer::{ImportRequest, Importer, ImporterConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Import a web page (or `demo`) as a new documentation page.
#[derive(Debug, Parser)]
#[command(name = "docportal-import", version)]
struct Cli {
    /// URL to import, or `demo` for the built-in sample article.
    source: String,

    /// Title for the new page (defaults to the document title).
    #[arg(long)]
    title: Option<String>,

    /// Carry the page's styles along, scoped to the imported content.
    #[arg(long)]
    styles: bool,

    /// Print the created page as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docportal_importer=info,docportal_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ImporterConfig::from_env();

    tracing::info!(
        source = %cli.source,
        styles = cli.styles,
        proxies = config.proxies.len(),
        timeout_secs = config.fetch_timeout_secs,
        "Starting import",
    );

    let importer = Importer::from_config(&config)?;
    let mut portal = Portal::seeded();

    let request = ImportRequest {
        source: cli.source,
        title: cli.title,
        include_styles: cli.styles,
    };

    let page_id = match importer.import(&mut portal, &request).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Import failed");
            return Err(e.into());
        }
    };
    let page = portal.get_page(page_id)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        println!("Imported page {}: {}", page.id, page.title);
        println!("{}", page.meta_line());
        println!();
        println!("{}", page.content);
    }

    Ok(())
}
