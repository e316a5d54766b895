use std::io::Write;

use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::info;

use sublink::generator::GenerateOptions;
use sublink::interfaces::{extract_from_source, SubscriptionSource};
use sublink::settings::init_settings;
use sublink::utils::FetchOptions;
use sublink::web_handlers::interfaces;
use sublink::Settings;

const DEFAULT_PREF_PATH: &str = "pref.toml";

/// Extract share links from Clash and Sing-box subscriptions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Subscription URL to convert directly instead of starting the server
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// Local subscription file to convert directly instead of starting the server
    #[arg(long, value_name = "PATH")]
    file: Option<String>,

    /// Write the links here instead of stdout (used with --url or --file)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,
}

async fn convert_once(source: SubscriptionSource, output: Option<&str>) -> anyhow::Result<()> {
    let global = Settings::current();
    let outcome = extract_from_source(
        &source,
        &FetchOptions::from(global.as_ref()),
        &GenerateOptions::from(global.as_ref()),
    )
    .await?;

    let mut links = outcome.all_links();
    links.push('\n');
    match output {
        Some(path) => {
            std::fs::write(path, links).with_context(|| format!("failed to write {}", path))?;
            info!("Wrote {} links to {}", outcome.results.len(), path);
        }
        None => std::io::stdout()
            .write_all(links.as_bytes())
            .context("failed to write to stdout")?,
    }

    info!("{}: {}", outcome.message(), outcome.summary());
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.output.is_some() && args.url.is_none() && args.file.is_none() {
        bail!("-o/--output must be used together with --url or --file");
    }

    let pref_path = args.config.as_deref().unwrap_or(DEFAULT_PREF_PATH);
    let loaded =
        init_settings(pref_path).with_context(|| format!("failed to load {}", pref_path))?;
    let global = Settings::current();

    env_logger::init_from_env(Env::default().default_filter_or(global.log_level.as_str()));
    if loaded {
        info!("Loaded preference from {}", pref_path);
    } else {
        info!("Preference file {} not found, using defaults", pref_path);
    }

    if let Some(url) = args.url {
        info!("Processing subscription from URL: {}", url);
        return convert_once(SubscriptionSource::Url(url), args.output.as_deref()).await;
    }
    if let Some(path) = args.file {
        info!("Processing subscription from file: {}", path);
        let content =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path))?;
        return convert_once(SubscriptionSource::Upload(content), args.output.as_deref()).await;
    }

    let listen_address = args.address.unwrap_or_else(|| global.listen_address.clone());
    let listen_port = args.port.unwrap_or(global.listen_port);

    info!("sublink starting on {}:{}", listen_address, listen_port);

    HttpServer::new(|| {
        App::new()
            // Register web handlers
            .configure(interfaces::config)
            // For health check
            .route("/", web::get().to(|| async { "sublink is running!" }))
    })
    .bind((listen_address.as_str(), listen_port))
    .with_context(|| format!("failed to bind {}:{}", listen_address, listen_port))?
    .workers(global.max_concur_threads)
    .run()
    .await?;

    Ok(())
}
