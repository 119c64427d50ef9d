//! `vgen`: command-line dashboard for the vgen-api proxy.
//!
//! Set VGEN_API_URL to point at the proxy (default http://localhost:3000).

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vgen_dashboard::render::{render_video, render_view};
use vgen_dashboard::{Dashboard, DashboardConfig, ProxyClient, VideoSource};
use vgen_models::{
    CatalogueEntry, CreateVideoRequest, VideoId, AVATARS, BACKGROUNDS, DEFAULT_AVATAR,
    DEFAULT_BACKGROUND,
};

#[derive(Parser)]
#[command(name = "vgen", about = "AI video studio CLI")]
struct Cli {
    /// Base URL of the vgen-api proxy
    #[arg(long, env = "VGEN_API_URL", global = true)]
    api_url: Option<String>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List videos
    List,
    /// Show a single video
    Get {
        /// Video ID
        id: String,
    },
    /// Create a new video
    Create {
        /// What the avatar says
        #[arg(long)]
        script: String,
        #[arg(long)]
        title: Option<String>,
        /// Avatar identifier (see `vgen avatars`)
        #[arg(long)]
        avatar: Option<String>,
        /// Background identifier (see `vgen backgrounds`)
        #[arg(long)]
        background: Option<String>,
        /// Poll until the video is complete or failed
        #[arg(long)]
        wait: bool,
    },
    /// Show the video list and keep it updated until nothing is in flight
    Watch,
    /// List available avatars
    Avatars,
    /// List available backgrounds
    Backgrounds,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_catalogue(entries: &[CatalogueEntry], default: &str) {
    for entry in entries {
        let marker = if entry.id == default { " (default)" } else { "" };
        println!("{:<24} {}{}", entry.id, entry.label, marker);
    }
}

/// Logs go to stderr so stdout stays clean for output.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let _ = rustls::crypto::ring::default_provider().install_default();

    init_tracing();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let client = ProxyClient::new(&config.api_url, config.request_timeout)
        .context("Failed to create API client. Check VGEN_API_URL")?;
    let client = Arc::new(client);

    match cli.command {
        Commands::List => {
            let dashboard = Dashboard::new(client, &config);
            dashboard.load_videos().await;
            dashboard.shutdown().await;

            let view = dashboard.state().snapshot().await;
            if let Some(error) = view.error() {
                anyhow::bail!("{}", error);
            }
            if cli.json {
                print_json(&view.videos())?;
            } else {
                print!("{}", render_view(&view));
            }
        }
        Commands::Get { id } => {
            let video = client.get_video(&VideoId::from(id)).await?;
            if cli.json {
                print_json(&video)?;
            } else {
                print!("{}", render_video(&video, false));
            }
        }
        Commands::Create {
            script,
            title,
            avatar,
            background,
            wait,
        } => {
            let request = CreateVideoRequest {
                title,
                avatar,
                background,
                ..CreateVideoRequest::new(script)
            };

            let dashboard = Dashboard::new(client, &config);
            let created = dashboard
                .create_video(request)
                .await
                .context("Failed to create video")?;

            if wait && created.is_active() {
                eprintln!("Waiting for {} to finish...", created.id);
                tokio::select! {
                    _ = dashboard.wait_until_settled(Some(&created.id)) => {}
                    _ = tokio::signal::ctrl_c() => {
                        eprintln!("Interrupted");
                    }
                }
            }
            dashboard.shutdown().await;

            let view = dashboard.state().snapshot().await;
            let video = view.video(&created.id).unwrap_or(&created);
            if cli.json {
                print_json(video)?;
            } else {
                print!("{}", render_video(video, false));
            }
        }
        Commands::Watch => {
            let dashboard = Dashboard::new(client, &config);
            watch(&dashboard).await;
            dashboard.shutdown().await;
        }
        Commands::Avatars => {
            if cli.json {
                print_json(&AVATARS)?;
            } else {
                print_catalogue(AVATARS, DEFAULT_AVATAR);
            }
        }
        Commands::Backgrounds => {
            if cli.json {
                print_json(&BACKGROUNDS)?;
            } else {
                print_catalogue(BACKGROUNDS, DEFAULT_BACKGROUND);
            }
        }
    }

    Ok(())
}

/// Re-render on every view change until nothing is pending or Ctrl-C.
async fn watch(dashboard: &Dashboard) {
    let state = dashboard.state();
    let mut changes = state.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    dashboard.load_videos().await;

    let mut last = String::new();
    loop {
        let view = state.snapshot().await;
        let frame = render_view(&view);
        if frame != last {
            println!("{}", frame);
            last = frame;
        }

        if !view.is_loading() && view.pending().is_empty() {
            break;
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                eprintln!("Interrupted");
                break;
            }
        }
    }
}
