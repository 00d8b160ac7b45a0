//! `vi-analyse`: annotate videos with the Cloud Video Intelligence API.

mod path;
mod report;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vintel_client::{ClientConfig, VideoIntelligenceClient};
use vintel_models::{AnnotationKind, AnnotationKindSet};

use crate::report::Report;

#[derive(Debug, Parser)]
#[command(
    name = "vi-analyse",
    version,
    about = "Submit videos for annotation and report the results"
)]
struct Args {
    /// Service account JSON file; `~/` expands and relative paths resolve
    /// against the home directory
    #[arg(short, long, default_value = ".vi-service-account.json")]
    credentials: String,

    /// Disable label detection (enabled by default)
    #[arg(long)]
    no_label: bool,

    /// Annotate for shot changes
    #[arg(long)]
    shot: bool,

    /// Annotate for explicit content
    #[arg(long)]
    explicit: bool,

    /// Seconds to wait between polls
    #[arg(long, default_value_t = 1)]
    poll_interval: u64,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Video URIs to annotate, e.g. gs://bucket/video.mp4
    #[arg(required = true)]
    uris: Vec<String>,
}

impl Args {
    fn kinds(&self) -> AnnotationKindSet {
        let mut kinds = AnnotationKindSet::empty();
        if !self.no_label {
            kinds.insert(AnnotationKind::Label);
        }
        if self.shot {
            kinds.insert(AnnotationKind::ShotChange);
        }
        if self.explicit {
            kinds.insert(AnnotationKind::ExplicitContent);
        }
        kinds
    }
}

fn init_tracing(debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_target(false))
        .with(env_filter)
        .init();
}

async fn run(args: &Args) -> Result<()> {
    let credentials = path::resolve_credentials(&args.credentials)?;
    debug!(credentials = %credentials.display(), "Loading service account");

    let client =
        VideoIntelligenceClient::from_service_account_file(ClientConfig::from_env(), &credentials)
            .context("failed to create client")?;

    let kinds = args.kinds();
    let poll_interval = Duration::from_secs(args.poll_interval.max(1));
    let mut report = Report::for_annotations();

    for uri in &args.uris {
        let operation = client
            .annotate(uri, kinds)
            .await
            .with_context(|| format!("failed to submit {}", uri))?;
        info!(uri = %uri, operation = %operation, "Annotation submitted");

        loop {
            let status = client
                .status(&operation)
                .await
                .with_context(|| format!("failed to poll {}", operation))?;
            println!("Percent complete: {:.0}%", status.percent_complete());

            if status.done {
                report.append_annotations(&status.annotations);
                break;
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    print!("{}", report.render());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // reqwest and gcp_auth both link rustls; pick one crypto provider up front
    rustls::crypto::ring::default_provider()
        .install_default()
        .ok();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.debug);

    run(&args).await
}
