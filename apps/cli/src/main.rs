use std::{io::Write, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, DashboardSnapshot, HttpInsightsClient, InsightsApi, Orchestrator, Phase,
    ProgressFrame, ViewComposer,
};
use futures::future::join_all;
use shared::domain::Operation;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "insights", about = "Storefront insights from the command line")]
struct Args {
    /// Overrides the configured insights service address.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Print the raw records instead of the text report.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one storefront.
    Analyze { url: String },
    /// Find and analyze competitors of a storefront.
    Competitors { url: String },
    /// Run both operations concurrently.
    Report { url: String },
    /// List brands stored by the service.
    Brands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load dashboard settings")?;
    if let Some(base_url) = args.api_base_url.as_deref() {
        settings = settings.with_api_base_url(base_url)?;
    }
    info!(api_base_url = %settings.api_base_url, "using insights service");

    let api: Arc<dyn InsightsApi> = Arc::new(HttpInsightsClient::from_settings(&settings)?);
    let orchestrator = Orchestrator::new(Arc::clone(&api), settings.progress);
    let composer = ViewComposer::new(settings.competitor_slots);

    let (operations, url) = match args.command {
        Command::Analyze { url } => (vec![Operation::Analysis], url),
        Command::Competitors { url } => (vec![Operation::Competitors], url),
        Command::Report { url } => (Operation::ALL.to_vec(), url),
        Command::Brands => {
            let brands = api.list_brands().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&brands)?);
            } else {
                print!("{}", render::render_brands(&brands));
            }
            return Ok(());
        }
    };

    let snapshot = run_operations(&orchestrator, &operations, &url).await?;
    if args.json {
        print_json(&snapshot, &operations)?;
    } else {
        print_panels(&composer, &snapshot, &operations);
    }

    let failures = render::render_failures(&composer.compose(&snapshot).controls);
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{failure}");
        }
        bail!("{} operation(s) failed", failures.len());
    }
    Ok(())
}

async fn run_operations(
    orchestrator: &Arc<Orchestrator>,
    operations: &[Operation],
    url: &str,
) -> Result<DashboardSnapshot> {
    let printer = tokio::spawn(print_progress(
        orchestrator.progress_frames(Operation::Analysis),
        orchestrator.progress_frames(Operation::Competitors),
    ));

    let mut handles = Vec::with_capacity(operations.len());
    for &operation in operations {
        match orchestrator.trigger(operation, url) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                printer.abort();
                return Err(err.into());
            }
        }
    }

    for joined in join_all(handles).await {
        joined.context("operation task ended unexpectedly")?;
    }
    printer.abort();

    let snapshot = orchestrator.snapshot();
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "\r{:>3}% Complete", snapshot.progress());
    Ok(snapshot)
}

async fn print_progress(
    mut analysis: watch::Receiver<ProgressFrame>,
    mut competitors: watch::Receiver<ProgressFrame>,
) {
    let mut stderr = std::io::stderr();
    let mut last = None;
    loop {
        let value = analysis
            .borrow_and_update()
            .value
            .max(competitors.borrow_and_update().value);
        if last != Some(value) {
            let _ = write!(stderr, "\r{value:>3}% Complete");
            let _ = stderr.flush();
            last = Some(value);
        }
        let closed = tokio::select! {
            changed = analysis.changed() => changed.is_err(),
            changed = competitors.changed() => changed.is_err(),
        };
        if closed {
            break;
        }
    }
}

fn print_panels(composer: &ViewComposer, snapshot: &DashboardSnapshot, operations: &[Operation]) {
    for &operation in operations {
        if snapshot.state.phase(operation) != Phase::Succeeded {
            continue;
        }
        let mut scoped = snapshot.clone();
        scoped.state.active_tab = operation.tab();
        if let Some(panel) = composer.compose(&scoped).panel {
            println!("{}", render::render_panel(&panel));
        }
    }
}

fn print_json(snapshot: &DashboardSnapshot, operations: &[Operation]) -> Result<()> {
    let state = &snapshot.state;
    let mut body = serde_json::Map::new();
    for &operation in operations {
        let value = match operation {
            Operation::Analysis => serde_json::to_value(state.analysis.result())?,
            Operation::Competitors => serde_json::to_value(state.competitors.result())?,
        };
        body.insert(operation.as_str().to_string(), value);
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
