use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::io::IsTerminal;
use tokio_util::sync::CancellationToken;

mod cli;

use cli::Args;
use traceplot::TraceError;
use traceplot::config::Config;
use traceplot::export::{Theme, export_csv, export_json, generate_report};
use traceplot::lookup::{AddressResolver, GeoClient, Geolocate, NoGeo};
use traceplot::prefs::Prefs;
use traceplot::trace::{SystemExecutor, TraceExecutor, Tracer, Transcript};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut prefs = Prefs::load();
    if args.save_prefs {
        if args.theme.is_some() {
            prefs.theme = args.theme.clone();
        }
        if args.geo_url.is_some() {
            prefs.geo_url = args.geo_url.clone();
        }
        if let Err(e) = prefs.save() {
            log::warn!("failed to save preferences: {}", e);
        }
    }

    let config = args.to_config(&prefs);

    // Escape codes only when writing to a terminal
    let theme = if std::io::stdout().is_terminal() {
        Theme::by_name(args.theme_name(&prefs))
    } else {
        Theme::plain()
    };

    if config.geo_enabled {
        let geo = GeoClient::new(&config.geo_url, config.geo_timeout)
            .context("Failed to build geolocation client")?;
        run_with_geo(&args, config, &theme, geo).await
    } else {
        run_with_geo(&args, config, &theme, NoGeo).await
    }
}

/// Pick the executor: saved transcript or the system traceroute
async fn run_with_geo<G: Geolocate + Sync>(
    args: &Args,
    config: Config,
    theme: &Theme,
    geo: G,
) -> Result<()> {
    match args.input {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read traceroute transcript: {}", path))?;
            let tracer = Tracer::for_host(Transcript(text), geo, config)?;
            run_trace(args, &tracer, theme).await
        }
        None => {
            let tracer = Tracer::for_host(SystemExecutor, geo, config)?;
            run_trace(args, &tracer, theme).await
        }
    }
}

/// Trace the target and print the result in the requested format
async fn run_trace<E, G>(args: &Args, tracer: &Tracer<E, G>, theme: &Theme) -> Result<()>
where
    E: TraceExecutor,
    G: Geolocate + Sync,
{
    let resolver = AddressResolver::new();

    // Cancellation token for Ctrl+C
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        cancel_clone.cancel();
    });

    let result = tokio::select! {
        _ = cancel.cancelled() => {
            eprintln!("Interrupted");
            std::process::exit(130);
        }
        result = tracer.trace_input(&resolver, &args.target) => result,
    };

    let trace = match result {
        Ok(Some(trace)) => trace,
        Ok(None) | Err(TraceError::InvalidTarget(_)) => {
            println!("Invalid target IP or domain.");
            return Ok(());
        }
        Err(TraceError::ExecutionTimeout(limit)) => {
            eprintln!("Error: traceroute did not finish within {}s", limit.as_secs());
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Traceroute failed"),
    };

    if trace.path.is_empty() {
        println!("An issue arose during the traceroute.");
        std::process::exit(1);
    }

    let public = tracer.public_view(&trace.path).await;

    let stdout = std::io::stdout();
    if args.json {
        export_json(&trace, &public, stdout.lock())?;
        println!();
    } else if args.csv {
        let path = if args.full { &trace.path } else { &public };
        export_csv(path, stdout.lock())?;
    } else {
        generate_report(&trace, &public, args.full, theme, stdout.lock())?;
    }

    Ok(())
}
