use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use drone_route_planner::config::PlannerConfig;
use drone_route_planner::directory::{InMemoryDirectory, load_points};
use drone_route_planner::http_sink::HttpTelemetrySink;
use drone_route_planner::models::{PlanningRequest, Vehicle};
use drone_route_planner::planner::plan;
use drone_route_planner::telemetry::{JsonLinesSink, publish_route};
use drone_route_planner::traits::TelemetrySink;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a drone delivery round and emit step telemetry", long_about = None)]
struct Args {
    /// JSON planning request (depot, vehicle, destinations)
    #[arg(long, conflicts_with = "points")]
    request: Option<PathBuf>,

    /// Points file with `name lon lat` lines, planned from the configured hub
    #[arg(long)]
    points: Option<PathBuf>,

    /// Drone id used with --points
    #[arg(long, default_value = "1")]
    drone_id: String,

    /// Full-charge range with no payload, km
    #[arg(long, default_value_t = 40.0)]
    base_range_km: f64,

    /// Maximum rated payload, kg
    #[arg(long, default_value_t = 5.0)]
    max_payload_kg: f64,

    /// Cruise speed, km/h
    #[arg(long, default_value_t = 60.0)]
    speed_kmh: f64,

    /// Payload assigned to every point, kg
    #[arg(long, default_value_t = 0.0)]
    weight_kg: f64,

    /// Overrides PLANNER_SAFETY_MARGIN
    #[arg(long)]
    safety_margin: Option<f64>,

    /// Overrides TELEMETRY_URL
    #[arg(long)]
    telemetry_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("drone_route_planner=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = PlannerConfig::from_env()?;
    if let Some(url) = args.telemetry_url.clone() {
        config.telemetry_url = Some(url);
    }
    let margin = args.safety_margin.unwrap_or(config.safety_margin_ratio);

    let request = build_request(&args, &config, margin)?;
    tracing::info!(
        depot = %request.depot.name,
        vehicle = %request.vehicle.id,
        destinations = request.destinations.len(),
        "planning route"
    );

    let outcome = plan(&request);
    if !outcome.is_complete() {
        tracing::warn!(unvisited = ?outcome.unvisited, "route is partial");
    }

    let sink: Box<dyn TelemetrySink> = match config.http_sink() {
        Some(http) => Box::new(HttpTelemetrySink::new(http).context("building telemetry client")?),
        None => Box::new(JsonLinesSink::new(io::stdout())),
    };
    let report = publish_route(&sink, &outcome)?;
    tracing::info!(sent = report.steps_sent, failed = report.steps_failed, "telemetry delivered");

    Ok(())
}

fn build_request(args: &Args, config: &PlannerConfig, margin: f64) -> Result<PlanningRequest> {
    if let Some(path) = &args.request {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut request: PlanningRequest =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(ratio) = args.safety_margin {
            request.safety_margin_ratio = ratio;
        }
        return Ok(request);
    }

    let Some(path) = &args.points else {
        bail!("either --request or --points is required");
    };
    let locations = load_points(path)?;
    let vehicle = Vehicle::new(
        args.drone_id.clone(),
        args.base_range_km,
        args.max_payload_kg,
        args.speed_kmh,
    );
    let directory = locations.iter().fold(
        InMemoryDirectory::new(config.hub.clone(), vehicle, locations.clone()),
        |directory, location| directory.with_weight(location.id.clone(), args.weight_kg),
    );

    Ok(PlanningRequest::resolve(&directory, &directory, margin))
}
