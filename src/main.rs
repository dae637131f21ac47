mod enrich;
mod geo;
mod gpx;
mod overpass;
mod web;

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use crate::enrich::enrich_track;
use crate::overpass::{HttpTransport, PoiClient};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "fuelstop")]
#[command(about = "Annotate cycling GPX routes with fuel stop waypoints")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the upload web server
    Serve,
    /// Enrich a GPX file on disk
    Enrich { input: String, output: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Enrich { input, output } => enrich_file(config, &input, &output).await,
    }
}

fn load_config(path: Option<&str>) -> Result<Config, web::ConfigError> {
    match path {
        Some(p) => Config::from_file(p),
        None => Ok(Config::default()),
    }
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn enrich_file(config: Config, input: &str, output: &str) -> ExitCode {
    let xml = match fs::read_to_string(input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let tracks = gpx::parse_gpx(&xml);
    let track = match tracks.into_iter().next() {
        Some(t) => t,
        None => {
            eprintln!("No route data in {}", input);
            return ExitCode::FAILURE;
        }
    };

    let timeout = match config.overpass.timeout_duration() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let transport = match HttpTransport::new(&config.overpass.url, timeout) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut client = PoiClient::new(transport);
    let stations = match enrich_track(&track, &mut client, &config.enrich.to_options()).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = match gpx::write_gpx(&track, &stations) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error rendering output: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(output, rendered) {
        eprintln!("Error writing {}: {}", output, e);
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} with {} fuel stop(s) for '{}'",
        output,
        stations.len(),
        track.name
    );
    ExitCode::SUCCESS
}
