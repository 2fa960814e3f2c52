#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating map artifacts from Statistics Canada data.
//!
//! Reads the flat source files under the data directory, renders the
//! choropleth, metrics, heatmap, city, and night-sky artifacts into the
//! output directory, and skips outputs whose inputs have not changed
//! since the last run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use econ_map_generate::{
    ALL_OUTPUTS, GenerateArgs, OUTPUT_CENSUS_DIVISIONS, OUTPUT_CITIES, OUTPUT_PROVINCES,
    OUTPUT_PROVINCE_METRICS, OUTPUT_REGIONS, run_allocate_census, run_night_sky, run_with_cache,
};
use econ_map_imagery::{DEFAULT_BASE_URL, nearest_image_id};

#[derive(Parser)]
#[command(name = "econ_map_generate", about = "Map artifact generation tool")]
struct Cli {
    /// Directory holding the source data files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory artifacts are written into
    #[arg(long, default_value = "data/generated")]
    out_dir: PathBuf,

    /// Pretty-print JSON artifacts
    #[arg(long)]
    pretty: bool,

    /// Regenerate even when input files haven't changed
    #[arg(long)]
    force: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every artifact
    All,
    /// Generate the provincial choropleth and the metrics table
    Provinces,
    /// Generate the regional choropleth
    Regions,
    /// Generate the census-division heatmap
    Census,
    /// Generate the city markers
    Cities,
    /// Generate the night-sky scatter for one city's listings
    NightSky {
        /// City whose listings become stars
        #[arg(long)]
        city: String,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Split provincial GDP across census divisions by population
    AllocateCensus,
    /// Look up the nearest street-level image for a coordinate
    StreetView {
        /// Latitude of the point
        #[arg(long)]
        lat: f64,

        /// Longitude of the point
        #[arg(long)]
        lng: f64,

        /// Access token; falls back to the MAPILLARY_TOKEN variable
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.out_dir)?;

    let args = GenerateArgs {
        data_dir: cli.data_dir,
        out_dir: cli.out_dir,
        pretty: cli.pretty,
        force: cli.force,
    };

    match cli.command {
        Commands::All => run_with_cache(&args, ALL_OUTPUTS)?,
        Commands::Provinces => {
            run_with_cache(&args, &[OUTPUT_PROVINCES, OUTPUT_PROVINCE_METRICS])?;
        }
        Commands::Regions => run_with_cache(&args, &[OUTPUT_REGIONS])?,
        Commands::Census => run_with_cache(&args, &[OUTPUT_CENSUS_DIVISIONS])?,
        Commands::Cities => run_with_cache(&args, &[OUTPUT_CITIES])?,
        Commands::NightSky {
            city,
            width,
            height,
        } => run_night_sky(&args, &city, width, height)?,
        Commands::AllocateCensus => run_allocate_census(&args)?,
        Commands::StreetView { lat, lng, token } => {
            let token = token
                .or_else(|| std::env::var("MAPILLARY_TOKEN").ok())
                .ok_or("no access token; pass --token or set MAPILLARY_TOKEN")?;

            let client = reqwest::Client::new();
            match nearest_image_id(&client, DEFAULT_BASE_URL, lat, lng, &token).await? {
                Some(id) => println!("{id}"),
                None => println!("No street-level imagery near {lat},{lng}"),
            }
        }
    }

    Ok(())
}
