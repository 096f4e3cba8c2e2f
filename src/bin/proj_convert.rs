//! Projection conversion tool
//!
//! Converts points between spatial and world coordinates for an oblique
//! cylindrical projection centered on a given point, and prints the bucket
//! metrics and legacy query fragment for that projection.
//!
//! Usage:
//!   cargo run --bin proj_convert -- --center-lon 137.4 --center-lat -4.6 forward 140 -5
//!   cargo run --bin proj_convert -- --round 0.5 inverse 2.0 -0.4
//!   cargo run --bin proj_convert -- --config proj.json buckets 16

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use planetproj::config::{validate_latitude, validate_longitude};
use planetproj::{
    MapProjection, ObliqueCylindrical, ProjectionConfig, SpatialPoint, StartupCenter, WorldPoint,
};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Projection conversion tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts between spatial and world coordinates of an oblique cylindrical projection",
    long_about = None
)]
struct Args {
    /// Western-leading longitude of the projection center (degrees)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_lon: f64,

    /// Latitude of the projection center (degrees)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_lat: f64,

    /// Up-vector rounding step in degrees, overrides the config file
    #[arg(long)]
    round: Option<f64>,

    /// JSON configuration file holding `projection.round`
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spatial (lon, lat) to world (x, y)
    Forward {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
    },
    /// World (x, y) to spatial (lon, lat)
    Inverse {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Bucket width and height at a zoom level (pixels per degree)
    Buckets { ppd: f64 },
    /// Legacy map-server query fragment
    Fragment,
}

fn load_config(args: &Args) -> Result<ProjectionConfig> {
    let mut config = match &args.config {
        Some(path) => ProjectionConfig::from_json_file(path)?,
        None => ProjectionConfig::default(),
    };
    if let Some(round) = args.round {
        config = ProjectionConfig::with_round(round)?;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let center = StartupCenter::new(args.center_lon, args.center_lat)?;
    info!(
        "Projection centered at ({}, {}) with rounding step {}",
        center.lon, center.lat, config.round
    );

    let projection = ObliqueCylindrical::from_center(center.lon, center.lat, &config);

    match args.command {
        Command::Forward { lon, lat } => {
            let spatial = SpatialPoint::new(validate_longitude(lon)?, validate_latitude(lat)?);
            let world = projection.spatial_to_world(spatial);
            println!("{:.9} {:.9}", world.x, world.y);
        }
        Command::Inverse { x, y } => {
            let spatial = projection.world_to_spatial(WorldPoint::new(x, y));
            println!("{:.9} {:.9}", spatial.lon, spatial.lat);
        }
        Command::Buckets { ppd } => {
            if !(ppd > 0.0) {
                return Err(format!("pixels per degree must be positive, got {}", ppd).into());
            }
            println!("width:  {}", projection.bucket_width(ppd));
            println!("height: {}", projection.bucket_height(ppd));
            println!(
                "limits: [{}, {}]",
                projection.lower_limit(),
                projection.upper_limit()
            );
        }
        Command::Fragment => {
            println!("{}", projection.query_fragment());
        }
    }

    Ok(())
}
