//! dongne CLI
//!
//! Drives neighborhood resolution and selection from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dongne::{
    error::Result,
    models::{Config, Coordinates, SelectedLocation},
    neighborhoods,
    pipeline::LocationResolver,
    services::{FixedLocation, GeocoderChain, LocationSource, NoLocationSource},
    storage::{KeyValueStore, LocalStorage, MemoryStorage, SelectionStore},
};

/// dongne - neighborhood resolver for the local marketplace
#[derive(Parser, Debug)]
#[command(
    name = "dongne",
    version,
    about = "Resolve your current position into a marketplace neighborhood"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the storage directory from the config
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Keep the selection in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Use the current position to pick a neighborhood
    Locate {
        /// Device latitude (falls back to geolocation.latitude)
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Device longitude (falls back to geolocation.longitude)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Pick one of the current candidate neighborhoods
    Select { name: String },

    /// Show the persisted selection
    Show,

    /// List the neighborhoods near NAME
    Nearby { name: String },

    /// Reverse geocode coordinates without touching the selection
    Reverse {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Look up the coordinates of an address (Kakao key required)
    #[cfg(feature = "kakao")]
    Search { address: String },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn selection_store(cli: &Cli, config: &Config) -> SelectionStore {
    let backend: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        let dir = cli
            .storage_dir
            .clone()
            .unwrap_or_else(|| config.storage.dir.clone());
        log::debug!("Using storage directory {}", dir.display());
        Arc::new(LocalStorage::new(dir))
    };
    SelectionStore::new(backend)
}

fn location_source(
    lat: Option<f64>,
    lon: Option<f64>,
    config: &Config,
) -> Result<Arc<dyn LocationSource>> {
    let coordinates = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => config.geolocation.fixed_coordinates(),
    };

    match coordinates {
        Some(coordinates) => {
            coordinates.validate()?;
            Ok(Arc::new(FixedLocation::new(coordinates)))
        }
        None => Ok(Arc::new(NoLocationSource)),
    }
}

fn print_selection(location: &SelectedLocation) {
    println!("Selected: {}", location.selected_neighborhood);
    println!("Nearby:   {}", location.neighborhood_candidates.join(", "));
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default().with_env_overrides()
    });

    match &cli.command {
        Command::Locate { lat, lon } => {
            let source = location_source(*lat, *lon, &config)?;
            let store = selection_store(&cli, &config);
            let resolver = LocationResolver::from_config(&config, source, store)?;

            match resolver.resolve_current_location().await {
                Ok(location) => print_selection(&location),
                Err(e) => {
                    if let Some(message) = e.user_message() {
                        eprintln!("{message}");
                    }
                    return Err(e);
                }
            }
        }

        Command::Select { name } => {
            let store = selection_store(&cli, &config);
            let location = store.select(name).await?;
            print_selection(&location);
        }

        Command::Show => {
            let store = selection_store(&cli, &config);
            print_selection(&store.load().await?);
        }

        Command::Nearby { name } => {
            let nearby = neighborhoods::nearby_neighborhoods(name);
            if !neighborhoods::is_known(name) {
                log::info!("{} has no adjacency entry", name);
            }
            println!("{}", nearby.join(", "));
        }

        Command::Reverse { lat, lon } => {
            let coordinates = Coordinates::new(*lat, *lon);
            coordinates.validate()?;

            let geocoder = GeocoderChain::from_config(&config)?;
            log::debug!("Geocoders: {}", geocoder.provider_names().join(" -> "));
            let address = geocoder.reverse_geocode(coordinates).await;

            println!("Neighborhood: {}", address.neighborhood_name);
            println!("District:     {}", address.district_name);
            println!("City:         {}", address.city_name);
            println!("Address:      {}", address.full_address_text);
        }

        #[cfg(feature = "kakao")]
        Command::Search { address } => {
            let kakao = dongne::services::KakaoProvider::from_config(&config.kakao)?;
            let coordinates = kakao.address_to_coordinates(address).await?;
            println!("{} {}", coordinates.latitude, coordinates.longitude);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            if config.kakao.resolved_api_key().is_none() {
                log::warn!("No Kakao API key; reverse geocoding will use Nominatim only");
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

