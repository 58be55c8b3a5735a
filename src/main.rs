use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use er_finder::dashboard::{self, SearchParams};
use er_finder::messaging::{self, OpenAiClient, SlackClient};
use er_finder::{
    CsvFacilitySource, ErFinderConfig, ErFinderError, FacilitySource, FacilityTable,
    filter_and_rank, group_counts_by_category, logging,
};

#[derive(Parser)]
#[command(
    name = "er-finder",
    version,
    about = "Nearby emergency room dashboard and chat trivia bot"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dashboard HTTP service
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the emergency rooms around a location
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Search radius in km
        #[arg(long)]
        radius: Option<f64>,
        /// Allowed category, repeatable; defaults to all
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Generate a trivia snippet and post it to the chat channel
    PostTmi {
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        channel: Option<String>,
    },
}

fn load_table(config: &ErFinderConfig) -> Result<FacilityTable> {
    let source = CsvFacilitySource::new(&config.data.csv_path, &config.data.encoding)?;
    Ok(source.load()?)
}

fn print_search(table: &FacilityTable, config: &ErFinderConfig, params: SearchParams) -> Result<()> {
    let request = params.resolve(&config.dashboard, table)?;
    let result = filter_and_rank(
        table.records(),
        &request.reference,
        request.radius_km,
        &request.category_set(),
    );

    println!(
        "🚨 Nearest emergency rooms within {} km of {}",
        request.radius_km,
        request.reference.format_coordinates()
    );
    if result.nearest.is_empty() {
        println!("   No emergency rooms found.");
    }
    for ranked in &result.nearest {
        print!("{ranked}");
    }

    println!("\n📊 Emergency rooms per category");
    for (category, count) in group_counts_by_category(&result.filtered) {
        println!("   {category}: {count}");
    }

    println!("\n📋 All {} matches", result.filtered.len());
    for ranked in &result.filtered {
        let facility = ranked.facility;
        println!(
            "   {:.2} km  {}  [{}]  {}  {}",
            ranked.distance_km,
            facility.name,
            facility.category,
            facility.phone,
            facility.emergency_phone
        );
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ErFinderConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.dashboard.port = port;
            }
            let table = load_table(&config)?;
            dashboard::run(&config.dashboard, table).await
        }
        Command::Search {
            lat,
            lon,
            radius,
            categories,
        } => {
            let table = load_table(&config)?;
            let mut params = SearchParams {
                lat,
                lon,
                radius_km: radius,
                ..Default::default()
            };
            if !categories.is_empty() {
                params = params.with_categories(categories);
            }
            print_search(&table, &config, params)
        }
        Command::PostTmi { prompt, channel } => {
            let prompt = prompt.unwrap_or_else(|| config.messaging.prompt.clone());
            let channel = channel.unwrap_or_else(|| config.messaging.channel.clone());

            let generator = OpenAiClient::new(&config.messaging)?;
            let sink = SlackClient::new(&config.messaging)?;
            let receipt =
                messaging::post_generated_message(&generator, &sink, &prompt, &channel).await?;
            info!("Posted trivia (timestamp: {})", receipt.timestamp);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        match e.downcast_ref::<ErFinderError>() {
            Some(app_error) => eprintln!("{}", app_error.user_message()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}
