use clap::Parser;
use place_picker::adapters::ConfiguredCandidates;
use place_picker::core::{ConfigProvider, PersistenceGateway};
use place_picker::utils::logger::{self, LogFormat};
use place_picker::utils::validation::Validate;
use place_picker::{
    distance_km, CliConfig, CollectionController, Command, FixedPosition, HttpPlacesClient,
    PickerError, PickerSession, PlaceId, RemovalConfirmationFlow, SyncOutcome, TomlConfig,
};
use std::io::{BufRead, Write};

const EXIT_CONFIG: i32 = 1;
const EXIT_FAILED: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(LogFormat::from_flag(cli.json_logs), cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => run(&config, &cli.command).await,
            Err(e) => Err(e),
        },
        None => run(&cli, &cli.command).await,
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(if e.is_config() { EXIT_CONFIG } else { EXIT_FAILED });
        }
    }
}

async fn run<C: ConfigProvider + Validate>(
    config: &C,
    command: &Command,
) -> place_picker::Result<i32> {
    config.validate()?;

    let client = HttpPlacesClient::from_config(config)?;
    let candidates = ConfiguredCandidates::from_config(config, &client);
    let position = FixedPosition::new(config.position());
    let session = PickerSession::new(client, candidates, position);
    let controller = session.controller();

    match command {
        Command::Nearby => {
            let nearby = session.nearby_places().await?;
            for place in &nearby.places {
                println!(
                    "{:<12} {:>9.1} km  {}",
                    place.id,
                    distance_km(&nearby.origin, &place.coordinate),
                    place.title
                );
            }
            Ok(0)
        }
        Command::List => {
            if !load_collection(controller).await {
                return Ok(EXIT_FAILED);
            }
            let places = controller.places();
            if places.is_empty() {
                println!("No places picked yet. Run `nearby` and `add <id>` to pick some.");
            }
            for place in &places {
                println!("{:<12} {}", place.id, place.title);
            }
            Ok(0)
        }
        Command::Add { id } => {
            if !load_collection(controller).await {
                return Ok(EXIT_FAILED);
            }
            let place = session.candidate(&PlaceId::new(id.as_str())).await?;
            Ok(report(controller.add_place(place).await))
        }
        Command::Remove { id, yes } => {
            if !load_collection(controller).await {
                return Ok(EXIT_FAILED);
            }
            let id = PlaceId::new(id.as_str());
            let place = controller
                .find(&id)
                .ok_or_else(|| PickerError::NotFound { id: id.to_string() })?;

            let mut flow = RemovalConfirmationFlow::new();
            flow.request_removal(&place);
            if !*yes && !ask_confirmation(&place.title)? {
                flow.cancel();
                println!("Kept {}", place.title);
                return Ok(0);
            }
            let outcome = flow.confirm(controller).await.unwrap_or(SyncOutcome::Unchanged);
            Ok(report(outcome))
        }
    }
}

/// Every write sends the whole collection, so nothing may be written before a successful load.
async fn load_collection<G: PersistenceGateway>(controller: &CollectionController<G>) -> bool {
    controller.load().await;
    match controller.load_error() {
        Some(error) => {
            eprintln!("❌ {}", error.message);
            false
        }
        None => true,
    }
}

fn ask_confirmation(title: &str) -> place_picker::Result<bool> {
    print!("Do you really want to remove {}? [y/N] ", title);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report(outcome: SyncOutcome) -> i32 {
    match outcome {
        SyncOutcome::Saved => {
            println!("✅ Places saved");
            0
        }
        SyncOutcome::Unchanged => {
            println!("Nothing to change");
            0
        }
        SyncOutcome::RolledBack(error) => {
            eprintln!("❌ An error occurred! {}", error.message);
            EXIT_FAILED
        }
    }
}
