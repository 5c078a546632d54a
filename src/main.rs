use clap::{Parser, Subcommand};
use log::{info, warn};
use simple_logger::SimpleLogger;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use mango_detector::app::{App, AppCommand};
use mango_detector::i18n::{detect_device_language, resolve_language, Catalog, LocaleContext};
use mango_detector::models::config::Config;
use mango_detector::screens::navigation::Route;
use mango_detector::services::media_service::DeviceMediaPicker;
use mango_detector::services::plant_api_service::PlantApiService;
use mango_detector::services::prompt_service::{read_stdin_line, TerminalPrompter};

#[derive(Parser)]
#[command(name = "mango-detector", version, about = "Mango leaf disease detector client")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display language (en, hi, ta, te); defaults to the system language
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Answer yes to confirmations
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose an image file, or a camera capture with --camera
    Predict {
        image: Option<PathBuf>,
        #[arg(long)]
        camera: bool,
    },
    /// List past predictions
    History,
    /// Delete one past prediction
    Delete { id: String },
    /// Show disease facts
    Learn {
        #[arg(long)]
        expand: Option<usize>,
    },
    /// Show languages and version
    Settings,
    /// Interactive session (default)
    Shell,
}

#[tokio::main]
pub async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    SimpleLogger::new().with_level(config.level_filter()).init()?;

    let catalog = Arc::new(Catalog::bundled()?);
    let language_code = cli.lang.clone().or_else(detect_device_language);
    let locale = LocaleContext::new(catalog, resolve_language(language_code.as_deref()));

    info!(
        "Using backend {} in language {}",
        config.api_base_url,
        locale.language()
    );

    let api = PlantApiService::new(&config.api_base_url, config.request_timeout())?;
    let prompter = Arc::new(TerminalPrompter::new(cli.yes));

    let preselected = match &cli.command {
        Some(Commands::Predict { image, .. }) => image.clone(),
        _ => None,
    };
    let picker = DeviceMediaPicker::new(prompter.clone(), config.camera_command.clone())
        .with_preselected(preselected);

    let mut app = App::new(Arc::new(api), Arc::new(picker), prompter, locale);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Predict { camera, .. } => {
            let pick = if camera {
                AppCommand::Camera
            } else {
                AppCommand::Pick
            };
            app.execute(pick).await;

            if app.home().image().is_none() {
                warn!("No image selected");
                return Ok(());
            }

            app.execute(AppCommand::Analyse).await;
            println!("{}", app.render());
        }
        Commands::History => {
            app.navigate(Route::History).await;
            println!("{}", app.render());
        }
        Commands::Delete { id } => {
            app.navigate(Route::History).await;
            app.execute(AppCommand::Delete(id)).await;
            println!("{}", app.render());
        }
        Commands::Learn { expand } => {
            app.navigate(Route::Learn).await;
            if let Some(card) = expand.filter(|card| *card > 0) {
                app.execute(AppCommand::Expand(card - 1)).await;
            }
            println!("{}", app.render());
        }
        Commands::Settings => {
            app.navigate(Route::Settings).await;
            println!("{}", app.render());
        }
        Commands::Shell => run_shell(&mut app).await?,
    }

    Ok(())
}

async fn run_shell(app: &mut App) -> Result<(), anyhow::Error> {
    println!("{}", app.render());

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let line = match read_stdin_line().await? {
            Some(line) => line,
            None => return Ok(()),
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match AppCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}, type help for a list of commands", err);
                continue;
            }
        };

        if !app.execute(command).await {
            return Ok(());
        }

        println!("\n{}", app.render());
    }
}
