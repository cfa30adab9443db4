use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use campus_directory::app::directory::DirectoryService;
use campus_directory::app::import::ImportUseCase;
use campus_directory::config::Config;
use campus_directory::infra::workbook;
use campus_directory::observability::logging::init_logging;
use campus_directory::server::{self, AppState};
use campus_directory::storage::build_registry;

#[derive(Parser)]
#[command(name = "campus-directory")]
#[command(about = "Role-scoped campus user directory with bulk import and credential lookup")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Import users from a spreadsheet on disk and print the summary
    Import {
        /// Path to the xlsx file
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();

    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port } => {
            info!("Initializing role-scoped stores...");
            let registry = build_registry(&config).await?;
            let state = AppState {
                directory: Arc::new(DirectoryService::new(registry.clone())),
                import: Arc::new(ImportUseCase::new(registry)),
                uploads_dir: config.stores.uploads_dir.clone(),
            };
            server::serve(state, port.unwrap_or(config.server.port)).await?;
        }
        Commands::Import { file } => {
            let registry = build_registry(&config).await?;
            let rows = workbook::read_rows(&file)?;
            let summary = ImportUseCase::new(registry).import_rows(rows).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
