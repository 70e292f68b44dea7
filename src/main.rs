use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Backend, Settings};
use core_types::Product;
use database::fixtures;
use tracing_subscriber::EnvFilter;

/// The entry point for the product service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    let mut settings = configuration::load_settings()?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Seed => {
            let pool = database::connect(&settings.database).await?;
            fixtures::create_table(&pool).await?;
            let rows = fixtures::seed(&pool).await?;
            tracing::info!(rows, "Seed complete.");
            Ok(())
        }
        Commands::Clear => {
            let pool = database::connect(&settings.database).await?;
            fixtures::clear(&pool).await?;
            Ok(())
        }
        Commands::List(args) => {
            settings.database.backend = Backend::Postgres;
            let repository = web_server::build_repository(&settings).await?;
            let products = match args.store.as_deref() {
                Some(store) => repository.try_get_all_products_by_store(store).await?,
                None => repository.try_get_all_products().await?,
            };
            println!("{}", render_products(&products));
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small CRUD service for products.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    Serve(ServeArgs),
    /// Create the product table if needed and insert the sample products.
    Seed,
    /// Delete every product and reset the id sequence.
    Clear,
    /// Print the stored products as a table.
    List(ListArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `database.backend` from the configuration.
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Overrides `server.port` from the configuration.
    #[arg(long)]
    port: Option<u16>,

    /// Insert the sample products before serving (in-memory backend only).
    #[arg(long)]
    seed: bool,
}

#[derive(Parser)]
struct ListArgs {
    /// Only list products of this store.
    #[arg(long)]
    store: Option<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(backend) = args.backend {
        settings.database.backend = backend;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let repository = web_server::build_repository(&settings).await?;
    if args.seed {
        if settings.database.backend == Backend::Memory {
            fixtures::seed_repository(repository.as_ref()).await?;
        } else {
            tracing::warn!("--seed only applies to the in-memory backend; use the `seed` command.");
        }
    }

    web_server::serve(settings, repository).await
}

fn render_products(products: &[Product]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Price", "Discount", "Store"]);
    for product in products {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
            format!("{}%", product.discount),
            product.store.clone(),
        ]);
    }
    table
}
