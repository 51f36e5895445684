//! graphscraper: explore graphs that are loaded lazily and cached in a database

use clap::Parser;
use graphscraper_cli::commands;
use graphscraper_cli::{setup_logging, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Demo {
            nodes,
            probability,
            named,
            seed,
            vertex,
        } => {
            let options = commands::demo::DemoOptions {
                nodes,
                probability,
                named,
                seed,
                vertex,
            };
            commands::demo::run(&options).await?;
        }
        Commands::Spotify {
            artists,
            client_id,
            client_secret,
            neighbors,
            reset,
            store,
        } => {
            let config = commands::spotify::config(&client_id, &client_secret);
            commands::spotify::run(&artists, config, neighbors, &store, reset).await?;
        }
        Commands::Neighbors { name, store } => {
            commands::neighbors::run(&name, &store).await?;
        }
    }

    Ok(())
}
