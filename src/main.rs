use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use dadjokes::cli::terminal::{render_favourites, HELP};
use dadjokes::cli::{read_commands, Cli, Commands, TerminalView};
use dadjokes::config::Config;
use dadjokes::errors::JokeResult;
use dadjokes::logging;
use dadjokes::services::{AppController, FavouritesService};
use dadjokes::sources::{HttpJokeSource, JokeSource};
use dadjokes::storage::JsonFileFavouritesRepository;

#[tokio::main]
async fn main() {
    // RUST_LOG may come from .env
    Config::load_dotenv();
    logging::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> JokeResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    let repository = JsonFileFavouritesRepository::new(&config.favourites_path);

    match cli.command {
        Commands::Fetch { save } => cmd_fetch(&config, repository, save).await,
        Commands::List => cmd_list(repository),
        Commands::Run => cmd_run(&config, repository).await,
        Commands::Path => {
            println!("{}", repository.path().display());
            Ok(())
        }
    }
}

async fn cmd_fetch(
    config: &Config,
    repository: JsonFileFavouritesRepository,
    save: bool,
) -> JokeResult<()> {
    let source = HttpJokeSource::new(config)?;
    let joke = source.fetch_random_joke().await?;

    println!("{}", joke.text);

    if save {
        let service = FavouritesService::new(repository);
        if service.add(joke)? {
            println!("Saved to favourites.");
        } else {
            println!("Already in favourites.");
        }
    }

    Ok(())
}

fn cmd_list(repository: JsonFileFavouritesRepository) -> JokeResult<()> {
    let service = FavouritesService::new(repository);
    println!("{}", render_favourites(&service.list()?));
    Ok(())
}

async fn cmd_run(config: &Config, repository: JsonFileFavouritesRepository) -> JokeResult<()> {
    let source = HttpJokeSource::new(config)?;
    let (events, receiver) = mpsc::unbounded_channel();
    let view = TerminalView::new();

    let mut controller =
        AppController::new(source, repository, events.clone(), config.persist_timeout);
    controller.subscribe(Box::new(view.clone()));

    println!("{}", HELP);
    controller.start();

    tokio::spawn(read_commands(
        BufReader::new(tokio::io::stdin()),
        events,
        view,
    ));

    let mut controller = controller.run(receiver).await;

    // Failures are already logged; the session still ends normally
    controller.flush().await.ok();

    Ok(())
}
