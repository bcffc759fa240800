use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dadjokes")]
#[command(about = "Fetch random dad jokes and keep the best ones")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one random joke and print it
    Fetch {
        /// Also add the joke to favourites
        #[arg(short, long)]
        save: bool,
    },

    /// List saved favourites
    List,

    /// Start an interactive session (favourites are saved when it ends)
    Run,

    /// Print the location of the favourites file
    Path,
}
