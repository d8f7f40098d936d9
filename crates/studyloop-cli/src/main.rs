use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studyloop", version, about = "Studyloop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive study session for a deck
    Study(commands::study::StudyArgs),
    /// Show due counts and any stored session for a deck
    Status {
        /// Deck identifier
        #[arg(long)]
        deck: String,
    },
    /// Replay pending reviews for a deck
    Sync {
        /// Deck identifier
        #[arg(long)]
        deck: String,
    },
    /// Discard a stored session without syncing
    Discard {
        /// Deck identifier
        #[arg(long)]
        deck: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Study(args) => commands::study::run(args),
        Commands::Status { deck } => commands::status::run(&deck),
        Commands::Sync { deck } => commands::sync::run(&deck, false),
        Commands::Discard { deck } => commands::sync::run(&deck, true),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "studyloop", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
