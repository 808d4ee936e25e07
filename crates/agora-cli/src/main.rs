//! Agora CLI - a question board served from either backend.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Direction, Session};

/// Agora - community Q&A over a REST service or an on-chain ledger
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Which backend serves the board
    #[arg(long, value_enum, default_value = "rest")]
    backend: BackendKind,

    /// Base URL of the REST service
    #[arg(long, default_value = "http://localhost:5000")]
    api_url: String,

    /// Acting user for the memory backend, or wallet for the ledger sim
    #[arg(long, default_value = "demo")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackendKind {
    /// The stateless JSON service
    Rest,
    /// An in-process board, lost on exit
    Memory,
    /// An in-process stand-in for the board contract, lost on exit
    LedgerSim,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all questions, newest first
    List {
        /// Print raw JSON instead of the rendered list
        #[arg(long)]
        json: bool,
    },

    /// Show one question with its answers
    Show {
        /// Question id
        id: String,
        /// Print raw JSON instead of the rendered page
        #[arg(long)]
        json: bool,
    },

    /// Ask a new question
    Ask {
        /// Question title
        title: String,
        /// Question text (markdown)
        body: String,
        /// Tags to file the question under
        #[arg(short, long, required = true)]
        tag: Vec<String>,
    },

    /// Answer a question
    Answer {
        /// Question id
        question: String,
        /// Answer text (markdown)
        body: String,
    },

    /// Vote on a question or answer
    Vote {
        /// Question id
        question: String,
        /// Vote on this answer of the question instead
        #[arg(long)]
        answer: Option<String>,
        /// Vote direction
        direction: Direction,
    },

    /// Delete a question or answer
    Delete {
        /// Question id
        question: String,
        /// Delete this answer of the question instead
        #[arg(long)]
        answer: Option<String>,
    },

    /// Sign in to the REST service
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Create an account on the REST service
    Signup {
        /// Display name
        name: String,
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// List the community's accounts (REST only)
    Users,

    /// Show the connected wallet's token stats (ledger only)
    Stats,

    /// Withdraw earned tokens (ledger only)
    Withdraw,

    /// List the built-in tags, or describe one
    Tags {
        /// Show only this tag
        name: Option<String>,
    },

    /// Forget the signed-in profile
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("agora={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(backend = ?cli.backend, api_url = %cli.api_url, "Starting agora");
    let session = match cli.backend {
        BackendKind::Rest => Session::rest(&cli.api_url),
        BackendKind::Memory => Session::memory(&cli.user),
        BackendKind::LedgerSim => Session::ledger_sim(&cli.user),
    };

    let result = match cli.command {
        Commands::List { json } => commands::list(&session, json).await,
        Commands::Show { id, json } => commands::show(&session, &id, json).await,
        Commands::Ask { title, body, tag } => commands::ask(&session, title, body, tag).await,
        Commands::Answer { question, body } => commands::answer(&session, &question, body).await,
        Commands::Vote {
            question,
            answer,
            direction,
        } => commands::vote(&session, &question, answer.as_deref(), direction).await,
        Commands::Delete { question, answer } => {
            commands::delete(&session, &question, answer.as_deref()).await
        }
        Commands::Login { email, password } => commands::login(&session, &email, &password).await,
        Commands::Signup {
            name,
            email,
            password,
        } => commands::signup(&session, &name, &email, &password).await,
        Commands::Users => commands::users(&session).await,
        Commands::Stats => commands::stats(&session).await,
        Commands::Withdraw => commands::withdraw(&session).await,
        Commands::Tags { name } => commands::tags(name.as_deref()),
        Commands::Logout => commands::logout(&session),
        Commands::Whoami => commands::whoami(&session),
        Commands::Version => {
            println!("agora {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
