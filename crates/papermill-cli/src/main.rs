//! Papermill CLI tool.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "papermill")]
#[command(about = "Papermill research pipeline CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(long, env = "PAPERMILL_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a research job
    Start {
        /// Research domain, e.g. "graph neural networks"
        domain: String,
        /// Narrower focus within the domain
        #[arg(long)]
        focus: Option<String>,
        /// Generative model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Show job status
    Status {
        /// Job ID
        id: String,
    },
    /// Print job logs
    Logs {
        /// Job ID
        id: String,
        /// Poll for new logs until the job finishes
        #[arg(short, long)]
        follow: bool,
    },
    /// Fetch the final results as JSON
    Results {
        /// Job ID
        id: String,
    },
    /// Download the rendered paper
    Paper {
        /// Job ID
        id: String,
        /// Output file
        #[arg(long, default_value = "paper.html")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            domain,
            focus,
            model,
        } => {
            commands::research::start(&cli.api_url, &domain, focus, model).await?;
        }
        Commands::Status { id } => {
            commands::research::status(&cli.api_url, &id).await?;
        }
        Commands::Logs { id, follow } => {
            commands::research::logs(&cli.api_url, &id, follow).await?;
        }
        Commands::Results { id } => {
            commands::research::results(&cli.api_url, &id).await?;
        }
        Commands::Paper { id, output } => {
            commands::research::paper(&cli.api_url, &id, &output).await?;
        }
    }

    Ok(())
}
