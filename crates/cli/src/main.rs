use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf-cli", version, about = "In-N-Out-Books server and tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a bcrypt hash for a seed file entry
    HashPassword {
        password: String,
        /// bcrypt cost; defaults to `auth.bcrypt_cost`
        #[arg(long)]
        cost: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load SHELF settings")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_telemetry::init(&settings.telemetry)?;

            tracing::info!(env = ?settings.environment, "shelf-cli serving");

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(shelf_app::run(settings))
        }
        Command::HashPassword { password, cost } => {
            let cost = cost.unwrap_or(settings.auth.bcrypt_cost);
            let hash = bcrypt::hash(&password, cost).context("failed to hash password")?;
            println!("{hash}");
            Ok(())
        }
    }
}
