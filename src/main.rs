//! `aci-auth-server` command line.
//!
//! ```text
//! aci-auth-server start <none|basic|oauth> [--config FILE]
//!     prints the credential document and the URL, then diagnostics
//!     until some client POSTs to the server
//!
//! aci-auth-server stop <URL>
//!     POSTs to a running server
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use aci_auth_server::client::request_stop;
use aci_auth_server::config::{load_config, FixtureConfig, ObservabilityConfig};
use aci_auth_server::lifecycle::{self, ControlLoop};
use aci_auth_server::observability::init_logging;
use aci_auth_server::{AuthMode, ToolchainBuilder};

#[derive(Parser)]
#[command(name = "aci-auth-server", version)]
#[command(about = "Self-terminating TLS server for testing image fetch authentication", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a server enforcing the given auth type
    Start {
        #[arg(value_enum)]
        auth: AuthMode,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Ask the server at URL to shut down
    Stop { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = match cli.command {
        Commands::Start { auth, config } => start_server(auth, config.as_deref()).await,
        Commands::Stop { url } => stop_server(&url).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start_server(mode: AuthMode, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => FixtureConfig::default(),
    };

    init_logging(&config.observability);
    tracing::info!(
        mode = %mode,
        bind_address = %config.listener.bind_address,
        compiler = %config.builder.compiler,
        packager = %config.builder.packager,
        "aci-auth-server v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let builder = Arc::new(ToolchainBuilder::new(&config.builder));
    let server = lifecycle::start(mode, &config, builder).await?;

    let stdout = std::io::stdout();
    server.announce(&mut stdout.lock())?;
    ControlLoop::new(stdout).run(server).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn stop_server(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&ObservabilityConfig::default());

    let status = request_stop(url).await?;
    println!("Response status: {}", status);
    if !status.is_success() {
        return Err("got a nonsuccess status".into());
    }
    Ok(())
}
