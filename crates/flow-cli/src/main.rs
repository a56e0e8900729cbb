mod commands;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use flow_builder::NodeRegistry;
use nifi_client::{EngineClient, EngineConfig, HttpTransport};

#[derive(Parser)]
#[command(
    name = "nifi-flow",
    version,
    about = "Deploy and manage NiFi dataflows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// NiFi base URL (defaults to NIFI_URL, then http://localhost:8080)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Directory holding flow templates (*.json)
    #[arg(long, env = "NIFI_TEMPLATES_DIR", default_value = "templates", global = true)]
    templates_dir: PathBuf,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List flows under the root process group
    List,
    /// Show a flow's processors and their states
    Show {
        /// Flow (process group) name
        flow: String,
    },
    /// Start every processor of a flow
    Start {
        /// Flow (process group) name
        flow: String,
    },
    /// Stop every processor of a flow
    Stop {
        /// Flow (process group) name
        flow: String,
    },
    /// Print a flow's status snapshot
    Status {
        /// Flow (process group) name
        flow: String,
    },
    /// Export a flow definition as JSON
    Export {
        /// Flow (process group) name
        flow: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Deploy a flow from a free-text description
    Deploy {
        /// Name of the new flow
        name: String,
        /// What the flow should do, e.g. "Generate data and log it"
        description: String,
    },
    /// Deploy a flow from a template
    Template {
        /// Template name (file stem in the templates directory)
        template: String,
        /// Name of the new flow
        flow: String,
    },
    /// List available templates
    Templates,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(url) = &self.url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.insecure {
            config = config.insecure(true);
        }
        config
    }

    fn registry(&self) -> anyhow::Result<NodeRegistry> {
        let config = self.engine_config();
        log::debug!(
            "Engine at {} (credentials: {})",
            config.base_url,
            config.credentials.kind()
        );
        let transport = HttpTransport::new(config)?;
        Ok(NodeRegistry::new(EngineClient::new(Arc::new(transport))))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match &cli.command {
        Commands::List => commands::list::execute(&cli.registry()?).await,
        Commands::Show { flow } => commands::show::execute(&cli.registry()?, flow).await,
        Commands::Start { flow } => commands::start::execute(&cli.registry()?, flow).await,
        Commands::Stop { flow } => commands::stop::execute(&cli.registry()?, flow).await,
        Commands::Status { flow } => commands::status::execute(&cli.registry()?, flow).await,
        Commands::Export { flow, output } => {
            commands::export::execute(&cli.registry()?, flow, output.as_deref()).await
        }
        Commands::Deploy { name, description } => {
            commands::deploy::execute(&cli.registry()?, name, description).await
        }
        Commands::Template { template, flow } => {
            commands::template::execute(&cli.registry()?, &cli.templates_dir, template, flow).await
        }
        Commands::Templates => commands::templates::execute(&cli.templates_dir),
    }
}
