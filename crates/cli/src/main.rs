use clap::{Parser, Subcommand};
use std::sync::Arc;

const DEFAULT_MESSAGE: &str = "Hello World!";

#[derive(Parser)]
#[command(name = "hello-agent")]
#[command(about = "Hello agent CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the hello agent: publish one NewMessageReceived and exit once the agent shuts the process down (or on Ctrl+C).
    Run {
        /// Config file path (default: HELLO_AGENT_CONFIG_PATH or ~/.hello-agent/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Text of the first message.
        #[arg(long, short, default_value = DEFAULT_MESSAGE)]
        message: String,

        /// Keep running after the goodbye instead of reading STAY_ALIVE_ON_GOODBYE.
        #[arg(long)]
        stay_alive: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("hello-agent {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run {
            config,
            message,
            stay_alive,
        }) => {
            if let Err(e) = run_agent(config, message, stay_alive).await {
                log::error!("agent failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_agent(
    config_path: Option<std::path::PathBuf>,
    message: String,
    stay_alive: bool,
) -> anyhow::Result<()> {
    let (mut config, path) = lib::config::load_config(config_path)?;
    if stay_alive {
        config.stay_alive_on_goodbye = Some(true);
    }
    log::info!("using config {}", path.display());

    let flag = lib::config::resolve_stay_alive(&config);
    let host = lib::host::AgentHost::start(&config, flag, Arc::new(lib::sink::ConsoleSink)).await?;
    host.send(message).await?;
    host.run(lib::host::shutdown_signal()).await;
    log::info!("hello agent stopped");
    Ok(())
}
