use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spotitimer::{
    config::{self, AppConfig},
    error, info,
    server::{AppState, start_api_server},
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the API server
    Serve(ServeOptions),

    /// Print the resolved configuration (secrets redacted)
    Config,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Bind address, overriding SERVER_ADDRESS
    #[clap(long)]
    pub addr: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    // A broken or absent .env file is not fatal; deployments usually set the
    // process environment directly and from_env reports anything missing.
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spotitimer=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => {
            let app_config = load_config();
            let address = opt
                .addr
                .unwrap_or_else(|| app_config.server_address.clone());

            info!("Spotify Timer API {}", env!("CARGO_PKG_VERSION"));
            let state = AppState::new(app_config);
            start_api_server(&address, state).await;
        }

        Command::Config => {
            let app_config = load_config();
            info!("client_id:       {}", app_config.client_id);
            info!("redirect_uri:    {}", app_config.redirect_uri);
            info!("frontend_url:    {}", app_config.frontend_url);
            info!("authorize_url:   {}", app_config.authorize_url);
            info!("token_url:       {}", app_config.token_url);
            info!("api_base_url:    {}", app_config.api_base_url);
            info!("server_address:  {}", app_config.server_address);
            info!("data_dir:        {}", app_config.data_dir.display());
            info!("scope:           {}", app_config.scope);
            info!("timeout:         {}s", app_config.request_timeout.as_secs());
        }

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn load_config() -> AppConfig {
    match AppConfig::from_env() {
        Ok(app_config) => app_config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}
