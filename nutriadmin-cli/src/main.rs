//! Main entry point for the NutriAdmin CLI.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use shared::guard::Route;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod commands;

use commands::{
    Context, news::NewsCommand, notifications::NotificationsCommand, password::PasswordCommand,
    profile::ProfileCommand, recipes::RecipesCommand, session::SessionCommand,
    users::UsersCommand,
};

/// NutriAdmin CLI
#[derive(Parser)]
#[command(name = "nutriadmin")]
#[command(about = "Admin dashboard for the NutriAdmin recipe and nutrition platform", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults will be used."
    )]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration file and environment
    #[arg(
        long,
        global = true,
        help = "API base URL (e.g., https://api.example.com/api/). Overrides NUTRIADMIN_API_BASE_URL."
    )]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the NutriAdmin CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, or show the current session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Request or complete a password reset
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
    /// Manage platform accounts (Admin only)
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Manage recipes
    Recipes {
        #[command(subcommand)]
        command: RecipesCommand,
    },
    /// Manage news articles
    News {
        #[command(subcommand)]
        command: NewsCommand,
    },
    /// Manage scheduled push notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
    /// Show or update your own profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Look up catalogue ingredients
    Ingredients {
        #[command(subcommand)]
        command: commands::ingredients::IngredientsCommand,
    },
    /// List the dashboard views the current session can open
    Routes {
        /// Show where navigating to this view leads instead (e.g. /users)
        path: Option<Route>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: String,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

fn init_tracing(config: &ClientConfig) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "warn,shared={level},nutriadmin={level}",
                level = config.log_level
            ))
        }))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // These two work without a usable configuration.
    match &cli.command {
        Commands::Completion { shell } => {
            let shell = shell
                .parse::<clap_complete::Shell>()
                .map_err(|err| anyhow::anyhow!("invalid shell type provided: {err}"))?;
            commands::completion::generate_completion(shell);
            return Ok(());
        }
        Commands::Config { format } => {
            return commands::config::generate_config(format.as_deref().unwrap_or("yaml"));
        }
        _ => {}
    }

    let config = ClientConfig::load_config(cli.config, cli.api_url)
        .context("failed to load configuration")?;
    init_tracing(&config);
    let ctx = Context::new(config);

    match cli.command {
        Commands::Session { command } => commands::session::run(&ctx, command).await,
        Commands::Password { command } => commands::password::run(&ctx, command).await,
        Commands::Users { command } => commands::users::run(&ctx, command).await,
        Commands::Recipes { command } => commands::recipes::run(&ctx, command).await,
        Commands::News { command } => commands::news::run(&ctx, command).await,
        Commands::Notifications { command } => commands::notifications::run(&ctx, command).await,
        Commands::Profile { command } => commands::profile::run(&ctx, command).await,
        Commands::Ingredients { command } => commands::ingredients::run(&ctx, command).await,
        Commands::Routes { path: None } => commands::routes::list_routes(&ctx),
        Commands::Routes { path: Some(route) } => commands::routes::check_route(&ctx, route),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
