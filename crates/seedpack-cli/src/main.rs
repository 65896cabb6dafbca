//! Seedpack - cluster init package configurator
//!
//! Usage:
//!   seedpack login "/auth?token=...&next=/initialize/configure"
//!   seedpack status         # Show cluster summary
//!   seedpack init           # Configure, review and deploy the init package
//!   seedpack components     # List components being deployed
//!   seedpack logout

mod interactive;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seedpack_core::api::PackagesApi;
use seedpack_core::auth::{Credential, LoginBootstrap};
use seedpack_core::context::AppContext;
use seedpack_core::http::ApiClient;

use crate::interactive::{InitWizard, PrefilledOptions};

#[derive(Parser)]
#[command(name = "seedpack")]
#[command(about = "Configure and deploy cluster init packages", long_about = None)]
struct Cli {
    /// Backend origin (overrides base_url in seedpack.toml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a session token
    ///
    /// Accepts the login location printed by the backend, e.g.
    /// "/auth?token=<t>&next=/initialize/configure", or --token directly.
    Login {
        /// Login location or URL carrying token and next parameters
        location: Option<String>,
        /// Session token
        #[arg(long, conflicts_with = "location")]
        token: Option<String>,
        /// Path to continue at after login
        #[arg(long, requires = "token")]
        next: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show cluster summary
    Status,

    /// Configure, review and deploy the init package
    Init {
        /// Package path on the backend (skips package selection)
        #[arg(long)]
        package: Option<String>,
        /// Optional component to deploy (repeatable; skips component selection)
        #[arg(long = "component", value_name = "NAME")]
        components: Vec<String>,
        /// Accept defaults and skip confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,
        /// Show each component's manifest
        #[arg(long)]
        details: bool,
    },

    /// List components currently being deployed
    Components,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seedpack=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut ctx = AppContext::with_defaults()?;
    if let Some(url) = &cli.api_url {
        ctx = ctx.with_base_url(url);
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

    match cli.command {
        Commands::Login {
            location,
            token,
            next,
        } => run_login(&ctx, location, token, next),
        Commands::Logout => run_logout(&ctx),
        Commands::Status => runtime.block_on(run_status(&ctx, cli.format)),
        Commands::Init {
            package,
            components,
            yes,
            details,
        } => {
            let prefilled = PrefilledOptions {
                package,
                components: (!components.is_empty()).then_some(components),
                yes,
                details,
            };
            runtime.block_on(run_init(&ctx, prefilled, cli.format))
        }
        Commands::Components => runtime.block_on(run_components(&ctx, cli.format)),
    }
}

/// Authenticated client, or an error pointing at `seedpack login`.
fn require_client(ctx: &AppContext) -> Result<ApiClient> {
    ctx.client().map_err(|err| {
        anyhow::anyhow!(
            "{}\nRun `seedpack login \"{}?token=<token>\"` to start a session",
            err,
            err.redirect.login_path()
        )
    })
}

fn run_login(
    ctx: &AppContext,
    location: Option<String>,
    token: Option<String>,
    next: Option<String>,
) -> Result<()> {
    let bootstrap = match (location, token) {
        (Some(location), _) => LoginBootstrap::parse(&location)?,
        (None, Some(token)) => {
            let credential = Credential::new(token)
                .ok_or_else(|| anyhow::anyhow!("Token must not be empty"))?;
            LoginBootstrap::from_parts(credential, next)
        }
        (None, None) => anyhow::bail!("Provide a login location or --token"),
    };

    let mut client = ctx.anonymous_client();
    let next = bootstrap.complete(&mut client)?;

    println!("✓ Logged in");
    println!("  Continue at {}", next);
    Ok(())
}

fn run_logout(ctx: &AppContext) -> Result<()> {
    let mut client = ctx.anonymous_client();
    let login_path = client.login_path().to_string();
    client.invalidate(&login_path);
    println!("✓ Logged out");
    Ok(())
}

async fn run_status(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let client = require_client(ctx)?;
    let summary = PackagesApi::new(&client).cluster_summary().await?;

    match format {
        OutputFormat::Table => {
            let reachable = if summary.reachable { "yes" } else { "no" };
            let initialized = if summary.has_zarf { "yes" } else { "no" };
            println!("Cluster reachable:   {}", reachable);
            println!("Cluster initialized: {}", initialized);
            if !summary.distro.is_empty() {
                println!("Distro:              {}", summary.distro);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

async fn run_init(ctx: &AppContext, prefilled: PrefilledOptions, format: OutputFormat) -> Result<()> {
    let client = require_client(ctx)?;
    let api = PackagesApi::new(&client);

    let paths = match &prefilled.package {
        Some(_) => Vec::new(),
        None => api.find_init_packages().await?,
    };

    let mut wizard = InitWizard::new(prefilled);
    let path = wizard.choose_package(&paths)?;
    let package = api
        .read_package(&path)
        .await?
        // The cluster does not report its architecture, so only the local OS
        // narrows the component list.
        .filtered_for(std::env::consts::OS, None);

    let result = wizard.run(package)?;
    if !result.confirmed {
        println!("Deployment cancelled");
        return Ok(());
    }

    let accepted = api.deploy(&result.request).await?;

    match format {
        OutputFormat::Table => {
            if accepted {
                println!("✓ Deployment started for {}", result.request.package_path);
            } else {
                println!("• Backend did not accept the deployment");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "packagePath": result.request.package_path,
                "components": result.request.components,
                "accepted": accepted,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if !accepted {
        anyhow::bail!("Deployment was not accepted");
    }
    Ok(())
}

async fn run_components(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let client = require_client(ctx)?;
    let components = PackagesApi::new(&client).deploying_components().await?;

    match format {
        OutputFormat::Table => {
            if components.is_empty() {
                println!("No components are being deployed");
            }
            for component in &components {
                if component.package_name.is_empty() {
                    println!("• {}", component.name);
                } else {
                    println!("• {} ({})", component.name, component.package_name);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&components)?);
        }
    }
    Ok(())
}
