use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contacts::contract::model::ImageBlob;
use contacts::domain::state::FormField;
use contacts::infra::fs::read_image;
use contacts::{
    ContactListController, ContactsConfig, HttpContactsGateway, MountOutcome, SubmitOutcome,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE_NAME: &str = "contacts";

/// Contact List Application - terminal client for the contact services
#[derive(Parser)]
#[command(name = "contacts-app")]
#[command(about = "Contact List Application - list and add contacts")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contact list
    List,
    /// Add a contact, then show the updated list
    Add {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Picture to upload (png, jpg, gif or jpeg); a placeholder is sent when omitted
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Check configuration
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, config.home_dir());
    tracing::info!("Contact List Application starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let contacts_cfg: ContactsConfig = config.module_config(MODULE_NAME)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => list(&config, &contacts_cfg).await,
        Commands::Add {
            first_name,
            last_name,
            phone,
            image,
        } => {
            let draft = [
                (FormField::FirstName, first_name),
                (FormField::LastName, last_name),
                (FormField::Phone, phone),
            ];
            add(&config, &contacts_cfg, draft, image).await
        }
        Commands::Check => check_config(&config, &contacts_cfg),
    }
}

async fn build_controller(
    config: &AppConfig,
    cfg: &ContactsConfig,
) -> Result<ContactListController> {
    let gateway = HttpContactsGateway::from_config(cfg)?;
    let placeholder = match &cfg.placeholder_image {
        Some(path) => {
            let path = resolve(config.home_dir(), path);
            read_image(&path)
                .await
                .with_context(|| format!("failed to read placeholder image {}", path.display()))?
        }
        None => ImageBlob::placeholder(),
    };
    let controller = ContactListController::with_placeholder(Arc::new(gateway), placeholder);

    // Ctrl-C tears the controller down; a response arriving afterwards is dropped.
    let disposal = controller.disposal_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, disposing");
            disposal.cancel();
        }
    });

    Ok(controller)
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_relative() {
        base.join(p)
    } else {
        p
    }
}

async fn list(config: &AppConfig, cfg: &ContactsConfig) -> Result<()> {
    let mut controller = build_controller(config, cfg).await?;
    if controller.mount().await == MountOutcome::Disposed {
        return Ok(());
    }
    println!("{}", controller.render());
    Ok(())
}

async fn add(
    config: &AppConfig,
    cfg: &ContactsConfig,
    draft: [(FormField, String); 3],
    image: Option<PathBuf>,
) -> Result<()> {
    let mut controller = build_controller(config, cfg).await?;
    if controller.mount().await == MountOutcome::Disposed {
        return Ok(());
    }

    for (field, value) in draft {
        controller.edit_field(field, value);
    }
    if let Some(path) = image {
        let blob = read_image(&path)
            .await
            .with_context(|| format!("failed to read image {}", path.display()))?;
        controller.select_image(blob);
    }

    let outcome = controller.submit().await;
    println!("{}", controller.render());
    match outcome {
        SubmitOutcome::Added(contact) => {
            tracing::info!(contact = %contact.display_name(), "contact added");
            Ok(())
        }
        SubmitOutcome::Rejected(e) => Err(anyhow::anyhow!(e)),
        SubmitOutcome::Failed(e) => Err(anyhow::anyhow!(e)),
        SubmitOutcome::Ignored => Ok(()),
    }
}

fn check_config(config: &AppConfig, cfg: &ContactsConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    HttpContactsGateway::from_config(cfg)?;
    if let Some(path) = &cfg.placeholder_image {
        let path = resolve(config.home_dir(), path);
        anyhow::ensure!(path.is_file(), "placeholder image {} not found", path.display());
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("list_url: {}", cfg.list_url);
    println!("upload_url: {}", cfg.upload_url);
    Ok(())
}
