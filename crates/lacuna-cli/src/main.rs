use anyhow::{Context, Result};
use clap::Parser;
use lacuna_cli::cli::{Cli, Commands, ResolveCommands};
use lacuna_cli::commands;
use lacuna_config::ConfigLoader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the command line level
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    debug!(types = config.stub_types.len(), prefix = %config.anchors.prefix, "Configuration ready");

    match cli.command {
        Commands::Sync {
            file,
            json,
            group,
            sort,
            types,
            query,
        } => commands::sync::execute(&config, &file, json, group, sort.into(), types, query).await?,
        Commands::Check { file } => {
            if !commands::check::execute(&config, &file).await? {
                std::process::exit(1);
            }
        }
        Commands::Add {
            file,
            stub_type,
            description,
            line,
            anchor,
            properties,
        } => {
            commands::edit::add(&config, &file, stub_type, description, line, anchor, &properties)
                .await?
        }
        Commands::Remove {
            file,
            target,
            with_anchor,
        } => commands::edit::remove(&config, &file, &target, with_anchor).await?,
        Commands::Update {
            file,
            target,
            set_description,
            set_anchor,
            clear_anchor,
            properties,
            unset,
        } => {
            let anchor = match (set_anchor, clear_anchor) {
                (Some(token), _) => Some(Some(token)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            commands::edit::update(
                &config,
                &file,
                &target,
                set_description,
                anchor,
                &properties,
                unset,
            )
            .await?
        }
        Commands::Resolve(ResolveCommands::Stub {
            file,
            target,
            delete,
            reinsert_at,
        }) => commands::resolve::stub(&config, &file, &target, delete, reinsert_at).await?,
        Commands::Resolve(ResolveCommands::Anchor {
            file,
            token,
            create,
            description,
            delete,
            plain,
        }) => {
            commands::resolve::anchor(&config, &file, &token, create, description, delete, plain)
                .await?
        }
        Commands::NewId { file, stub_type } => {
            commands::new_id::execute(&config, &file, &stub_type).await?
        }
    }

    Ok(())
}
