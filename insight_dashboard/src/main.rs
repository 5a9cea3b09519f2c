use anyhow::Result;
use clap::Parser;
use insight_dashboard::cli::{Cli, Commands};
use insight_dashboard::commands::{handle_export, handle_generate, handle_report, handle_show};
use insight_dashboard::Settings;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the log subscriber; `RUST_LOG` overrides the configured filter.
fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.logging.filter)?;
    tracing::debug!(?settings, "Loaded settings");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Show(args) => handle_show(&mut out, args, &settings)?,
        Commands::Report(args) => handle_report(&mut out, args, &settings)?,
        Commands::Export(args) => handle_export(&mut out, args, &settings)?,
        Commands::Generate(args) => handle_generate(&mut out, args)?,
    }

    Ok(())
}
