use clap::Parser;
use form_autofill::cli::commands::{cmd_fill, cmd_live};
use form_autofill::cli::config::{Cli, Commands, load_config, log_level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    FmtSubscriber::builder()
        .with_max_level(log_level(cli.quiet, cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fill {
            fixture,
            seed,
            format,
            submit,
            trace,
        } => {
            cmd_fill(&fixture, &seed, &format, submit, trace.as_deref(), &config)?;
        }
        Commands::Live {
            url,
            selector,
            seed,
            submit,
            script,
            trace,
        } => {
            cmd_live(
                &url,
                &selector,
                &seed,
                submit,
                script.as_deref(),
                trace.as_deref(),
                &config,
            )?;
        }
    }

    Ok(())
}
