//! netform - Terraform bundles for Google Cloud network topologies
//!
//! This is the main entry point for the netform CLI.

mod cli;

use anyhow::Result;
use cli::commands::CommandContext;
use cli::{Cli, Commands};
use netform::config::{LoggingSettings, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse_args();

    // Completions need neither settings nor logging
    if let Commands::Completions(args) = &cli.command {
        std::process::exit(report(args.execute(), None));
    }

    let settings = match Settings::load(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) if cli.config.is_some() => {
            eprintln!("ERROR: {:#}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("WARNING: Failed to load config: {:#}", e);
            Settings::default()
        }
    };

    init_logging(cli.verbosity(), &settings.logging);
    tracing::debug!(build = %netform::version_info(), "netform starting");

    let mut ctx = CommandContext::new(&cli, settings);
    let result = run(&cli, &mut ctx);
    std::process::exit(report(result, Some(&ctx)));
}

fn run(cli: &Cli, ctx: &mut CommandContext) -> Result<i32> {
    match &cli.command {
        Commands::Generate(args) => args.execute(ctx),
        Commands::Validate(args) => args.execute(ctx),
        Commands::Variables(args) => args.execute(ctx),
        Commands::Cost(args) => args.execute(ctx),
        Commands::Completions(args) => args.execute(),
    }
}

/// Print a failed command's error and map it to an exit code.
fn report(result: Result<i32>, ctx: Option<&CommandContext>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{:#}", e);
            match ctx {
                Some(ctx) => ctx.output.error(&message),
                None => eprintln!("ERROR: {}", message),
            }
            e.downcast_ref::<netform::Error>()
                .map(netform::Error::exit_code)
                .unwrap_or(1)
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8, logging: &LoggingSettings) {
    let filter = match verbosity {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if logging.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbosity >= 3),
            )
            .with(env_filter)
            .init();
    }
}
