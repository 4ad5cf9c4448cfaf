//! Voidline - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voidline_tools::simulate::{self, SimulationParams};
use voidline_tools::{templates, validate};

#[derive(Parser)]
#[command(name = "voidline-tools")]
#[command(about = "Development tools for Voidline")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate template files
    Validate {
        /// Path to template directory
        #[arg(default_value = "data/templates")]
        path: PathBuf,

        /// Template file extension
        #[arg(long, default_value = "ron")]
        extension: String,
    },

    /// Create a blank template holding a default transform
    NewTemplate {
        /// Path to template directory
        path: PathBuf,

        /// Template name
        name: String,

        /// Template file extension
        #[arg(long, default_value = "ron")]
        extension: String,
    },

    /// Run a headless sector and print a summary
    Simulate {
        /// Path to template directory
        #[arg(long, default_value = "data/templates")]
        templates: PathBuf,

        /// Template to spawn
        #[arg(long, default_value = "dagger")]
        template: String,

        /// Number of ships
        #[arg(long, default_value = "4")]
        ships: usize,

        /// Ticks to run at 60 Hz
        #[arg(long, default_value = "600")]
        ticks: u32,
    },
}

fn run(command: Commands) -> voidline_tools::Result<()> {
    match command {
        Commands::Validate { path, extension } => {
            tracing::info!("Validating templates in: {}", path.display());
            let report = validate::validate_template_directory(&path, &extension)?;
            println!(
                "{}",
                ron::ser::to_string_pretty(&report, ron::ser::PrettyConfig::new())?
            );
            report.into_result()?;
            tracing::info!("Validation passed");
        }
        Commands::NewTemplate {
            path,
            name,
            extension,
        } => {
            let file = templates::create_blank_template(&path, &name, &extension)?;
            println!("{}", file.display());
        }
        Commands::Simulate {
            templates,
            template,
            ships,
            ticks,
        } => {
            let summary = simulate::run(&SimulationParams {
                templates,
                template,
                ships,
                ticks,
                ..SimulationParams::default()
            })?;
            println!(
                "{}",
                ron::ser::to_string_pretty(&summary, ron::ser::PrettyConfig::new())?
            );
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
