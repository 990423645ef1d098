use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spot_separation::{OutputFormat, QuantizerKind};
use spotsep::models::{AppConfig, Overrides, DEFAULT_CONFIG_FILE};
use spotsep::services::SeparationService;

#[derive(Parser)]
#[command(name = "spotsep")]
#[command(about = "Spot-color separation of raster artwork for print production")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Separate a PNG into named, ordered spot-color channels
    Separate {
        /// Input artwork (PNG)
        input: PathBuf,

        /// Configuration file (default: ./spotsep.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of spot colors (2-12)
        #[arg(long)]
        colors: Option<u32>,

        /// Dither strength in percent (1-100)
        #[arg(long)]
        dither: Option<u32>,

        /// Palette reduction: "adaptive" or "selective"
        #[arg(long)]
        quantizer: Option<QuantizerKind>,

        /// Channel file format: "grayscale" or "indexed"
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Write the default configuration file
    Init {
        /// Where to write it
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
    /// List the known spot colors used for channel names
    Colors {
        /// Configuration file (default: ./spotsep.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotsep=info,spot_separation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Separate {
            input,
            config,
            output,
            colors,
            dither,
            quantizer,
            format,
        } => {
            let overrides = Overrides {
                color_count: colors,
                dither_strength: dither,
                quantizer,
                output_format: format,
                output_dir: output,
            };
            run_separate_command(&input, config.as_deref(), &overrides)
        }
        Commands::Init { output, force } => run_init_command(&output, force),
        Commands::Colors { config } => run_colors_command(config.as_deref()),
    }
}

/// Separate one artwork file and print a summary
fn run_separate_command(
    input: &Path,
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load(config_path)?;
    config.apply(overrides);

    let service = SeparationService::new(config);
    let outcome = service.separate_file(input)?;
    let report = &outcome.report;

    println!("Separation complete");
    println!("  Output:      {}", report.output_dir);
    println!("  Channels:    {}", report.channels.len());
    println!("  Min stroke:  {}mm", report.min_stroke_mm);
    for channel in &report.channels {
        println!(
            "  {:>2}. {:<24} {}  opacity {:>3}%  coverage {:>6.2}%",
            channel.position, channel.name, channel.color, channel.opacity, channel.coverage_percent
        );
    }
    if outcome.failure_count() > 0 {
        println!(
            "  Skipped:     {} (see {})",
            outcome.failure_count(),
            service.error_log().path().display()
        );
    }
    println!("  Report:      {}", outcome.report_path.display());

    Ok(())
}

/// Write the default configuration file
fn run_init_command(output: &Path, force: bool) -> anyhow::Result<()> {
    AppConfig::write_default(output, force)?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Print the effective known-color table
fn run_colors_command(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;
    let table = config.known_color_table();

    println!("Known colors ({}):", table.len());
    for (hex, name) in table.iter() {
        println!("  #{hex}  {name}");
    }
    if !config.separation.use_known_colors {
        println!("(known-color naming is disabled in the configuration)");
    }
    Ok(())
}
