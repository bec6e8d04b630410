use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

mod color;
mod config;
mod display;
mod error;
mod export;
mod scene;
mod share;
mod spiral;

use config::Config;
use export::ExportOptions;
use spiral::PresetCatalog;

#[derive(Parser, Debug)]
#[command(name = "demisphere")]
#[command(author, version, about = "Rotating spirals of circles in the terminal and as SVG")]
pub struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    pub spiral: SpiralArgs,
}

/// Starting spiral and display options, shared by every subcommand
#[derive(clap::Args, Debug, Default)]
pub struct SpiralArgs {
    /// Start from a named preset (see `demisphere presets`)
    #[arg(short, long, global = true)]
    pub preset: Option<String>,

    /// Shared query string, e.g. "circles=12&radius=25&reverse=1"
    #[arg(short, long, global = true)]
    pub query: Option<String>,

    /// Number of circles
    #[arg(long, global = true)]
    pub circles: Option<usize>,

    /// Radius of the first circle
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub radius: Option<f64>,

    /// Radius added per circle
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub increment: Option<f64>,

    /// Center offset added per circle
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Center angle added per circle, in radians
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// Circle stroke width
    #[arg(long, global = true)]
    pub stroke: Option<f64>,

    /// Milliseconds per full turn
    #[arg(long, global = true)]
    pub speed: Option<f64>,

    /// Rotate in reverse
    #[arg(short, long, global = true)]
    pub reverse: bool,

    /// Terminal color scheme: spectrum, rainbow, fire, ocean, forest, purple, monochrome
    #[arg(long, global = true)]
    pub colors: Option<String>,

    /// Terminal dots per scene unit
    #[arg(long, global = true)]
    pub zoom: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate the spiral in the terminal (default)
    View,

    /// Write the spiral as a standalone animated SVG
    Export {
        /// Output file, or "-" for stdout (defaults to "<preset>-demisphere.svg")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Use the 800x600 preview canvas
        #[arg(long, conflicts_with_all = ["width", "height"])]
        preview: bool,
    },

    /// Print the query string for the current spiral
    Share {
        /// Prefix the query with this URL
        #[arg(long)]
        base: Option<String>,
    },

    /// List the built-in presets
    Presets,

    /// Write a default config file to the XDG config directory
    InitConfig,

    /// Print shell completions
    Completions { shell: clap_complete::Shell },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::View);

    // The terminal view owns the screen, so keep logs quiet there
    let level = match command {
        Command::View => "demisphere=warn",
        _ => "demisphere=info",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    // Handle commands that don't need a resolved spiral
    match command {
        Command::InitConfig => {
            let path = Config::init_default_config()?;
            println!("Created config at {}", path.display());
            return Ok(());
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "demisphere", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    // Load config: explicit path, then XDG default, then built-in defaults
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args.spiral);

    let catalog = PresetCatalog::builtin();
    let state = config.resolve(&catalog, &args.spiral)?;
    let preset_name = catalog.identify(&state.parameters).to_string();

    match command {
        Command::View => {
            info!("Starting view on '{}'", preset_name);
            display::terminal::run(state, config, catalog).await?;
        }
        Command::Export {
            output,
            width,
            height,
            preview,
        } => {
            let options = if preview {
                ExportOptions::preview()
            } else {
                ExportOptions::default().with_size(
                    width.unwrap_or(config.export.width),
                    height.unwrap_or(config.export.height),
                )
            }
            .with_display(state.display);
            let document = export::svg_document(&state.parameters, &options);

            match output {
                Some(path) if path.as_os_str() == "-" => {
                    std::io::stdout().write_all(document.as_bytes())?;
                }
                Some(path) => export::write_svg(&path, &document)?,
                None => {
                    let filename = export::export_filename(&preset_name);
                    let path = match &config.export.directory {
                        Some(dir) => dir.join(filename),
                        None => PathBuf::from(filename),
                    };
                    export::write_svg(&path, &document)?;
                }
            }
        }
        Command::Share { base } => {
            let query = state.to_query();
            match base {
                Some(base) => println!("{}?{}", base.trim_end_matches('?'), query),
                None => println!("{}", query),
            }
        }
        Command::Presets => {
            for preset in catalog.all() {
                let p = &preset.parameters;
                let marker = if preset.name == preset_name { "*" } else { " " };
                println!(
                    "{} {:<24} circles={:<3} radius={:<6} increment={:<8.3} offset={:<5} angle={:.4}",
                    marker,
                    preset.name,
                    p.number_of_circles,
                    p.starting_radius,
                    p.radius_increment,
                    p.offset_distance,
                    p.angle_increment,
                );
            }
        }
        Command::InitConfig | Command::Completions { .. } => {}
    }

    Ok(())
}
