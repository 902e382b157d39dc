use clap::{Parser, Subcommand};
use picture_atom::attributes::{self, Attributes};
use picture_atom::component::{HostElement, Picture};
use picture_atom::config::{self, PictureConfig};
use picture_atom::gate::NoopObserver;
use picture_atom::hover::NodeId;
use picture_atom::output;
use picture_atom::styles::FsStylesheets;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared flags for commands that build a component.
#[derive(clap::Args, Clone)]
struct ElementArgs {
    /// Attribute file (.toml or .json) describing the host element
    #[arg(long)]
    attrs: PathBuf,

    /// Natural width of the image in CSS pixels; bounds the synthesized sources
    #[arg(long)]
    natural_width: Option<u32>,
}

#[derive(Parser)]
#[command(name = "picture-atom")]
#[command(about = "Responsive, lazily-loaded picture fragments")]
#[command(long_about = "\
Responsive, lazily-loaded picture fragments

An element is described by an attribute file. Every value is a string;
structured values such as `sources` may be written natively:

  # hero.toml
  defaultSource = \"/img/hero.jpg?width=1200&format=jpg&quality=80\"
  alt = \"Harbour at dusk\"
  loading = \"eager\"
  namespace = \"picture-teaser-\"
  open-modal = \"open-gallery\"
  sources = [
    { source = \"/img/hero-s.webp\", type = \"image/webp\", size = \"small\" },
  ]

Without explicit sources, a `width` query parameter on defaultSource is
expanded into width variants every `synthesis.step` pixels.

Run 'picture-atom gen-config' to generate a documented picture.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing picture.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the element as an HTML fragment
    Render(ElementArgs),
    /// Show resolved configuration, sources, and warnings
    Check(ElementArgs),
    /// Print a stock picture.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let picture = connect(&args, &config)?;
            println!("{}", picture.render().into_string());
        }
        Command::Check(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let picture = connect(&args, &config)?;
            output::print_check_report(&picture, &config);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build a component for a statically rendered element.
///
/// Nothing ever scrolls into view here, so lazy images keep only their
/// `data-src`; eager ones are triggered during connect.
fn connect(args: &ElementArgs, config: &PictureConfig) -> Result<Picture, attributes::AttributeError> {
    let attributes = read_attributes(&args.attrs)?;
    let element = HostElement {
        id: NodeId(0),
        attributes,
        children: Vec::new(),
        natural_width: args.natural_width,
    };
    Ok(Picture::connect(
        element,
        config,
        Box::new(NoopObserver),
        &FsStylesheets,
    ))
}

fn read_attributes(path: &Path) -> Result<Attributes, attributes::AttributeError> {
    let attributes = attributes::load_attributes(path)?;
    tracing::debug!(path = %path.display(), count = attributes.iter().count(), "attributes loaded");
    Ok(attributes)
}
