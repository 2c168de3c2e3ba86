mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reggen_core::FallbackAnchor;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rgen", version, about = "Fill document placeholders with generated regulatory text")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// List the known sections and their placeholder tags
    Sections,

    /// Generate a section (or free-form text) and insert it into a document
    Generate(GenerateArgs),

    /// Insert given text into a document without generating it
    Insert(InsertArgs),

    /// List content controls and check section placeholders
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Section to generate (intro, objectives, methodology)
    #[arg(required_unless_present = "prompt")]
    pub section: Option<String>,

    /// Free-form prompt; the result replaces the document's selection
    #[arg(long, conflicts_with = "section")]
    pub prompt: Option<String>,

    /// Markdown document to fill
    #[arg(long)]
    pub doc: PathBuf,
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Markdown document to fill
    #[arg(long)]
    pub doc: PathBuf,

    #[command(flatten)]
    pub target: InsertTarget,

    #[command(flatten)]
    pub source: TextSource,

    /// Where text goes when no control carries the tag
    #[arg(long, value_enum, default_value_t = AnchorArg::End)]
    pub anchor: AnchorArg,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InsertTarget {
    /// Placeholder tag to fill (e.g. "cc_intro")
    #[arg(long)]
    pub tag: Option<String>,

    /// Section whose placeholder to fill
    #[arg(long)]
    pub section: Option<String>,

    /// Replace the active selection instead of a placeholder
    #[arg(long)]
    pub at_cursor: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TextSource {
    /// Text to insert; a literal \n becomes a line break
    #[arg(long)]
    pub text: Option<String>,

    /// Read the text to insert from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Markdown document to inspect
    #[arg(long)]
    pub doc: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnchorArg {
    End,
    Start,
}

impl From<AnchorArg> for FallbackAnchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::End => FallbackAnchor::End,
            AnchorArg::Start => FallbackAnchor::Start,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Sections => cmd::sections::run(),
        Commands::Generate(args) => {
            cmd::generate::run(cli.config.as_deref(), cli.profile.as_deref(), &args)?
        }
        Commands::Insert(args) => cmd::insert::run(&args)?,
        Commands::Inspect(args) => cmd::inspect::run(&args)?,
    }

    Ok(())
}
