use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locus")]
#[command(about = "Resolve mobile UI selectors against recorded hierarchy dumps")]
#[command(
    long_about = "Locus resolves declarative selectors (text, id, size, state and relative position) the same way a test run does, but against a saved hierarchy dump instead of a live device."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[clap(rename_all = "lower")]
pub enum PlatformArg {
    #[default]
    Android,
    Ios,
}

impl From<PlatformArg> for locus::Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Android => locus::Platform::Android,
            PlatformArg::Ios => locus::Platform::Ios,
        }
    }
}

#[derive(Args, Debug)]
pub struct HierarchyArgs {
    /// Recorded hierarchy dump (UiAutomator XML or XCUITest page source)
    #[clap(long, short = 'H', env = "LOCUS_HIERARCHY")]
    pub hierarchy: PathBuf,

    /// Platform the dump was recorded on
    #[clap(long, short = 'p', value_enum, default_value_t = PlatformArg::Android, env = "LOCUS_PLATFORM")]
    pub platform: PlatformArg,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: HierarchyArgs,

    /// Selector in compact form, e.g. "text:Login && below:text:Header"
    #[clap(
        long,
        short = 's',
        conflicts_with = "selector_file",
        required_unless_present = "selector_file"
    )]
    pub selector: Option<String>,

    /// Selector as a JSON or YAML document
    #[clap(long)]
    pub selector_file: Option<PathBuf>,

    /// Timeout in milliseconds; 0 uses the configured default tier
    #[clap(long, short = 't', default_value_t = 0)]
    pub timeout_ms: u64,

    /// Treat the lookup as optional (shorter default timeout)
    #[clap(long)]
    pub optional: bool,

    /// Use the quick timeout tier instead of required/optional
    #[clap(long, conflicts_with = "optional")]
    pub quick: bool,

    /// Resolver config file (JSON or YAML); defaults plus LOCUS_* env otherwise
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print the resolved element as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: HierarchyArgs,

    /// Print the parsed elements as JSON instead of the indexed tree
    #[clap(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a selector against a hierarchy dump
    Resolve(ResolveArgs),
    /// Print a hierarchy dump as an indexed tree
    Dump(DumpArgs),
}
