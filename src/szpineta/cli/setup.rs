use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2025-03-01 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "szpineta", bin_name = "szpineta", version = get_version())]
#[command(about = "Publishing and sharing for the szpineta poetry archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root holding poems.html, index.html and szpineta.json
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the site, the admin panel and the publishing API
    Serve {
        /// Port to listen on (overrides PORT and szpineta.json)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Append a poem to the local listing and summary pages
    Add {
        /// Title, kept as a comment above the poem
        #[arg(short, long)]
        title: Option<String>,

        /// Poem text; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,
    },

    /// Print the text of a poem (numbered from 1)
    Show { number: u64 },

    /// Render a poem as a story card PNG
    Card {
        number: u64,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Font file (overrides CARD_FONT and szpineta.json)
        #[arg(long)]
        font: Option<PathBuf>,
    },
}
