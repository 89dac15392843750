//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kurso",
    version,
    about = "Turn a syllabus PDF into a multi-week curriculum",
    long_about = "Kurso ingests a syllabus PDF into a local embedding index, retrieves the \
                  syllabus context relevant to a topic, and generates weekly subtopics, lesson \
                  plans, quizzes, resource lists, and assignments through a chat completion \
                  service. Generated markdown can be rendered to PDF."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/kurso/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a syllabus PDF and (re)build its retrieval collection
    Ingest {
        /// Path to the syllabus PDF
        pdf: PathBuf,

        /// Collection name (defaults to the configured default collection)
        #[arg(short = 'n', long)]
        collection: Option<String>,
    },

    /// Show the syllabus context retrieved for a query
    Context {
        /// Query text
        query: String,

        /// Collection name
        #[arg(short = 'n', long)]
        collection: Option<String>,

        /// Number of chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Decompose a topic into weekly subtopics using syllabus context
    Outline {
        /// Topic to plan a curriculum for
        topic: String,

        /// Collection name
        #[arg(short = 'n', long)]
        collection: Option<String>,

        /// Number of context chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Write the outline here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expand a weekly outline into a detailed lesson plan
    Lessons {
        /// File holding the weekly outline
        outline: PathBuf,

        /// Write the plan here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate quiz questions from a lesson plan
    Quiz {
        /// File holding the lesson plan
        plan: PathBuf,

        /// Write the quiz here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recommend learning resources for a weekly plan
    Resources {
        /// File holding the weekly plan
        plan: PathBuf,

        /// Write the recommendations here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create assignments from a weekly outline
    Assignments {
        /// File holding the weekly outline
        outline: PathBuf,

        /// Write the assignments here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render an HTML document to a PDF file
    Export {
        /// File holding the HTML document
        html: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
