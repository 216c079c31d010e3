use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::config::Overrides;

/// Visualize a public GitHub account from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "ghlens")]
#[command(about = "Profile, repositories and contribution analysis of a GitHub account", long_about = None)]
#[command(version)]
pub struct Args {
    /// GitHub REST API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Where the last username is remembered
    #[arg(long, value_name = "PATH", global = true)]
    pub session_file: Option<PathBuf>,

    /// Do not read or remember the last username
    #[arg(long, global = true)]
    pub no_session: bool,

    /// More output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show a user's profile and remember the username
    Profile { username: Option<String> },
    /// List a user's repositories
    Repos {
        username: Option<String>,
        /// Keep repositories whose name or description contains TERM
        #[arg(short, long, value_name = "TERM")]
        filter: Option<String>,
    },
    /// Show one repository in detail
    Repo {
        name: String,
        /// Owner of the repository (defaults to the remembered username)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Language distribution, contribution trend and popular repositories
    Analyze {
        username: Option<String>,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the remembered username
    Forget,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout,
            session_file: self.session_file.clone(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}
