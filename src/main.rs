mod age;
mod cli;
mod config;
mod error;
mod github;
mod models;
mod render;
mod repos;
mod session;
mod stats;

use std::process::ExitCode;

use age::AccountAge;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use cli::{Args, Command};
use config::Config;
use github::{GithubApi, GithubClient, is_valid_repo_name, is_valid_username};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use session::{FileSessionStore, MemorySessionStore, SessionStore};
use stats::RandomContributions;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The chain only shows up with -v; stderr gets the outermost message.
            info!("{e:#}");
            debug!("{e:?}");
            eprintln!("{}", failure_line(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.overrides())?;
    let session = open_session(&args, &config)?;
    let client = GithubClient::new(&config)?;
    let today = Utc::now().date_naive();

    match args.command {
        Command::Profile { username } => {
            let username = resolve_username(username, session.as_ref())?;
            let profile = client.profile(&username).await.context(
                "Failed to fetch GitHub profile. Please check the username and try again.",
            )?;
            if let Err(e) = session.set(&username) {
                warn!("could not remember {username}: {e}");
            }
            let age = AccountAge::between(profile.created_at.date_naive(), today);
            print!("{}", render::render_profile(&profile, age));
        }
        Command::Repos { username, filter } => {
            let username = resolve_username(username, session.as_ref())?;
            let all = client
                .repositories(&username)
                .await
                .context("Failed to fetch repositories. Please try again.")?;
            let term = filter.as_deref().unwrap_or("");
            let shown = repos::filter_repositories(&all, term);
            info!("{} of {} repositories match", shown.len(), all.len());
            print!("{}", render::render_repositories(&shown, filter.as_deref()));
        }
        Command::Repo { name, user } => {
            let owner = resolve_username(user, session.as_ref())?;
            if !is_valid_repo_name(&name) {
                bail!("'{name}' is not a valid repository name");
            }
            let details = client
                .repository(&owner, &name)
                .await
                .context("Failed to fetch repository details. Please try again.")?;
            print!("{}", render::render_repository(&details));
        }
        Command::Analyze { username, json } => {
            let username = resolve_username(username, session.as_ref())?;
            let mut contributions = RandomContributions::new(StdRng::from_entropy());
            let statistics = stats::analyze(&client, &username, today, &mut contributions).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&statistics)?);
            } else {
                print!("{}", render::render_statistics(&username, &statistics));
            }
        }
        Command::Forget => {
            session.clear()?;
            info!("forgot the remembered username");
        }
    }

    Ok(())
}

/// The single line printed on stderr when a command fails.
fn failure_line(e: &anyhow::Error) -> String {
    format!("error: {e}")
}

fn open_session(args: &Args, config: &Config) -> Result<Box<dyn SessionStore>> {
    if args.no_session {
        return Ok(Box::new(MemorySessionStore::default()));
    }
    let store = match &config.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::in_config_dir()?,
    };
    debug!("session file: {}", store.path().display());
    Ok(Box::new(store))
}

/// The username given on the command line, else the remembered one.
fn resolve_username(given: Option<String>, session: &dyn SessionStore) -> Result<String> {
    let username = match given.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        Some(u) => u,
        None => match session.get()? {
            Some(u) => u,
            None => bail!("no username given and none remembered; run `ghlens profile <USERNAME>` first"),
        },
    };

    if !is_valid_username(&username) {
        bail!("'{username}' is not a valid GitHub username");
    }
    Ok(username)
}
