use std::cmp::Ordering;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing_subscriber::EnvFilter;

use upgo::output::Table;
use upgo::repo::{self, RepoResolution};
use upgo::toolchain::Toolchain;
use upgo::version::catalog;
use upgo::version::semver::{compare_toolchain, prerelease};

#[derive(Parser)]
#[command(name = "upgo")]
#[command(version, about = "Update Go executables and inspect their release history")]
struct Cli {
    /// Overall deadline for the command in seconds (0 for none).
    #[arg(long, global = true, default_value_t = 600)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print available versions for a Go executable
    List {
        /// Path or name of the executable to inspect
        exe: String,

        /// List all versions, not just unretracted ones newer than the
        /// installed executable
        #[arg(long)]
        all: bool,

        /// Only print versions whose pre-release part matches the
        /// pattern
        #[arg(long, value_name = "REGEXP")]
        suffix: Option<String>,
    },

    /// Reinstall the executable at a chosen version
    Install {
        /// Path or name of the executable to reinstall
        exe: String,

        /// Version to install, e.g. v1.2.3 or latest
        version: String,

        /// Print the names of packages as they are compiled
        #[arg(short = 'v')]
        verbose: bool,

        /// Print the commands run by the go tool
        #[arg(short = 'x')]
        commands: bool,
    },

    /// Print the source repository URL for the executable
    Repo {
        /// Path or name of the executable to look up
        exe: String,

        /// Open the URL in a browser instead of printing it
        #[arg(short = 'o')]
        open: bool,
    },

    /// Print the issue tracker URL for the executable
    Bugs {
        /// Path or name of the executable to look up
        exe: String,

        /// Open the URL in a browser instead of printing it
        #[arg(short = 'o')]
        open: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("UPGO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let work = run(cli.command);
        if cli.timeout > 0 {
            tokio::time::timeout(Duration::from_secs(cli.timeout), work)
                .await
                .map_err(|_| anyhow!("operation timed out after {}s", cli.timeout))?
        } else {
            work.await
        }
    })
}

async fn run(command: Command) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("upgo/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;
    let go = Toolchain::new();

    match command {
        Command::List { exe, all, suffix } => {
            run_list(&client, &go, &exe, all, suffix.as_deref()).await
        }
        Command::Install {
            exe,
            version,
            verbose,
            commands,
        } => {
            let info = go.executable_info(&exe).await?;
            go.install(
                &client,
                &info.package_path,
                &info.module_path,
                &version,
                verbose,
                commands,
            )
            .await
        }
        Command::Repo { exe, open } => run_url(&client, &go, &exe, open, |r| r.repo_url).await,
        Command::Bugs { exe, open } => run_url(&client, &go, &exe, open, |r| r.issues_url).await,
    }
}

async fn run_list(
    client: &reqwest::Client,
    go: &Toolchain,
    exe: &str,
    all: bool,
    suffix: Option<&str>,
) -> Result<()> {
    let filter = Regex::new(suffix.unwrap_or("")).context("invalid --suffix pattern")?;

    let info = go.executable_info(exe).await?;
    let proxies = go.proxies().await?;
    let versions =
        catalog::available_versions(client, &proxies, &info.module_path, &info.version, all)
            .await?;

    let mut table = Table::new();
    for v in &versions {
        if !all && compare_toolchain(&v.version, &info.version) != Ordering::Greater {
            if table.is_empty() {
                eprintln!("no new version");
            }
            break;
        }
        if !all && v.retracted {
            continue;
        }
        if !filter.is_match(&prerelease(&v.version)) {
            continue;
        }

        let date = v
            .time
            .map(|t| t.format("%e %b %Y %H:%M").to_string())
            .unwrap_or_default();
        let note = if v.retracted {
            match &v.rationale {
                Some(rationale) => format!("retracted: {rationale}"),
                None => "retracted".to_string(),
            }
        } else {
            String::new()
        };
        table.add_row(vec![v.version.clone(), date, note]);
    }
    print!("{}", table.render());
    Ok(())
}

async fn run_url(
    client: &reqwest::Client,
    go: &Toolchain,
    exe: &str,
    open_browser: bool,
    pick: fn(RepoResolution) -> String,
) -> Result<()> {
    let info = go.executable_info(exe).await?;
    let resolution = repo::resolve(client, &info.module_path).await?;
    let url = pick(resolution);
    if !open_browser || open::that(&url).is_err() {
        println!("{url}");
    }
    Ok(())
}
