use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for glade")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in order, stopping at the first failure
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates and targets, warnings denied
    Clippy,
    /// Run tests for the workspace or a single crate
    Test {
        /// Crate name, e.g. glade-terrain
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Run the terrain build benchmark
    Bench,
    /// Run every CLI subcommand once with small settings
    Smoke,
    /// Build rustdoc for the workspace
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test(None)?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test { package } => test(package.as_deref())?,
        Commands::Bench => cargo("bench", &["bench", "-p", "glade-terrain"])?,
        Commands::Smoke => smoke()?,
        Commands::Doc => doc()?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `label` if it exits unsuccessfully.
fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed ({status})");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test(package: Option<&str>) -> Result<()> {
    match package {
        Some(package) => cargo("tests", &["test", "-p", package]),
        None => cargo("tests", &["test", "--workspace"]),
    }
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn smoke() -> Result<()> {
    let runs: [&[&str]; 4] = [
        &["run", "-q", "-p", "glade-cli", "--", "info"],
        &["run", "-q", "-p", "glade-cli", "--", "build", "--size", "8", "--seed", "1"],
        &["run", "-q", "-p", "glade-cli", "--", "tween", "--easing", "cubic"],
        &["run", "-q", "-p", "glade-cli", "--", "fly", "--frame-ms", "100"],
    ];
    for args in runs {
        cargo("smoke run", args)?;
    }
    Ok(())
}
