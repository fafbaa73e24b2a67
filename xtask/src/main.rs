use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for physstep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the world stepping benchmark in release mode
    Bench,
    /// Run the demo scene and the frame pacing replay through the CLI
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_deny()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Deny => run_deny()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo(&["build", "--workspace"], "cargo build")?,
        Commands::Bench => cargo(
            &[
                "bench",
                "-p",
                "physstep-integrators",
                "--bench",
                "bench_world_step",
            ],
            "cargo bench",
        )?,
        Commands::Demo => run_demo()?,
    }

    Ok(())
}

/// Run `cargo <args>` and fail with `what` if it exits unsuccessfully.
fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("==> Running {what}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "cargo fmt check")
}

fn run_clippy() -> Result<()> {
    cargo(
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        "cargo clippy",
    )
}

fn run_tests() -> Result<()> {
    cargo(&["test", "--workspace"], "cargo test")
}

fn run_deny() -> Result<()> {
    cargo(
        &["deny", "check", "licenses", "bans", "sources"],
        "cargo deny check",
    )
}

fn run_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"], "cargo doc")
}

fn run_demo() -> Result<()> {
    let cli = ["run", "-q", "-p", "physstep-cli", "--"];
    let run: Vec<&str> = cli
        .iter()
        .copied()
        .chain(["run", "--frames", "600", "--hitch-every", "120"])
        .collect();
    cargo(&run, "demo run")?;
    let replay: Vec<&str> = cli.iter().copied().chain(["replay"]).collect();
    cargo(&replay, "demo replay")
}
