//! ambit - audit the ambient global and Node core API surface an npm
//! package (and its whole dependency tree) would touch at runtime.
//!
//! The report prints to stdout as JSON; diagnostics go to stderr via
//! `AMBIT_LOG` (e.g. `AMBIT_LOG=ambit_core=debug`).

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Once;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tempfile::TempDir;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ambit_core::{package_entry, Auditor};

#[derive(Debug, Parser)]
#[command(
    name = "ambit",
    version,
    about = "Statically audit which ambient globals and Node core APIs an npm package references"
)]
struct Cli {
    /// NPM package name, package directory, or path to a JS/TS entry file
    target: String,

    /// Never run `npm install`; fail if the package is not in ./node_modules
    #[arg(long)]
    offline: bool,

    /// Print the report on a single line instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("AMBIT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("ambit_core=warn,ambit_cli=warn"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // _install_dir keeps a temporary npm prefix alive until the run ends
    let (entry, root, _install_dir) = locate_entry(&cli)?;
    info!(entry = %entry.display(), "starting audit");

    let report = Auditor::new(&root).run(&entry)?;

    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}

/// Turn the CLI target into an entry file plus the root that anchors module
/// identities. Precedence: existing file, existing directory, locally
/// installed package, `npm install` into a temp prefix.
fn locate_entry(cli: &Cli) -> Result<(PathBuf, PathBuf, Option<TempDir>)> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;

    let candidate = cwd.join(&cli.target);
    if candidate.is_file() {
        return Ok((candidate, cwd, None));
    }
    if candidate.is_dir() {
        let entry = package_entry(&candidate)
            .with_context(|| format!("{} has no resolvable entry point", candidate.display()))?;
        return Ok((entry, cwd, None));
    }

    let local = cwd.join("node_modules").join(&cli.target);
    if local.is_dir() {
        let entry = package_entry(&local)
            .with_context(|| format!("package {} has no resolvable entry point", cli.target))?;
        return Ok((entry, cwd, None));
    }

    if cli.offline {
        bail!(
            "package {} not found in ./node_modules (running with --offline)",
            cli.target
        );
    }

    let install_dir = tempfile::tempdir().context("cannot create temporary install directory")?;
    install_package(&cli.target, install_dir.path())?;
    let package_dir = install_dir.path().join("node_modules").join(&cli.target);
    let entry = package_entry(&package_dir)
        .with_context(|| format!("package {} has no resolvable entry point", cli.target))?;
    let root = install_dir.path().to_path_buf();
    Ok((entry, root, Some(install_dir)))
}

fn install_package(name: &str, prefix: &Path) -> Result<()> {
    info!(package = name, prefix = %prefix.display(), "installing package into temporary prefix");
    let status = Command::new("npm")
        .args(["install", name, "--no-save", "--prefix"])
        .arg(prefix)
        .status()
        .context("failed to run npm")?;
    if !status.success() {
        bail!("npm install {name} failed with {status}");
    }
    Ok(())
}
