use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use fragdiff::config::RenderConfig;
use fragdiff::driver;

/// Structural diff of two Go source files.
#[derive(Parser)]
#[command(name = "fragdiff")]
#[command(about = "Structural diff of two Go source files")]
struct Cli {
    /// The older file (defaults to godiff-new.gogo, matching the original tool's sample pair)
    #[arg(default_value = "godiff-new.gogo")]
    old: PathBuf,

    /// The newer file (defaults to godiff.go)
    #[arg(default_value = "godiff.go")]
    new: PathBuf,
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: libc::signal is a standard POSIX call; this just changes how
    // SIGPIPE is delivered to this process, no memory safety implications.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn main() -> ExitCode {
    reset_sigpipe();

    let cli = Cli::parse();
    let cfg = RenderConfig::load(Path::new("."));

    println!(
        "{}",
        cfg.paint(&format!("Analyzing difference between {} and {} ...", cli.old.display(), cli.new.display()))
    );

    let old = match fragdiff_go::parse(&cli.old) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let new = match fragdiff_go::parse(&cli.new) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    for line in driver::diff(&old, &new, &cfg) {
        println!("{line}");
    }

    ExitCode::SUCCESS
}
