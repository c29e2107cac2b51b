use owo_colors::OwoColorize;
use std::io::{ErrorKind, Write};
use std::process::{self, ExitStatus, Stdio};

/// Builds `code` with `cxx` in a temporary directory and runs the result.
pub fn run(code: &str, cxx: &str) -> Result<ExitStatus, ()> {
    let dir = tempfile::tempdir()
        .map_err(|e| eprintln!("failed to create a temporary directory: {e}"))?;
    let exe = dir.path().join("a.out");
    let mut child = match process::Command::new(cxx)
        .args(["-std=c++17", "-x", "c++", "-O2", "-o"])
        .arg(&exe)
        .arg("-")
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound => eprintln!(
                    "{cxx} command not found. \
                    You need to install a C++ compiler."
                ),
                _ => eprintln!("failed to run {cxx}: {e}"),
            };
            return Err(());
        }
    };
    log::info!("   {} with {cxx}", "Compiling".green().bold());
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(code.as_bytes())
            .map_err(|e| eprintln!("failed to pass the program to {cxx}: {e}"))?;
    }
    let status = child
        .wait()
        .map_err(|e| eprintln!("failed to wait for {cxx}: {e}"))?;
    if !status.success() {
        eprintln!("{cxx} exited with {status}");
        return Err(());
    }
    log::info!("     {} {}", "Running".green().bold(), exe.display());
    process::Command::new(&exe)
        .status()
        .map_err(|e| eprintln!("failed to run {}: {e}", exe.display()))
}
