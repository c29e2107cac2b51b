mod run_cpp;

use clap::Parser;
use owo_colors::OwoColorize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::io::{self, stdout, Write};
use std::process::exit;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File name; the program is read from stdin if omitted
    file: Option<String>,
    #[arg(short, long)]
    /// Compile the generated C++ and run it
    run: bool,
    #[arg(long, default_value = "c++")]
    /// C++ compiler used by `--run`
    cxx: String,
    #[arg(short, long)]
    /// Show debug logs
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logger: {e}");
    }
    let file_name = args.file.as_deref().unwrap_or("<stdin>");
    let src = match &args.file {
        Some(path) => fs::read_to_string(path),
        None => io::read_to_string(io::stdin()),
    };
    let src = src.unwrap_or_else(|e| {
        eprintln!("{} {file_name}: {e}", "error:".red().bold());
        exit(1)
    });
    log::info!(" {} {file_name}", "Translating".green().bold());
    let ast = compiler::parse(&src).unwrap_or_else(|e| {
        if let Err(e) = e.write(io::stderr(), file_name, &src) {
            eprintln!("failed to report parse errors: {e}");
        }
        exit(1)
    });
    let cpp = compiler::gen_cpp(ast).unwrap_or_else(|e| {
        eprintln!("{} {e}", "error:".red().bold());
        exit(1)
    });
    if args.run {
        match run_cpp::run(&cpp, &args.cxx) {
            Ok(status) => exit(status.code().unwrap_or(1)),
            Err(()) => exit(1),
        }
    } else {
        let mut out = stdout().lock();
        if let Err(e) = write!(out, "{cpp}").and_then(|()| out.flush()) {
            eprintln!("{} failed to write the output: {e}", "error:".red().bold());
            exit(1);
        }
    }
}
