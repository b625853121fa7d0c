//! termctl - print colored text through a terminal controller
//!
//! Writes its arguments to stdout in the requested color. Color is only
//! emitted when stdout is a color-capable terminal, unless forced with
//! `--mode always`.

use std::io;
use std::process::ExitCode;

use serde::Serialize;
use termctl::capability::{self, ColorMode, OsEnv};
use termctl::text::{best_match, chuzzle};
use termctl::{Color, TerminalController};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Capability report printed by `--json`
#[derive(Debug, Serialize)]
struct Report {
    is_tty: bool,
    term: Option<String>,
    mode: ColorMode,
    color: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Parse command line arguments
    let mut color = Color::NoColor;
    let mut mode = ColorMode::Auto;
    let mut json = false;
    let mut show_help = false;
    let mut words: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--color" => {
                i += 1;
                let Some(name) = args.get(i) else {
                    eprintln!("--color needs a value");
                    return ExitCode::FAILURE;
                };
                match name.parse::<Color>() {
                    Ok(c) => color = c,
                    Err(e) => {
                        eprintln!("{e}");
                        let names: Vec<&str> = Color::ALL.iter().map(|c| c.name()).collect();
                        if let Some(suggestion) = best_match(name, &names) {
                            eprintln!("Did you mean '{suggestion}'?");
                        }
                        return ExitCode::FAILURE;
                    },
                }
            },
            "-m" | "--mode" => {
                i += 1;
                match args.get(i).map(|m| m.parse::<ColorMode>()) {
                    Some(Ok(m)) => mode = m,
                    Some(Err(e)) => {
                        eprintln!("{e}");
                        return ExitCode::FAILURE;
                    },
                    None => {
                        eprintln!("--mode needs a value");
                        return ExitCode::FAILURE;
                    },
                }
            },
            "-j" | "--json" => {
                json = true;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => words.push(args[i].clone()),
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if json {
        return print_report(mode);
    }

    let stdout = io::stdout();
    let mut term = match TerminalController::with_mode(stdout.lock(), mode, &OsEnv) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to bind stdout: {}", e);
            return ExitCode::FAILURE;
        },
    };

    let joined = words.join(" ");
    let text = chuzzle(&joined).unwrap_or("");
    tracing::info!(%color, color_capable = term.is_color_capable(), "writing");

    let result = term.write(text, color).and_then(|_| term.end_line());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Write error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn print_report(mode: ColorMode) -> ExitCode {
    let stdout = io::stdout();
    let report = Report {
        is_tty: capability::is_terminal(&stdout),
        term: std::env::var("TERM").ok(),
        mode,
        color: capability::resolve(&stdout, mode, &OsEnv),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn print_help() {
    println!("termctl - print colored text through a terminal controller");
    println!();
    println!("Usage: termctl [OPTIONS] [TEXT]...");
    println!();
    println!("Options:");
    println!("  -c, --color <NAME>  Foreground color (default: nocolor)");
    println!("                      black, red, green, yellow, blue, magenta,");
    println!("                      cyan, white, default, nocolor");
    println!("  -m, --mode <MODE>   auto, always or never (default: auto)");
    println!("  -j, --json          Print the detected capability as JSON");
    println!("  -h, --help          Show this help message");
    println!();
    println!("Color is written only when stdout is a terminal and TERM is not");
    println!("'dumb', unless --mode always is given.");
}
