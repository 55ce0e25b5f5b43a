//! Command-line front end for `remake`.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as CliArgs;
use log::warn;

use remake::interp::{ExecOptions, Interpreter};
use remake::lexer::Lexer;
use remake::parser::{ParseState, Parser};

#[derive(CliArgs)]
#[command(name = "remake", version, about = "Minimal Makefile-driven build tool")]
struct Args {
    /// Build target to run (default: the first target in the file)
    target: Option<String>,

    /// Read FILE as the build description
    #[arg(short = 'f', long = "file", default_value = "Makefile")]
    file: PathBuf,

    /// Change to DIRECTORY before doing anything
    #[arg(short = 'C', long = "directory")]
    directory: Option<PathBuf>,

    /// Print commands without executing them
    #[arg(short = 'n', long = "just-print")]
    just_print: bool,

    /// Don't echo commands
    #[arg(short = 's', long = "silent")]
    silent: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if let Some(directory) = &args.directory {
        if let Err(error) = env::set_current_dir(directory) {
            eprintln!(
                "remake: cannot change to directory {}: {error}",
                directory.display()
            );
            return ExitCode::FAILURE;
        }
    }

    let lexer = Lexer::new(&args.file);
    if !lexer.is_open() {
        eprintln!("remake: failed to open makefile: {}", args.file.display());
        return ExitCode::FAILURE;
    }

    let mut parser = Parser::new(lexer);
    loop {
        match parser.parse_to_ast() {
            ParseState::Done => break,
            ParseState::Warning => {
                warn!(
                    "{}:{}: malformed variable assignment: {}",
                    args.file.display(),
                    parser.line_number(),
                    parser.line_text()
                );
            }
            ParseState::Error => {
                eprintln!(
                    "remake: {}:{}: syntax error: {}",
                    args.file.display(),
                    parser.line_number(),
                    parser.line_text()
                );
                return ExitCode::FAILURE;
            }
            ParseState::Ready | ParseState::NotReady => {
                eprintln!(
                    "remake: failed to create a parser for makefile: {}",
                    args.file.display()
                );
                return ExitCode::FAILURE;
            }
        }
    }

    let interp = Interpreter::new(parser.assignments(), parser.receipts());
    let options = ExecOptions {
        dry_run: args.just_print,
        silent: args.silent,
    };
    if let Err(error) = interp.execute(args.target.as_deref(), options) {
        eprintln!("remake: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
