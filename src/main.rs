use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brain::{
    parse_tokens, print_tree, tokenize_file, Chain, Config, Interpreter, ParserState, RuntimeError,
    Tokenizer,
};

/// Runs a brain script, or starts an interactive session.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The script file to run. If not provided, launches the REPL.
    file: Option<PathBuf>,

    /// Reject input to `read` that is not an integer.
    #[arg(long)]
    strict_read: bool,

    /// Print the syntax tree of the script before running it.
    #[arg(long)]
    tree: bool,

    /// More log output; repeat for trace level. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config {
        strict_read: cli.strict_read,
        ..Config::default()
    };
    match cli.file {
        Some(path) => run_script(&path, config, cli.tree),
        None => match run_repl(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(%err, "line editor failed");
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run_script(path: &Path, config: Config, show_tree: bool) -> ExitCode {
    let program = match tokenize_file(path).and_then(|tokens| parse_tokens(&tokens)) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}: syntax error: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    if show_tree {
        println!("{}", print_tree(&program));
    }

    let mut interpreter = Interpreter::stdio(config);
    let mut status = ExitCode::SUCCESS;
    match run_input(&mut interpreter, &program) {
        Ok(true) => {}
        Ok(false) => status = ExitCode::FAILURE,
        Err(e) => {
            eprintln!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = interpreter.finish() {
        eprintln!("fatal: {e}");
        status = ExitCode::FAILURE;
    }
    status
}

/// Executes one input and reports its fault, which clears the error flag
/// for the next one. Returns whether the input ran without a fault.
fn run_input(interpreter: &mut Interpreter, program: &Chain) -> Result<bool, RuntimeError> {
    interpreter.execute(program)?;
    match interpreter.take_error() {
        Some(e) => {
            eprintln!("error: {e}");
            Ok(false)
        }
        None => Ok(true),
    }
}

fn run_repl(config: Config) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history("history.txt").is_err() {
        println!("No previous history.");
    }

    let mut interpreter = Interpreter::stdio(config);
    let mut session = Chain::new();
    let mut tokenizer = Tokenizer::new();
    let mut continuing = false;
    loop {
        let prompt = if continuing { "...> " } else { "brain> " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };
        rl.add_history_entry(line.as_str())?;

        if !continuing {
            match line.trim() {
                "quit" => break,
                "tree" => {
                    println!("{}", print_tree(&session));
                    continue;
                }
                _ => {}
            }
        }

        let state = tokenizer.tokenize(std::iter::once(line));
        if let ParserState::ContinuationNeeded = state {
            continuing = true;
            continue;
        }
        continuing = false;
        let tokens = std::mem::take(&mut tokenizer).finalize();
        let program = match state {
            ParserState::Error(e) => {
                eprintln!("syntax error: {e}");
                continue;
            }
            _ => match parse_tokens(&tokens) {
                Ok(program) => program,
                Err(e) => {
                    eprintln!("syntax error: {e}");
                    continue;
                }
            },
        };
        debug!(statements = program.len(), "parsed input");

        if let Err(e) = run_input(&mut interpreter, &program) {
            eprintln!("fatal: {e}");
            break;
        }
        session = session.append(program);
    }

    if let Err(e) = interpreter.finish() {
        eprintln!("fatal: {e}");
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history("history.txt")?;
    println!("Good bye!");
    Ok(())
}
