use clap::Parser;
use std::{
    io::{stderr, stdin, stdout, BufRead, Write},
    process::ExitCode,
};
use throf::{
    lang::tokenizing::tokenize_from_file,
    runtime::{
        config::{InterpreterConfig, DEFAULT_INIT_FILE},
        error::{self, ScriptError},
        interpreter::{
            throf_interpreter::ThrofInterpreter, CodeManagement, Interpreter, WordManagement,
        },
    },
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Run a throf program, or start an interactive session when no file is given.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Source file to run.
    #[arg()]
    file: Option<String>,

    /// Source loaded before anything else, if it exists.
    #[arg(long, default_value = DEFAULT_INIT_FILE)]
    init: String,

    /// Do not load the init source.
    #[arg(long)]
    no_init: bool,

    /// How deeply words may call each other before execution is aborted.
    #[arg(long, short = 'm')]
    max_depth: Option<usize>,

    /// Print the file's tokens before running it.
    #[arg(long)]
    dump_tokens: bool,

    /// Print the dictionary and the stack after running the file.
    #[arg(long)]
    dump_state: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}

/// Report an error that ended the processing of a file.
fn report_file_error(file: &str, error: &ScriptError) {
    eprintln!("Error encountered while processing file '{}'", file);
    eprintln!("\tfilename: {}", error.source_name().unwrap_or(file));
    eprintln!("\tcomponent: {}", error.component());
    eprintln!("\texplanation: {}", error.explanation());

    if let Some(location) = error.location() {
        eprintln!("\tlocation: {}", location);
    }

    if let Some(call_stack) = error.call_stack()
        && !call_stack.is_empty()
    {
        eprintln!("\tcall stack:");

        for item in call_stack.iter().rev() {
            eprintln!("\t\t{}", item);
        }
    }
}

fn run_file(interpreter: &mut ThrofInterpreter, file: &str, args: &Args) -> error::Result<()> {
    if args.dump_tokens {
        let full_path = interpreter.find_file(file)?;
        let tokens = tokenize_from_file(&full_path)?;

        interpreter.write_output(&tokens.to_string())?;
    }

    interpreter.process_source_file(file)?;

    if args.dump_state {
        interpreter.execute_word_named("words")?;
        interpreter.execute_word_named("stack")?;
    }

    interpreter.output().flush()?;
    Ok(())
}

/// Read lines until the end of input, each line is its own source unit.  Errors are reported and
/// the session goes on.
fn repl(interpreter: &mut ThrofInterpreter) -> ExitCode {
    let mut lines = stdin().lock().lines();

    loop {
        print!("throf> ");
        let _ = stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,

            Some(Err(error)) => {
                eprintln!("ERROR: could not read input: {}", error);
                return ExitCode::FAILURE;
            }

            None => {
                println!();
                return ExitCode::SUCCESS;
            }
        };

        if let Err(error) = interpreter.process_source("<repl>", &line) {
            warn!("Line failed: {}", error.explanation());
            eprintln!("ERROR: {}", error);
        }

        let _ = interpreter.output().flush();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    let mut config = InterpreterConfig::from_env().with_init_file(&args.init);

    if let Some(depth) = args.max_depth {
        config = config.with_max_call_depth(depth);
    }

    debug!("Starting with {:?}.", config);

    let mut interpreter = ThrofInterpreter::with_config(config);

    if !args.no_init {
        match interpreter.load_init_file() {
            Ok(loaded) => debug!("Init source loaded: {}.", loaded),

            Err(error) => {
                report_file_error(&args.init, &error);
                return ExitCode::FAILURE;
            }
        }
    }

    match &args.file {
        Some(file) => match run_file(&mut interpreter, file, &args) {
            Ok(()) => ExitCode::SUCCESS,

            Err(error) => {
                let _ = interpreter.output().flush();
                report_file_error(file, &error);
                ExitCode::FAILURE
            }
        },

        None => repl(&mut interpreter),
    }
}
