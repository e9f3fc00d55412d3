use calyx_interpreter::{interpreter, parser};
use clap::{ArgGroup, Parser};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Run a Calyx program and print its result.
#[derive(Parser, Debug)]
#[command(name = "calyx", version, about, long_about = None)]
#[command(group(ArgGroup::new("program").required(true).args(["file", "source"])))]
struct Cli {
    /// Program file to run
    file: Option<PathBuf>,

    /// Program text to run instead of a file
    #[arg(short = 'e', value_name = "SOURCE")]
    source: Option<String>,

    /// Maximum nesting of function calls before evaluation stops
    #[arg(long, default_value_t = interpreter::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let max_depth = cli.max_depth;

    let source = match (cli.source, cli.file) {
        (Some(source), _) => source,
        (None, Some(path)) => match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return;
            }
        },
        (None, None) => {
            eprintln!("no program given");
            return;
        }
    };

    let program = match parser::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parsing error: {}", e);
            return;
        }
    };

    println!("running {}", program);
    debug!(max_depth, "starting evaluation");

    let mut interpreter = interpreter::Interpreter::new().with_max_depth(max_depth);
    match interpreter.eval(&program) {
        Ok(value) => println!("result: {}", value),
        Err(e) => {
            info!(error = %e, "evaluation failed");
            println!("error: {}", e);
        }
    }
}
