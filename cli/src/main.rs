mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use blocks::board::{BoardProfile, PinRole};
use generator::{DiagnosticError, GeneratorTable};

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["generate", "check", "boards", "test", "help"];

#[derive(Parser)]
#[command(name = "blockgen", version, about = "Generate Arduino sketches from block programs")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log each traversed block and fragment to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./blockgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a sketch from a block program
    Generate(GenerateArgs),

    /// Generate without printing; exit 0 if the program is valid
    Check(CheckArgs),

    /// List known boards and their pin capabilities
    Boards(BoardsArgs),

    /// Run .test.toml test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Program document (TOML)
    file: String,

    /// Target board, overriding the program and configuration
    #[arg(short, long)]
    board: Option<String>,

    /// Write the sketch here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Program document (TOML)
    file: String,

    /// Target board, overriding the program and configuration
    #[arg(short, long)]
    board: Option<String>,
}

#[derive(clap::Args)]
struct BoardsArgs {
    /// Show only the pins eligible for this role (e.g. servo, analog-input)
    #[arg(short, long)]
    role: Option<PinRole>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.toml file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let args = expand_shorthand(std::env::args().collect());
    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose, cli.no_color);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Command::Generate(args) => {
            let sketch = generate_sketch(&args.file, args.board.as_deref(), &config, cli.no_color);
            match &args.output {
                Some(path) => {
                    if let Err(e) = std::fs::write(path, &sketch) {
                        eprintln!("error: cannot write '{}': {}", path.display(), e);
                        process::exit(1);
                    }
                }
                None => print!("{}", sketch),
            }
        }
        Command::Check(args) => {
            generate_sketch(&args.file, args.board.as_deref(), &config, cli.no_color);
            eprintln!("ok: {} generated successfully", args.file);
        }
        Command::Boards(args) => list_boards(&config, args.role),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, &config, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// `blockgen file.toml` is shorthand for `blockgen generate file.toml`.
/// Inserts `generate` before the first positional argument unless it already
/// names a subcommand. The value following `--config` is not positional.
fn expand_shorthand(mut args: Vec<String>) -> Vec<String> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--config" {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        if !SUBCOMMANDS.contains(&arg) {
            args.insert(i, "generate".to_string());
        }
        break;
    }
    args
}

/// Logs go to stderr so a sketch printed on stdout stays clean.
fn init_logging(verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

/// Parse and generate `file`, or report diagnostics and exit.
fn generate_sketch(file: &str, board: Option<&str>, config: &Config, no_color: bool) -> String {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let term_config = term::Config::default();

    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let parser = blocks::parser::Parser::new(source, file_id);
    let program = match parser.parse() {
        Ok(p) => p,
        Err(errors) => {
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ = term::emit_to_write_style(&mut writer.lock(), &term_config, &files, &diagnostic);
            }
            process::exit(1);
        }
    };

    // --board beats the program's own board, which beats the configuration.
    let board_name = board
        .or(program.board.as_deref())
        .unwrap_or(&config.default_board);
    let Some(board) = config.find_board(board_name) else {
        let names: Vec<String> = config.all_boards().into_iter().map(|b| b.name).collect();
        eprintln!(
            "error: unknown board '{}' (available boards: {})",
            board_name,
            names.join(", ")
        );
        process::exit(1);
    };
    debug!(board = board.name.as_str(), "selected board");

    let table = GeneratorTable::with_builtins();
    match generator::generate(&program, &board, &table, config.options()) {
        Ok(sketch) => sketch,
        Err(error) => {
            emit_diagnostic_error(&writer, &term_config, &files, &error);
            process::exit(1);
        }
    }
}

fn emit_diagnostic_error(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    error: &DiagnosticError,
) {
    let Some(span) = &error.span else {
        eprintln!("error: {}", error);
        return;
    };

    let mut labels = vec![Label::primary(error.source_id, span.clone())];
    if let Some(related) = &error.related {
        labels.push(
            Label::secondary(error.source_id, related.span.clone()).with_message(&related.message),
        );
    }
    let mut notes = Vec::new();
    if let Some(id) = &error.block_id {
        notes.push(format!("in block '{}'", id));
    }
    let diagnostic = Diagnostic::error()
        .with_message(error.to_string())
        .with_labels(labels)
        .with_notes(notes);
    let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
}

fn list_boards(config: &Config, role: Option<PinRole>) {
    let roles = match role {
        Some(role) => vec![role],
        None => vec![
            PinRole::DigitalOutput,
            PinRole::Pwm,
            PinRole::AnalogInput,
            PinRole::Serial,
            PinRole::I2c,
            PinRole::Spi,
        ],
    };
    for board in config.all_boards() {
        print!("{}", describe_board(&board, &roles));
    }
}

fn describe_board(board: &BoardProfile, roles: &[PinRole]) -> String {
    let mut out = if board.description.is_empty() {
        format!("{}\n", board.name)
    } else {
        format!("{} ({})\n", board.name, board.description)
    };
    for &role in roles {
        let pins = board.eligible_pins(role);
        if !pins.is_empty() {
            out.push_str(&format!("  {:<14} {}\n", role.name(), pins.join(" ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: &[&str]) -> Vec<String> {
        expand_shorthand(args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn bare_file_becomes_generate() {
        assert_eq!(expand(&["blockgen", "prog.toml"]), ["blockgen", "generate", "prog.toml"]);
        assert_eq!(
            expand(&["blockgen", "--no-color", "prog.toml", "-b", "mega"]),
            ["blockgen", "--no-color", "generate", "prog.toml", "-b", "mega"]
        );
    }

    #[test]
    fn config_value_is_not_the_file() {
        assert_eq!(
            expand(&["blockgen", "--config", "c.toml", "prog.toml"]),
            ["blockgen", "--config", "c.toml", "generate", "prog.toml"]
        );
        assert_eq!(
            expand(&["blockgen", "--config=c.toml", "prog.toml"]),
            ["blockgen", "--config=c.toml", "generate", "prog.toml"]
        );
    }

    #[test]
    fn subcommands_are_left_alone() {
        assert_eq!(
            expand(&["blockgen", "--config", "c.toml", "boards"]),
            ["blockgen", "--config", "c.toml", "boards"]
        );
        assert_eq!(expand(&["blockgen", "test", "tests"]), ["blockgen", "test", "tests"]);
        assert_eq!(expand(&["blockgen", "--help"]), ["blockgen", "--help"]);
    }

    #[test]
    fn boards_role_filter_parses_role_names() {
        let cli = Cli::parse_from(["blockgen", "boards", "--role", "analog-input"]);
        assert!(matches!(cli.command, Command::Boards(args) if args.role == Some(PinRole::AnalogInput)));
        assert!(Cli::try_parse_from(["blockgen", "boards", "--role", "laser"]).is_err());
    }

    #[test]
    fn board_description_lists_requested_roles() {
        let uno = BoardProfile::builtin("uno").unwrap();
        let text = describe_board(&uno, &[PinRole::Servo]);
        assert!(text.starts_with("uno"));
        assert!(text.contains("  servo          3 5 6 9 10 11\n"), "got:\n{}", text);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn shorthand_parses_with_config() {
        let cli = Cli::parse_from(expand(&["blockgen", "--config", "c.toml", "prog.toml"]));
        assert_eq!(cli.config.as_deref(), Some(Path::new("c.toml")));
        assert!(matches!(cli.command, Command::Generate(args) if args.file == "prog.toml"));
    }
}
