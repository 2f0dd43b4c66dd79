//! initlang compiler
//!
//! Lexes and parses `init`/`end` programs and turns their `print(...)` into a
//! standalone x86-64 assembly program.

mod backend;
mod compiler;
mod feedback;
mod frontend;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use feedback::{CompilationFeedback, CompilationStats, ErrorReport};
use frontend::parser::{ConditionalMode, ParserOptions};
use frontend::token::Token;

/// initlang compiler
#[derive(Parser, Debug)]
#[command(name = "initc")]
#[command(version = "0.1.0")]
#[command(about = "initlang compiler - init/end blocks, print to assembly")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input source file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Parse `if (cond) init ... end else init ... end` as a full statement
    #[arg(long, global = true)]
    structured_if: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file
    Build {
        /// Input source file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a source file for errors
    Check {
        /// Input source file
        input: PathBuf,
    },
    /// Print the token stream of a source file
    Tokens {
        /// Input source file
        input: PathBuf,
    },
    /// Print version information
    Version,
}

impl Cli {
    fn parser_options(&self) -> ParserOptions {
        let conditionals = if self.structured_if {
            ConditionalMode::Structured
        } else {
            ConditionalMode::Counted
        };
        ParserOptions { conditionals }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Build { input, output }) => compile_file(input, output.clone(), &cli),
        Some(Commands::Check { input }) => check_file(input, &cli),
        Some(Commands::Tokens { input }) => print_tokens(input, &cli),
        Some(Commands::Version) => {
            println!("initc 0.1.0");
            println!("initlang compiler");
            Ok(true)
        }
        None => match cli.input {
            Some(ref input) => compile_file(input, cli.output.clone(), &cli),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: initc <FILE> or initc build <FILE>");
                process::exit(1);
            }
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

/// Report a compiler error; JSON feedback when requested
fn report_error(error: &utils::Error, input: &Path, cli: &Cli) {
    let file_name = input.display().to_string();
    if cli.json {
        let report = ErrorReport::from_error(error, &file_name);
        let feedback =
            CompilationFeedback::failure(file_name, vec![report], CompilationStats::default());
        println!("{}", feedback.to_json());
    } else {
        eprintln!("{}", error);
    }
}

/// Compile a source file; returns whether it succeeded
fn compile_file(input: &Path, output: Option<PathBuf>, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;

    let compilation = match compiler::compile(&source, cli.parser_options()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, input, cli);
            return Ok(false);
        }
    };

    let asm_path = output.unwrap_or_else(|| input.with_extension("asm"));
    if compilation.has_print() {
        fs::write(&asm_path, &compilation.assembly)
            .with_context(|| format!("writing {}", asm_path.display()))?;
    }

    if cli.json {
        let feedback = CompilationFeedback::from_compilation(
            input.display().to_string(),
            &compilation,
            &source,
        );
        println!("{}", feedback.to_json());
        return Ok(true);
    }

    println!("Compiling: {}", input.display());
    println!(
        "  [✓] Lexed {} tokens, parsed {} statements",
        compilation.tokens.len(),
        compilation.program.statements.len()
    );
    let blocks = compilation.blocks;
    println!("  [✓] Blocks: {} init, {} end", blocks.opened, blocks.closed);
    if let Some(warning) = ErrorReport::unclosed_blocks(blocks) {
        println!("  [!] {}", warning.message);
    }
    if compilation.has_print() {
        println!("  [✓] Wrote assembly to {}", asm_path.display());
    } else {
        println!("  [-] No print call, no assembly emitted");
    }
    Ok(true)
}

/// Check a source file for errors without generating code
fn check_file(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;

    if let Err(e) = compiler::check(&source, cli.parser_options()) {
        report_error(&e, input, cli);
        return Ok(false);
    }

    if cli.json {
        let stats = CompilationStats {
            loc: source.lines().count(),
            ..Default::default()
        };
        println!(
            "{}",
            CompilationFeedback::success(input.display().to_string(), stats).to_json()
        );
    } else {
        println!("Checking: {}", input.display());
        println!("✅ No errors found");
    }
    Ok(true)
}

fn print_tokens(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;

    let tokens = match compiler::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            report_error(&e, input, cli);
            return Ok(false);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        print!("{}", token_table(&tokens));
    }
    Ok(true)
}

fn token_table(tokens: &[Token]) -> String {
    let mut out = format!("{:<6} {:<24} {}\n", "LINE", "CATEGORY", "LEXEME");
    for token in tokens {
        out.push_str(&format!(
            "{:<6} {:<24} {}\n",
            token.line(),
            token.category.as_str(),
            token.lexeme
        ));
    }
    out
}
