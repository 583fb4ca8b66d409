use clap::Parser as ClapParser;
use colored::*;
use std::{
    fs,
    io::{self, BufRead, Read, Write},
    process::ExitCode,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

extern crate frontend;
extern crate runtime;

use runtime::{FunxError, Interpreter, RuntimeVal};

// --------
//   CLI
// --------

#[derive(ClapParser)]
#[command(version)]
#[command(about = "Interpreter for the funx language")]
struct CLI {
    #[arg(short, long)]
    /// Path to the file to run
    file: Option<String>,

    /// Interactive mode after interpreting a file
    #[arg(short, long)]
    inter: bool,

    /// Reads the whole standard input as one program
    #[arg(short, long, conflicts_with = "file")]
    stdin: bool,

    /// Prints the AST tree
    #[arg(short, long)]
    ast_print: bool,
}

// Only installed when RUST_LOG asks for it, so program output stays clean
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(EnvFilter::from_default_env())
        .init();
}

fn interpretation_sequence(
    code: &str,
    interp: &mut Interpreter,
    cli: &CLI,
) -> Result<RuntimeVal, FunxError> {
    if !cli.ast_print {
        return interp.execute(code);
    }

    let program = frontend::parse(code)?;
    println!("\nProgram tree:\n{:#?}", program);

    interp.execute_program(&program)
}

fn report(res: Result<RuntimeVal, FunxError>, interp: &mut Interpreter) -> bool {
    match res {
        Ok(val) => {
            println!("{} {}", "Out:".green().bold(), val);
            true
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            interp.recover();
            false
        }
    }
}

fn interpret_file(file_name: &str, interp: &mut Interpreter, cli: &CLI) -> bool {
    debug!(file = file_name, "reading source file");

    match fs::read_to_string(file_name) {
        Ok(code) => {
            let res = interpretation_sequence(&code, interp, cli);
            report(res, interp)
        }
        Err(e) => {
            eprintln!(
                "{} can't open script file {}, {e}",
                "Error:".red().bold(),
                file_name.yellow()
            );
            false
        }
    }
}

fn interpret_stdin(interp: &mut Interpreter, cli: &CLI) -> bool {
    let mut code = String::new();

    if let Err(e) = io::stdin().read_to_string(&mut code) {
        eprintln!("{} can't read standard input, {e}", "Error:".red().bold());
        return false;
    }

    let res = interpretation_sequence(&code, interp, cli);
    report(res, interp)
}

// Open braces minus closing ones, comments excluded
fn brace_balance(line: &str) -> i64 {
    let code = line.split('#').next().unwrap_or_default();

    code.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

fn print_vars(interp: &Interpreter) {
    let vars = interp.current_variables();

    if vars.is_empty() {
        println!("{}", "no variables".dimmed());
    }
    for (name, val) in vars.sorted() {
        println!("  {} = {}", name.cyan(), val);
    }
}

fn print_funcs(interp: &Interpreter) {
    let funcs = interp.defined_functions();

    if funcs.is_empty() {
        println!("{}", "no functions".dimmed());
    }
    for (name, entry) in funcs.sorted() {
        println!("  {} {}", name.cyan(), entry.params.join(" "));
    }
}

// REPL
fn repl(interp: &mut Interpreter, cli: &CLI) -> io::Result<()> {
    println!("\n{} mode started", "Interactive".yellow().bold());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut input = String::new();
    let mut pending = String::new();
    let mut depth: i64 = 0;

    loop {
        input.clear();
        match depth > 0 {
            true => print!(". "),
            false => print!("\n> "),
        }
        stdout.flush()?;

        // End of input
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }

        if depth == 0 {
            match input.trim() {
                "quit" => return Ok(()),
                ":vars" => {
                    print_vars(interp);
                    continue;
                }
                ":funcs" => {
                    print_funcs(interp);
                    continue;
                }
                ":reset" => {
                    interp.reset();
                    println!("{}", "session cleared".dimmed());
                    continue;
                }
                "" => continue,
                _ => {}
            }
        }

        // A definition can span several lines, run it once it is closed
        depth += brace_balance(&input);
        pending.push_str(&input);
        if depth > 0 {
            continue;
        }

        let res = interpretation_sequence(&pending, interp, cli);
        report(res, interp);

        pending.clear();
        depth = 0;
    }
}

fn main() -> ExitCode {
    let cli = CLI::parse();
    init_tracing();

    let mut interp = Interpreter::new();

    let success = if let Some(file_name) = cli.file.as_deref() {
        interpret_file(file_name, &mut interp, &cli)
    } else if cli.stdin {
        interpret_stdin(&mut interp, &cli)
    } else {
        println!("\n       --- {} language v0.1 ---", "Funx".cyan().bold());
        true
    };

    // Without any program we go straight to the REPL, otherwise only on demand
    let interactive = (cli.file.is_none() && !cli.stdin) || cli.inter;
    if interactive {
        if let Err(e) = repl(&mut interp, &cli) {
            eprintln!("{} reading from terminal, {e}", "Error:".red().bold());
            return ExitCode::FAILURE;
        }
    }

    match success {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}
