use std::{
    io::{BufRead, Write},
    process::ExitCode,
};

use clap::Parser;
use infix_calc::{compile, eval_postfix_with, format_postfix, Config, EvaluationError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "infix-calc")]
#[command(author, version, about = "Evaluates arithmetic expressions", long_about = None)]
struct Cli {
    /// Only `+ - * /`, with flooring division
    #[arg(long)]
    basic: bool,

    /// Print the postfix form before each result
    #[arg(long)]
    show_postfix: bool,

    /// Evaluate a single expression and exit
    #[arg(short, long, value_name = "TEXT")]
    expr: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = if cli.basic {
        Config::basic()
    } else {
        Config::advanced()
    };
    debug!(?config, "starting");

    if let Some(expr) = &cli.expr {
        return match calculate(expr, &config, cli.show_postfix) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error}");
                ExitCode::FAILURE
            }
        };
    }

    match repl(&config, cli.show_postfix) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("io error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn repl(config: &Config, show_postfix: bool) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!(">>> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            return Ok(());
        }

        if let Err(error) = calculate(line, config, show_postfix) {
            println!("error: {error}");
        }
    }
}

fn calculate(text: &str, config: &Config, show_postfix: bool) -> Result<(), EvaluationError> {
    let postfix = compile(text, config)?;
    if show_postfix {
        println!("{}", format_postfix(&postfix));
    }
    println!("{}", eval_postfix_with(&postfix, config)?);
    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::{is_exit_command, Cli};

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("Quit"));
        assert!(!is_exit_command("quitter"));
        assert!(!is_exit_command("1 + 1"));
    }

    #[test]
    fn flags() {
        let cli = Cli::parse_from(["infix-calc", "--basic", "-e", "1 + 1"]);
        assert!(cli.basic);
        assert!(!cli.show_postfix);
        assert_eq!(Some("1 + 1".to_string()), cli.expr);
    }
}
