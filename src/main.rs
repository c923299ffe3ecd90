mod report;

use maskline::{CaretGravity, CaretString, Mask};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mask = match Mask::new(&config.format) {
        Ok(mask) => mask,
        Err(err) => {
            eprintln!("error: invalid format '{}': {err}", config.format);
            std::process::exit(1);
        }
    };

    let gravity = if config.backward {
        CaretGravity::Backward { autoskip: config.autoskip }
    } else {
        CaretGravity::Forward { autocomplete: config.autocomplete }
    };
    let text = match config.caret {
        Some(caret) => {
            CaretString::new(config.input.as_str(), caret.min(config.input.chars().count()), gravity)
        }
        None => CaretString::at_end(config.input.as_str(), gravity),
    };

    let result = mask.apply(&text);
    report::print_run(&mask, &text, &result, config.color);
}

struct CliConfig {
    format: String,
    input: String,
    caret: Option<usize>,
    backward: bool,
    autocomplete: bool,
    autoskip: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut format: Option<String> = None;
    let mut input: Option<String> = None;
    let mut caret: Option<usize> = None;
    let mut backward = false;
    let mut autocomplete = true;
    let mut autoskip = true;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("maskline {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--backward" => backward = true,
            "--no-autocomplete" => autocomplete = false,
            "--no-autoskip" => autoskip = false,
            "--caret" => {
                let value = args.next().ok_or_else(|| "error: --caret expects a value".to_string())?;
                caret = Some(parse_caret(&value)?);
            }
            "--format" | "-f" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                if format.is_some() {
                    return Err("error: format provided multiple times".to_string());
                }
                format = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--format=") => {
                let value = arg.trim_start_matches("--format=");
                if format.is_some() {
                    return Err("error: format provided multiple times".to_string());
                }
                format = Some(value.to_string());
            }
            _ if arg.starts_with("--caret=") => {
                caret = Some(parse_caret(arg.trim_start_matches("--caret="))?);
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let format = format.ok_or_else(|| format!("error: no format provided\n\n{}", help_text()))?;
    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    Ok(CliConfig { format, input, caret, backward, autocomplete, autoskip, color })
}

fn parse_caret(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid --caret '{value}' (expected a character index)"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "maskline {version}

Input mask formatting CLI.

Usage:
  maskline --format <format> [OPTIONS] [--] <input...>
  maskline --format <format> [OPTIONS] --input <text>

Options:
  -f, --format <format>      Mask format, e.g. '+7 ([000]) [000]-[00]-[00]'.
  -i, --input <text>         Input text to format. If omitted, reads remaining
                             args or stdin when no args are provided.
  --caret <index>            Caret position in characters. Default: end of input.
  --backward                 Backward caret gravity (deletion semantics).
  --no-autocomplete          Do not fill trailing literals (forward gravity).
  --no-autoskip              Do not trim trailing literals (backward gravity).
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Invalid mask format.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
