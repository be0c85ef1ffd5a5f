//! wavec-drv - command-line driver
//!
//! A thin binary wiring `add_file -> lex -> parse -> emit` together. There
//! is no semantic analysis, code generation, or linking in this workspace -
//! the driver's only job is to get source text through the lexer and
//! parser and report what came out.

use std::path::PathBuf;

use rayon::prelude::*;
use wavec_par::Ast;
use wavec_util::diagnostic::emit_diagnostics;
use wavec_util::span::{FileId, SourceMap};
use wavec_util::{CliError, CliResult};

/// Which artifact to print for each compiled file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Emit {
    /// Parse and report diagnostics only; print nothing.
    #[default]
    None,
    /// One line per token: `KIND "text"`.
    Tokens,
    /// `{:#?}`-style dump of the parsed `Ast`.
    Ast,
    /// S-expression form via `wavec-print`.
    Sexpr,
}

impl std::str::FromStr for Emit {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokens" => Ok(Emit::Tokens),
            "ast" => Ok(Emit::Ast),
            "sexpr" => Ok(Emit::Sexpr),
            other => Err(CliError::InvalidArgument(format!(
                "unknown --emit kind `{other}` (expected tokens, ast, or sexpr)"
            ))),
        }
    }
}

/// Parsed command-line configuration.
#[derive(Debug)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub emit: Emit,
    pub verbose: bool,
}

impl Config {
    /// Parse `args` (not including the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> CliResult<Self> {
        let mut inputs = Vec::new();
        let mut emit = Emit::None;
        let mut verbose = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--emit" => {
                    let value = args.next().ok_or_else(|| {
                        CliError::InvalidArgument("--emit requires a value".to_string())
                    })?;
                    emit = value.parse()?;
                }
                "-v" | "--verbose" => verbose = true,
                _ if arg.starts_with("--emit=") => {
                    emit = arg["--emit=".len()..].parse()?;
                }
                _ if arg.starts_with('-') && arg != "-" => {
                    return Err(CliError::InvalidArgument(arg));
                }
                _ => inputs.push(PathBuf::from(arg)),
            }
        }

        if inputs.is_empty() {
            return Err(CliError::NoInputFiles);
        }

        Ok(Config { inputs, emit, verbose })
    }
}

/// Run the driver against `config`, printing artifacts to `stdout` and
/// diagnostics to `stderr`. Returns the number of input files that had at
/// least one error-level diagnostic.
pub fn run(config: &Config) -> CliResult<usize> {
    let mut vfs = SourceMap::new();
    let mut file_ids = Vec::with_capacity(config.inputs.len());

    for path in &config.inputs {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
        let name = path.display().to_string();
        if config.verbose {
            eprintln!("reading {name}");
        }
        let id = vfs.add_file(name, content);
        file_ids.push(id);
    }

    if config.verbose {
        eprintln!("lexing and parsing {} file(s)", file_ids.len());
    }

    // "Add all files before parsing, then read freely": every file is already
    // registered above, so the VFS reads below are safe to run in parallel.
    let asts: Vec<(FileId, Ast)> = file_ids
        .into_par_iter()
        .map(|id| {
            let source = vfs.content(id).expect("file was just registered");
            (id, wavec_par::parse(id, &source))
        })
        .collect();

    let mut failed = 0;
    for (id, ast) in &asts {
        if config.verbose {
            eprintln!("emitting {}", vfs.path(*id).unwrap_or_default());
        }
        emit_artifact(config.emit, ast);
        if ast.diagnostics.iter().any(|d| d.level.is_error()) {
            failed += 1;
        }
    }

    let all_diags: Vec<_> = asts.iter().flat_map(|(_, ast)| ast.diagnostics.clone()).collect();
    emit_diagnostics(&all_diags, &vfs);

    Ok(failed)
}

fn emit_artifact(emit: Emit, ast: &Ast) {
    match emit {
        Emit::None => {}
        Emit::Tokens => print_tokens(ast),
        Emit::Ast => println!("{ast:#?}"),
        Emit::Sexpr => {
            let rendered = wavec_print::print_ast(ast);
            if !rendered.is_empty() {
                println!("{rendered}");
            }
        }
    }
}

fn print_tokens(ast: &Ast) {
    use wavec_lex::TokenKind;

    for (kind, start) in ast.tokens.kind.iter().zip(ast.tokens.start.iter()) {
        if *kind == TokenKind::Eof {
            println!("{kind:?} \"\"");
            continue;
        }
        let text_from_start = &ast.source[*start as usize..];
        let len = wavec_lex::token_length(*kind, text_from_start);
        println!("{kind:?} {:?}", &text_from_start[..len]);
    }
}
