mod exit;

use clap::Parser;
use colored::Colorize;
use lumina_error::{DiagnosticEngine, DriverError};
use lumina_frontend::semantic::{analyze, expand_includes, register_natives};
use lumina_frontend::{io, lexer, parser};
use lumina_ir::source_location::SourceMap;
use lumina_shared::CompilationContext;
use std::path::PathBuf;
use std::process::ExitCode;

/// Front-end compiler for the shading language: tokenizes, parses and
/// semantically checks a source file, reporting every diagnostic found
/// without aborting on the first one.
#[derive(Parser)]
#[command(version, about = "Shading language front end")]
struct Cli {
    /// Entry source file
    path: PathBuf,

    /// Print the token stream produced by the tokenizer and exit
    #[arg(long)]
    print_tokens: bool,

    /// Print the parsed AST and exit
    #[arg(long)]
    print_ast: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let text = match io::read_source(&cli.path) {
        Ok(text) => text,
        Err(source) => {
            let error = DriverError::EntryFileUnreadable {
                path: cli.path.clone(),
                source,
            };
            exit::with_code(
                exit::Code::NoInput,
                &format!("{} {}", "error:".red(), error),
            );
        }
    };

    let mut source_map = SourceMap::new();
    let entry_id = source_map.insert(io::canonicalize_or_absolute(&cli.path), text.clone());

    let tokens = lexer::tokenize(entry_id, &text);

    if cli.print_tokens {
        #[cfg(feature = "print-tokens")]
        for token in &tokens {
            println!("{}", token);
        }
        #[cfg(not(feature = "print-tokens"))]
        eprintln!(
            "{}: rebuild with `--features print-tokens` to use --print-tokens",
            "warning".yellow()
        );
    }

    let (nodes, mut errors) = parser::parse(&tokens);

    let mut ctx = CompilationContext::new();
    register_natives(&mut ctx);
    let (nodes, include_errors) = expand_includes(nodes, &mut source_map, &mut ctx);
    errors.extend(include_errors);

    if cli.print_ast {
        #[cfg(feature = "print-ast")]
        lumina_ir::ast_printer::AstPrinter::new().print(&nodes);
        #[cfg(not(feature = "print-ast"))]
        eprintln!(
            "{}: rebuild with `--features print-ast` to use --print-ast",
            "warning".yellow()
        );
    }

    errors.extend(analyze(&nodes, &mut ctx));

    if errors.is_empty() {
        return ExitCode::SUCCESS;
    }

    let mut diagnostics = DiagnosticEngine::new();
    for error in errors {
        diagnostics.emit(error);
    }
    diagnostics.render_all(&source_map);
    eprintln!(
        "{}: could not compile '{}' due to {} previous diagnostic(s)",
        "error".red(),
        cli.path.display(),
        diagnostics.count()
    );
    ExitCode::from(exit::Code::Dataerr as u8)
}
