use colored::Colorize;
use lumina_ir::SourceMap;

use crate::compiler_error::CompilerError;

/// Accumulates `CompilerError`s raised by the tokenizer, parser, and
/// semantic analyzer and renders them in the driver's diagnostic format.
/// Owned by the driver and threaded by mutable reference into every phase.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<CompilerError>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
        }
    }

    pub fn emit(&mut self, error: CompilerError) {
        self.diagnostics.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &[CompilerError] {
        &self.diagnostics
    }

    /// Renders every accumulated diagnostic to stderr using the §6 format:
    ///
    /// ```text
    /// In file [<path>] :
    ///     Error on line[<line>] : <message>
    ///               <offending source line>
    ///               <column-aligned caret or |---| span>
    /// ```
    pub fn render_all(&self, source_map: &SourceMap) {
        for diagnostic in &self.diagnostics {
            self.render_one(diagnostic, source_map);
        }
    }

    fn render_one(&self, diagnostic: &CompilerError, source_map: &SourceMap) {
        let location = &diagnostic.location;
        let path = source_map.path(location.source);
        let source_line = source_map
            .line_text(location.source, location.line)
            .unwrap_or("");
        let message = format!("{} {}", diagnostic.code, diagnostic.message);

        eprintln!("In file [{}] :", path.display());
        eprintln!(
            "    {} on line[{}] : {}",
            "Error".red().bold(),
            location.line,
            message
        );
        eprintln!("              {}", source_line);
        eprintln!("              {}", span_marker(location.column, location.length));
    }
}

/// Builds the column-aligned caret (single-width spans) or `|---|` span
/// marker (multi-width spans) demanded by §6, offset to the token's column.
fn span_marker(column: u32, length: usize) -> String {
    let indent = " ".repeat((column.saturating_sub(1)) as usize);
    let marker = if length <= 1 {
        "^".to_string()
    } else {
        format!("|{}|", "-".repeat(length - 2))
    };
    indent + &marker
}
