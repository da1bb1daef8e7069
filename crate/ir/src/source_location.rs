use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identifies one source file within a compilation's [`SourceMap`]. Needed
/// because include expansion (§4.3) splices top-level nodes drawn from
/// several files into a single worklist; a bare line/column pair is not
/// enough to print a diagnostic once more than one file is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// Owns the text and path of every file (entry point and includes) touched
/// by a compilation, so diagnostics can look up the offending source line
/// long after the tokenizer that produced the span has gone out of scope.
#[derive(Debug, Default)]
pub struct SourceMap {
    paths: Vec<PathBuf>,
    sources: Vec<String>,
    by_canonical_path: HashMap<PathBuf, SourceId>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap::default()
    }

    /// Registers a file's contents, returning its id. If the (canonical)
    /// path was already registered, returns the existing id without
    /// re-inserting — this is the mechanism include deduplication is built
    /// on (§4.3, §8).
    pub fn insert(&mut self, path: PathBuf, text: String) -> SourceId {
        if let Some(&id) = self.by_canonical_path.get(&path) {
            return id;
        }
        let id = SourceId(self.paths.len() as u32);
        self.by_canonical_path.insert(path.clone(), id);
        self.paths.push(path);
        self.sources.push(text);
        id
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.by_canonical_path.contains_key(path)
    }

    pub fn path(&self, id: SourceId) -> &Path {
        &self.paths[id.0 as usize]
    }

    pub fn text(&self, id: SourceId) -> &str {
        &self.sources[id.0 as usize]
    }

    /// The raw text of a single 1-based line, for annotating a diagnostic.
    pub fn line_text(&self, id: SourceId, line: u32) -> Option<&str> {
        self.text(id).lines().nth(line.checked_sub(1)? as usize)
    }
}

/// A span in one source file: a byte offset, its 1-based line/column, and a
/// length in bytes. Distinct AST sub-expressions combine their locations via
/// [`Location::span_to`] to produce a diagnostic-friendly encompassing span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub source: SourceId,
    pub position: usize,
    pub line: u32,
    pub column: u32,
    pub length: usize,
}

impl Location {
    pub fn new(source: SourceId, position: usize, line: u32, column: u32, length: usize) -> Self {
        Location {
            source,
            position,
            line,
            column,
            length,
        }
    }

    /// Combines two locations in the same file into the smallest span that
    /// encompasses both, keeping the leftmost line/column as the reported
    /// origin. Used when a parser rule needs to report the full extent of a
    /// multi-token production (e.g. a binary expression) rather than just
    /// its first token.
    pub fn span_to(&self, other: &Location) -> Location {
        debug_assert_eq!(
            self.source, other.source,
            "cannot span locations from different source files"
        );
        let start = self.position.min(other.position);
        let self_end = self.position + self.length;
        let other_end = other.position + other.length;
        let end = self_end.max(other_end);
        let origin = if self.position <= other.position {
            self
        } else {
            other
        };
        Location {
            source: self.source,
            position: start,
            line: origin.line,
            column: origin.column,
            length: end - start,
        }
    }
}
