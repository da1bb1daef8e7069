#[cfg(feature = "print-ast")]
pub mod ast_printer;
pub mod ast;
pub mod source_location;
pub mod visitor;

pub use source_location::{Location, SourceId, SourceMap};
pub use visitor::Visitor;
