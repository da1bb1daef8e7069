use lumina_derive::{IterableEnum, NamedEnum};
use lumina_ir::source_location::Location;
use std::fmt::Display;

/// The closed set of token categories a lexeme can be classified into
/// (§6). `Unknown` is the tokenizer's failure case: a character sequence
/// that could not be absorbed into any other category never aborts
/// tokenization, it just becomes an `Unknown` token for the parser to
/// diagnose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    SingleLineComment,
    MultiLineCommentStart,
    MultiLineCommentStop,
    Include,
    StringLiteral,
    IncludeLiteral,
    PipelineFlow,
    PipelineFlowSeparator,
    NamespaceSeparator,
    Separator,
    Identifier,
    Number,
    StructureBlock,
    AttributeBlock,
    ConstantBlock,
    Texture,
    Namespace,
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenParenthesis,
    CloseParenthesis,
    OpenBracket,
    CloseBracket,
    Accessor,
    Comment,
    Operator,
    ComparatorOperator,
    ConditionOperator,
    Return,
    Discard,
    IfStatement,
    ElseStatement,
    WhileStatement,
    ForStatement,
    EndOfSentence,
    Assignator,
    Comma,
    Unknown,
}

impl Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A reserved word mapped to its dedicated [`TokenCategory`] during
/// classification (§4.1 step 3), rather than falling through to
/// `Identifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IterableEnum, NamedEnum)]
pub enum ReservedWord {
    #[name = "if"]
    If,
    #[name = "else"]
    Else,
    #[name = "while"]
    While,
    #[name = "for"]
    For,
    #[name = "struct"]
    Struct,
    #[name = "namespace"]
    Namespace,
    #[name = "return"]
    Return,
    #[name = "discard"]
    Discard,
    #[name = "Input"]
    Input,
    #[name = "VertexPass"]
    VertexPass,
    #[name = "FragmentPass"]
    FragmentPass,
    #[name = "AttributeBlock"]
    AttributeBlock,
    #[name = "ConstantBlock"]
    ConstantBlock,
    #[name = "Texture"]
    Texture,
}

impl ReservedWord {
    /// The [`TokenCategory`] a reserved word classifies to.
    pub fn category(&self) -> TokenCategory {
        match self {
            ReservedWord::If => TokenCategory::IfStatement,
            ReservedWord::Else => TokenCategory::ElseStatement,
            ReservedWord::While => TokenCategory::WhileStatement,
            ReservedWord::For => TokenCategory::ForStatement,
            ReservedWord::Struct => TokenCategory::StructureBlock,
            ReservedWord::Namespace => TokenCategory::Namespace,
            ReservedWord::Return => TokenCategory::Return,
            ReservedWord::Discard => TokenCategory::Discard,
            ReservedWord::Input | ReservedWord::VertexPass | ReservedWord::FragmentPass => {
                TokenCategory::PipelineFlow
            }
            ReservedWord::AttributeBlock => TokenCategory::AttributeBlock,
            ReservedWord::ConstantBlock => TokenCategory::ConstantBlock,
            ReservedWord::Texture => TokenCategory::Texture,
        }
    }
}

/// A lexeme with its category, raw text, and the source context needed to
/// reconstruct a user-pointing diagnostic (§3 Token).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub category: TokenCategory,
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(category: TokenCategory, text: impl Into<String>, location: Location) -> Self {
        Token {
            category,
            text: text.into(),
            location,
        }
    }

    pub fn is(&self, category: TokenCategory) -> bool {
        self.category == category
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.category, self.text)
    }
}
