/// Unified error codes for every diagnostic the front end can raise.
///
/// Error code ranges:
/// - 1000-1999: lexical / syntax errors (§4.1, §4.2, §7)
/// - 2000-2999: semantic analysis errors (§4.3, §7)
/// - 3000-3999: include resolution / generic errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical / syntax errors (1000-1999)
    /// A token did not match what the grammar expected at this position.
    UnexpectedToken = 1000,
    /// A specific token category was required but not found.
    ExpectedToken = 1001,
    /// `()` with no contained expression.
    EmptyParenthesizedExpression = 1002,
    /// A namespace/field chain interleaved `::` and `.` in one reference.
    InterleavedPathAccess = 1003,
    /// A statement inside a symbol body could not be classified.
    UnrecognizedStatement = 1004,
    /// A pipeline-flow declaration used a type that is not a primitive or
    /// vector type.
    InvalidPipelineFlowType = 1005,

    // Semantic analysis errors (2000-2999)
    /// A name did not resolve in any searched namespace.
    UnresolvedName = 2000,
    /// A fully qualified name was declared twice in the same scope.
    DuplicateDeclaration = 2001,
    /// An expression's type has no accepted conversion to the required type.
    IncompatibleConversion = 2002,
    /// An operator is not supported by the operand's type.
    UnsupportedOperator = 2003,
    /// A symbol call had the wrong number of arguments for every overload.
    WrongArgumentCount = 2004,
    /// No overload accepted the argument types found.
    NoMatchingOverload = 2005,
    /// A return expression's type does not match the declared return type.
    WrongReturnType = 2006,
    /// A pipeline-flow pair outside {Input->VertexPass, VertexPass->FragmentPass}.
    ForbiddenPipelinePair = 2007,
    /// Two pipeline-flow declarations used the same variable name.
    NonUniquePipelineVariable = 2008,
    /// A block element referenced an attribute/constant block as its type.
    UnsupportedElementType = 2009,
    /// An array size was missing, negative, or not an integer.
    InvalidArraySize = 2010,
    /// A pipeline stage body (VertexPass/FragmentPass) was defined twice.
    RepeatedPipelineBody = 2011,
    /// A pipeline body used the `Input` stage keyword.
    InputPipelineBody = 2012,
    /// Two parameters of the same symbol shared a name.
    DuplicateParameter = 2013,
    /// An existing overload shares the name and parameter types exactly.
    DuplicateOverload = 2014,
    /// An existing overload shares the name but disagrees on return type.
    DisagreeingOverloadReturnType = 2015,
    /// An assignment target's accessor chain referenced a field that does
    /// not exist on the preceding type.
    UnknownAttribute = 2016,
    /// A condition (if/while/for) did not evaluate to `bool`.
    NonBooleanCondition = 2017,
    /// A texture name collided with another texture in the same namespace.
    DuplicateTexture = 2018,

    // Include / generic errors (3000-3999)
    /// `#include` referenced a file that could not be found on the search
    /// path.
    IncludeFileNotFound = 3000,
    /// The entry file itself could not be opened.
    EntryFileNotFound = 3001,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::ExpectedToken => "expected token",
            ErrorCode::EmptyParenthesizedExpression => "empty parenthesized expression",
            ErrorCode::InterleavedPathAccess => "interleaved namespace and field access",
            ErrorCode::UnrecognizedStatement => "unrecognized statement",
            ErrorCode::InvalidPipelineFlowType => "invalid pipeline flow element type",
            ErrorCode::UnresolvedName => "unresolved name",
            ErrorCode::DuplicateDeclaration => "duplicate declaration",
            ErrorCode::IncompatibleConversion => "incompatible conversion",
            ErrorCode::UnsupportedOperator => "unsupported operator",
            ErrorCode::WrongArgumentCount => "wrong argument count",
            ErrorCode::NoMatchingOverload => "no matching overload",
            ErrorCode::WrongReturnType => "wrong return type",
            ErrorCode::ForbiddenPipelinePair => "forbidden pipeline pair",
            ErrorCode::NonUniquePipelineVariable => "non-unique pipeline variable",
            ErrorCode::UnsupportedElementType => "unsupported element type in block",
            ErrorCode::InvalidArraySize => "invalid array size",
            ErrorCode::RepeatedPipelineBody => "repeated pipeline body",
            ErrorCode::InputPipelineBody => "pipeline body on Input stage",
            ErrorCode::DuplicateParameter => "duplicate parameter name",
            ErrorCode::DuplicateOverload => "duplicate overload",
            ErrorCode::DisagreeingOverloadReturnType => "overload with disagreeing return type",
            ErrorCode::UnknownAttribute => "unknown attribute",
            ErrorCode::NonBooleanCondition => "non-boolean condition",
            ErrorCode::DuplicateTexture => "duplicate texture",
            ErrorCode::IncludeFileNotFound => "include file not found",
            ErrorCode::EntryFileNotFound => "entry file not found",
        }
    }

    /// Lexical/syntax errors (1000-1999 range).
    pub fn is_syntax_error(&self) -> bool {
        let code = self.code();
        (1000..2000).contains(&code)
    }

    /// Semantic analysis errors (2000-2999 range).
    pub fn is_semantic_error(&self) -> bool {
        let code = self.code();
        (2000..3000).contains(&code)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[E{:04}]", self.code())
    }
}
