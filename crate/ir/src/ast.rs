use crate::source_location::Location;
use std::fmt::Display;

/// The arithmetic operators recognized in expressions (§6 `Operator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinaryOperator::Add => "+",
                BinaryOperator::Subtract => "-",
                BinaryOperator::Multiply => "*",
                BinaryOperator::Divide => "/",
            }
        )
    }
}

/// The comparison operators recognized in expressions (§6 `ComparatorOperator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ComparisonOperator::Equal => "==",
                ComparisonOperator::NotEqual => "!=",
                ComparisonOperator::Less => "<",
                ComparisonOperator::Greater => ">",
                ComparisonOperator::LessEqual => "<=",
                ComparisonOperator::GreaterEqual => ">=",
            }
        )
    }
}

/// The logical operators recognized in conditions (§6 `ConditionOperator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        })
    }
}

/// Any element separator recognized in a compound expression: arithmetic,
/// comparison, or logical. Kept as one enum because §4.3 treats a compound
/// expression as one uniform "sequence of elements separated by operators".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Binary(BinaryOperator),
    Comparison(ComparisonOperator),
    Logical(LogicalOperator),
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Binary(op) => write!(f, "{op}"),
            Operator::Comparison(op) => write!(f, "{op}"),
            Operator::Logical(op) => write!(f, "{op}"),
        }
    }
}

/// The `+=`, `-=`, … compound assignment forms, plus plain `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
}

/// A (possibly namespaced) reference to a type, e.g. `Vector3` or
/// `::lighting::Material`. An optional leading `::` pins resolution to the
/// root namespace (§4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub root_qualified: bool,
    pub segments: Vec<String>,
    pub location: Location,
}

impl TypeRef {
    /// The `::`-joined textual form, as written by the user (used in
    /// diagnostics and in namespace-relative resolution).
    pub fn joined(&self) -> String {
        let prefix = if self.root_qualified { "::" } else { "" };
        format!("{}{}", prefix, self.segments.join("::"))
    }
}

/// A pipeline stage keyword (§6 reserved words `Input`, `VertexPass`,
/// `FragmentPass`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Input,
    VertexPass,
    FragmentPass,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PipelineStage::Input => "Input",
                PipelineStage::VertexPass => "VertexPass",
                PipelineStage::FragmentPass => "FragmentPass",
            }
        )
    }
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub text: String,
    pub value: NumberValue,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: Location,
}

/// A dotted/scoped variable reference: an optional root qualifier, a run of
/// `::`-separated namespace segments ending in the variable name, and a run
/// of `.field` accessors. Per §4.2 the two chains may not be interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct VariablePath {
    pub root_qualified: bool,
    pub segments: Vec<String>,
    pub accessors: Vec<String>,
    pub location: Location,
}

/// A symbol (function) call, with a namespaced callee name, an ordered
/// argument list, and an optional trailing `.field` accessor chain applied
/// to the call's result.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCall {
    pub root_qualified: bool,
    pub segments: Vec<String>,
    pub arguments: Vec<Expression>,
    pub accessors: Vec<String>,
    pub location: Location,
}

/// A left-to-right sequence of elements separated by operators, with no
/// precedence (§9 Open Question, resolved to flat evaluation). A single
/// parenthesized element collapses back to that element rather than being
/// wrapped here; this variant only appears when at least one operator joins
/// two or more elements.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundExpr {
    pub elements: Vec<Expression>,
    pub operators: Vec<Operator>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(NumberLiteral),
    String(StringLiteral),
    Variable(VariablePath),
    Call(SymbolCall),
    Compound(CompoundExpr),
}

impl Expression {
    pub fn location(&self) -> Location {
        match self {
            Expression::Number(n) => n.location,
            Expression::String(s) => s.location,
            Expression::Variable(v) => v.location,
            Expression::Call(c) => c.location,
            Expression::Compound(c) => c.location,
        }
    }

    pub fn accept<T>(&self, visitor: &mut dyn Visitor<T>) -> T {
        visitor.visit_expression(self)
    }
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarationStmt {
    pub type_ref: TypeRef,
    pub name: String,
    pub initializer: Option<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignmentStmt {
    pub target: VariablePath,
    pub operator: AssignmentOperator,
    pub value: Expression,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(VariableDeclarationStmt),
    Assignment(VariableAssignmentStmt),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForIncrement {
    Assignment(VariableAssignmentStmt),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// `(condition, body)` pairs; the first is the `if`, the rest are
    /// `else if`.
    pub branches: Vec<(Expression, Vec<Statement>)>,
    pub else_branch: Option<Vec<Statement>>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<ForInit>>,
    pub condition: Option<Expression>,
    pub increment: Option<ForIncrement>,
    pub body: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expr: Expression,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclarationStmt),
    VariableAssignment(VariableAssignmentStmt),
    Return(ReturnStmt),
    Discard(Location),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Expression(ExpressionStmt),
}

impl Statement {
    pub fn location(&self) -> Location {
        match self {
            Statement::VariableDeclaration(s) => s.location,
            Statement::VariableAssignment(s) => s.location,
            Statement::Return(s) => s.location,
            Statement::Discard(loc) => *loc,
            Statement::If(s) => s.location,
            Statement::While(s) => s.location,
            Statement::For(s) => s.location,
            Statement::Expression(s) => s.location,
        }
    }

    pub fn accept<T>(&self, visitor: &mut dyn Visitor<T>) -> T {
        visitor.visit_statement(self)
    }
}

// ---------------------------------------------------------------------
// Top-level declarations
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDecl {
    pub path: String,
    /// `true` for `#include <name>`, `false` for `#include "path"`.
    pub is_system: bool,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineFlowDecl {
    pub from: PipelineStage,
    pub to: PipelineStage,
    pub type_ref: TypeRef,
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockElement {
    pub type_ref: TypeRef,
    pub name: String,
    pub array_count: Option<NumberLiteral>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Structure,
    Attribute,
    Constant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockDecl {
    pub kind: BlockKind,
    pub name: String,
    pub elements: Vec<BlockElement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureDecl {
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_ref: TypeRef,
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDecl {
    pub return_type: TypeRef,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineBodyDecl {
    pub stage: PipelineStage,
    pub body: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: String,
    pub body: Vec<TopLevel>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Include(IncludeDecl),
    PipelineFlow(PipelineFlowDecl),
    StructureBlock(BlockDecl),
    AttributeBlock(BlockDecl),
    ConstantBlock(BlockDecl),
    Texture(TextureDecl),
    Symbol(SymbolDecl),
    PipelineBody(PipelineBodyDecl),
    Namespace(NamespaceDecl),
}

impl TopLevel {
    pub fn location(&self) -> Location {
        match self {
            TopLevel::Include(n) => n.location,
            TopLevel::PipelineFlow(n) => n.location,
            TopLevel::StructureBlock(n) => n.location,
            TopLevel::AttributeBlock(n) => n.location,
            TopLevel::ConstantBlock(n) => n.location,
            TopLevel::Texture(n) => n.location,
            TopLevel::Symbol(n) => n.location,
            TopLevel::PipelineBody(n) => n.location,
            TopLevel::Namespace(n) => n.location,
        }
    }

    pub fn accept<T>(&self, visitor: &mut dyn Visitor<T>) -> T {
        visitor.visit_top_level(self)
    }
}

use crate::visitor::Visitor;
