use crate::ast::{
    BlockDecl, ExpressionStmt, ForStmt, IfStmt, IncludeDecl, NamespaceDecl, PipelineBodyDecl,
    PipelineFlowDecl, ReturnStmt, Statement, SymbolCall, SymbolDecl, TextureDecl, TopLevel,
    VariableAssignmentStmt, VariableDeclarationStmt, VariablePath, WhileStmt,
};
use crate::source_location::Location;
use crate::ast::{CompoundExpr, Expression, NumberLiteral, StringLiteral};

/// Trait implementing the visitor pattern used to traverse the AST during
/// semantic analysis. `visit_top_level`, `visit_statement`, and
/// `visit_expression` dispatch to the per-variant methods below; a caller
/// that only needs a subset of variants still has to implement all the
/// required methods, matching the exhaustive-dispatch style this trait is
/// modeled on.
pub trait Visitor<T> {
    fn visit_top_level(&mut self, node: &TopLevel) -> T {
        match node {
            TopLevel::Include(n) => self.visit_include(n),
            TopLevel::PipelineFlow(n) => self.visit_pipeline_flow(n),
            TopLevel::StructureBlock(n) => self.visit_structure_block(n),
            TopLevel::AttributeBlock(n) => self.visit_attribute_block(n),
            TopLevel::ConstantBlock(n) => self.visit_constant_block(n),
            TopLevel::Texture(n) => self.visit_texture(n),
            TopLevel::Symbol(n) => self.visit_symbol(n),
            TopLevel::PipelineBody(n) => self.visit_pipeline_body(n),
            TopLevel::Namespace(n) => self.visit_namespace(n),
        }
    }

    fn visit_include(&mut self, node: &IncludeDecl) -> T;
    fn visit_pipeline_flow(&mut self, node: &PipelineFlowDecl) -> T;
    fn visit_structure_block(&mut self, node: &BlockDecl) -> T;
    fn visit_attribute_block(&mut self, node: &BlockDecl) -> T;
    fn visit_constant_block(&mut self, node: &BlockDecl) -> T;
    fn visit_texture(&mut self, node: &TextureDecl) -> T;
    fn visit_symbol(&mut self, node: &SymbolDecl) -> T;
    fn visit_pipeline_body(&mut self, node: &PipelineBodyDecl) -> T;
    fn visit_namespace(&mut self, node: &NamespaceDecl) -> T;

    fn visit_statement(&mut self, stmt: &Statement) -> T {
        match stmt {
            Statement::VariableDeclaration(s) => self.visit_variable_declaration(s),
            Statement::VariableAssignment(s) => self.visit_variable_assignment(s),
            Statement::Return(s) => self.visit_return(s),
            Statement::Discard(loc) => self.visit_discard(loc),
            Statement::If(s) => self.visit_if(s),
            Statement::While(s) => self.visit_while(s),
            Statement::For(s) => self.visit_for(s),
            Statement::Expression(s) => self.visit_expression_statement(s),
        }
    }

    fn visit_variable_declaration(&mut self, stmt: &VariableDeclarationStmt) -> T;
    fn visit_variable_assignment(&mut self, stmt: &VariableAssignmentStmt) -> T;
    fn visit_return(&mut self, stmt: &ReturnStmt) -> T;
    fn visit_discard(&mut self, location: &Location) -> T;
    fn visit_if(&mut self, stmt: &IfStmt) -> T;
    fn visit_while(&mut self, stmt: &WhileStmt) -> T;
    fn visit_for(&mut self, stmt: &ForStmt) -> T;
    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> T;

    fn visit_expression(&mut self, expr: &Expression) -> T {
        match expr {
            Expression::Number(n) => self.visit_number(n),
            Expression::String(s) => self.visit_string(s),
            Expression::Variable(v) => self.visit_variable(v),
            Expression::Call(c) => self.visit_call(c),
            Expression::Compound(c) => self.visit_compound(c),
        }
    }

    fn visit_number(&mut self, expr: &NumberLiteral) -> T;
    fn visit_string(&mut self, expr: &StringLiteral) -> T;
    fn visit_variable(&mut self, expr: &VariablePath) -> T;
    fn visit_call(&mut self, expr: &SymbolCall) -> T;
    fn visit_compound(&mut self, expr: &CompoundExpr) -> T;
}
