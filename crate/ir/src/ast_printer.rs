use crate::Visitor;
use crate::ast::{
    BlockDecl, CompoundExpr, Expression, ExpressionStmt, ForIncrement, ForInit, ForStmt, IfStmt,
    IncludeDecl, NamespaceDecl, NumberLiteral, NumberValue, PipelineBodyDecl, PipelineFlowDecl,
    ReturnStmt, Statement, StringLiteral, SymbolCall, SymbolDecl, TextureDecl, TopLevel,
    VariableAssignmentStmt, VariableDeclarationStmt, VariablePath, WhileStmt,
};
use crate::source_location::Location;

/// A visitor implementation that prints the AST in a human-readable,
/// indented tree, gated behind the `print-ast` feature for debugging.
pub struct AstPrinter {
    indent_level: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        AstPrinter { indent_level: 0 }
    }

    pub fn print(&mut self, nodes: &[TopLevel]) {
        println!("AST Root");
        for node in nodes {
            self.indent_level = 1;
            node.accept::<()>(self);
        }
    }

    fn indent(&self) -> String {
        " ".repeat(self.indent_level * 4)
    }

    fn print_statements(&mut self, statements: &[Statement]) {
        self.indent_level += 1;
        for stmt in statements {
            self.visit_statement(stmt);
        }
        self.indent_level -= 1;
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        AstPrinter::new()
    }
}

impl Visitor<()> for AstPrinter {
    fn visit_include(&mut self, node: &IncludeDecl) {
        println!("{}Include: {}", self.indent(), node.path);
    }

    fn visit_pipeline_flow(&mut self, node: &PipelineFlowDecl) {
        println!(
            "{}PipelineFlow: {} -> {} : {} {}",
            self.indent(),
            node.from,
            node.to,
            node.type_ref.joined(),
            node.name
        );
    }

    fn visit_structure_block(&mut self, node: &BlockDecl) {
        self.print_block("Struct", node);
    }

    fn visit_attribute_block(&mut self, node: &BlockDecl) {
        self.print_block("AttributeBlock", node);
    }

    fn visit_constant_block(&mut self, node: &BlockDecl) {
        self.print_block("ConstantBlock", node);
    }

    fn visit_texture(&mut self, node: &TextureDecl) {
        println!("{}Texture: {}", self.indent(), node.name);
    }

    fn visit_symbol(&mut self, node: &SymbolDecl) {
        println!(
            "{}Symbol: {} -> {}",
            self.indent(),
            node.name,
            node.return_type.joined()
        );
        self.indent_level += 1;
        if !node.parameters.is_empty() {
            println!("{}Parameters:", self.indent());
            self.indent_level += 1;
            for param in &node.parameters {
                println!("{}{}: {}", self.indent(), param.name, param.type_ref.joined());
            }
            self.indent_level -= 1;
        }
        println!("{}Body:", self.indent());
        self.print_statements(&node.body);
        self.indent_level -= 1;
    }

    fn visit_pipeline_body(&mut self, node: &PipelineBodyDecl) {
        println!("{}PipelineBody: {}", self.indent(), node.stage);
        self.print_statements(&node.body);
    }

    fn visit_namespace(&mut self, node: &NamespaceDecl) {
        println!("{}Namespace: {}", self.indent(), node.name);
        self.indent_level += 1;
        for child in &node.body {
            child.accept::<()>(self);
        }
        self.indent_level -= 1;
    }

    fn visit_variable_declaration(&mut self, stmt: &VariableDeclarationStmt) {
        println!(
            "{}Let: {} {} =",
            self.indent(),
            stmt.type_ref.joined(),
            stmt.name
        );
        if let Some(init) = &stmt.initializer {
            self.indent_level += 1;
            self.visit_expression(init);
            self.indent_level -= 1;
        }
    }

    fn visit_variable_assignment(&mut self, stmt: &VariableAssignmentStmt) {
        println!(
            "{}Assign: {}.{} =",
            self.indent(),
            stmt.target.segments.join("::"),
            stmt.target.accessors.join(".")
        );
        self.indent_level += 1;
        self.visit_expression(&stmt.value);
        self.indent_level -= 1;
    }

    fn visit_return(&mut self, stmt: &ReturnStmt) {
        println!("{}Return:", self.indent());
        if let Some(value) = &stmt.value {
            self.indent_level += 1;
            self.visit_expression(value);
            self.indent_level -= 1;
        }
    }

    fn visit_discard(&mut self, _location: &Location) {
        println!("{}Discard", self.indent());
    }

    fn visit_if(&mut self, stmt: &IfStmt) {
        println!("{}If:", self.indent());
        for (i, (condition, body)) in stmt.branches.iter().enumerate() {
            self.indent_level += 1;
            println!("{}{}:", self.indent(), if i == 0 { "Condition" } else { "Else If Condition" });
            self.indent_level += 1;
            self.visit_expression(condition);
            self.indent_level -= 1;
            println!("{}Body:", self.indent());
            self.print_statements(body);
            self.indent_level -= 1;
        }
        if let Some(else_branch) = &stmt.else_branch {
            self.indent_level += 1;
            println!("{}Else:", self.indent());
            self.print_statements(else_branch);
            self.indent_level -= 1;
        }
    }

    fn visit_while(&mut self, stmt: &WhileStmt) {
        println!("{}While:", self.indent());
        self.indent_level += 1;
        self.visit_expression(&stmt.condition);
        self.indent_level -= 1;
        self.print_statements(&stmt.body);
    }

    fn visit_for(&mut self, stmt: &ForStmt) {
        println!("{}For:", self.indent());
        self.indent_level += 1;
        if let Some(init) = &stmt.init {
            match init.as_ref() {
                ForInit::Declaration(decl) => self.visit_variable_declaration(decl),
                ForInit::Assignment(assign) => self.visit_variable_assignment(assign),
                ForInit::Expression(expr) => self.visit_expression(expr),
            }
        }
        if let Some(condition) = &stmt.condition {
            self.visit_expression(condition);
        }
        if let Some(increment) = &stmt.increment {
            match increment {
                ForIncrement::Assignment(assign) => self.visit_variable_assignment(assign),
                ForIncrement::Expression(expr) => self.visit_expression(expr),
            }
        }
        self.indent_level -= 1;
        self.print_statements(&stmt.body);
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) {
        println!("{}ExprStatement:", self.indent());
        self.indent_level += 1;
        self.visit_expression(&stmt.expr);
        self.indent_level -= 1;
    }

    fn visit_number(&mut self, expr: &NumberLiteral) {
        match expr.value {
            NumberValue::Int(i) => println!("{}int: {}", self.indent(), i),
            NumberValue::UInt(u) => println!("{}uint: {}", self.indent(), u),
            NumberValue::Float(f) => println!("{}float: {}", self.indent(), f),
            NumberValue::Bool(b) => println!("{}bool: {}", self.indent(), b),
        }
    }

    fn visit_string(&mut self, expr: &StringLiteral) {
        println!("{}string: \"{}\"", self.indent(), expr.value);
    }

    fn visit_variable(&mut self, expr: &VariablePath) {
        let prefix = if expr.root_qualified { "::" } else { "" };
        println!(
            "{}Var: {}{}{}{}",
            self.indent(),
            prefix,
            expr.segments.join("::"),
            if expr.accessors.is_empty() { "" } else { "." },
            expr.accessors.join(".")
        );
    }

    fn visit_call(&mut self, expr: &SymbolCall) {
        println!("{}Call: {}", self.indent(), expr.segments.join("::"));
        if !expr.arguments.is_empty() {
            self.indent_level += 1;
            println!("{}Arguments:", self.indent());
            self.indent_level += 1;
            for arg in &expr.arguments {
                self.visit_expression(arg);
            }
            self.indent_level -= 2;
        }
    }

    fn visit_compound(&mut self, expr: &CompoundExpr) {
        println!("{}Compound:", self.indent());
        self.indent_level += 1;
        for (i, element) in expr.elements.iter().enumerate() {
            if i > 0 {
                println!("{}Op: {}", self.indent(), expr.operators[i - 1]);
            }
            self.visit_expression(element);
        }
        self.indent_level -= 1;
    }
}

impl AstPrinter {
    fn print_block(&mut self, label: &str, node: &BlockDecl) {
        println!("{}{}: {}", self.indent(), label, node.name);
        self.indent_level += 1;
        for element in &node.elements {
            println!(
                "{}{}: {}{}",
                self.indent(),
                element.name,
                element.type_ref.joined(),
                element
                    .array_count
                    .as_ref()
                    .map(|n| format!("[{}]", n.text))
                    .unwrap_or_default()
            );
        }
        self.indent_level -= 1;
    }
}
