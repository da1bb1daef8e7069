use crate::token::{Token, TokenCategory};
use lumina_error::{CompilerError, ErrorCode};
use lumina_ir::ast::{
    AssignmentOperator, BinaryOperator, BlockDecl, BlockElement, BlockKind, ComparisonOperator,
    CompoundExpr, Expression, ExpressionStmt, ForIncrement, ForInit, ForStmt, IfStmt, IncludeDecl,
    LogicalOperator, NamespaceDecl, NumberLiteral, NumberValue, Operator, Parameter,
    PipelineBodyDecl, PipelineFlowDecl, PipelineStage, ReturnStmt, Statement, StringLiteral,
    SymbolCall, SymbolDecl, TextureDecl, TopLevel, TypeRef, VariableAssignmentStmt,
    VariableDeclarationStmt, VariablePath, WhileStmt,
};
use lumina_ir::source_location::Location;

/// A namespaced reference consumed during statement/expression parsing, not
/// yet known to be a type, a variable, or a call target — disambiguated by
/// whatever token follows it (§4.2 statement disambiguation).
struct DottedPath {
    root_qualified: bool,
    segments: Vec<String>,
    accessors: Vec<String>,
    location: Location,
}

/// Recursive-descent syntactic analyzer (§4.2). Consumes the flat token
/// stream produced by the lexer and builds one [`TopLevel`] node per
/// top-level production, recovering from a malformed construct by
/// discarding the rest of its source line rather than resynchronizing on a
/// token kind.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompilerError>,
}

/// Parses a whole token stream into top-level declarations, collecting
/// every diagnostic encountered along the way instead of stopping at the
/// first one.
pub fn parse(tokens: &[Token]) -> (Vec<TopLevel>, Vec<CompilerError>) {
    let mut parser = Parser::new(tokens);
    let nodes = parser.parse_program();
    (nodes, parser.errors)
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    // -- token stream plumbing -------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn is(&self, category: TokenCategory) -> bool {
        self.peek().is_some_and(|t| t.is(category))
    }

    fn is_at(&self, offset: usize, category: TokenCategory) -> bool {
        self.peek_at(offset).is_some_and(|t| t.is(category))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.at_end() {
            return None;
        }
        let token = &self.tokens[self.pos];
        self.pos += 1;
        Some(token)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos - 1]
    }

    fn last_location(&self) -> Location {
        if self.pos > 0 {
            self.previous().location
        } else if let Some(t) = self.peek() {
            t.location
        } else {
            Location::new(lumina_ir::source_location::SourceId(0), 0, 1, 1, 0)
        }
    }

    /// Skips leading `Comment` tokens; comments never carry syntax.
    fn skip_comments(&mut self) {
        while self.is(TokenCategory::Comment) {
            self.advance();
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, location: Location) {
        self.errors.push(CompilerError::new(code, message, location));
    }

    /// Consumes and returns the current token if it matches `category`,
    /// otherwise records an `ExpectedToken` diagnostic and returns `None`
    /// without advancing.
    fn expect(&mut self, category: TokenCategory, what: &str) -> Option<Token> {
        if self.is(category) {
            self.advance().cloned()
        } else {
            let location = self.peek().map(|t| t.location).unwrap_or_else(|| self.last_location());
            let found = self
                .peek()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "end of input".to_string());
            self.error(
                ErrorCode::ExpectedToken,
                format!("expected {what}, found {found}"),
                location,
            );
            None
        }
    }

    /// Discards every remaining token on the line the parser stalled on,
    /// then resumes at the next line (§4.2 line-based error recovery).
    fn recover_to_next_line(&mut self) {
        let failing_line = self
            .peek()
            .map(|t| t.location.line)
            .unwrap_or(self.last_location().line);
        while let Some(t) = self.peek() {
            if t.location.line != failing_line {
                break;
            }
            self.advance();
        }
    }

    // -- top level ---------------------------------------------------------

    fn parse_program(&mut self) -> Vec<TopLevel> {
        let mut nodes = Vec::new();
        while !self.at_end() {
            self.skip_comments();
            if self.at_end() {
                break;
            }
            if let Some(node) = self.parse_top_level_item() {
                nodes.push(node);
            }
        }
        nodes
    }

    fn parse_top_level_item(&mut self) -> Option<TopLevel> {
        let category = self.peek()?.category;
        match category {
            TokenCategory::Include => self.parse_include().map(TopLevel::Include),
            TokenCategory::PipelineFlow => {
                if self.is_at(1, TokenCategory::PipelineFlowSeparator) {
                    self.parse_pipeline_flow().map(TopLevel::PipelineFlow)
                } else if self.is_at(1, TokenCategory::OpenParenthesis) {
                    self.parse_pipeline_body().map(TopLevel::PipelineBody)
                } else {
                    let loc = self.peek()?.location;
                    self.error(
                        ErrorCode::UnexpectedToken,
                        "expected '->' or '(' after pipeline stage keyword",
                        loc,
                    );
                    self.recover_to_next_line();
                    None
                }
            }
            TokenCategory::StructureBlock => self.parse_block(BlockKind::Structure).map(TopLevel::StructureBlock),
            TokenCategory::AttributeBlock => self.parse_block(BlockKind::Attribute).map(TopLevel::AttributeBlock),
            TokenCategory::ConstantBlock => self.parse_block(BlockKind::Constant).map(TopLevel::ConstantBlock),
            TokenCategory::Texture => self.parse_texture().map(TopLevel::Texture),
            TokenCategory::Namespace => self.parse_namespace().map(TopLevel::Namespace),
            TokenCategory::Identifier | TokenCategory::NamespaceSeparator => {
                self.parse_symbol_decl().map(TopLevel::Symbol)
            }
            _ => {
                let loc = self.peek()?.location;
                let text = self.peek()?.text.clone();
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("unexpected token '{text}' at top level"),
                    loc,
                );
                self.recover_to_next_line();
                None
            }
        }
    }

    fn parse_include(&mut self) -> Option<IncludeDecl> {
        let start = self.advance()?.location; // '#include'
        let literal = self.expect(TokenCategory::IncludeLiteral, "an include path")?;
        let is_system = literal.text.starts_with('<');
        let path = literal
            .text
            .trim_matches(|c| c == '"' || c == '<' || c == '>')
            .to_string();
        Some(IncludeDecl {
            path,
            is_system,
            location: start.span_to(&literal.location),
        })
    }

    fn pipeline_stage_of(&self, token: &Token) -> PipelineStage {
        match token.text.as_str() {
            "Input" => PipelineStage::Input,
            "VertexPass" => PipelineStage::VertexPass,
            _ => PipelineStage::FragmentPass,
        }
    }

    fn parse_pipeline_flow(&mut self) -> Option<PipelineFlowDecl> {
        let from_token = self.advance()?.clone();
        let from = self.pipeline_stage_of(&from_token);
        self.expect(TokenCategory::PipelineFlowSeparator, "'->'")?;
        let to_token = self.expect(TokenCategory::PipelineFlow, "a pipeline stage keyword")?;
        let to = self.pipeline_stage_of(&to_token);
        self.expect(TokenCategory::Separator, "':'")?;
        let type_ref = self.parse_type_ref()?;
        let name_token = self.expect(TokenCategory::Identifier, "a variable name")?;
        let end = self.expect(TokenCategory::EndOfSentence, "';'");
        let location = from_token
            .location
            .span_to(&end.map(|t| t.location).unwrap_or(name_token.location));
        Some(PipelineFlowDecl {
            from,
            to,
            type_ref,
            name: name_token.text,
            location,
        })
    }

    fn parse_pipeline_body(&mut self) -> Option<PipelineBodyDecl> {
        let stage_token = self.advance()?.clone();
        let stage = self.pipeline_stage_of(&stage_token);
        self.expect(TokenCategory::OpenParenthesis, "'('")?;
        self.expect(TokenCategory::CloseParenthesis, "')'")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let location = stage_token
            .location
            .span_to(&close.map(|t| t.location).unwrap_or(stage_token.location));
        Some(PipelineBodyDecl { stage, body, location })
    }

    fn parse_block(&mut self, kind: BlockKind) -> Option<BlockDecl> {
        let keyword = self.advance()?.clone();
        let name_token = self.expect(TokenCategory::Identifier, "a block name")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let mut elements = Vec::new();
        while !self.is(TokenCategory::CloseCurlyBracket) && !self.at_end() {
            self.skip_comments();
            if self.is(TokenCategory::CloseCurlyBracket) || self.at_end() {
                break;
            }
            match self.parse_block_element() {
                Some(element) => elements.push(element),
                None => self.recover_to_next_line(),
            }
        }
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let end = self.expect(TokenCategory::EndOfSentence, "';'");
        let location = keyword.location.span_to(
            &end.map(|t| t.location)
                .or(close.map(|t| t.location))
                .unwrap_or(keyword.location),
        );
        Some(BlockDecl {
            kind,
            name: name_token.text,
            elements,
            location,
        })
    }

    fn parse_block_element(&mut self) -> Option<BlockElement> {
        let type_ref = self.parse_type_ref()?;
        let name_token = self.expect(TokenCategory::Identifier, "a field name")?;
        let array_count = if self.is(TokenCategory::OpenBracket) {
            self.advance();
            let number = self.expect(TokenCategory::Number, "an array size")?;
            self.expect(TokenCategory::CloseBracket, "']'")?;
            Some(self.number_literal_from(&number))
        } else {
            None
        };
        let end = self.expect(TokenCategory::EndOfSentence, "';'")?;
        Some(BlockElement {
            name: name_token.text,
            array_count,
            location: type_ref.location.span_to(&end.location),
            type_ref,
        })
    }

    fn parse_texture(&mut self) -> Option<TextureDecl> {
        let keyword = self.advance()?.clone();
        let name_token = self.expect(TokenCategory::Identifier, "a texture name")?;
        let end = self.expect(TokenCategory::EndOfSentence, "';'");
        let location = keyword
            .location
            .span_to(&end.map(|t| t.location).unwrap_or(name_token.location));
        Some(TextureDecl {
            name: name_token.text,
            location,
        })
    }

    fn parse_namespace(&mut self) -> Option<NamespaceDecl> {
        let keyword = self.advance()?.clone();
        let name_token = self.expect(TokenCategory::Identifier, "a namespace name")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let mut body = Vec::new();
        while !self.is(TokenCategory::CloseCurlyBracket) && !self.at_end() {
            self.skip_comments();
            if self.is(TokenCategory::CloseCurlyBracket) || self.at_end() {
                break;
            }
            if let Some(node) = self.parse_top_level_item() {
                body.push(node);
            }
        }
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let location = keyword
            .location
            .span_to(&close.map(|t| t.location).unwrap_or(name_token.location));
        Some(NamespaceDecl {
            name: name_token.text,
            body,
            location,
        })
    }

    fn parse_symbol_decl(&mut self) -> Option<SymbolDecl> {
        let return_type = self.parse_type_ref()?;
        let name_token = self.expect(TokenCategory::Identifier, "a symbol name")?;
        self.expect(TokenCategory::OpenParenthesis, "'('")?;
        let mut parameters = Vec::new();
        if !self.is(TokenCategory::CloseParenthesis) {
            loop {
                let param_type = self.parse_type_ref()?;
                let param_name = self.expect(TokenCategory::Identifier, "a parameter name")?;
                parameters.push(Parameter {
                    location: param_type.location.span_to(&param_name.location),
                    type_ref: param_type,
                    name: param_name.text,
                });
                if self.is(TokenCategory::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenCategory::CloseParenthesis, "')'")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let location = return_type
            .location
            .span_to(&close.map(|t| t.location).unwrap_or(name_token.location));
        Some(SymbolDecl {
            return_type,
            name: name_token.text,
            parameters,
            body,
            location,
        })
    }

    // -- shared productions --------------------------------------------

    fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let start_location = self.peek()?.location;
        let root_qualified = if self.is(TokenCategory::NamespaceSeparator) {
            self.advance();
            true
        } else {
            false
        };
        let mut segments = vec![self.expect(TokenCategory::Identifier, "a type name")?.text];
        let mut end_location = self.previous().location;
        while self.is(TokenCategory::NamespaceSeparator) {
            self.advance();
            let segment = self.expect(TokenCategory::Identifier, "a namespace segment")?;
            end_location = segment.location;
            segments.push(segment.text);
        }
        Some(TypeRef {
            root_qualified,
            segments,
            location: start_location.span_to(&end_location),
        })
    }

    /// Scans a `::`-segment run followed by a `.`-accessor run, starting at
    /// the current position, without deciding yet whether it names a type,
    /// a variable, or a call (§4.2 statement disambiguation).
    fn parse_dotted_path(&mut self) -> Option<DottedPath> {
        let start_location = self.peek()?.location;
        let root_qualified = if self.is(TokenCategory::NamespaceSeparator) {
            self.advance();
            true
        } else {
            false
        };
        let mut segments = vec![self.expect(TokenCategory::Identifier, "a name")?.text];
        let mut end_location = self.previous().location;
        let mut accessors = Vec::new();
        loop {
            if self.is(TokenCategory::NamespaceSeparator) {
                if !accessors.is_empty() {
                    let loc = self.peek().unwrap().location;
                    self.error(
                        ErrorCode::InterleavedPathAccess,
                        "'::' cannot follow a '.' accessor in the same reference",
                        loc,
                    );
                }
                self.advance();
                let segment = self.expect(TokenCategory::Identifier, "a namespace segment")?;
                end_location = segment.location;
                segments.push(segment.text);
            } else if self.is(TokenCategory::Accessor) {
                self.advance();
                let field = self.expect(TokenCategory::Identifier, "a field name")?;
                end_location = field.location;
                accessors.push(field.text);
            } else {
                break;
            }
        }
        Some(DottedPath {
            root_qualified,
            segments,
            accessors,
            location: start_location.span_to(&end_location),
        })
    }

    fn number_literal_from(&self, token: &Token) -> NumberLiteral {
        let value = if token.text == "true" {
            NumberValue::Bool(true)
        } else if token.text == "false" {
            NumberValue::Bool(false)
        } else if token.text.contains('.') {
            NumberValue::Float(token.text.parse().unwrap_or(0.0))
        } else {
            NumberValue::Int(token.text.parse().unwrap_or(0))
        };
        NumberLiteral {
            text: token.text.clone(),
            value,
            location: token.location,
        }
    }

    fn assignment_operator_of(&self, text: &str) -> AssignmentOperator {
        match text {
            "+=" => AssignmentOperator::AddAssign,
            "-=" => AssignmentOperator::SubtractAssign,
            "*=" => AssignmentOperator::MultiplyAssign,
            "/=" => AssignmentOperator::DivideAssign,
            _ => AssignmentOperator::Assign,
        }
    }

    // -- statements ------------------------------------------------------

    fn parse_statements_until(&mut self, closing: TokenCategory) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.is(closing) && !self.at_end() {
            self.skip_comments();
            if self.is(closing) || self.at_end() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
        }
        statements
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        let category = self.peek()?.category;
        match category {
            TokenCategory::Return => self.parse_return().map(Statement::Return),
            TokenCategory::Discard => {
                let loc = self.advance()?.location;
                let end = self.expect(TokenCategory::EndOfSentence, "';'");
                Some(Statement::Discard(loc.span_to(&end.map(|t| t.location).unwrap_or(loc))))
            }
            TokenCategory::IfStatement => self.parse_if().map(Statement::If),
            TokenCategory::WhileStatement => self.parse_while().map(Statement::While),
            TokenCategory::ForStatement => self.parse_for().map(Statement::For),
            TokenCategory::Identifier | TokenCategory::NamespaceSeparator => self.parse_path_led_statement(),
            _ => {
                let loc = self.peek()?.location;
                self.error(ErrorCode::UnrecognizedStatement, "unrecognized statement", loc);
                self.recover_to_next_line();
                None
            }
        }
    }

    /// Dispatches on what follows a scanned `::`/`.` path: another
    /// identifier means a variable declaration, `(` means a call, and an
    /// assignment operator means an assignment (§4.2).
    fn parse_path_led_statement(&mut self) -> Option<Statement> {
        let path_start = self.pos;
        let path = self.parse_dotted_path()?;

        if self.is(TokenCategory::Identifier) && path.accessors.is_empty() {
            self.pos = path_start;
            return self.parse_variable_declaration().map(Statement::VariableDeclaration);
        }

        if self.is(TokenCategory::OpenParenthesis) {
            self.advance();
            let arguments = self.parse_arguments();
            let close = self.expect(TokenCategory::CloseParenthesis, "')'");
            let mut trailing_accessors = Vec::new();
            while self.is(TokenCategory::Accessor) {
                self.advance();
                if let Some(field) = self.expect(TokenCategory::Identifier, "a field name") {
                    trailing_accessors.push(field.text);
                }
            }
            let call_end = close.map(|t| t.location).unwrap_or(path.location);
            let call = SymbolCall {
                root_qualified: path.root_qualified,
                segments: path.segments,
                arguments,
                accessors: trailing_accessors,
                location: path.location.span_to(&call_end),
            };
            let end = self.expect(TokenCategory::EndOfSentence, "';'");
            let stmt_location = path.location.span_to(&end.map(|t| t.location).unwrap_or(call_end));
            return Some(Statement::Expression(ExpressionStmt {
                expr: Expression::Call(call),
                location: stmt_location,
            }));
        }

        if self.is(TokenCategory::Assignator) {
            let op_token = self.advance()?.clone();
            let operator = self.assignment_operator_of(&op_token.text);
            let value = self.parse_expression()?;
            let end = self.expect(TokenCategory::EndOfSentence, "';'");
            let location = path.location.span_to(&end.map(|t| t.location).unwrap_or(value.location()));
            return Some(Statement::VariableAssignment(VariableAssignmentStmt {
                target: VariablePath {
                    root_qualified: path.root_qualified,
                    segments: path.segments,
                    accessors: path.accessors,
                    location: path.location,
                },
                operator,
                value,
                location,
            }));
        }

        let loc = self.peek().map(|t| t.location).unwrap_or(path.location);
        self.error(
            ErrorCode::UnrecognizedStatement,
            "expected a declaration, call, or assignment",
            loc,
        );
        self.recover_to_next_line();
        None
    }

    fn parse_variable_declaration(&mut self) -> Option<VariableDeclarationStmt> {
        let type_ref = self.parse_type_ref()?;
        let name_token = self.expect(TokenCategory::Identifier, "a variable name")?;
        let initializer = if self.is(TokenCategory::Assignator) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        let end = self.expect(TokenCategory::EndOfSentence, "';'");
        let location = type_ref.location.span_to(
            &end.map(|t| t.location)
                .or(initializer.as_ref().map(|e| e.location()))
                .unwrap_or(name_token.location),
        );
        Some(VariableDeclarationStmt {
            type_ref,
            name: name_token.text,
            initializer,
            location,
        })
    }

    /// Parses the assignment form of a path-led construct, used by `for`
    /// loop init/increment clauses where a plain assignment (not just an
    /// expression) is the common idiom.
    fn parse_variable_assignment(&mut self) -> Option<VariableAssignmentStmt> {
        let path = self.parse_dotted_path()?;
        let op_token = self.expect(TokenCategory::Assignator, "an assignment operator")?;
        let operator = self.assignment_operator_of(&op_token.text);
        let value = self.parse_expression()?;
        let location = path.location.span_to(&value.location());
        Some(VariableAssignmentStmt {
            target: VariablePath {
                root_qualified: path.root_qualified,
                segments: path.segments,
                accessors: path.accessors,
                location: path.location,
            },
            operator,
            value,
            location,
        })
    }

    fn parse_return(&mut self) -> Option<ReturnStmt> {
        let keyword = self.advance()?.clone();
        let value = if self.is(TokenCategory::EndOfSentence) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let end = self.expect(TokenCategory::EndOfSentence, "';'");
        let location = keyword.location.span_to(
            &end.map(|t| t.location)
                .or(value.as_ref().map(|e| e.location()))
                .unwrap_or(keyword.location),
        );
        Some(ReturnStmt { value, location })
    }

    fn parse_if(&mut self) -> Option<IfStmt> {
        let keyword = self.advance()?.clone();
        self.expect(TokenCategory::OpenParenthesis, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenCategory::CloseParenthesis, "')'")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
        let mut end_loc = self
            .expect(TokenCategory::CloseCurlyBracket, "'}'")
            .map(|t| t.location)
            .unwrap_or(keyword.location);
        let mut branches = vec![(condition, body)];
        let mut else_branch = None;

        loop {
            if !self.is(TokenCategory::ElseStatement) {
                break;
            }
            self.advance();
            if self.is(TokenCategory::IfStatement) {
                self.advance();
                self.expect(TokenCategory::OpenParenthesis, "'('")?;
                let condition = self.parse_expression()?;
                self.expect(TokenCategory::CloseParenthesis, "')'")?;
                self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
                let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
                end_loc = self
                    .expect(TokenCategory::CloseCurlyBracket, "'}'")
                    .map(|t| t.location)
                    .unwrap_or(end_loc);
                branches.push((condition, body));
            } else {
                self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
                let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
                end_loc = self
                    .expect(TokenCategory::CloseCurlyBracket, "'}'")
                    .map(|t| t.location)
                    .unwrap_or(end_loc);
                else_branch = Some(body);
                break;
            }
        }

        Some(IfStmt {
            branches,
            else_branch,
            location: keyword.location.span_to(&end_loc),
        })
    }

    fn parse_while(&mut self) -> Option<WhileStmt> {
        let keyword = self.advance()?.clone();
        self.expect(TokenCategory::OpenParenthesis, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenCategory::CloseParenthesis, "')'")?;
        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let location = keyword
            .location
            .span_to(&close.map(|t| t.location).unwrap_or(keyword.location));
        Some(WhileStmt { condition, body, location })
    }

    fn parse_for(&mut self) -> Option<ForStmt> {
        let keyword = self.advance()?.clone();
        self.expect(TokenCategory::OpenParenthesis, "'('")?;

        let init = if self.is(TokenCategory::EndOfSentence) {
            None
        } else {
            Some(Box::new(self.parse_for_init()?))
        };
        self.expect(TokenCategory::EndOfSentence, "';'")?;

        let condition = if self.is(TokenCategory::EndOfSentence) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenCategory::EndOfSentence, "';'")?;

        let increment = if self.is(TokenCategory::CloseParenthesis) {
            None
        } else {
            Some(self.parse_for_increment()?)
        };
        self.expect(TokenCategory::CloseParenthesis, "')'")?;

        self.expect(TokenCategory::OpenCurlyBracket, "'{'")?;
        let body = self.parse_statements_until(TokenCategory::CloseCurlyBracket);
        let close = self.expect(TokenCategory::CloseCurlyBracket, "'}'");
        let location = keyword
            .location
            .span_to(&close.map(|t| t.location).unwrap_or(keyword.location));
        Some(ForStmt {
            init,
            condition,
            increment,
            body,
            location,
        })
    }

    /// A `for` loop's init clause is a variable declaration, a plain
    /// assignment, or a bare expression (§4.3); distinguished the same way
    /// a statement is, by what follows the leading dotted path.
    fn parse_for_init(&mut self) -> Option<ForInit> {
        if self.is(TokenCategory::Identifier) || self.is(TokenCategory::NamespaceSeparator) {
            let save = self.pos;
            let path = self.parse_dotted_path()?;
            if self.is(TokenCategory::Identifier) && path.accessors.is_empty() {
                self.pos = save;
                return self.parse_variable_declaration().map(ForInit::Declaration);
            }
            if self.is(TokenCategory::Assignator) {
                self.pos = save;
                return self.parse_variable_assignment().map(ForInit::Assignment);
            }
            self.pos = save;
        }
        self.parse_expression().map(ForInit::Expression)
    }

    fn parse_for_increment(&mut self) -> Option<ForIncrement> {
        if self.is(TokenCategory::Identifier) || self.is(TokenCategory::NamespaceSeparator) {
            let save = self.pos;
            let _ = self.parse_dotted_path();
            if self.is(TokenCategory::Assignator) {
                self.pos = save;
                return self.parse_variable_assignment().map(ForIncrement::Assignment);
            }
            self.pos = save;
        }
        self.parse_expression().map(ForIncrement::Expression)
    }

    fn parse_arguments(&mut self) -> Vec<Expression> {
        let mut arguments = Vec::new();
        if self.is(TokenCategory::CloseParenthesis) {
            return arguments;
        }
        loop {
            match self.parse_expression() {
                Some(expr) => arguments.push(expr),
                None => break,
            }
            if self.is(TokenCategory::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        arguments
    }

    // -- expressions -------------------------------------------------------

    /// A left-to-right sequence of elements joined by operators, with no
    /// precedence (§9 Open Question, resolved to flat evaluation).
    fn parse_expression(&mut self) -> Option<Expression> {
        let first = self.parse_element()?;
        let mut elements = vec![first];
        let mut operators = Vec::new();

        loop {
            let operator = match self.peek().map(|t| t.category) {
                Some(TokenCategory::Operator) => {
                    Operator::Binary(self.binary_operator_of(&self.peek().unwrap().text))
                }
                Some(TokenCategory::ComparatorOperator) => {
                    Operator::Comparison(self.comparison_operator_of(&self.peek().unwrap().text))
                }
                Some(TokenCategory::ConditionOperator) => {
                    Operator::Logical(self.logical_operator_of(&self.peek().unwrap().text))
                }
                _ => break,
            };
            self.advance();
            let next = self.parse_element()?;
            operators.push(operator);
            elements.push(next);
        }

        if elements.len() == 1 {
            Some(elements.into_iter().next().unwrap())
        } else {
            let location = elements
                .first()
                .unwrap()
                .location()
                .span_to(&elements.last().unwrap().location());
            Some(Expression::Compound(CompoundExpr {
                elements,
                operators,
                location,
            }))
        }
    }

    fn parse_element(&mut self) -> Option<Expression> {
        let token = self.peek()?;
        match token.category {
            TokenCategory::Number => {
                let token = self.advance()?.clone();
                Some(Expression::Number(self.number_literal_from(&token)))
            }
            TokenCategory::StringLiteral => {
                let token = self.advance()?.clone();
                let value = token.text.trim_matches('"').to_string();
                Some(Expression::String(StringLiteral {
                    value,
                    location: token.location,
                }))
            }
            TokenCategory::OpenParenthesis => {
                let open = self.advance()?.clone();
                if self.is(TokenCategory::CloseParenthesis) {
                    self.error(
                        ErrorCode::EmptyParenthesizedExpression,
                        "'()' does not contain an expression",
                        open.location,
                    );
                    self.advance();
                    return Some(Expression::Number(NumberLiteral {
                        text: String::new(),
                        value: NumberValue::Int(0),
                        location: open.location,
                    }));
                }
                let inner = self.parse_expression()?;
                self.expect(TokenCategory::CloseParenthesis, "')'")?;
                Some(inner)
            }
            TokenCategory::Identifier | TokenCategory::NamespaceSeparator => self.parse_path_led_expression(),
            _ => {
                let loc = token.location;
                let text = token.text.clone();
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("unexpected token '{text}' in expression"),
                    loc,
                );
                self.advance();
                Some(Expression::Number(NumberLiteral {
                    text: String::new(),
                    value: NumberValue::Int(0),
                    location: loc,
                }))
            }
        }
    }

    fn parse_path_led_expression(&mut self) -> Option<Expression> {
        let path = self.parse_dotted_path()?;
        if self.is(TokenCategory::OpenParenthesis) {
            self.advance();
            let arguments = self.parse_arguments();
            let close = self.expect(TokenCategory::CloseParenthesis, "')'");
            let mut accessors = Vec::new();
            while self.is(TokenCategory::Accessor) {
                self.advance();
                if let Some(field) = self.expect(TokenCategory::Identifier, "a field name") {
                    accessors.push(field.text);
                }
            }
            let end = close.map(|t| t.location).unwrap_or(path.location);
            return Some(Expression::Call(SymbolCall {
                root_qualified: path.root_qualified,
                segments: path.segments,
                arguments,
                accessors,
                location: path.location.span_to(&end),
            }));
        }
        Some(Expression::Variable(VariablePath {
            root_qualified: path.root_qualified,
            segments: path.segments,
            accessors: path.accessors,
            location: path.location,
        }))
    }

    fn binary_operator_of(&self, text: &str) -> BinaryOperator {
        match text {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            _ => BinaryOperator::Divide,
        }
    }

    fn comparison_operator_of(&self, text: &str) -> ComparisonOperator {
        match text {
            "==" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            "<" => ComparisonOperator::Less,
            ">" => ComparisonOperator::Greater,
            "<=" => ComparisonOperator::LessEqual,
            _ => ComparisonOperator::GreaterEqual,
        }
    }

    fn logical_operator_of(&self, text: &str) -> LogicalOperator {
        match text {
            "&&" => LogicalOperator::And,
            _ => LogicalOperator::Or,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use lumina_ir::source_location::SourceId;

    fn parse_source(text: &str) -> (Vec<TopLevel>, Vec<CompilerError>) {
        let tokens = tokenize(SourceId(0), text);
        parse(&tokens)
    }

    #[test]
    fn parses_pipeline_flow_declaration() {
        let (nodes, errors) = parse_source("Input -> VertexPass : Vector3 position;");
        assert!(errors.is_empty());
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0], TopLevel::PipelineFlow(_)));
    }

    #[test]
    fn parses_struct_block() {
        let (nodes, errors) = parse_source("struct Material { float shininess; Vector3 color; };");
        assert!(errors.is_empty());
        match &nodes[0] {
            TopLevel::StructureBlock(block) => assert_eq!(block.elements.len(), 2),
            other => panic!("expected struct block, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_with_statements() {
        let src = "float square(float x) { return x * x; }";
        let (nodes, errors) = parse_source(src);
        assert!(errors.is_empty());
        match &nodes[0] {
            TopLevel::Symbol(decl) => {
                assert_eq!(decl.name, "square");
                assert_eq!(decl.parameters.len(), 1);
                assert_eq!(decl.body.len(), 1);
            }
            other => panic!("expected symbol decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_variable_declaration_and_assignment() {
        let src = "void run() { float x = 1.0; x += 2.0; }";
        let (nodes, errors) = parse_source(src);
        assert!(errors.is_empty());
        match &nodes[0] {
            TopLevel::Symbol(decl) => {
                assert!(matches!(decl.body[0], Statement::VariableDeclaration(_)));
                assert!(matches!(decl.body[1], Statement::VariableAssignment(_)));
            }
            other => panic!("expected symbol decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_field_assignment() {
        let src = "void run() { position.x = 1.0; }";
        let (nodes, _errors) = parse_source(src);
        match &nodes[0] {
            TopLevel::Symbol(decl) => match &decl.body[0] {
                Statement::VariableAssignment(stmt) => {
                    assert_eq!(stmt.target.segments, vec!["position".to_string()]);
                    assert_eq!(stmt.target.accessors, vec!["x".to_string()]);
                }
                other => panic!("expected assignment, got {other:?}"),
            },
            other => panic!("expected symbol decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_for_loop_with_assignment_increment() {
        let src = "void run() { for (int i = 0; i < 10; i += 1) { discard; } }";
        let (nodes, errors) = parse_source(src);
        assert!(errors.is_empty());
        match &nodes[0] {
            TopLevel::Symbol(decl) => match &decl.body[0] {
                Statement::For(for_stmt) => {
                    assert!(for_stmt.init.is_some());
                    assert!(matches!(for_stmt.increment, Some(ForIncrement::Assignment(_))));
                }
                other => panic!("expected for statement, got {other:?}"),
            },
            other => panic!("expected symbol decl, got {other:?}"),
        }
    }

    #[test]
    fn empty_parenthesized_expression_is_an_error() {
        let src = "void run() { float x = (); }";
        let (_, errors) = parse_source(src);
        assert!(errors.iter().any(|e| e.code == ErrorCode::EmptyParenthesizedExpression));
    }

    #[test]
    fn flat_compound_expression_has_no_precedence() {
        let src = "void run() { float x = 1.0 + 2.0 * 3.0; }";
        let (nodes, errors) = parse_source(src);
        assert!(errors.is_empty());
        match &nodes[0] {
            TopLevel::Symbol(decl) => match &decl.body[0] {
                Statement::VariableDeclaration(stmt) => match stmt.initializer.as_ref().unwrap() {
                    Expression::Compound(expr) => assert_eq!(expr.elements.len(), 3),
                    other => panic!("expected compound expression, got {other:?}"),
                },
                other => panic!("expected declaration, got {other:?}"),
            },
            other => panic!("expected symbol decl, got {other:?}"),
        }
    }
}
