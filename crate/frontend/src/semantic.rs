use crate::io;
use crate::lexer::tokenize;
use crate::parser::parse;
use lumina_error::{CompilerError, ErrorCode};
use lumina_ir::ast::{
    AssignmentOperator, BlockDecl, BlockKind, Expression, ForIncrement, ForInit, IfStmt, NamespaceDecl,
    NumberValue, Operator, Parameter, PipelineBodyDecl, PipelineFlowDecl, PipelineStage, ReturnStmt,
    Statement, SymbolCall, SymbolDecl, TextureDecl, TopLevel, TypeRef, VariableAssignmentStmt,
    VariableDeclarationStmt, VariablePath, WhileStmt,
};
use lumina_ir::source_location::{Location, SourceMap};
use lumina_shared::compilation_context::FunctionSignature;
use lumina_shared::CompilationContext;
use lumina_types::{Attribute, BinaryOperator, ComparisonOperator, TypeId, TypeInfo, TypeKind, VectorScalar};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Splices `#include` targets into the top-level node stream (§4.3). Each
/// `Include` node is replaced in place by the top-level declarations of the
/// referenced file, tokenized and parsed exactly once (deduplicated by
/// canonical path through [`CompilationContext::mark_included`]); a second
/// `#include` of an already-expanded file is dropped silently rather than
/// re-expanded, and a file that cannot be resolved on the §6 search path
/// produces a single diagnostic instead of aborting the run. Recurses into
/// namespace bodies, since an include nested inside a `namespace { ... }`
/// block splices its declarations into that namespace rather than the root.
pub fn expand_includes(
    nodes: Vec<TopLevel>,
    source_map: &mut SourceMap,
    ctx: &mut CompilationContext,
) -> (Vec<TopLevel>, Vec<CompilerError>) {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    expand_into(nodes, source_map, ctx, &mut out, &mut errors);
    (out, errors)
}

fn expand_into(
    nodes: Vec<TopLevel>,
    source_map: &mut SourceMap,
    ctx: &mut CompilationContext,
    out: &mut Vec<TopLevel>,
    errors: &mut Vec<CompilerError>,
) {
    for node in nodes {
        match node {
            TopLevel::Include(include) => {
                let including_dir = source_map
                    .path(include.location.source)
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let Some(resolved) = io::resolve_include(&including_dir, &include.path) else {
                    errors.push(CompilerError::new(
                        ErrorCode::IncludeFileNotFound,
                        format!("Include file [{}] not found", include.path),
                        include.location,
                    ));
                    continue;
                };
                let canonical = io::canonicalize_or_absolute(&resolved);
                if !ctx.mark_included(canonical.clone()) {
                    continue;
                }
                let Ok(text) = io::read_source(&resolved) else {
                    errors.push(CompilerError::new(
                        ErrorCode::IncludeFileNotFound,
                        format!("Include file [{}] not found", include.path),
                        include.location,
                    ));
                    continue;
                };
                let source_id = source_map.insert(canonical, text.clone());
                let tokens = tokenize(source_id, &text);
                let (included_nodes, parse_errors) = parse(&tokens);
                errors.extend(parse_errors);
                expand_into(included_nodes, source_map, ctx, out, errors);
            }
            TopLevel::Namespace(mut ns) => {
                let mut body = Vec::new();
                expand_into(ns.body, source_map, ctx, &mut body, errors);
                ns.body = body;
                out.push(TopLevel::Namespace(ns));
            }
            other => out.push(other),
        }
    }
}

/// Registers the fixed native function set available everywhere without an
/// `#include` (§4.3): the GLSL-derived helpers `max`, `min`, `clamp`, `mix`,
/// `step`, `smoothstep`, `length`, `normalize` and `dot`, each overloaded
/// over `float` and the float vector family.
pub fn register_natives(ctx: &mut CompilationContext) {
    let float = ctx.builtins.float;
    let vectors: Vec<TypeId> = [2u8, 3, 4]
        .into_iter()
        .filter_map(|dim| ctx.builtins.vector(dim, VectorScalar::Float))
        .collect();

    let mut binary_like = |ctx: &mut CompilationContext, name: &str| {
        ctx.declare_function_overload(
            name,
            FunctionSignature {
                parameters: vec![float, float],
                return_type: float,
            },
        );
        for &v in &vectors {
            ctx.declare_function_overload(
                name,
                FunctionSignature {
                    parameters: vec![v, v],
                    return_type: v,
                },
            );
        }
    };
    binary_like(ctx, "max");
    binary_like(ctx, "min");
    binary_like(ctx, "step");

    let mut ternary_like = |ctx: &mut CompilationContext, name: &str| {
        ctx.declare_function_overload(
            name,
            FunctionSignature {
                parameters: vec![float, float, float],
                return_type: float,
            },
        );
        for &v in &vectors {
            ctx.declare_function_overload(
                name,
                FunctionSignature {
                    parameters: vec![v, v, v],
                    return_type: v,
                },
            );
        }
    };
    ternary_like(ctx, "clamp");
    ternary_like(ctx, "smoothstep");

    ctx.declare_function_overload(
        "mix",
        FunctionSignature {
            parameters: vec![float, float, float],
            return_type: float,
        },
    );
    for &v in &vectors {
        ctx.declare_function_overload(
            "mix",
            FunctionSignature {
                parameters: vec![v, v, float],
                return_type: v,
            },
        );
    }

    for &v in &vectors {
        ctx.declare_function_overload(
            "length",
            FunctionSignature {
                parameters: vec![v],
                return_type: float,
            },
        );
        ctx.declare_function_overload(
            "normalize",
            FunctionSignature {
                parameters: vec![v],
                return_type: v,
            },
        );
        ctx.declare_function_overload(
            "dot",
            FunctionSignature {
                parameters: vec![v, v],
                return_type: float,
            },
        );
    }
}

/// Walks the flattened (include-expanded) top-level node list twice: once
/// to declare every name (so forward references across symbols and
/// namespaces resolve), once to check every body against what the first
/// pass declared. Returns every diagnostic raised in either pass.
pub fn analyze(nodes: &[TopLevel], ctx: &mut CompilationContext) -> Vec<CompilerError> {
    let mut analyzer = Analyzer {
        ctx,
        errors: Vec::new(),
        seen_pipeline_bodies: HashSet::new(),
    };
    analyzer.declare_pass(nodes);
    analyzer.check_pass(nodes);
    analyzer.errors
}

struct Analyzer<'a> {
    ctx: &'a mut CompilationContext,
    errors: Vec<CompilerError>,
    seen_pipeline_bodies: HashSet<PipelineStage>,
}

impl<'a> Analyzer<'a> {
    fn error(&mut self, code: ErrorCode, message: impl Into<String>, location: Location) {
        self.errors.push(CompilerError::new(code, message, location));
    }

    fn resolve_type_ref(&mut self, type_ref: &TypeRef) -> Option<TypeId> {
        match self.ctx.resolve_type(type_ref.root_qualified, &type_ref.segments) {
            Some(id) => Some(id),
            None => {
                self.error(
                    ErrorCode::UnresolvedName,
                    format!("unresolved type '{}'", type_ref.joined()),
                    type_ref.location,
                );
                None
            }
        }
    }

    // -- declare pass ------------------------------------------------------

    fn declare_pass(&mut self, nodes: &[TopLevel]) {
        for node in nodes {
            match node {
                TopLevel::Include(_) => {}
                TopLevel::PipelineFlow(decl) => self.declare_pipeline_flow(decl),
                TopLevel::StructureBlock(block) => self.declare_block(block),
                TopLevel::AttributeBlock(block) => self.declare_block(block),
                TopLevel::ConstantBlock(block) => self.declare_block(block),
                TopLevel::Texture(tex) => self.declare_texture(tex),
                TopLevel::Symbol(decl) => self.declare_symbol(decl),
                TopLevel::PipelineBody(body) => self.declare_pipeline_body(body),
                TopLevel::Namespace(ns) => self.declare_namespace(ns),
            }
        }
    }

    fn declare_pipeline_flow(&mut self, decl: &PipelineFlowDecl) {
        if !matches!(
            (decl.from, decl.to),
            (PipelineStage::Input, PipelineStage::VertexPass) | (PipelineStage::VertexPass, PipelineStage::FragmentPass)
        ) {
            self.error(
                ErrorCode::ForbiddenPipelinePair,
                format!("'{} -> {}' is not an accepted pipeline flow pair", decl.from, decl.to),
                decl.location,
            );
        }

        let Some(type_id) = self.resolve_type_ref(&decl.type_ref) else {
            return;
        };
        let is_valid_flow_type = matches!(
            self.ctx.type_registry.get(type_id).map(|t| &t.kind),
            Some(TypeKind::Primitive(_)) | Some(TypeKind::Vector { .. })
        );
        if !is_valid_flow_type {
            self.error(
                ErrorCode::InvalidPipelineFlowType,
                format!("'{}' cannot be used as a pipeline flow element type", decl.type_ref.joined()),
                decl.type_ref.location,
            );
        }

        if let Err(_) = self.ctx.declare_pipeline_flow_variable(&decl.name, type_id) {
            self.error(
                ErrorCode::NonUniquePipelineVariable,
                format!("pipeline variable '{}' is already declared", decl.name),
                decl.location,
            );
        }
    }

    fn declare_block(&mut self, block: &BlockDecl) {
        let mut attributes = Vec::with_capacity(block.elements.len());
        for element in &block.elements {
            let Some(element_type) = self.resolve_type_ref(&element.type_ref) else {
                continue;
            };
            let is_block_type = self
                .ctx
                .type_registry
                .get(element_type)
                .is_some_and(|t| t.is_block());
            if is_block_type {
                self.error(
                    ErrorCode::UnsupportedElementType,
                    format!("'{}' cannot be used as a field type inside a block", element.type_ref.joined()),
                    element.location,
                );
                continue;
            }
            let array_count = match &element.array_count {
                None => None,
                Some(n) => match &n.value {
                    NumberValue::Int(v) if *v > 0 => Some(*v as u32),
                    NumberValue::UInt(v) if *v > 0 => Some(*v as u32),
                    _ => {
                        self.error(ErrorCode::InvalidArraySize, "array size must be a positive integer", n.location);
                        None
                    }
                },
            };
            attributes.push(Attribute {
                name: element.name.clone(),
                type_id: element_type,
                array_count,
            });
        }

        let type_kind = match block.kind {
            BlockKind::Structure => TypeKind::Struct,
            BlockKind::Attribute => TypeKind::AttributeBlock,
            BlockKind::Constant => TypeKind::ConstantBlock,
        };
        let info = TypeInfo {
            id: TypeId::new(),
            name: block.name.clone(),
            kind: type_kind,
            attributes,
            binary_operators: Default::default(),
            comparison_operators: [ComparisonOperator::Equal, ComparisonOperator::NotEqual].into_iter().collect(),
            conversions: Default::default(),
            constructors: Vec::new(),
        };
        if self.ctx.declare_type(&block.name, info).is_err() {
            self.error(
                ErrorCode::DuplicateDeclaration,
                format!("'{}' is already declared in this namespace", block.name),
                block.location,
            );
        }
    }

    fn declare_texture(&mut self, tex: &TextureDecl) {
        if self.ctx.declare_texture(&tex.name).is_err() {
            self.error(
                ErrorCode::DuplicateTexture,
                format!("texture '{}' is already declared", tex.name),
                tex.location,
            );
        }
    }

    fn resolve_parameter_list(&mut self, parameters: &[Parameter]) -> Vec<TypeId> {
        let mut seen_names = HashSet::new();
        let mut types = Vec::with_capacity(parameters.len());
        for param in parameters {
            if !seen_names.insert(param.name.clone()) {
                self.error(
                    ErrorCode::DuplicateParameter,
                    format!("duplicate parameter name '{}'", param.name),
                    param.location,
                );
            }
            if let Some(id) = self.resolve_type_ref(&param.type_ref) {
                types.push(id);
            }
        }
        types
    }

    fn declare_symbol(&mut self, decl: &SymbolDecl) {
        let parameter_types = self.resolve_parameter_list(&decl.parameters);
        let Some(return_type) = self.resolve_type_ref(&decl.return_type) else {
            return;
        };

        let existing: Vec<FunctionSignature> = self
            .ctx
            .resolve_function_overloads_in_current_namespace(&decl.name)
            .map(|s| s.to_vec())
            .unwrap_or_default();
        for overload in &existing {
            if overload.parameters == parameter_types {
                self.error(
                    ErrorCode::DuplicateOverload,
                    format!("'{}' already has an overload with this parameter list", decl.name),
                    decl.location,
                );
            } else if overload.return_type != return_type {
                self.error(
                    ErrorCode::DisagreeingOverloadReturnType,
                    format!("overload of '{}' disagrees with an existing overload's return type", decl.name),
                    decl.location,
                );
            }
        }

        self.ctx.declare_function_overload(
            &decl.name,
            FunctionSignature {
                parameters: parameter_types,
                return_type,
            },
        );
    }

    fn declare_pipeline_body(&mut self, body: &PipelineBodyDecl) {
        if body.stage == PipelineStage::Input {
            self.error(ErrorCode::InputPipelineBody, "the Input stage cannot have a body", body.location);
            return;
        }
        if !self.seen_pipeline_bodies.insert(body.stage) {
            self.error(
                ErrorCode::RepeatedPipelineBody,
                format!("the {} stage body is already defined", body.stage),
                body.location,
            );
        }
    }

    fn declare_namespace(&mut self, ns: &NamespaceDecl) {
        self.ctx.enter_namespace(&ns.name);
        self.declare_pass(&ns.body);
        self.ctx.exit_namespace();
    }

    // -- check pass --------------------------------------------------------

    fn check_pass(&mut self, nodes: &[TopLevel]) {
        for node in nodes {
            match node {
                TopLevel::Symbol(decl) => self.check_symbol(decl),
                TopLevel::PipelineBody(body) => self.check_pipeline_body(body),
                TopLevel::Namespace(ns) => {
                    self.ctx.enter_namespace(&ns.name);
                    self.check_pass(&ns.body);
                    self.ctx.exit_namespace();
                }
                _ => {}
            }
        }
    }

    fn check_symbol(&mut self, decl: &SymbolDecl) {
        let Some(return_type) = self.ctx.resolve_type(decl.return_type.root_qualified, &decl.return_type.segments) else {
            return;
        };
        self.ctx.locals.push_scope();
        self.seed_block_members();
        for param in &decl.parameters {
            if let Some(id) = self.ctx.resolve_type(param.type_ref.root_qualified, &param.type_ref.segments) {
                let _ = self.ctx.locals.define(param.name.clone(), id);
            }
        }
        self.check_statements(&decl.body, return_type);
        self.ctx.locals.pop_scope();
    }

    fn check_pipeline_body(&mut self, body: &PipelineBodyDecl) {
        self.ctx.locals.push_scope();
        self.seed_block_members();
        self.check_statements(&body.body, self.ctx.builtins.void);
        self.ctx.locals.pop_scope();
    }

    /// Seeds the current (freshly pushed) local scope with every attribute
    /// and constant block member visible from here, per §4.3 step 4: both
    /// kinds of block expose their members as if they were global variables
    /// available inside any symbol or pipeline body.
    fn seed_block_members(&mut self) {
        let mut members = Vec::new();
        for type_id in self.ctx.visible_block_member_types() {
            if let Some(info) = self.ctx.type_registry.get(type_id) {
                if matches!(info.kind, TypeKind::AttributeBlock | TypeKind::ConstantBlock) {
                    for attr in &info.attributes {
                        members.push((attr.name.clone(), attr.type_id));
                    }
                }
            }
        }
        for (name, type_id) in members {
            let _ = self.ctx.locals.define(name, type_id);
        }
    }

    fn check_statements(&mut self, statements: &[Statement], expected_return: TypeId) {
        for statement in statements {
            self.check_statement(statement, expected_return);
        }
    }

    fn check_statement(&mut self, statement: &Statement, expected_return: TypeId) {
        match statement {
            Statement::VariableDeclaration(stmt) => self.check_variable_declaration(stmt),
            Statement::VariableAssignment(stmt) => self.check_variable_assignment(stmt),
            Statement::Return(stmt) => self.check_return(stmt, expected_return),
            Statement::Discard(_) => {}
            Statement::If(stmt) => self.check_if(stmt, expected_return),
            Statement::While(stmt) => self.check_while(stmt, expected_return),
            Statement::For(stmt) => self.check_for(stmt, expected_return),
            Statement::Expression(stmt) => {
                self.check_expression(&stmt.expr);
            }
        }
    }

    fn check_variable_declaration(&mut self, stmt: &VariableDeclarationStmt) {
        let Some(declared_type) = self.resolve_type_ref(&stmt.type_ref) else {
            return;
        };
        if let Some(initializer) = &stmt.initializer {
            if let Some(value_type) = self.check_expression(initializer) {
                if !self.ctx.type_registry.is_convertible(value_type, declared_type) {
                    self.error(
                        ErrorCode::IncompatibleConversion,
                        format!(
                            "cannot initialize '{}' from an incompatible expression",
                            stmt.type_ref.joined()
                        ),
                        initializer.location(),
                    );
                }
            }
        }
        if self.ctx.locals.define(stmt.name.clone(), declared_type).is_err() {
            self.error(
                ErrorCode::DuplicateDeclaration,
                format!("'{}' is already declared in this scope", stmt.name),
                stmt.location,
            );
        }
    }

    fn resolve_variable_path_type(&mut self, path: &VariablePath) -> Option<TypeId> {
        let base = self.ctx.resolve_variable(path.root_qualified, &path.segments);
        let Some(mut current) = base else {
            self.error(
                ErrorCode::UnresolvedName,
                format!("unresolved name '{}'", path.segments.join("::")),
                path.location,
            );
            return None;
        };
        for accessor in &path.accessors {
            let Some(info) = self.ctx.type_registry.get(current) else {
                return None;
            };
            let found = info.find_attribute(accessor).map(|a| a.type_id);
            let type_name = info.name.clone();
            match found {
                Some(type_id) => current = type_id,
                None => {
                    self.error(
                        ErrorCode::UnknownAttribute,
                        format!("'{type_name}' has no attribute '{accessor}'"),
                        path.location,
                    );
                    return None;
                }
            }
        }
        Some(current)
    }

    fn check_variable_assignment(&mut self, stmt: &VariableAssignmentStmt) {
        let Some(target_type) = self.resolve_variable_path_type(&stmt.target) else {
            self.check_expression(&stmt.value);
            return;
        };
        let Some(value_type) = self.check_expression(&stmt.value) else {
            return;
        };
        if stmt.operator != AssignmentOperator::Assign {
            let op = match stmt.operator {
                AssignmentOperator::AddAssign => BinaryOperator::Add,
                AssignmentOperator::SubtractAssign => BinaryOperator::Subtract,
                AssignmentOperator::MultiplyAssign => BinaryOperator::Multiply,
                AssignmentOperator::DivideAssign => BinaryOperator::Divide,
                AssignmentOperator::Assign => unreachable!(),
            };
            if !self.ctx.type_registry.supports_binary_operator(target_type, op) {
                self.error(
                    ErrorCode::UnsupportedOperator,
                    format!("'{}' does not support '{op}'", self.type_name(target_type)),
                    stmt.location,
                );
                return;
            }
        }
        if !self.ctx.type_registry.is_convertible(value_type, target_type) {
            self.error(
                ErrorCode::IncompatibleConversion,
                "assignment value is not convertible to the target's type",
                stmt.value.location(),
            );
        }
    }

    fn check_return(&mut self, stmt: &ReturnStmt, expected_return: TypeId) {
        match &stmt.value {
            Some(expr) => {
                if let Some(value_type) = self.check_expression(expr) {
                    if !self.ctx.type_registry.is_convertible(value_type, expected_return) {
                        self.error(ErrorCode::WrongReturnType, "return value does not match the declared return type", stmt.location);
                    }
                }
            }
            None => {
                if expected_return != self.ctx.builtins.void {
                    self.error(ErrorCode::WrongReturnType, "missing return value for a non-void symbol", stmt.location);
                }
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression) {
        if let Some(ty) = self.check_expression(condition) {
            if ty != self.ctx.builtins.bool_ {
                self.error(ErrorCode::NonBooleanCondition, "condition must be a bool expression", condition.location());
            }
        }
    }

    fn check_if(&mut self, stmt: &IfStmt, expected_return: TypeId) {
        for (condition, body) in &stmt.branches {
            self.check_condition(condition);
            self.ctx.locals.push_scope();
            self.check_statements(body, expected_return);
            self.ctx.locals.pop_scope();
        }
        if let Some(body) = &stmt.else_branch {
            self.ctx.locals.push_scope();
            self.check_statements(body, expected_return);
            self.ctx.locals.pop_scope();
        }
    }

    fn check_while(&mut self, stmt: &WhileStmt, expected_return: TypeId) {
        self.check_condition(&stmt.condition);
        self.ctx.locals.push_scope();
        self.check_statements(&stmt.body, expected_return);
        self.ctx.locals.pop_scope();
    }

    fn check_for(&mut self, stmt: &lumina_ir::ast::ForStmt, expected_return: TypeId) {
        self.ctx.locals.push_scope();
        if let Some(init) = &stmt.init {
            match init.as_ref() {
                ForInit::Declaration(decl) => self.check_variable_declaration(decl),
                ForInit::Assignment(assign) => self.check_variable_assignment(assign),
                ForInit::Expression(expr) => {
                    self.check_expression(expr);
                }
            }
        }
        if let Some(condition) = &stmt.condition {
            self.check_condition(condition);
        }
        if let Some(increment) = &stmt.increment {
            match increment {
                ForIncrement::Assignment(assign) => self.check_variable_assignment(assign),
                ForIncrement::Expression(expr) => {
                    self.check_expression(expr);
                }
            }
        }
        self.check_statements(&stmt.body, expected_return);
        self.ctx.locals.pop_scope();
    }

    // -- expressions -------------------------------------------------------

    fn check_expression(&mut self, expr: &Expression) -> Option<TypeId> {
        match expr {
            Expression::Number(n) => Some(match n.value {
                NumberValue::Int(_) => self.ctx.builtins.int,
                NumberValue::UInt(_) => self.ctx.builtins.uint,
                NumberValue::Float(_) => self.ctx.builtins.float,
                NumberValue::Bool(_) => self.ctx.builtins.bool_,
            }),
            Expression::String(_) => Some(self.ctx.builtins.void),
            Expression::Variable(path) => self.resolve_variable_path_type(path),
            Expression::Call(call) => self.check_call(call),
            Expression::Compound(compound) => self.check_compound(compound),
        }
    }

    fn check_call(&mut self, call: &SymbolCall) -> Option<TypeId> {
        let argument_types: Vec<Option<TypeId>> = call.arguments.iter().map(|a| self.check_expression(a)).collect();

        // A call target may name either a declared symbol overload set or a
        // type's constructor set (`Vector3(...)`); the latter is tried only
        // when no function of that name exists, since the two namespaces
        // never overlap (§4.3 keeps functions and types in separate scopes).
        let overloads: Vec<FunctionSignature> = if let Some(sigs) =
            self.ctx.resolve_function_overloads(call.root_qualified, &call.segments)
        {
            sigs.to_vec()
        } else if let Some(type_id) = self.ctx.resolve_type(call.root_qualified, &call.segments) {
            self.ctx
                .type_registry
                .get(type_id)
                .map(|info| {
                    info.constructors
                        .iter()
                        .map(|c| FunctionSignature {
                            parameters: c.parameters.clone(),
                            return_type: type_id,
                        })
                        .collect()
                })
                .unwrap_or_default()
        } else {
            self.error(
                ErrorCode::UnresolvedName,
                format!("unresolved symbol '{}'", call.segments.join("::")),
                call.location,
            );
            return None;
        };

        if argument_types.iter().any(Option::is_none) {
            return None;
        }
        let argument_types: Vec<TypeId> = argument_types.into_iter().map(Option::unwrap).collect();

        let arity_matches: Vec<_> = overloads.iter().filter(|o| o.parameters.len() == argument_types.len()).collect();
        if arity_matches.is_empty() {
            self.error(
                ErrorCode::WrongArgumentCount,
                format!("no overload of '{}' accepts {} argument(s)", call.segments.join("::"), argument_types.len()),
                call.location,
            );
            return None;
        }

        // §4.3: resolve by convertibility, but an overload whose parameters match
        // the argument types exactly always wins over one that merely accepts them
        // through an implicit conversion (e.g. int literal -> float parameter).
        let exact = arity_matches.iter().find(|overload| {
            overload.parameters.iter().zip(&argument_types).all(|(param, arg)| param == arg)
        });
        let matching = exact.or_else(|| {
            arity_matches.iter().find(|overload| {
                overload
                    .parameters
                    .iter()
                    .zip(&argument_types)
                    .all(|(param, arg)| self.ctx.type_registry.is_convertible(*arg, *param))
            })
        });

        let mut result_type = match matching {
            Some(overload) => overload.return_type,
            None => {
                self.error(
                    ErrorCode::NoMatchingOverload,
                    format!("no overload of '{}' accepts these argument types", call.segments.join("::")),
                    call.location,
                );
                return None;
            }
        };

        for accessor in &call.accessors {
            let Some(info) = self.ctx.type_registry.get(result_type) else {
                return None;
            };
            let found = info.find_attribute(accessor).map(|a| a.type_id);
            let type_name = info.name.clone();
            match found {
                Some(type_id) => result_type = type_id,
                None => {
                    self.error(ErrorCode::UnknownAttribute, format!("'{type_name}' has no attribute '{accessor}'"), call.location);
                    return None;
                }
            }
        }
        Some(result_type)
    }

    fn check_compound(&mut self, compound: &lumina_ir::ast::CompoundExpr) -> Option<TypeId> {
        let mut elements = compound.elements.iter();
        let mut running = self.check_expression(elements.next()?)?;
        for (operator, element) in compound.operators.iter().zip(elements) {
            let Some(next) = self.check_expression(element) else {
                return None;
            };
            running = match operator {
                Operator::Binary(op) => {
                    let op = registry_binary_operator(*op);
                    let Some(common) = self.ctx.type_registry.common_type(running, next) else {
                        self.error(ErrorCode::IncompatibleConversion, "operands have no common type", element.location());
                        return None;
                    };
                    if !self.ctx.type_registry.supports_binary_operator(common, op) {
                        self.error(
                            ErrorCode::UnsupportedOperator,
                            format!("'{}' does not support '{op}'", self.type_name(common)),
                            element.location(),
                        );
                        return None;
                    }
                    common
                }
                Operator::Comparison(op) => {
                    let op = registry_comparison_operator(*op);
                    let Some(common) = self.ctx.type_registry.common_type(running, next) else {
                        self.error(ErrorCode::IncompatibleConversion, "operands have no common type", element.location());
                        return None;
                    };
                    if !self.ctx.type_registry.supports_comparison_operator(common, op) {
                        self.error(
                            ErrorCode::UnsupportedOperator,
                            format!("'{}' does not support '{op}'", self.type_name(common)),
                            element.location(),
                        );
                        return None;
                    }
                    self.ctx.builtins.bool_
                }
                Operator::Logical(_) => {
                    if !self.ctx.type_registry.is_convertible(running, self.ctx.builtins.bool_)
                        || !self.ctx.type_registry.is_convertible(next, self.ctx.builtins.bool_)
                    {
                        self.error(ErrorCode::UnsupportedOperator, "logical operators require bool operands", element.location());
                        return None;
                    }
                    self.ctx.builtins.bool_
                }
            };
        }
        Some(running)
    }

    fn type_name(&self, id: TypeId) -> String {
        self.ctx.type_registry.name_of(id).unwrap_or("<unknown>").to_string()
    }
}

fn registry_binary_operator(op: lumina_ir::ast::BinaryOperator) -> BinaryOperator {
    match op {
        lumina_ir::ast::BinaryOperator::Add => BinaryOperator::Add,
        lumina_ir::ast::BinaryOperator::Subtract => BinaryOperator::Subtract,
        lumina_ir::ast::BinaryOperator::Multiply => BinaryOperator::Multiply,
        lumina_ir::ast::BinaryOperator::Divide => BinaryOperator::Divide,
    }
}

fn registry_comparison_operator(op: lumina_ir::ast::ComparisonOperator) -> ComparisonOperator {
    match op {
        lumina_ir::ast::ComparisonOperator::Equal => ComparisonOperator::Equal,
        lumina_ir::ast::ComparisonOperator::NotEqual => ComparisonOperator::NotEqual,
        lumina_ir::ast::ComparisonOperator::Less => ComparisonOperator::Less,
        lumina_ir::ast::ComparisonOperator::Greater => ComparisonOperator::Greater,
        lumina_ir::ast::ComparisonOperator::LessEqual => ComparisonOperator::LessEqual,
        lumina_ir::ast::ComparisonOperator::GreaterEqual => ComparisonOperator::GreaterEqual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_ir::source_location::SourceId;
    use std::io::Write;

    fn compile(text: &str) -> Vec<CompilerError> {
        let mut source_map = SourceMap::new();
        let id = source_map.insert(PathBuf::from("entry.shader"), text.to_string());
        let tokens = tokenize(id, text);
        let (nodes, mut errors) = parse(&tokens);
        let mut ctx = CompilationContext::new();
        register_natives(&mut ctx);
        let (expanded, include_errors) = expand_includes(nodes, &mut source_map, &mut ctx);
        errors.extend(include_errors);
        errors.extend(analyze(&expanded, &mut ctx));
        errors
    }

    #[test]
    fn accepts_int_literal_initializing_a_float() {
        let errors = compile("void run() { float f = 2; }");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn rejects_pipeline_flow_from_input_to_fragment() {
        let errors = compile("Input -> FragmentPass : Vector3 pos;");
        assert!(errors.iter().any(|e| e.code == ErrorCode::ForbiddenPipelinePair));
    }

    #[test]
    fn rejects_overload_with_disagreeing_return_type() {
        let src = "int foo(Vector3 v) { return 0; } float foo(float f) { return 0.0; }";
        let errors = compile(src);
        assert!(errors.iter().any(|e| e.code == ErrorCode::DisagreeingOverloadReturnType));
    }

    #[test]
    fn rejects_return_without_value_for_non_void_symbol() {
        let src = "Vector3 tint() { return; }";
        let errors = compile(src);
        assert!(errors.iter().any(|e| e.code == ErrorCode::WrongReturnType));
    }

    #[test]
    fn resolves_vector_constructor_and_field_access() {
        let src = "void run() { Vector3 v = Vector3(1.0, 2.0, 3.0); float x = v.x; }";
        let errors = compile(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn missing_include_produces_single_diagnostic() {
        let mut source_map = SourceMap::new();
        let id = source_map.insert(PathBuf::from("entry.shader"), "#include \"missing.shader\"".to_string());
        let tokens = tokenize(id, "#include \"missing.shader\"");
        let (nodes, _) = parse(&tokens);
        let mut ctx = CompilationContext::new();
        let (expanded, errors) = expand_includes(nodes, &mut source_map, &mut ctx);
        assert!(expanded.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::IncludeFileNotFound);
    }

    #[test]
    fn duplicate_include_expands_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let included_path = dir.path().join("common.shader");
        let mut file = std::fs::File::create(&included_path).unwrap();
        writeln!(file, "struct Material {{ float shininess; }};").unwrap();

        let entry_text = format!(
            "#include \"{path}\"\n#include \"{path}\"\n",
            path = included_path.file_name().unwrap().to_str().unwrap()
        );
        let mut source_map = SourceMap::new();
        let entry_path = dir.path().join("entry.shader");
        let id = source_map.insert(entry_path, entry_text.clone());
        let tokens = tokenize(id, &entry_text);
        let (nodes, _) = parse(&tokens);
        let mut ctx = CompilationContext::new();
        let (expanded, errors) = expand_includes(nodes, &mut source_map, &mut ctx);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(expanded.len(), 1, "expected the included struct to appear exactly once");
    }
}
