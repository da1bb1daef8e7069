use crate::SymbolTable;
use lumina_types::{BuiltinTypes, TypeId, TypeInfo, TypeRegistry};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// One accepted overload of a declared symbol (function), per §4.3's
/// overload-resolution rule: same name, distinct parameter lists.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub parameters: Vec<TypeId>,
    pub return_type: TypeId,
}

/// Everything declared directly inside one namespace: its own types
/// (structs, attribute/constant blocks), pipeline-flow variables, textures,
/// and function overload sets. Keyed by simple (unqualified) name; the
/// namespace itself is addressed by its `::`-joined path in
/// [`CompilationContext`]'s namespace map.
#[derive(Debug, Default)]
struct NamespaceScope {
    types: HashMap<String, TypeId>,
    variables: HashMap<String, TypeId>,
    textures: HashSet<String>,
    functions: HashMap<String, Vec<FunctionSignature>>,
}

/// Owns every piece of state threaded by mutable reference through the
/// semantic analyzer (§10.1): the type registry, the current namespace's
/// declared names plus every other namespace reachable by the resolution
/// search, a lexically scoped local variable table, and the set of include
/// paths already expanded (so `#include` dedups per §4.3/§8).
pub struct CompilationContext {
    pub type_registry: TypeRegistry,
    pub builtins: BuiltinTypes,
    pub locals: SymbolTable,
    namespace_stack: Vec<String>,
    namespaces: HashMap<String, NamespaceScope>,
    includes_seen: HashSet<PathBuf>,
    pipeline_flow_variables: HashSet<String>,
}

impl Default for CompilationContext {
    fn default() -> Self {
        CompilationContext::new()
    }
}

impl CompilationContext {
    pub fn new() -> Self {
        let (type_registry, builtins) = TypeRegistry::with_builtins();
        let mut root = NamespaceScope::default();
        for (dim, scalar) in [2u8, 3, 4].into_iter().flat_map(|d| {
            [
                lumina_types::VectorScalar::Float,
                lumina_types::VectorScalar::Int,
                lumina_types::VectorScalar::UInt,
            ]
            .into_iter()
            .map(move |s| (d, s))
        }) {
            if let Some(id) = builtins.vector(dim, scalar) {
                if let Some(name) = type_registry.name_of(id) {
                    root.types.insert(name.to_string(), id);
                }
            }
        }
        for dim in [2u8, 3, 4] {
            if let Some(id) = builtins.matrix(dim) {
                if let Some(name) = type_registry.name_of(id) {
                    root.types.insert(name.to_string(), id);
                }
            }
        }
        for id in [builtins.void, builtins.bool_, builtins.int, builtins.uint, builtins.float] {
            if let Some(name) = type_registry.name_of(id) {
                root.types.insert(name.to_string(), id);
            }
        }

        let mut namespaces = HashMap::new();
        namespaces.insert(String::new(), root);

        CompilationContext {
            type_registry,
            builtins,
            locals: SymbolTable::new(),
            namespace_stack: Vec::new(),
            namespaces,
            includes_seen: HashSet::new(),
            pipeline_flow_variables: HashSet::new(),
        }
    }

    // -- namespace stack --------------------------------------------------

    pub fn enter_namespace(&mut self, name: &str) {
        self.namespace_stack.push(name.to_string());
        self.namespaces.entry(self.current_namespace_path()).or_default();
    }

    pub fn exit_namespace(&mut self) {
        self.namespace_stack.pop();
    }

    pub fn current_namespace_path(&self) -> String {
        self.namespace_stack.join("::")
    }

    /// Namespace paths to search in order, from the innermost enclosing
    /// namespace down to the root (§4.3 namespace resolution): at stack
    /// `[A, B, C]` this yields `A::B::C`, `A::B`, `A`, `""`.
    fn search_prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::with_capacity(self.namespace_stack.len() + 1);
        for end in (0..=self.namespace_stack.len()).rev() {
            prefixes.push(self.namespace_stack[..end].join("::"));
        }
        prefixes
    }

    /// Candidate fully qualified namespace paths for a reference whose
    /// explicit qualifier (the `::`-segments before the final name) is
    /// `qualifier`. A root-qualified reference (leading `::`) disables the
    /// search and resolves `qualifier` from the global root only.
    fn candidate_namespace_paths(&self, root_qualified: bool, qualifier: &str) -> Vec<String> {
        if root_qualified {
            return vec![qualifier.to_string()];
        }
        self.search_prefixes()
            .into_iter()
            .map(|prefix| match (prefix.is_empty(), qualifier.is_empty()) {
                (true, true) => String::new(),
                (true, false) => qualifier.to_string(),
                (false, true) => prefix,
                (false, false) => format!("{prefix}::{qualifier}"),
            })
            .collect()
    }

    fn split_qualifier<'a>(&self, segments: &'a [String]) -> (String, &'a str) {
        if segments.len() <= 1 {
            (String::new(), segments[0].as_str())
        } else {
            (segments[..segments.len() - 1].join("::"), segments.last().unwrap().as_str())
        }
    }

    // -- resolution ---------------------------------------------------------

    /// Resolves a (possibly namespaced) type reference by searching the
    /// namespace stack outward, per §4.3.
    pub fn resolve_type(&self, root_qualified: bool, segments: &[String]) -> Option<TypeId> {
        let (qualifier, name) = self.split_qualifier(segments);
        self.candidate_namespace_paths(root_qualified, &qualifier)
            .into_iter()
            .find_map(|path| self.namespaces.get(&path)?.types.get(name).copied())
    }

    /// Resolves a (possibly namespaced) variable reference the same way.
    pub fn resolve_variable(&self, root_qualified: bool, segments: &[String]) -> Option<TypeId> {
        if segments.len() == 1 && !root_qualified {
            if let Some(local) = self.locals.lookup(&segments[0]) {
                return Some(local);
            }
        }
        let (qualifier, name) = self.split_qualifier(segments);
        self.candidate_namespace_paths(root_qualified, &qualifier)
            .into_iter()
            .find_map(|path| self.namespaces.get(&path)?.variables.get(name).copied())
    }

    /// Resolves every overload set reachable for a (possibly namespaced)
    /// call target, stopping at the first namespace in the search order
    /// that declares the name at all (§4.3 overload resolution operates
    /// within that one set, never merging overloads across namespaces).
    pub fn resolve_function_overloads(&self, root_qualified: bool, segments: &[String]) -> Option<&[FunctionSignature]> {
        let (qualifier, name) = self.split_qualifier(segments);
        self.candidate_namespace_paths(root_qualified, &qualifier)
            .into_iter()
            .find_map(|path| self.namespaces.get(&path)?.functions.get(name))
            .map(|v| v.as_slice())
    }

    /// Resolves the overload set already declared for `name` in the current
    /// namespace only, with no outward search. Used when checking a new
    /// declaration against its own fully qualified name (§4.3 step 3): a
    /// `helper` at root and an `A::helper` are distinct overload sets even
    /// though an outward call-site search from inside `A` would find both.
    pub fn resolve_function_overloads_in_current_namespace(&self, name: &str) -> Option<&[FunctionSignature]> {
        self.namespaces
            .get(&self.current_namespace_path())?
            .functions
            .get(name)
            .map(|v| v.as_slice())
    }

    /// Every type declared in a namespace reachable from the current search
    /// order (§4.3 step 4): used by the symbol/pipeline-body checker to seed
    /// attribute and constant block members as function-scope variables.
    pub fn visible_block_member_types(&self) -> Vec<TypeId> {
        self.search_prefixes()
            .into_iter()
            .filter_map(|path| self.namespaces.get(&path))
            .flat_map(|scope| scope.types.values().copied())
            .collect()
    }

    pub fn texture_declared(&self, root_qualified: bool, segments: &[String]) -> bool {
        let (qualifier, name) = self.split_qualifier(segments);
        self.candidate_namespace_paths(root_qualified, &qualifier)
            .into_iter()
            .any(|path| self.namespaces.get(&path).is_some_and(|ns| ns.textures.contains(name)))
    }

    // -- declaration ---------------------------------------------------------

    fn current_scope_mut(&mut self) -> &mut NamespaceScope {
        let path = self.current_namespace_path();
        self.namespaces.entry(path).or_default()
    }

    /// Declares a type in the current namespace. Returns `Err` if a type of
    /// that name is already declared *in this namespace* (duplicate
    /// declaration is scoped to a namespace, not global, per §4.3).
    pub fn declare_type(&mut self, name: &str, info: TypeInfo) -> Result<TypeId, String> {
        if self.current_scope_mut().types.contains_key(name) {
            return Err(format!("'{name}' is already declared in this namespace"));
        }
        let id = self.type_registry.register(info);
        self.current_scope_mut().types.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn declare_variable(&mut self, name: &str, type_id: TypeId) -> Result<(), String> {
        let scope = self.current_scope_mut();
        if scope.variables.contains_key(name) {
            return Err(format!("'{name}' is already declared in this namespace"));
        }
        scope.variables.insert(name.to_string(), type_id);
        Ok(())
    }

    /// Declares a pipeline-flow variable, binding it as a regular variable of
    /// the current namespace for lookup purposes while additionally
    /// enforcing §4.3's program-wide uniqueness rule: a flow variable name
    /// may not repeat across any flow declaration anywhere in the program,
    /// regardless of which namespace encloses it.
    pub fn declare_pipeline_flow_variable(&mut self, name: &str, type_id: TypeId) -> Result<(), String> {
        if !self.pipeline_flow_variables.insert(name.to_string()) {
            return Err(format!("pipeline variable '{name}' is already declared"));
        }
        let _ = self.current_scope_mut().variables.insert(name.to_string(), type_id);
        Ok(())
    }

    pub fn declare_texture(&mut self, name: &str) -> Result<(), String> {
        let scope = self.current_scope_mut();
        if scope.textures.contains(name) {
            return Err(format!("texture '{name}' is already declared in this namespace"));
        }
        scope.textures.insert(name.to_string());
        Ok(())
    }

    /// Adds an overload of `name` to the current namespace. The caller
    /// (the symbol check in §4.3) is responsible for rejecting exact
    /// parameter-list duplicates and disagreeing return types before
    /// calling this.
    pub fn declare_function_overload(&mut self, name: &str, signature: FunctionSignature) {
        self.current_scope_mut()
            .functions
            .entry(name.to_string())
            .or_default()
            .push(signature);
    }

    // -- includes -------------------------------------------------------------

    /// Marks `path` as expanded, returning `true` if it had not been seen
    /// before. An `#include` whose path was already expanded is silently
    /// skipped rather than re-expanded (§4.3, §8).
    pub fn mark_included(&mut self, path: PathBuf) -> bool {
        self.includes_seen.insert(path)
    }
}
