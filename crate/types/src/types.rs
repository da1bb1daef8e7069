use lumina_derive::NamedEnum;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique, interned identifier for a [`TypeInfo`] registered in a
/// [`crate::registry::TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

static NEXT_TYPE_ID: AtomicUsize = AtomicUsize::new(0);

impl TypeId {
    /// Allocates a fresh, process-unique type id.
    pub fn new() -> Self {
        TypeId(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TypeId {
    fn default() -> Self {
        TypeId::new()
    }
}

/// The non-comparison arithmetic operators a type may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl std::fmt::Display for BinaryOperator {
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

/// The comparison operators a type may support. Equality is separated from
/// ordering because every non-bool, non-struct type supports `==`/`!=` while
/// only scalar kinds support ordering, per the built-in environment in the
/// semantic analyzer's design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl std::fmt::Display for ComparisonOperator {
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

/// The scalar family a vector or matrix type is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VectorScalar {
    Float,
    Int,
    UInt,
}

impl VectorScalar {
    /// The suffix appended to `VectorN` to name this family, empty for the
    /// float family (`Vector2`, not `Vector2Float`).
    pub fn suffix(&self) -> &'static str {
        match self {
            VectorScalar::Float => "",
            VectorScalar::Int => "Int",
            VectorScalar::UInt => "UInt",
        }
    }
}

/// The built-in primitive type kinds (§4.3 of the specification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, NamedEnum)]
pub enum PrimitiveKind {
    #[name = "void"]
    Void,
    #[name = "bool"]
    Bool,
    #[name = "int"]
    Int,
    #[name = "uint"]
    UInt,
    #[name = "float"]
    Float,
}

impl PrimitiveKind {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int | PrimitiveKind::UInt | PrimitiveKind::Float
        )
    }
}

/// What shape of declaration produced a [`TypeInfo`]. Structures, attribute
/// blocks and constant blocks share the same attribute-list shape but are
/// kept in distinct kinds because block check rules differ per §4.3 (e.g. an
/// attribute/constant block is not a legal element type inside another
/// block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Vector { dim: u8, scalar: VectorScalar },
    Matrix { dim: u8 },
    Struct,
    AttributeBlock,
    ConstantBlock,
}

/// A named, typed member of a vector, struct, attribute block or constant
/// block, with an optional fixed-size array count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_id: TypeId,
    pub array_count: Option<u32>,
}

/// One accepted argument-type list for constructing a value of a type (e.g.
/// `Vector3(float, float, float)` or `Vector3(Vector2, float)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    pub parameters: Vec<TypeId>,
}

/// A registered value category, per the Type data model in §3: a fully
/// qualified name, its attributes, the operators it supports, the types
/// implicitly convertible to it, and its constructor signatures.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    pub attributes: Vec<Attribute>,
    pub binary_operators: HashSet<BinaryOperator>,
    pub comparison_operators: HashSet<ComparisonOperator>,
    /// Types convertible *to* this type (a symmetric relation in practice,
    /// but stored per-type to match the Type data model exactly).
    pub conversions: HashSet<TypeId>,
    pub constructors: Vec<ConstructorSignature>,
}

impl TypeInfo {
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn supports_binary_operator(&self, op: BinaryOperator) -> bool {
        self.binary_operators.contains(&op)
    }

    pub fn supports_comparison_operator(&self, op: ComparisonOperator) -> bool {
        self.comparison_operators.contains(&op)
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, TypeKind::AttributeBlock | TypeKind::ConstantBlock)
    }
}
