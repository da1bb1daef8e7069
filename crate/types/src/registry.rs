use crate::types::{
    Attribute, BinaryOperator, ComparisonOperator, ConstructorSignature, PrimitiveKind, TypeId,
    TypeInfo, TypeKind, VectorScalar,
};
use std::collections::HashMap;

/// The built-in primitive, vector and matrix type ids registered at
/// [`TypeRegistry::with_builtins`] time, exposed as named fields so callers
/// don't have to re-resolve them by name on every lookup.
#[derive(Debug, Clone)]
pub struct BuiltinTypes {
    pub void: TypeId,
    pub bool_: TypeId,
    pub int: TypeId,
    pub uint: TypeId,
    pub float: TypeId,
    vectors: HashMap<(u8, VectorScalar), TypeId>,
    matrices: HashMap<u8, TypeId>,
}

impl BuiltinTypes {
    pub fn vector(&self, dim: u8, scalar: VectorScalar) -> Option<TypeId> {
        self.vectors.get(&(dim, scalar)).copied()
    }

    pub fn matrix(&self, dim: u8) -> Option<TypeId> {
        self.matrices.get(&dim).copied()
    }

    pub fn scalar_of(&self, id: TypeId) -> Option<PrimitiveKind> {
        if id == self.void {
            Some(PrimitiveKind::Void)
        } else if id == self.bool_ {
            Some(PrimitiveKind::Bool)
        } else if id == self.int {
            Some(PrimitiveKind::Int)
        } else if id == self.uint {
            Some(PrimitiveKind::UInt)
        } else if id == self.float {
            Some(PrimitiveKind::Float)
        } else {
            None
        }
    }
}

/// Registry of every [`TypeInfo`] known to a compilation, keyed both by
/// [`TypeId`] and by fully qualified name.
pub struct TypeRegistry {
    types: HashMap<TypeId, TypeInfo>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            types: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a type under its fully qualified name, returning the
    /// allocated id. Panics if the name is already registered; callers in
    /// the semantic analyzer are expected to check `lookup_by_name` first
    /// and diagnose a duplicate declaration instead of calling this twice.
    pub fn register(&mut self, mut info: TypeInfo) -> TypeId {
        let id = info.id;
        info.id = id;
        self.by_name.insert(info.name.clone(), id);
        self.types.insert(id, info);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(&id)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeInfo> {
        self.types.get_mut(&id)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: TypeId) -> Option<&str> {
        self.types.get(&id).map(|t| t.name.as_str())
    }

    /// Whether a value of type `from` can be used where `to` is expected,
    /// either because they are the same type or because `to`'s conversion
    /// set lists `from`.
    pub fn is_convertible(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        self.types
            .get(&to)
            .map(|t| t.conversions.contains(&from))
            .unwrap_or(false)
    }

    pub fn supports_binary_operator(&self, id: TypeId, op: BinaryOperator) -> bool {
        self.types
            .get(&id)
            .map(|t| t.supports_binary_operator(op))
            .unwrap_or(false)
    }

    pub fn supports_comparison_operator(&self, id: TypeId, op: ComparisonOperator) -> bool {
        self.types
            .get(&id)
            .map(|t| t.supports_comparison_operator(op))
            .unwrap_or(false)
    }

    /// Picks the common type of two mutually convertible types, preferring
    /// the type with more attributes (so a vector wins over a scalar), per
    /// §4.3's compound-expression promotion rule. Returns `None` if neither
    /// converts to the other.
    pub fn common_type(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }
        let a_info = self.types.get(&a)?;
        let b_info = self.types.get(&b)?;
        let a_to_b = self.is_convertible(a, b);
        let b_to_a = self.is_convertible(b, a);
        match (a_to_b, b_to_a) {
            (true, true) => {
                if a_info.attributes.len() >= b_info.attributes.len() {
                    Some(a)
                } else {
                    Some(b)
                }
            }
            (true, false) => Some(b),
            (false, true) => Some(a),
            (false, false) => None,
        }
    }

    /// Registers the fixed built-in environment described in §4.3: the five
    /// primitive types, the nine vector types, the three matrix types, and
    /// the conversion table between them.
    pub fn with_builtins() -> (Self, BuiltinTypes) {
        let mut registry = TypeRegistry::new();

        let void = registry.register(TypeInfo {
            id: TypeId::new(),
            name: "void".to_string(),
            kind: TypeKind::Primitive(PrimitiveKind::Void),
            attributes: Vec::new(),
            binary_operators: Default::default(),
            comparison_operators: Default::default(),
            conversions: Default::default(),
            constructors: Vec::new(),
        });

        let bool_ = registry.register(TypeInfo {
            id: TypeId::new(),
            name: "bool".to_string(),
            kind: TypeKind::Primitive(PrimitiveKind::Bool),
            attributes: Vec::new(),
            binary_operators: Default::default(),
            comparison_operators: [ComparisonOperator::Equal, ComparisonOperator::NotEqual]
                .into_iter()
                .collect(),
            conversions: Default::default(),
            constructors: Vec::new(),
        });

        let int = registry.register(TypeInfo {
            id: TypeId::new(),
            name: "int".to_string(),
            kind: TypeKind::Primitive(PrimitiveKind::Int),
            attributes: Vec::new(),
            binary_operators: [
                BinaryOperator::Add,
                BinaryOperator::Subtract,
                BinaryOperator::Multiply,
                BinaryOperator::Divide,
            ]
            .into_iter()
            .collect(),
            comparison_operators: all_comparisons(),
            conversions: Default::default(),
            constructors: Vec::new(),
        });

        let uint = registry.register(TypeInfo {
            id: TypeId::new(),
            name: "uint".to_string(),
            kind: TypeKind::Primitive(PrimitiveKind::UInt),
            attributes: Vec::new(),
            binary_operators: [
                BinaryOperator::Add,
                BinaryOperator::Subtract,
                BinaryOperator::Multiply,
                BinaryOperator::Divide,
            ]
            .into_iter()
            .collect(),
            comparison_operators: all_comparisons(),
            conversions: Default::default(),
            constructors: Vec::new(),
        });

        let float = registry.register(TypeInfo {
            id: TypeId::new(),
            name: "float".to_string(),
            kind: TypeKind::Primitive(PrimitiveKind::Float),
            attributes: Vec::new(),
            binary_operators: [
                BinaryOperator::Add,
                BinaryOperator::Subtract,
                BinaryOperator::Multiply,
                BinaryOperator::Divide,
            ]
            .into_iter()
            .collect(),
            comparison_operators: all_comparisons(),
            conversions: Default::default(),
            constructors: Vec::new(),
        });

        // Scalar numeric conversions are symmetric within {int, uint, float};
        // bool is isolated, per §4.3's accepted-conversions table.
        for (a, b) in [(int, uint), (int, float), (uint, float)] {
            add_symmetric_conversion(&mut registry, a, b);
        }

        let mut vectors = HashMap::new();
        let component_names = ["x", "y", "z", "w"];
        for dim in [2u8, 3, 4] {
            for scalar in [VectorScalar::Float, VectorScalar::Int, VectorScalar::UInt] {
                let scalar_type = match scalar {
                    VectorScalar::Float => float,
                    VectorScalar::Int => int,
                    VectorScalar::UInt => uint,
                };
                let name = format!("Vector{}{}", dim, scalar.suffix());
                let attributes = component_names[..dim as usize]
                    .iter()
                    .map(|n| Attribute {
                        name: n.to_string(),
                        type_id: scalar_type,
                        array_count: None,
                    })
                    .collect();
                let id = registry.register(TypeInfo {
                    id: TypeId::new(),
                    name,
                    kind: TypeKind::Vector { dim, scalar },
                    attributes,
                    binary_operators: [
                        BinaryOperator::Add,
                        BinaryOperator::Subtract,
                        BinaryOperator::Multiply,
                        BinaryOperator::Divide,
                    ]
                    .into_iter()
                    .collect(),
                    comparison_operators: [
                        ComparisonOperator::Equal,
                        ComparisonOperator::NotEqual,
                    ]
                    .into_iter()
                    .collect(),
                    conversions: Default::default(),
                    constructors: Vec::new(),
                });
                vectors.insert((dim, scalar), id);
            }
        }

        // Within each dimension, the three scalar suffixes convert freely
        // into one another, mirroring the scalar conversion table.
        for dim in [2u8, 3, 4] {
            let f = vectors[&(dim, VectorScalar::Float)];
            let i = vectors[&(dim, VectorScalar::Int)];
            let u = vectors[&(dim, VectorScalar::UInt)];
            add_symmetric_conversion(&mut registry, f, i);
            add_symmetric_conversion(&mut registry, f, u);
            add_symmetric_conversion(&mut registry, i, u);
        }

        // Constructor signatures: every ordered combination of scalar and
        // lower-dimensional-vector pieces that sums to the vector's
        // dimension, restricted to the float family (the canonical
        // constructor set; Int/UInt vectors construct from their own
        // scalar family the same way).
        for dim in [2u8, 3, 4] {
            for scalar in [VectorScalar::Float, VectorScalar::Int, VectorScalar::UInt] {
                let vector_id = vectors[&(dim, scalar)];
                let scalar_type = match scalar {
                    VectorScalar::Float => float,
                    VectorScalar::Int => int,
                    VectorScalar::UInt => uint,
                };
                let mut ctors = constructor_combinations(dim, scalar_type, &vectors, scalar);
                ctors.push(ConstructorSignature {
                    parameters: vec![scalar_type; dim as usize],
                });
                if let Some(info) = registry.get_mut(vector_id) {
                    info.constructors = ctors;
                }
            }
        }

        let mut matrices = HashMap::new();
        for dim in [2u8, 3, 4] {
            let name = format!("Matrix{}x{}", dim, dim);
            let id = registry.register(TypeInfo {
                id: TypeId::new(),
                name,
                kind: TypeKind::Matrix { dim },
                attributes: Vec::new(),
                binary_operators: [BinaryOperator::Multiply].into_iter().collect(),
                comparison_operators: Default::default(),
                conversions: Default::default(),
                constructors: Vec::new(),
            });
            matrices.insert(dim, id);
        }

        // Matrices implicitly convert to their corresponding float vector
        // family, per §4.3.
        for dim in [2u8, 3, 4] {
            let matrix_id = matrices[&dim];
            let vector_id = vectors[&(dim, VectorScalar::Float)];
            if let Some(info) = registry.get_mut(vector_id) {
                info.conversions.insert(matrix_id);
            }
        }

        let builtins = BuiltinTypes {
            void,
            bool_,
            int,
            uint,
            float,
            vectors,
            matrices,
        };

        (registry, builtins)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

fn all_comparisons() -> std::collections::HashSet<ComparisonOperator> {
    [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::Less,
        ComparisonOperator::Greater,
        ComparisonOperator::LessEqual,
        ComparisonOperator::GreaterEqual,
    ]
    .into_iter()
    .collect()
}

fn add_symmetric_conversion(registry: &mut TypeRegistry, a: TypeId, b: TypeId) {
    if let Some(info) = registry.get_mut(a) {
        info.conversions.insert(b);
    }
    if let Some(info) = registry.get_mut(b) {
        info.conversions.insert(a);
    }
}

/// Every ordered combination of scalar-or-lower-dimensional-vector pieces
/// that sum to `dim` components, within one scalar family.
fn constructor_combinations(
    dim: u8,
    scalar_type: TypeId,
    vectors: &HashMap<(u8, VectorScalar), TypeId>,
    scalar: VectorScalar,
) -> Vec<ConstructorSignature> {
    let mut out = Vec::new();
    let mut pieces: Vec<(u8, TypeId)> = vec![(1, scalar_type)];
    for lower_dim in 2..dim {
        if let Some(&id) = vectors.get(&(lower_dim, scalar)) {
            pieces.push((lower_dim, id));
        }
    }

    fn recurse(
        remaining: u8,
        pieces: &[(u8, TypeId)],
        current: &mut Vec<TypeId>,
        out: &mut Vec<ConstructorSignature>,
    ) {
        if remaining == 0 {
            if current.len() > 1 {
                out.push(ConstructorSignature {
                    parameters: current.clone(),
                });
            }
            return;
        }
        for &(size, id) in pieces {
            if size <= remaining {
                current.push(id);
                recurse(remaining - size, pieces, current, out);
                current.pop();
            }
        }
    }

    recurse(dim, &pieces, &mut Vec::new(), &mut out);
    out
}
