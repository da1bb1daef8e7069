pub mod registry;
pub mod types;

pub use registry::{BuiltinTypes, TypeRegistry};
pub use types::{
    Attribute, BinaryOperator, ComparisonOperator, ConstructorSignature, PrimitiveKind, TypeId,
    TypeInfo, TypeKind, VectorScalar,
};
