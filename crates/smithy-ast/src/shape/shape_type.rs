use std::fmt;

/// The `type` discriminator of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeType {
    BigDecimal,
    BigInteger,
    Blob,
    Boolean,
    Byte,
    Double,
    Document,
    Float,
    Integer,
    Long,
    Short,
    String,
    Timestamp,
    List,
    Set,
    Map,
    Structure,
    Union,
    Service,
    Resource,
    Operation,
    Apply,
}

impl ShapeType {
    pub const ALL: [ShapeType; 22] = [
        ShapeType::BigDecimal,
        ShapeType::BigInteger,
        ShapeType::Blob,
        ShapeType::Boolean,
        ShapeType::Byte,
        ShapeType::Double,
        ShapeType::Document,
        ShapeType::Float,
        ShapeType::Integer,
        ShapeType::Long,
        ShapeType::Short,
        ShapeType::String,
        ShapeType::Timestamp,
        ShapeType::List,
        ShapeType::Set,
        ShapeType::Map,
        ShapeType::Structure,
        ShapeType::Union,
        ShapeType::Service,
        ShapeType::Resource,
        ShapeType::Operation,
        ShapeType::Apply,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::Byte => "byte",
            ShapeType::Double => "double",
            ShapeType::Document => "document",
            ShapeType::Float => "float",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::Short => "short",
            ShapeType::String => "string",
            ShapeType::Timestamp => "timestamp",
            ShapeType::List => "list",
            ShapeType::Set => "set",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Service => "service",
            ShapeType::Resource => "resource",
            ShapeType::Operation => "operation",
            ShapeType::Apply => "apply",
        }
    }

    /// Case-sensitive lookup by the name used in the `type` field.
    pub fn from_name(name: &str) -> Option<ShapeType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Scalar types that carry no payload fields.
    pub fn is_simple(self) -> bool {
        !matches!(
            self,
            ShapeType::List
                | ShapeType::Set
                | ShapeType::Map
                | ShapeType::Structure
                | ShapeType::Union
                | ShapeType::Service
                | ShapeType::Resource
                | ShapeType::Operation
                | ShapeType::Apply
        )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
