//! `Shape`: a typed definition keyed by its absolute identifier.
//!
//! The `type` key may come after the payload keys that depend on it, so a
//! shape decodes in three steps:
//!
//! 1. scan every key, decoding payload values into a [`ShapeBuffer`] and
//!    remembering which fields were seen and where;
//! 2. once the object is consumed, require a `type` and check each seen field
//!    against [`SHAPE_FIELDS`];
//! 3. move the buffered values into the [`ShapeBody`] for that type.

mod payload;
mod shape_type;

use std::collections::BTreeMap;

use indexmap::IndexMap;

pub use payload::{
    CollectionShape, MapShape, OperationShape, ResourceShape, ServiceShape, StructureShape,
};
pub use shape_type::ShapeType;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, IdComponent, Result};
use crate::location::Location;
use crate::member::Member;
use crate::node::{decode_id_map, decode_list, decode_map, Node, StringNode};
use crate::scanner::Scanner;
use crate::shape_id::{is_identifier, AbsShapeId, AbsShapeIdNode};
use crate::traits::TraitMap;

/// A payload field, the shape types it may appear on, and how its value is
/// read into the buffer.
pub struct ShapeField {
    pub name: &'static str,
    pub types: &'static [ShapeType],
    decode: fn(&mut ShapeBuffer, &mut Scanner<'_>) -> Result<()>,
}

impl std::fmt::Debug for ShapeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeField")
            .field("name", &self.name)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

impl ShapeField {
    pub fn allows(&self, shape_type: ShapeType) -> bool {
        self.types.contains(&shape_type)
    }
}

const SERVICE_AND_RESOURCE: &[ShapeType] = &[ShapeType::Service, ShapeType::Resource];
const RESOURCE: &[ShapeType] = &[ShapeType::Resource];
const OPERATION: &[ShapeType] = &[ShapeType::Operation];

/// Every payload field a shape object may carry besides `type` and `traits`.
pub static SHAPE_FIELDS: &[ShapeField] = &[
    ShapeField {
        name: "member",
        types: &[ShapeType::List, ShapeType::Set],
        decode: read_member,
    },
    ShapeField {
        name: "key",
        types: &[ShapeType::Map],
        decode: read_key,
    },
    ShapeField {
        name: "value",
        types: &[ShapeType::Map],
        decode: read_value,
    },
    ShapeField {
        name: "members",
        types: &[ShapeType::Structure, ShapeType::Union],
        decode: read_members,
    },
    ShapeField {
        name: "version",
        types: &[ShapeType::Service],
        decode: read_version,
    },
    ShapeField {
        name: "operations",
        types: SERVICE_AND_RESOURCE,
        decode: read_operations,
    },
    ShapeField {
        name: "resources",
        types: SERVICE_AND_RESOURCE,
        decode: read_resources,
    },
    ShapeField {
        name: "errors",
        types: &[ShapeType::Service, ShapeType::Operation],
        decode: read_errors,
    },
    ShapeField {
        name: "rename",
        types: &[ShapeType::Service],
        decode: read_rename,
    },
    ShapeField {
        name: "identifiers",
        types: RESOURCE,
        decode: read_identifiers,
    },
    ShapeField {
        name: "create",
        types: RESOURCE,
        decode: read_create,
    },
    ShapeField {
        name: "put",
        types: RESOURCE,
        decode: read_put,
    },
    ShapeField {
        name: "read",
        types: RESOURCE,
        decode: read_read,
    },
    ShapeField {
        name: "update",
        types: RESOURCE,
        decode: read_update,
    },
    ShapeField {
        name: "delete",
        types: RESOURCE,
        decode: read_delete,
    },
    ShapeField {
        name: "list",
        types: RESOURCE,
        decode: read_list,
    },
    ShapeField {
        name: "collectionOperations",
        types: RESOURCE,
        decode: read_collection_operations,
    },
    ShapeField {
        name: "input",
        types: OPERATION,
        decode: read_input,
    },
    ShapeField {
        name: "output",
        types: OPERATION,
        decode: read_output,
    },
];

pub fn shape_field(name: &str) -> Option<&'static ShapeField> {
    SHAPE_FIELDS.iter().find(|f| f.name == name)
}

/// Payload values decoded before the shape type is known.
#[derive(Default)]
struct ShapeBuffer {
    seen: Vec<(&'static ShapeField, usize)>,
    member: Option<Member>,
    key: Option<Member>,
    value: Option<Member>,
    members: Option<IndexMap<String, Member>>,
    version: Option<StringNode>,
    operations: Option<Vec<AbsShapeIdNode>>,
    resources: Option<Vec<AbsShapeIdNode>>,
    errors: Option<Vec<AbsShapeIdNode>>,
    rename: Option<BTreeMap<AbsShapeId, StringNode>>,
    identifiers: Option<IndexMap<String, AbsShapeIdNode>>,
    create: Option<AbsShapeIdNode>,
    put: Option<AbsShapeIdNode>,
    read: Option<AbsShapeIdNode>,
    update: Option<AbsShapeIdNode>,
    delete: Option<AbsShapeIdNode>,
    list: Option<AbsShapeIdNode>,
    collection_operations: Option<Vec<AbsShapeIdNode>>,
    input: Option<AbsShapeIdNode>,
    output: Option<AbsShapeIdNode>,
}

impl ShapeBuffer {
    fn read(&mut self, field: &'static ShapeField, offset: usize, s: &mut Scanner<'_>) -> Result<()> {
        (field.decode)(self, s)?;
        self.seen.push((field, offset));
        Ok(())
    }

    /// Fails on the first seen field that `shape_type` does not allow.
    fn validate(&self, shape_type: ShapeType) -> Result<()> {
        for (field, offset) in &self.seen {
            if !field.allows(shape_type) {
                return Err(AstError::FieldNotAllowedForType {
                    field: field.name,
                    shape_type,
                    offset: *offset,
                });
            }
        }
        Ok(())
    }

    fn into_body(self, shape_type: ShapeType) -> ShapeBody {
        match shape_type {
            ShapeType::BigDecimal => ShapeBody::BigDecimal,
            ShapeType::BigInteger => ShapeBody::BigInteger,
            ShapeType::Blob => ShapeBody::Blob,
            ShapeType::Boolean => ShapeBody::Boolean,
            ShapeType::Byte => ShapeBody::Byte,
            ShapeType::Double => ShapeBody::Double,
            ShapeType::Document => ShapeBody::Document,
            ShapeType::Float => ShapeBody::Float,
            ShapeType::Integer => ShapeBody::Integer,
            ShapeType::Long => ShapeBody::Long,
            ShapeType::Short => ShapeBody::Short,
            ShapeType::String => ShapeBody::String,
            ShapeType::Timestamp => ShapeBody::Timestamp,
            ShapeType::Apply => ShapeBody::Apply,
            ShapeType::List => ShapeBody::List(CollectionShape {
                member: self.member,
            }),
            ShapeType::Set => ShapeBody::Set(CollectionShape {
                member: self.member,
            }),
            ShapeType::Map => ShapeBody::Map(MapShape {
                key: self.key,
                value: self.value,
            }),
            ShapeType::Structure => ShapeBody::Structure(StructureShape {
                members: self.members.unwrap_or_default(),
            }),
            ShapeType::Union => ShapeBody::Union(StructureShape {
                members: self.members.unwrap_or_default(),
            }),
            ShapeType::Service => ShapeBody::Service(ServiceShape {
                version: self.version,
                operations: self.operations.unwrap_or_default(),
                resources: self.resources.unwrap_or_default(),
                errors: self.errors.unwrap_or_default(),
                rename: self.rename.unwrap_or_default(),
            }),
            ShapeType::Resource => ShapeBody::Resource(ResourceShape {
                identifiers: self.identifiers.unwrap_or_default(),
                create: self.create,
                put: self.put,
                read: self.read,
                update: self.update,
                delete: self.delete,
                list: self.list,
                operations: self.operations.unwrap_or_default(),
                collection_operations: self.collection_operations.unwrap_or_default(),
                resources: self.resources.unwrap_or_default(),
            }),
            ShapeType::Operation => ShapeBody::Operation(OperationShape {
                input: self.input,
                output: self.output,
                errors: self.errors.unwrap_or_default(),
            }),
        }
    }
}

macro_rules! buffered_fields {
    ($($fn_name:ident: |$s:ident| $slot:ident = $decode:expr;)*) => {
        $(
            fn $fn_name(buf: &mut ShapeBuffer, $s: &mut Scanner<'_>) -> Result<()> {
                buf.$slot = Some($decode);
                Ok(())
            }
        )*
    };
}

buffered_fields! {
    read_member: |s| member = Member::decode(s)?;
    read_key: |s| key = Member::decode(s)?;
    read_value: |s| value = Member::decode(s)?;
    read_members: |s| members = decode_members(s)?;
    read_version: |s| version = StringNode::decode(s)?;
    read_operations: |s| operations = decode_list(s, "operations")?;
    read_resources: |s| resources = decode_list(s, "resources")?;
    read_errors: |s| errors = decode_list(s, "errors")?;
    read_rename: |s| rename = decode_id_map(s, "rename")?;
    read_identifiers: |s| identifiers = decode_map(s, "identifiers")?;
    read_create: |s| create = AbsShapeIdNode::decode(s)?;
    read_put: |s| put = AbsShapeIdNode::decode(s)?;
    read_read: |s| read = AbsShapeIdNode::decode(s)?;
    read_update: |s| update = AbsShapeIdNode::decode(s)?;
    read_delete: |s| delete = AbsShapeIdNode::decode(s)?;
    read_list: |s| list = AbsShapeIdNode::decode(s)?;
    read_collection_operations: |s| collection_operations = decode_list(s, "collection operations")?;
    read_input: |s| input = AbsShapeIdNode::decode(s)?;
    read_output: |s| output = AbsShapeIdNode::decode(s)?;
}

fn decode_members(s: &mut Scanner<'_>) -> Result<IndexMap<String, Member>> {
    let mut members = IndexMap::new();
    s.decode_object("structure/union members", |s, key, offset| {
        if !is_identifier(key) {
            return Err(AstError::Grammar {
                value: key.to_string(),
                offset,
                component: IdComponent::MemberName,
            });
        }
        members.insert(key.to_string(), Member::decode(s)?);
        Ok(())
    })?;
    Ok(members)
}

/// The type of a shape together with the payload that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeBody {
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
    List(CollectionShape),
    Set(CollectionShape),
    Map(MapShape),
    Structure(StructureShape),
    Union(StructureShape),
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
    Apply,
}

impl ShapeBody {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeBody::BigDecimal => ShapeType::BigDecimal,
            ShapeBody::BigInteger => ShapeType::BigInteger,
            ShapeBody::Blob => ShapeType::Blob,
            ShapeBody::Boolean => ShapeType::Boolean,
            ShapeBody::Byte => ShapeType::Byte,
            ShapeBody::Double => ShapeType::Double,
            ShapeBody::Document => ShapeType::Document,
            ShapeBody::Float => ShapeType::Float,
            ShapeBody::Integer => ShapeType::Integer,
            ShapeBody::Long => ShapeType::Long,
            ShapeBody::Short => ShapeType::Short,
            ShapeBody::String => ShapeType::String,
            ShapeBody::Timestamp => ShapeType::Timestamp,
            ShapeBody::List(_) => ShapeType::List,
            ShapeBody::Set(_) => ShapeType::Set,
            ShapeBody::Map(_) => ShapeType::Map,
            ShapeBody::Structure(_) => ShapeType::Structure,
            ShapeBody::Union(_) => ShapeType::Union,
            ShapeBody::Service(_) => ShapeType::Service,
            ShapeBody::Resource(_) => ShapeType::Resource,
            ShapeBody::Operation(_) => ShapeType::Operation,
            ShapeBody::Apply => ShapeType::Apply,
        }
    }

    fn encode_fields(&self, enc: &mut JsonEncoder) {
        match self {
            ShapeBody::List(c) | ShapeBody::Set(c) => c.encode_fields(enc),
            ShapeBody::Map(m) => m.encode_fields(enc),
            ShapeBody::Structure(s) | ShapeBody::Union(s) => s.encode_fields(enc),
            ShapeBody::Service(s) => s.encode_fields(enc),
            ShapeBody::Resource(r) => r.encode_fields(enc),
            ShapeBody::Operation(o) => o.encode_fields(enc),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub traits: TraitMap,
    pub body: ShapeBody,
    pub loc: Location,
}

impl Shape {
    pub fn new(body: ShapeBody) -> Self {
        Self {
            traits: TraitMap::default(),
            body,
            loc: Location::default(),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.body.shape_type()
    }

    /// Members of a structure or union.
    pub fn members(&self) -> Option<&IndexMap<String, Member>> {
        match &self.body {
            ShapeBody::Structure(s) | ShapeBody::Union(s) => Some(&s.members),
            _ => None,
        }
    }
}

impl Node for Shape {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let mut shape_type = None;
        let mut traits = TraitMap::default();
        let mut buf = ShapeBuffer::default();

        s.decode_object("shape", |s, key, offset| {
            match key {
                "type" => {
                    let (name, at) = s.read_string("string [shape type]")?;
                    match ShapeType::from_name(&name) {
                        Some(t) => shape_type = Some(t),
                        None => {
                            return Err(AstError::UnrecognizedType {
                                value: name,
                                offset: at,
                            })
                        }
                    }
                }
                "traits" => traits = TraitMap::decode(s)?,
                _ => match shape_field(key) {
                    Some(field) => buf.read(field, offset, s)?,
                    None => {
                        return Err(AstError::UnsupportedKey {
                            entity: "shape",
                            key: key.to_string(),
                            offset,
                        })
                    }
                },
            }
            Ok(())
        })?;

        let shape_type = shape_type.ok_or(AstError::MissingType { offset: start })?;
        buf.validate(shape_type)?;
        Ok(Shape {
            traits,
            body: buf.into_body(shape_type),
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.begin_object();
        enc.key("type");
        enc.write_str(self.shape_type().as_str());
        if !self.traits.is_empty() {
            enc.key("traits");
            self.traits.encode(enc);
        }
        self.body.encode_fields(enc);
        enc.end_object();
    }
}
