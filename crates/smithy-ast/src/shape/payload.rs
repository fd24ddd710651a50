//! Per-type payloads of a shape.
//!
//! Payload fields sit directly in the shape's JSON object, so each payload
//! writes its keys into an object the caller has already opened.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::encoder::JsonEncoder;
use crate::member::Member;
use crate::node::{encode_id_map, encode_list, encode_map, Node, StringNode};
use crate::shape_id::{AbsShapeId, AbsShapeIdNode};

fn put<T: Node>(enc: &mut JsonEncoder, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        enc.key(key);
        value.encode(enc);
    }
}

fn put_list<T: Node>(enc: &mut JsonEncoder, key: &str, items: &[T]) {
    if !items.is_empty() {
        enc.key(key);
        encode_list(enc, items);
    }
}

/// Payload of `list` and `set` shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionShape {
    pub member: Option<Member>,
}

impl CollectionShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        put(enc, "member", &self.member);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapShape {
    pub key: Option<Member>,
    pub value: Option<Member>,
}

impl MapShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        put(enc, "key", &self.key);
        put(enc, "value", &self.value);
    }
}

/// Payload of `structure` and `union` shapes. Members keep source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureShape {
    pub members: IndexMap<String, Member>,
}

impl StructureShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        enc.key("members");
        encode_map(enc, &self.members);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceShape {
    pub version: Option<StringNode>,
    pub operations: Vec<AbsShapeIdNode>,
    pub resources: Vec<AbsShapeIdNode>,
    pub errors: Vec<AbsShapeIdNode>,
    pub rename: BTreeMap<AbsShapeId, StringNode>,
}

impl ServiceShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        put(enc, "version", &self.version);
        put_list(enc, "operations", &self.operations);
        put_list(enc, "resources", &self.resources);
        put_list(enc, "errors", &self.errors);
        if !self.rename.is_empty() {
            enc.key("rename");
            encode_id_map(enc, &self.rename);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceShape {
    pub identifiers: IndexMap<String, AbsShapeIdNode>,
    pub create: Option<AbsShapeIdNode>,
    pub put: Option<AbsShapeIdNode>,
    pub read: Option<AbsShapeIdNode>,
    pub update: Option<AbsShapeIdNode>,
    pub delete: Option<AbsShapeIdNode>,
    pub list: Option<AbsShapeIdNode>,
    pub operations: Vec<AbsShapeIdNode>,
    pub collection_operations: Vec<AbsShapeIdNode>,
    pub resources: Vec<AbsShapeIdNode>,
}

impl ResourceShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        if !self.identifiers.is_empty() {
            enc.key("identifiers");
            encode_map(enc, &self.identifiers);
        }
        put(enc, "create", &self.create);
        put(enc, "put", &self.put);
        put(enc, "read", &self.read);
        put(enc, "update", &self.update);
        put(enc, "delete", &self.delete);
        put(enc, "list", &self.list);
        put_list(enc, "operations", &self.operations);
        put_list(enc, "collectionOperations", &self.collection_operations);
        put_list(enc, "resources", &self.resources);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationShape {
    pub input: Option<AbsShapeIdNode>,
    pub output: Option<AbsShapeIdNode>,
    pub errors: Vec<AbsShapeIdNode>,
}

impl OperationShape {
    pub(crate) fn encode_fields(&self, enc: &mut JsonEncoder) {
        put(enc, "input", &self.input);
        put(enc, "output", &self.output);
        put_list(enc, "errors", &self.errors);
    }
}
