//! Trait applications.
//!
//! Well-known `smithy.api` traits decode into typed values through a static
//! registry keyed by trait identifier. Any other trait is kept verbatim as a
//! document, so unknown traits survive a round trip byte for byte.
//! [`TraitMap`] is the map every shape and member carries; it always encodes
//! in identifier order.

pub mod ids;
mod values;

use std::collections::{btree_map, BTreeMap, HashMap};
use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::trace;

use crate::encoder::JsonEncoder;
use crate::error::Result;
use crate::location::Location;
use crate::node::{decode_list, decode_map, encode_list, encode_map, Int32Node, Node, OpaqueNode, StringNode};
use crate::scanner::Scanner;
use crate::shape_id::{AbsShapeId, AbsShapeIdNode};

pub use values::{
    AnnotationTrait, AuthDefinitionTrait, CorsTrait, DeprecatedTrait, EndpointTrait, EnumDefinition,
    ErrorFault, ErrorTrait, Example, ExampleError, HttpApiKeyAuthTrait, HttpTrait, IdRefTrait,
    LengthTrait, PaginatedTrait, ProtocolDefinitionTrait, RangeTrait, RecommendedTrait, Reference,
    RetryableTrait, TraitDefinition, XmlNamespaceTrait,
};

/// A list-valued trait such as `smithy.api#tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitList<T> {
    pub items: Vec<T>,
    pub loc: Location,
}

impl<T> TraitList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            loc: Location::default(),
        }
    }
}

impl<T: Node> Node for TraitList<T> {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let items = decode_list(s, "list trait")?;
        Ok(Self {
            items,
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        encode_list(enc, &self.items);
    }
}

/// `smithy.api#externalDocumentation`: names to URLs, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringMapTrait {
    pub entries: IndexMap<String, StringNode>,
    pub loc: Location,
}

impl Node for StringMapTrait {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let entries = decode_map(s, "map trait")?;
        Ok(Self {
            entries,
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        encode_map(enc, &self.entries);
    }
}

/// The value type a registered trait decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitKind {
    Annotation,
    String,
    Integer,
    Error,
    Length,
    Range,
    IdRef,
    Deprecated,
    Recommended,
    ProtocolDefinition,
    AuthDefinition,
    Paginated,
    Http,
    Cors,
    XmlNamespace,
    Endpoint,
    Retryable,
    HttpApiKeyAuth,
    TraitDefinition,
    Enum,
    Examples,
    StringList,
    ShapeIdList,
    References,
    StringMap,
}

fn registry() -> &'static HashMap<&'static str, TraitKind> {
    static REGISTRY: OnceLock<HashMap<&'static str, TraitKind>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        use TraitKind as K;
        HashMap::from([
            (ids::ENUM, K::Enum),
            (ids::ID_REF, K::IdRef),
            (ids::LENGTH, K::Length),
            (ids::PATTERN, K::String),
            (ids::PRIVATE, K::Annotation),
            (ids::RANGE, K::Range),
            (ids::REQUIRED, K::Annotation),
            (ids::UNIQUE_ITEMS, K::Annotation),
            (ids::DEPRECATED, K::Deprecated),
            (ids::DOCUMENTATION, K::String),
            (ids::EXAMPLES, K::Examples),
            (ids::EXTERNAL_DOCUMENTATION, K::StringMap),
            (ids::INTERNAL, K::Annotation),
            (ids::RECOMMENDED, K::Recommended),
            (ids::SENSITIVE, K::Annotation),
            (ids::SINCE, K::String),
            (ids::TAGS, K::StringList),
            (ids::TITLE, K::String),
            (ids::UNSTABLE, K::Annotation),
            (ids::BOX, K::Annotation),
            (ids::ERROR, K::Error),
            (ids::INPUT, K::Annotation),
            (ids::OUTPUT, K::Annotation),
            (ids::SPARSE, K::Annotation),
            (ids::TRAIT, K::TraitDefinition),
            (ids::SUPPRESS, K::StringList),
            (ids::PROTOCOL_DEFINITION, K::ProtocolDefinition),
            (ids::JSON_NAME, K::String),
            (ids::MEDIA_TYPE, K::String),
            (ids::TIMESTAMP_FORMAT, K::String),
            (ids::AUTH_DEFINITION, K::AuthDefinition),
            (ids::HTTP_BASIC_AUTH, K::Annotation),
            (ids::HTTP_DIGEST_AUTH, K::Annotation),
            (ids::HTTP_BEARER_AUTH, K::Annotation),
            (ids::HTTP_API_KEY_AUTH, K::HttpApiKeyAuth),
            (ids::OPTIONAL_AUTH, K::Annotation),
            (ids::AUTH, K::ShapeIdList),
            (ids::IDEMPOTENCY_TOKEN, K::Annotation),
            (ids::IDEMPOTENT, K::Annotation),
            (ids::READONLY, K::Annotation),
            (ids::RETRYABLE, K::Retryable),
            (ids::PAGINATED, K::Paginated),
            (ids::HTTP_CHECKSUM_REQUIRED, K::Annotation),
            (ids::NO_REPLACE, K::Annotation),
            (ids::REFERENCES, K::References),
            (ids::RESOURCE_IDENTIFIER, K::String),
            (ids::STREAMING, K::Annotation),
            (ids::REQUIRES_LENGTH, K::Annotation),
            (ids::EVENT_PAYLOAD, K::Annotation),
            (ids::EVENT_HEADER, K::Annotation),
            (ids::HTTP, K::Http),
            (ids::HTTP_ERROR, K::Integer),
            (ids::HTTP_HEADER, K::String),
            (ids::HTTP_LABEL, K::Annotation),
            (ids::HTTP_PAYLOAD, K::Annotation),
            (ids::HTTP_PREFIXED_HEADERS, K::String),
            (ids::HTTP_QUERY, K::String),
            (ids::HTTP_QUERY_PARAMS, K::Annotation),
            (ids::HTTP_RESPONSE_CODE, K::Annotation),
            (ids::CORS, K::Cors),
            (ids::XML_ATTRIBUTE, K::Annotation),
            (ids::XML_FLATTENED, K::Annotation),
            (ids::XML_NAME, K::String),
            (ids::XML_NAMESPACE, K::XmlNamespace),
            (ids::ENDPOINT, K::Endpoint),
            (ids::HOST_LABEL, K::Annotation),
        ])
    })
}

impl TraitKind {
    /// Looks up a registered trait; `None` for traits kept as documents.
    pub fn of(id: &str) -> Option<TraitKind> {
        registry().get(id).copied()
    }

    pub fn decode(self, s: &mut Scanner<'_>) -> Result<TraitValue> {
        Ok(match self {
            TraitKind::Annotation => TraitValue::Annotation(Node::decode(s)?),
            TraitKind::String => TraitValue::String(Node::decode(s)?),
            TraitKind::Integer => TraitValue::Integer(Node::decode(s)?),
            TraitKind::Error => TraitValue::Error(Node::decode(s)?),
            TraitKind::Length => TraitValue::Length(Node::decode(s)?),
            TraitKind::Range => TraitValue::Range(Node::decode(s)?),
            TraitKind::IdRef => TraitValue::IdRef(Node::decode(s)?),
            TraitKind::Deprecated => TraitValue::Deprecated(Node::decode(s)?),
            TraitKind::Recommended => TraitValue::Recommended(Node::decode(s)?),
            TraitKind::ProtocolDefinition => TraitValue::ProtocolDefinition(Node::decode(s)?),
            TraitKind::AuthDefinition => TraitValue::AuthDefinition(Node::decode(s)?),
            TraitKind::Paginated => TraitValue::Paginated(Node::decode(s)?),
            TraitKind::Http => TraitValue::Http(Node::decode(s)?),
            TraitKind::Cors => TraitValue::Cors(Node::decode(s)?),
            TraitKind::XmlNamespace => TraitValue::XmlNamespace(Node::decode(s)?),
            TraitKind::Endpoint => TraitValue::Endpoint(Node::decode(s)?),
            TraitKind::Retryable => TraitValue::Retryable(Node::decode(s)?),
            TraitKind::HttpApiKeyAuth => TraitValue::HttpApiKeyAuth(Node::decode(s)?),
            TraitKind::TraitDefinition => TraitValue::TraitDefinition(Node::decode(s)?),
            TraitKind::Enum => TraitValue::Enum(Node::decode(s)?),
            TraitKind::Examples => TraitValue::Examples(Node::decode(s)?),
            TraitKind::StringList => TraitValue::StringList(Node::decode(s)?),
            TraitKind::ShapeIdList => TraitValue::ShapeIdList(Node::decode(s)?),
            TraitKind::References => TraitValue::References(Node::decode(s)?),
            TraitKind::StringMap => TraitValue::StringMap(Node::decode(s)?),
        })
    }
}

/// The value of one trait application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitValue {
    Annotation(AnnotationTrait),
    String(StringNode),
    Integer(Int32Node),
    Error(ErrorTrait),
    Length(LengthTrait),
    Range(RangeTrait),
    IdRef(IdRefTrait),
    Deprecated(DeprecatedTrait),
    Recommended(RecommendedTrait),
    ProtocolDefinition(ProtocolDefinitionTrait),
    AuthDefinition(AuthDefinitionTrait),
    Paginated(PaginatedTrait),
    Http(HttpTrait),
    Cors(CorsTrait),
    XmlNamespace(XmlNamespaceTrait),
    Endpoint(EndpointTrait),
    Retryable(RetryableTrait),
    HttpApiKeyAuth(HttpApiKeyAuthTrait),
    TraitDefinition(TraitDefinition),
    Enum(TraitList<EnumDefinition>),
    Examples(TraitList<Example>),
    StringList(TraitList<StringNode>),
    ShapeIdList(TraitList<AbsShapeIdNode>),
    References(TraitList<Reference>),
    StringMap(StringMapTrait),
    /// A trait outside the registry, kept as written.
    Document(OpaqueNode),
}

macro_rules! each_value {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            TraitValue::Annotation($v) => $body,
            TraitValue::String($v) => $body,
            TraitValue::Integer($v) => $body,
            TraitValue::Error($v) => $body,
            TraitValue::Length($v) => $body,
            TraitValue::Range($v) => $body,
            TraitValue::IdRef($v) => $body,
            TraitValue::Deprecated($v) => $body,
            TraitValue::Recommended($v) => $body,
            TraitValue::ProtocolDefinition($v) => $body,
            TraitValue::AuthDefinition($v) => $body,
            TraitValue::Paginated($v) => $body,
            TraitValue::Http($v) => $body,
            TraitValue::Cors($v) => $body,
            TraitValue::XmlNamespace($v) => $body,
            TraitValue::Endpoint($v) => $body,
            TraitValue::Retryable($v) => $body,
            TraitValue::HttpApiKeyAuth($v) => $body,
            TraitValue::TraitDefinition($v) => $body,
            TraitValue::Enum($v) => $body,
            TraitValue::Examples($v) => $body,
            TraitValue::StringList($v) => $body,
            TraitValue::ShapeIdList($v) => $body,
            TraitValue::References($v) => $body,
            TraitValue::StringMap($v) => $body,
            TraitValue::Document($v) => $body,
        }
    };
}

impl TraitValue {
    pub fn location(&self) -> &Location {
        each_value!(self, v => v.location())
    }

    pub fn encode(&self, enc: &mut JsonEncoder) {
        each_value!(self, v => v.encode(enc))
    }

    /// The text of a string-valued trait such as `documentation`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TraitValue::String(node) => Some(&node.value),
            _ => None,
        }
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, TraitValue::Annotation(_))
    }
}

/// Trait applications keyed by trait identifier, iterated and encoded in
/// identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitMap {
    entries: BTreeMap<AbsShapeId, TraitValue>,
    pub loc: Location,
}

impl TraitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&TraitValue> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: AbsShapeId, value: TraitValue) -> Option<TraitValue> {
        self.entries.insert(id, value)
    }

    pub fn remove(&mut self, id: &str) -> Option<TraitValue> {
        self.entries.remove(id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AbsShapeId, TraitValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A copy of `self` with every entry of `overrides` applied on top.
    pub fn overridden_by(&self, overrides: &TraitMap) -> TraitMap {
        let mut merged = self.clone();
        for (id, value) in overrides {
            merged.entries.insert(id.clone(), value.clone());
        }
        merged
    }
}

impl<'a> IntoIterator for &'a TraitMap {
    type Item = (&'a AbsShapeId, &'a TraitValue);
    type IntoIter = btree_map::Iter<'a, AbsShapeId, TraitValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(AbsShapeId, TraitValue)> for TraitMap {
    fn from_iter<I: IntoIterator<Item = (AbsShapeId, TraitValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            loc: Location::default(),
        }
    }
}

impl Node for TraitMap {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let mut entries = BTreeMap::new();
        s.decode_object("traits map", |s, key, offset| {
            let id = AbsShapeId::parse_at(key, offset)?;
            let value = match TraitKind::of(id.as_str()) {
                Some(kind) => kind.decode(s)?,
                None => {
                    trace!(trait_id = %id, "keeping unregistered trait as a document");
                    TraitValue::Document(OpaqueNode::decode(s)?)
                }
            };
            entries.insert(id, value);
            Ok(())
        })?;
        Ok(Self {
            entries,
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.begin_object();
        for (id, value) in &self.entries {
            enc.key(id.as_str());
            value.encode(enc);
        }
        enc.end_object();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AstError;
    use crate::node::{from_json_str, to_json_string};
    use proptest::prelude::*;

    #[test]
    fn registered_traits_decode_typed() {
        let text = r#"{
            "smithy.api#documentation": "Hello",
            "smithy.api#required": {},
            "smithy.api#length": {"min": 1},
            "smithy.api#tags": ["a", "b"],
            "smithy.api#httpError": 404,
            "smithy.api#error": "server",
            "smithy.api#auth": ["smithy.api#httpBasicAuth"],
            "smithy.api#externalDocumentation": {"Home": "https://example.com"}
        }"#;
        let traits: TraitMap = from_json_str(text).unwrap();
        assert_eq!(traits.len(), 8);
        assert_eq!(traits.get(ids::DOCUMENTATION).and_then(TraitValue::as_str), Some("Hello"));
        assert!(traits.get(ids::REQUIRED).unwrap().is_annotation());
        assert!(matches!(traits.get(ids::LENGTH), Some(TraitValue::Length(_))));
        assert!(matches!(traits.get(ids::HTTP_ERROR), Some(TraitValue::Integer(n)) if n.value == 404));
        assert!(matches!(
            traits.get(ids::ERROR),
            Some(TraitValue::Error(ErrorTrait { fault: ErrorFault::Server, .. }))
        ));
        match traits.get(ids::TAGS) {
            Some(TraitValue::StringList(list)) => assert_eq!(list.items.len(), 2),
            other => panic!("unexpected tags value: {other:?}"),
        }
        assert!(matches!(traits.get(ids::AUTH), Some(TraitValue::ShapeIdList(_))));
        assert!(matches!(traits.get(ids::EXTERNAL_DOCUMENTATION), Some(TraitValue::StringMap(_))));
    }

    #[test]
    fn encodes_in_identifier_order() {
        let traits: TraitMap =
            from_json_str(r#"{"smithy.api#sensitive":{},"a.b#z":1,"smithy.api#box":{}}"#).unwrap();
        assert_eq!(
            to_json_string(&traits),
            r#"{"a.b#z":1,"smithy.api#box":{},"smithy.api#sensitive":{}}"#
        );
    }

    #[test]
    fn unknown_traits_round_trip_verbatim() {
        let text = r#"{"com.example#custom":{"z":[1,2.50,{"q":null}],"a":"x"}}"#;
        let traits: TraitMap = from_json_str(text).unwrap();
        assert!(matches!(traits.get("com.example#custom"), Some(TraitValue::Document(_))));
        assert_eq!(to_json_string(&traits), text);
    }

    #[test]
    fn trait_keys_must_be_shape_ids() {
        let err = from_json_str::<TraitMap>(r#"{"documentation":"x"}"#).unwrap_err();
        assert!(matches!(err, AstError::Grammar { offset: 1, .. }));
    }

    #[test]
    fn registered_values_are_checked() {
        let err = from_json_str::<TraitMap>(r#"{"smithy.api#required":true}"#).unwrap_err();
        assert!(matches!(err, AstError::Syntax { offset: 23, .. }));

        let err = from_json_str::<TraitMap>(r#"{"smithy.api#httpError":4e2}"#).unwrap_err();
        assert!(matches!(err, AstError::InvalidValue { offset: 24, .. }));

        let err = from_json_str::<TraitMap>(r#"{"smithy.api#documentation":1}"#).unwrap_err();
        assert!(matches!(err, AstError::TypeMismatch { offset: 28, .. }));
    }

    #[test]
    fn every_registered_id_is_well_formed() {
        for id in registry().keys() {
            let parsed = AbsShapeId::parse(id).unwrap();
            assert_eq!(parsed.namespace(), "smithy.api");
        }
        assert_eq!(TraitKind::of(ids::PAGINATED), Some(TraitKind::Paginated));
        assert_eq!(TraitKind::of("smithy.api#nope"), None);
    }

    #[test]
    fn overrides_replace_inherited_values() {
        let base: TraitMap = from_json_str(
            r#"{"smithy.api#documentation":"target","smithy.api#sensitive":{}}"#,
        )
        .unwrap();
        let member: TraitMap = from_json_str(r#"{"smithy.api#documentation":"member"}"#).unwrap();
        let merged = base.overridden_by(&member);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(ids::DOCUMENTATION).and_then(TraitValue::as_str), Some("member"));
        assert!(merged.contains(ids::SENSITIVE));
    }

    fn document_traits<'a>(entries: impl IntoIterator<Item = &'a (String, String)>) -> TraitMap {
        let mut traits = TraitMap::new();
        for (name, doc) in entries {
            let id = AbsShapeId::parse(&format!("test.ns#{name}")).unwrap();
            traits.insert(id, TraitValue::Document(OpaqueNode::new(doc.as_str())));
        }
        traits
    }

    proptest! {
        #[test]
        fn encoding_ignores_insertion_order(
            (sorted, shuffled) in prop::collection::btree_map("[a-z]{1,6}", "[ -~]{0,12}", 0..8)
                .prop_flat_map(|docs| {
                    let entries: Vec<(String, String)> = docs.into_iter().collect();
                    (Just(entries.clone()), Just(entries).prop_shuffle())
                })
        ) {
            let from_sorted = document_traits(&sorted);
            let from_shuffled = document_traits(&shuffled);
            let from_reversed = document_traits(shuffled.iter().rev());
            let first = to_json_string(&from_shuffled);
            prop_assert_eq!(&to_json_string(&from_sorted), &first);
            prop_assert_eq!(&to_json_string(&from_reversed), &first);

            // Source order in the document does not leak into the encoding.
            let mut enc = JsonEncoder::new();
            enc.begin_object();
            for (name, doc) in &shuffled {
                enc.key(&format!("test.ns#{name}"));
                enc.write_str(doc);
            }
            enc.end_object();
            let text = String::from_utf8(enc.into_bytes()).unwrap();
            let decoded: TraitMap = from_json_str(&text).unwrap();
            prop_assert_eq!(&decoded, &from_sorted);
            prop_assert_eq!(to_json_string(&decoded), first);

            let keys: Vec<String> = decoded.iter().map(|(id, _)| id.to_string()).collect();
            let mut ordered = keys.clone();
            ordered.sort();
            prop_assert_eq!(keys, ordered);
        }
    }
}
