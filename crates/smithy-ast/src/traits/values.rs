//! Typed values for the structured traits of the `smithy.api` namespace.
//!
//! Each structure accepts only its documented keys; anything else is an
//! [`AstError::UnsupportedKey`]. Absent fields stay `None` so a decoded value
//! re-encodes with exactly the keys it was read with.

use indexmap::IndexMap;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, Result};
use crate::location::Location;
use crate::node::{
    decode_list, decode_map, encode_list, encode_map, BigDecimalNode, BoolNode, Int32Node,
    Int64Node, Node, OpaqueNode, StringNode,
};
use crate::scanner::Scanner;
use crate::shape_id::AbsShapeIdNode;

fn unsupported(entity: &'static str, key: &str, offset: usize) -> AstError {
    AstError::UnsupportedKey {
        entity,
        key: key.to_string(),
        offset,
    }
}

/// Anything that can fill one field of a trait structure.
trait FieldValue: Sized {
    fn decode_field(s: &mut Scanner<'_>, name: &str) -> Result<Self>;
    fn encode_field(&self, enc: &mut JsonEncoder);
}

impl<T: Node> FieldValue for Vec<T> {
    fn decode_field(s: &mut Scanner<'_>, name: &str) -> Result<Self> {
        decode_list(s, name)
    }

    fn encode_field(&self, enc: &mut JsonEncoder) {
        encode_list(enc, self);
    }
}

impl<T: Node> FieldValue for IndexMap<String, T> {
    fn decode_field(s: &mut Scanner<'_>, name: &str) -> Result<Self> {
        decode_map(s, name)
    }

    fn encode_field(&self, enc: &mut JsonEncoder) {
        encode_map(enc, self);
    }
}

macro_rules! node_fields {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn decode_field(s: &mut Scanner<'_>, _name: &str) -> Result<Self> {
                    <$ty as Node>::decode(s)
                }

                fn encode_field(&self, enc: &mut JsonEncoder) {
                    Node::encode(self, enc);
                }
            }
        )*
    };
}

node_fields!(
    StringNode,
    BoolNode,
    Int32Node,
    Int64Node,
    BigDecimalNode,
    OpaqueNode,
    AbsShapeIdNode,
    ExampleError,
);

// Declares a trait structure whose fields are all optional, with a decoder
// that rejects unknown keys and an encoder that writes fields in declaration
// order.
macro_rules! trait_structure {
    (
        $(#[$meta:meta])*
        $name:ident as $entity:literal {
            $($field:ident: $ty:ty = $key:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            $(pub $field: Option<$ty>,)+
            pub loc: Location,
        }

        impl Node for $name {
            fn location(&self) -> &Location {
                &self.loc
            }

            fn decode(s: &mut Scanner<'_>) -> Result<Self> {
                let start = s.next_offset();
                let mut out = Self {
                    loc: s.location(start),
                    ..Self::default()
                };
                s.decode_object($entity, |s, key, offset| {
                    match key {
                        $($key => out.$field = Some(<$ty as FieldValue>::decode_field(s, $key)?),)+
                        _ => return Err(unsupported($entity, key, offset)),
                    }
                    Ok(())
                })?;
                Ok(out)
            }

            fn encode(&self, enc: &mut JsonEncoder) {
                enc.begin_object();
                $(
                    if let Some(value) = &self.$field {
                        enc.key($key);
                        value.encode_field(enc);
                    }
                )+
                enc.end_object();
            }
        }
    };
}

/// A marker trait; its only legal value is `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationTrait {
    pub loc: Location,
}

impl Node for AnnotationTrait {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        s.decode_object("annotation trait", |_, key, offset| {
            Err(unsupported("annotation trait", key, offset))
        })?;
        Ok(Self {
            loc: s.location(start),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.begin_object();
        enc.end_object();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFault {
    Client,
    Server,
}

impl ErrorFault {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorFault::Client => "client",
            ErrorFault::Server => "server",
        }
    }
}

/// `smithy.api#error`: who is at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTrait {
    pub fault: ErrorFault,
    pub loc: Location,
}

impl Node for ErrorTrait {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (value, offset) = s.read_string("string [error fault]")?;
        let fault = match value.as_str() {
            "client" => ErrorFault::Client,
            "server" => ErrorFault::Server,
            _ => {
                return Err(AstError::InvalidValue {
                    offset,
                    expected: "\"client\" or \"server\"",
                })
            }
        };
        Ok(Self {
            fault,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_str(self.fault.as_str());
    }
}

trait_structure! {
    /// `smithy.api#length`: inclusive size bounds.
    LengthTrait as "length trait" {
        min: Int64Node = "min",
        max: Int64Node = "max",
    }
}

trait_structure! {
    /// `smithy.api#range`: inclusive numeric bounds, kept at full precision.
    RangeTrait as "range trait" {
        min: BigDecimalNode = "min",
        max: BigDecimalNode = "max",
    }
}

trait_structure! {
    IdRefTrait as "idRef trait" {
        fail_when_missing: BoolNode = "failWhenMissing",
        selector: StringNode = "selector",
        error_message: StringNode = "errorMessage",
    }
}

trait_structure! {
    DeprecatedTrait as "deprecated trait" {
        message: StringNode = "message",
        since: StringNode = "since",
    }
}

trait_structure! {
    RecommendedTrait as "recommended trait" {
        reason: StringNode = "reason",
    }
}

trait_structure! {
    ProtocolDefinitionTrait as "protocolDefinition trait" {
        traits: Vec<AbsShapeIdNode> = "traits",
        no_inline_document_support: BoolNode = "noInlineDocumentSupport",
    }
}

trait_structure! {
    AuthDefinitionTrait as "authDefinition trait" {
        traits: Vec<AbsShapeIdNode> = "traits",
    }
}

trait_structure! {
    PaginatedTrait as "paginated trait" {
        input_token: StringNode = "inputToken",
        output_token: StringNode = "outputToken",
        items: StringNode = "items",
        page_size: StringNode = "pageSize",
    }
}

trait_structure! {
    HttpTrait as "http trait" {
        method: StringNode = "method",
        uri: StringNode = "uri",
        code: Int32Node = "code",
    }
}

trait_structure! {
    CorsTrait as "cors trait" {
        origin: StringNode = "origin",
        max_age: Int32Node = "maxAge",
        additional_allowed_headers: Vec<StringNode> = "additionalAllowedHeaders",
        additional_exposed_headers: Vec<StringNode> = "additionalExposedHeaders",
    }
}

trait_structure! {
    XmlNamespaceTrait as "xmlNamespace trait" {
        uri: StringNode = "uri",
        prefix: StringNode = "prefix",
    }
}

trait_structure! {
    EndpointTrait as "endpoint trait" {
        host_prefix: StringNode = "hostPrefix",
    }
}

trait_structure! {
    RetryableTrait as "retryable trait" {
        throttling: BoolNode = "throttling",
    }
}

trait_structure! {
    HttpApiKeyAuthTrait as "httpApiKeyAuth trait" {
        name: StringNode = "name",
        in_: StringNode = "in",
        scheme: StringNode = "scheme",
    }
}

trait_structure! {
    /// `smithy.api#trait`: marks a shape as a trait definition.
    TraitDefinition as "trait definition" {
        selector: StringNode = "selector",
        structurally_exclusive: StringNode = "structurallyExclusive",
        conflicts: Vec<AbsShapeIdNode> = "conflicts",
    }
}

trait_structure! {
    /// One entry of `smithy.api#enum`.
    EnumDefinition as "enum definition" {
        value: StringNode = "value",
        name: StringNode = "name",
        documentation: StringNode = "documentation",
        tags: Vec<StringNode> = "tags",
        deprecated: BoolNode = "deprecated",
    }
}

trait_structure! {
    ExampleError as "example error" {
        shape_id: AbsShapeIdNode = "shapeId",
        content: OpaqueNode = "content",
    }
}

trait_structure! {
    /// One entry of `smithy.api#examples`.
    Example as "example" {
        title: StringNode = "title",
        documentation: StringNode = "documentation",
        input: OpaqueNode = "input",
        output: OpaqueNode = "output",
        error: ExampleError = "error",
    }
}

trait_structure! {
    /// One entry of `smithy.api#references`.
    Reference as "reference" {
        service: AbsShapeIdNode = "service",
        resource: AbsShapeIdNode = "resource",
        ids: IndexMap<String, StringNode> = "ids",
        rel: StringNode = "rel",
    }
}
