//! Identifiers of the traits defined in the `smithy.api` namespace.

// Constraint traits.
pub const ENUM: &str = "smithy.api#enum";
pub const ID_REF: &str = "smithy.api#idRef";
pub const LENGTH: &str = "smithy.api#length";
pub const PATTERN: &str = "smithy.api#pattern";
pub const PRIVATE: &str = "smithy.api#private";
pub const RANGE: &str = "smithy.api#range";
pub const REQUIRED: &str = "smithy.api#required";
pub const UNIQUE_ITEMS: &str = "smithy.api#uniqueItems";

// Documentation traits.
pub const DEPRECATED: &str = "smithy.api#deprecated";
pub const DOCUMENTATION: &str = "smithy.api#documentation";
pub const EXAMPLES: &str = "smithy.api#examples";
pub const EXTERNAL_DOCUMENTATION: &str = "smithy.api#externalDocumentation";
pub const INTERNAL: &str = "smithy.api#internal";
pub const RECOMMENDED: &str = "smithy.api#recommended";
pub const SENSITIVE: &str = "smithy.api#sensitive";
pub const SINCE: &str = "smithy.api#since";
pub const TAGS: &str = "smithy.api#tags";
pub const TITLE: &str = "smithy.api#title";
pub const UNSTABLE: &str = "smithy.api#unstable";

// Type refinement traits.
pub const BOX: &str = "smithy.api#box";
pub const ERROR: &str = "smithy.api#error";
pub const INPUT: &str = "smithy.api#input";
pub const OUTPUT: &str = "smithy.api#output";
pub const SPARSE: &str = "smithy.api#sparse";

// Model definition traits.
pub const TRAIT: &str = "smithy.api#trait";
pub const SUPPRESS: &str = "smithy.api#suppress";

// Protocol traits.
pub const PROTOCOL_DEFINITION: &str = "smithy.api#protocolDefinition";
pub const JSON_NAME: &str = "smithy.api#jsonName";
pub const MEDIA_TYPE: &str = "smithy.api#mediaType";
pub const TIMESTAMP_FORMAT: &str = "smithy.api#timestampFormat";

// Authentication traits.
pub const AUTH_DEFINITION: &str = "smithy.api#authDefinition";
pub const HTTP_BASIC_AUTH: &str = "smithy.api#httpBasicAuth";
pub const HTTP_DIGEST_AUTH: &str = "smithy.api#httpDigestAuth";
pub const HTTP_BEARER_AUTH: &str = "smithy.api#httpBearerAuth";
pub const HTTP_API_KEY_AUTH: &str = "smithy.api#httpApiKeyAuth";
pub const OPTIONAL_AUTH: &str = "smithy.api#optionalAuth";
pub const AUTH: &str = "smithy.api#auth";

// Behavior traits.
pub const IDEMPOTENCY_TOKEN: &str = "smithy.api#idempotencyToken";
pub const IDEMPOTENT: &str = "smithy.api#idempotent";
pub const READONLY: &str = "smithy.api#readonly";
pub const RETRYABLE: &str = "smithy.api#retryable";
pub const PAGINATED: &str = "smithy.api#paginated";
pub const HTTP_CHECKSUM_REQUIRED: &str = "smithy.api#httpChecksumRequired";

// Resource traits.
pub const NO_REPLACE: &str = "smithy.api#noReplace";
pub const REFERENCES: &str = "smithy.api#references";
pub const RESOURCE_IDENTIFIER: &str = "smithy.api#resourceIdentifier";

// Streaming traits.
pub const STREAMING: &str = "smithy.api#streaming";
pub const REQUIRES_LENGTH: &str = "smithy.api#requiresLength";
pub const EVENT_PAYLOAD: &str = "smithy.api#eventPayload";
pub const EVENT_HEADER: &str = "smithy.api#eventHeader";

// HTTP binding traits.
pub const HTTP: &str = "smithy.api#http";
pub const HTTP_ERROR: &str = "smithy.api#httpError";
pub const HTTP_HEADER: &str = "smithy.api#httpHeader";
pub const HTTP_LABEL: &str = "smithy.api#httpLabel";
pub const HTTP_PAYLOAD: &str = "smithy.api#httpPayload";
pub const HTTP_PREFIXED_HEADERS: &str = "smithy.api#httpPrefixedHeaders";
pub const HTTP_QUERY: &str = "smithy.api#httpQuery";
pub const HTTP_QUERY_PARAMS: &str = "smithy.api#httpQueryParams";
pub const HTTP_RESPONSE_CODE: &str = "smithy.api#httpResponseCode";
pub const CORS: &str = "smithy.api#cors";

// XML binding traits.
pub const XML_ATTRIBUTE: &str = "smithy.api#xmlAttribute";
pub const XML_FLATTENED: &str = "smithy.api#xmlFlattened";
pub const XML_NAME: &str = "smithy.api#xmlName";
pub const XML_NAMESPACE: &str = "smithy.api#xmlNamespace";

// Endpoint traits.
pub const ENDPOINT: &str = "smithy.api#endpoint";
pub const HOST_LABEL: &str = "smithy.api#hostLabel";
