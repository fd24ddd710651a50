//! Absolute shape identifiers: `namespace#Name` and `namespace#Name$member`.
//!
//! ```text
//! AbsShapeId = Namespace "#" Identifier [ "$" Identifier ]
//! Namespace  = Identifier *( "." Identifier )
//! Identifier = [A-Za-z_][A-Za-z0-9_]*
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, IdComponent, Result};
use crate::location::Location;
use crate::node::Node;
use crate::scanner::Scanner;

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles"))
}

/// True when `s` is exactly one identifier.
pub fn is_identifier(s: &str) -> bool {
    identifier_regex().is_match(s)
}

/// A validated absolute shape identifier.
///
/// The only way to build one is through the grammar check, so every value of
/// this type is well-formed. Ordering is byte-wise on the full text.
#[derive(Debug, Clone)]
pub struct AbsShapeId {
    text: String,
    hash: usize,
    dollar: Option<usize>,
}

// Equality, ordering and hashing look at the text only, matching `str` so
// maps keyed by `AbsShapeId` can be queried with `&str`.
impl PartialEq for AbsShapeId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for AbsShapeId {}

impl PartialOrd for AbsShapeId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AbsShapeId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl std::hash::Hash for AbsShapeId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl AbsShapeId {
    pub fn parse(s: &str) -> std::result::Result<Self, IdComponent> {
        let hash = s.find('#').ok_or(IdComponent::Namespace)?;
        let namespace = &s[..hash];
        if namespace.is_empty() || !namespace.split('.').all(is_identifier) {
            return Err(IdComponent::Namespace);
        }
        let rest = &s[hash + 1..];
        let (name, member) = match rest.find('$') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        if !is_identifier(name) {
            return Err(IdComponent::ShapeName);
        }
        if let Some(member) = member {
            if !is_identifier(member) {
                return Err(IdComponent::MemberName);
            }
        }
        Ok(Self {
            text: s.to_string(),
            hash,
            dollar: member.map(|_| hash + 1 + name.len()),
        })
    }

    /// Parses text found at `offset` in a document.
    pub(crate) fn parse_at(s: &str, offset: usize) -> Result<Self> {
        Self::parse(s).map_err(|component| AstError::Grammar {
            value: s.to_string(),
            offset,
            component,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn namespace(&self) -> &str {
        &self.text[..self.hash]
    }

    pub fn name(&self) -> &str {
        match self.dollar {
            Some(d) => &self.text[self.hash + 1..d],
            None => &self.text[self.hash + 1..],
        }
    }

    /// The member segment, if this identifies a member.
    pub fn member(&self) -> Option<&str> {
        self.dollar.map(|d| &self.text[d + 1..])
    }

    /// The identifier of the enclosing shape (drops any member segment).
    pub fn root(&self) -> AbsShapeId {
        match self.dollar {
            Some(d) => Self {
                text: self.text[..d].to_string(),
                hash: self.hash,
                dollar: None,
            },
            None => self.clone(),
        }
    }

    /// The identifier of member `member` of this shape.
    pub fn with_member(&self, member: &str) -> std::result::Result<AbsShapeId, IdComponent> {
        if !is_identifier(member) {
            return Err(IdComponent::MemberName);
        }
        let root = self.root();
        Ok(Self {
            dollar: Some(root.text.len()),
            text: format!("{}${}", root.text, member),
            hash: root.hash,
        })
    }
}

impl fmt::Display for AbsShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for AbsShapeId {
    type Err = IdComponent;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AbsShapeId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::borrow::Borrow<str> for AbsShapeId {
    fn borrow(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsShapeIdNode {
    pub value: AbsShapeId,
    pub loc: Location,
}

impl AbsShapeIdNode {
    pub fn new(value: AbsShapeId) -> Self {
        Self {
            value,
            loc: Location::default(),
        }
    }
}

impl Node for AbsShapeIdNode {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let (text, offset) = s.read_string("string [absolute shape ID]")?;
        Ok(Self {
            value: AbsShapeId::parse_at(&text, offset)?,
            loc: s.location(offset),
        })
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.write_str(self.value.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::from_json_str;
    use proptest::prelude::*;

    #[test]
    fn shape_id_parts() {
        let id = AbsShapeId::parse("com.foo#Bar").unwrap();
        assert_eq!(id.namespace(), "com.foo");
        assert_eq!(id.name(), "Bar");
        assert_eq!(id.member(), None);

        let id = AbsShapeId::parse("com.foo#Bar$baz").unwrap();
        assert_eq!(id.namespace(), "com.foo");
        assert_eq!(id.name(), "Bar");
        assert_eq!(id.member(), Some("baz"));
        assert_eq!(id.root().as_str(), "com.foo#Bar");
    }

    #[test]
    fn grammar_failures_name_the_component() {
        let cases = [
            ("com.foo#", IdComponent::ShapeName),
            ("#Bar", IdComponent::Namespace),
            ("com.foo", IdComponent::Namespace),
            ("com..foo#Bar", IdComponent::Namespace),
            ("com.1foo#Bar", IdComponent::Namespace),
            ("com.foo#Bar#Baz", IdComponent::ShapeName),
            ("com.foo#Bar-x", IdComponent::ShapeName),
            ("com.foo#Bar$", IdComponent::MemberName),
            ("com.foo#Bar$a$b", IdComponent::MemberName),
            ("com.foo #Bar", IdComponent::Namespace),
        ];
        for (input, component) in cases {
            assert_eq!(AbsShapeId::parse(input), Err(component), "{input}");
        }
    }

    #[test]
    fn with_member_builds_member_ids() {
        let id = AbsShapeId::parse("ns#Shape").unwrap();
        let m = id.with_member("field").unwrap();
        assert_eq!(m.as_str(), "ns#Shape$field");
        assert_eq!(m.member(), Some("field"));
        assert_eq!(m.name(), "Shape");
        assert_eq!(m, AbsShapeId::parse("ns#Shape$field").unwrap());
        assert_eq!(id.with_member("9"), Err(IdComponent::MemberName));
    }

    #[test]
    fn ordering_is_bytewise() {
        let mut ids: Vec<AbsShapeId> = ["b#A", "a#Z", "a#B", "A#a"]
            .into_iter()
            .map(|s| AbsShapeId::parse(s).unwrap())
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, vec!["A#a", "a#B", "a#Z", "b#A"]);
    }

    #[test]
    fn node_decode() {
        let n: AbsShapeIdNode = from_json_str(r#""smithy.api#String""#).unwrap();
        assert_eq!(n.value.name(), "String");

        let err = from_json_str::<AbsShapeIdNode>(r##" "#Bar""##).unwrap_err();
        assert!(matches!(
            err,
            AstError::Grammar {
                offset: 1,
                component: IdComponent::Namespace,
                ..
            }
        ));

        let err = from_json_str::<AbsShapeIdNode>("12").unwrap_err();
        assert!(matches!(err, AstError::TypeMismatch { .. }));
    }

    proptest! {
        #[test]
        fn well_formed_ids_parse(
            ns in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..4),
            name in "[A-Za-z_][A-Za-z0-9_]{0,8}",
            member in prop::option::of("[A-Za-z_][A-Za-z0-9_]{0,8}"),
        ) {
            let namespace = ns.join(".");
            let mut text = format!("{namespace}#{name}");
            if let Some(m) = &member {
                text.push('$');
                text.push_str(m);
            }
            let id = AbsShapeId::parse(&text).unwrap();
            prop_assert_eq!(id.namespace(), namespace.as_str());
            prop_assert_eq!(id.name(), name.as_str());
            prop_assert_eq!(id.member(), member.as_deref());
            prop_assert_eq!(id.as_str(), text.as_str());
        }

        #[test]
        fn names_with_foreign_characters_are_rejected(
            head in "[A-Za-z_]{1,4}",
            bad in "[-!@%^&*() +=/]",
            tail in "[A-Za-z0-9_]{0,4}",
        ) {
            let name = format!("{head}{bad}{tail}");
            prop_assert!(!is_identifier(&name));
            prop_assert_eq!(
                AbsShapeId::parse(&format!("ns#{name}")),
                Err(IdComponent::ShapeName)
            );
        }
    }
}
