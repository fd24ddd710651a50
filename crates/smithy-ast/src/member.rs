//! `Member`: a named slot of an aggregate shape.

use std::borrow::Cow;

use crate::encoder::JsonEncoder;
use crate::error::{AstError, Result};
use crate::location::Location;
use crate::model::Model;
use crate::node::Node;
use crate::scanner::Scanner;
use crate::shape_id::{AbsShapeId, AbsShapeIdNode};
use crate::traits::TraitMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Member {
    pub target: Option<AbsShapeIdNode>,
    pub traits: TraitMap,
    pub loc: Location,
}

impl Member {
    pub fn new(target: AbsShapeId) -> Self {
        Self {
            target: Some(AbsShapeIdNode::new(target)),
            ..Self::default()
        }
    }

    pub fn target_id(&self) -> Option<&AbsShapeId> {
        self.target.as_ref().map(|t| &t.value)
    }

    /// The traits in effect on this member: the target shape's traits with
    /// the member's own applied on top. Borrows whichever side is the whole
    /// answer and only allocates when both contribute.
    pub fn resolve_traits<'a>(&'a self, model: &'a Model) -> Result<Cow<'a, TraitMap>> {
        let target = self.target_id().ok_or(AstError::MissingTarget)?;
        let shape = model
            .shapes
            .get(target)
            .ok_or_else(|| AstError::DanglingReference {
                id: target.to_string(),
            })?;
        if self.traits.is_empty() {
            return Ok(Cow::Borrowed(&shape.traits));
        }
        if shape.traits.is_empty() {
            return Ok(Cow::Borrowed(&self.traits));
        }
        Ok(Cow::Owned(shape.traits.overridden_by(&self.traits)))
    }
}

impl Node for Member {
    fn location(&self) -> &Location {
        &self.loc
    }

    fn decode(s: &mut Scanner<'_>) -> Result<Self> {
        let start = s.next_offset();
        let mut member = Member {
            loc: s.location(start),
            ..Member::default()
        };
        s.decode_object("member", |s, key, offset| {
            match key {
                "target" => member.target = Some(AbsShapeIdNode::decode(s)?),
                "traits" => member.traits = TraitMap::decode(s)?,
                _ => {
                    return Err(AstError::UnsupportedKey {
                        entity: "member",
                        key: key.to_string(),
                        offset,
                    })
                }
            }
            Ok(())
        })?;
        Ok(member)
    }

    fn encode(&self, enc: &mut JsonEncoder) {
        enc.begin_object();
        if let Some(target) = &self.target {
            enc.key("target");
            target.encode(enc);
        }
        if !self.traits.is_empty() {
            enc.key("traits");
            self.traits.encode(enc);
        }
        enc.end_object();
    }
}
