use std::borrow::Cow;

use smithy_ast::traits::{ids, TraitList};
use smithy_ast::{
    read_model, to_json_string, AbsShapeId, AstError, Model, StringNode, TraitMap, TraitValue,
};

const MODEL: &str = r#"{
    "version": "1.0",
    "shapes": {
        "ns#Target": {
            "type": "string",
            "traits": {"smithy.api#documentation": "A", "ns#custom": [1, 2]}
        },
        "ns#Bare": {"type": "integer"},
        "ns#Holder": {
            "type": "structure",
            "members": {
                "inherits": {"target": "ns#Target"},
                "adds": {"target": "ns#Target", "traits": {"smithy.api#since": "B"}},
                "overrides": {"target": "ns#Target", "traits": {"smithy.api#documentation": "C"}},
                "bare": {"target": "ns#Bare", "traits": {"smithy.api#required": {}}},
                "dangling": {"target": "ns#Missing"}
            }
        }
    }
}"#;

fn model() -> Model {
    read_model(MODEL.as_bytes()).expect("resolution model must decode")
}

fn text<'a>(traits: &'a TraitMap, id: &str) -> Option<&'a str> {
    traits.get(id).and_then(TraitValue::as_str)
}

#[test]
fn member_trait_resolution_matrix() {
    let model = model();
    let holder = model.shape("ns#Holder").expect("holder shape");
    let members = holder.members().expect("structure members");

    let inherits = members["inherits"].resolve_traits(&model).unwrap();
    assert!(matches!(inherits, Cow::Borrowed(_)));
    assert_eq!(inherits.len(), 2);
    assert_eq!(text(&inherits, ids::DOCUMENTATION), Some("A"));

    let adds = members["adds"].resolve_traits(&model).unwrap();
    assert_eq!(adds.len(), 3);
    assert_eq!(text(&adds, ids::DOCUMENTATION), Some("A"));
    assert_eq!(text(&adds, ids::SINCE), Some("B"));
    assert!(adds.contains("ns#custom"));

    let overrides = members["overrides"].resolve_traits(&model).unwrap();
    assert_eq!(overrides.len(), 2);
    assert_eq!(text(&overrides, ids::DOCUMENTATION), Some("C"));

    let bare = members["bare"].resolve_traits(&model).unwrap();
    assert!(matches!(bare, Cow::Borrowed(_)));
    assert!(bare.contains(ids::REQUIRED));

    match members["dangling"].resolve_traits(&model) {
        Err(AstError::DanglingReference { id }) => assert_eq!(id, "ns#Missing"),
        other => panic!("expected a dangling reference, got {other:?}"),
    }
}

#[test]
fn resolution_leaves_the_model_untouched() {
    let model = model();
    let before = model.clone();
    let holder = model.shape("ns#Holder").expect("holder shape");
    for member in holder.members().expect("structure members").values() {
        let _ = member.resolve_traits(&model);
    }
    assert_eq!(model, before);
    let target = model.shape("ns#Target").expect("target shape");
    assert_eq!(text(&target.traits, ids::DOCUMENTATION), Some("A"));
}

#[test]
fn trait_map_encoding_ignores_insertion_order() {
    let entries = [
        (ids::TAGS, TraitValue::StringList(TraitList::new(vec![StringNode::new("x")]))),
        (ids::DOCUMENTATION, TraitValue::String(StringNode::new("doc"))),
        ("a.z#last", TraitValue::String(StringNode::new("custom"))),
        (ids::BOX, TraitValue::Annotation(Default::default())),
    ];
    let forward: TraitMap = entries
        .iter()
        .map(|(id, v)| (AbsShapeId::parse(id).unwrap(), v.clone()))
        .collect();
    let backward: TraitMap = entries
        .iter()
        .rev()
        .map(|(id, v)| (AbsShapeId::parse(id).unwrap(), v.clone()))
        .collect();
    let encoded = to_json_string(&forward);
    assert_eq!(encoded, to_json_string(&backward));
    assert_eq!(
        encoded,
        r#"{"a.z#last":"custom","smithy.api#box":{},"smithy.api#documentation":"doc","smithy.api#tags":["x"]}"#
    );
}
