use smithy_ast::shape::{ShapeField, SHAPE_FIELDS};
use smithy_ast::{from_json_str, to_json_string, AstError, Shape, ShapeType};

fn sample_value(field: &ShapeField) -> &'static str {
    match field.name {
        "member" | "key" | "value" => r#"{"target":"ns#T"}"#,
        "members" | "rename" | "identifiers" => "{}",
        "version" => r#""2024-01-01""#,
        "operations" | "resources" | "errors" | "collectionOperations" => "[]",
        _ => r#""ns#Op""#,
    }
}

fn legal_fields(shape_type: ShapeType) -> Vec<&'static str> {
    SHAPE_FIELDS
        .iter()
        .filter(|f| f.allows(shape_type))
        .map(|f| f.name)
        .collect()
}

#[test]
fn legal_field_sets_per_type() {
    let resource = vec![
        "operations",
        "resources",
        "identifiers",
        "create",
        "put",
        "read",
        "update",
        "delete",
        "list",
        "collectionOperations",
    ];
    let cases: Vec<(ShapeType, Vec<&str>)> = vec![
        (ShapeType::List, vec!["member"]),
        (ShapeType::Set, vec!["member"]),
        (ShapeType::Map, vec!["key", "value"]),
        (ShapeType::Structure, vec!["members"]),
        (ShapeType::Union, vec!["members"]),
        (
            ShapeType::Service,
            vec!["version", "operations", "resources", "errors", "rename"],
        ),
        (ShapeType::Resource, resource),
        (ShapeType::Operation, vec!["errors", "input", "output"]),
        (ShapeType::Apply, vec![]),
    ];
    for (shape_type, expected) in cases {
        assert_eq!(legal_fields(shape_type), expected, "{shape_type}");
    }
    for shape_type in ShapeType::ALL.into_iter().filter(|t| t.is_simple()) {
        assert!(legal_fields(shape_type).is_empty(), "{shape_type}");
    }
}

#[test]
fn every_field_is_accepted_exactly_for_its_legal_types() {
    for field in SHAPE_FIELDS {
        let value = sample_value(field);
        for shape_type in ShapeType::ALL {
            let payload_first = format!(r#"{{"{}":{},"type":"{}"}}"#, field.name, value, shape_type);
            let type_first = format!(r#"{{"type":"{}","{}":{}}}"#, shape_type, field.name, value);
            for text in [payload_first, type_first] {
                let result = from_json_str::<Shape>(&text);
                if field.allows(shape_type) {
                    let shape = result.unwrap_or_else(|e| panic!("{text} must decode: {e}"));
                    assert_eq!(shape.shape_type(), shape_type, "{text}");
                } else {
                    match result {
                        Err(AstError::FieldNotAllowedForType {
                            field: name,
                            shape_type: t,
                            ..
                        }) => {
                            assert_eq!(name, field.name, "{text}");
                            assert_eq!(t, shape_type, "{text}");
                        }
                        other => panic!("{text}: expected FieldNotAllowedForType, got {other:?}"),
                    }
                }
            }
        }
    }
}

#[test]
fn first_illegal_field_in_source_order_is_reported() {
    let err = from_json_str::<Shape>(r#"{"input":"ns#I","key":{"target":"ns#K"},"type":"list"}"#)
        .expect_err("list shapes cannot carry input or key");
    assert!(matches!(
        err,
        AstError::FieldNotAllowedForType {
            field: "input",
            shape_type: ShapeType::List,
            offset: 1
        }
    ));
}

#[test]
fn non_empty_payloads_re_encode_in_field_order() {
    let cases = [
        (
            r#"{"value":{"target":"ns#V"},"type":"map","key":{"target":"ns#K"}}"#,
            r#"{"type":"map","key":{"target":"ns#K"},"value":{"target":"ns#V"}}"#,
        ),
        (
            r#"{"errors":["ns#E"],"output":"ns#O","type":"operation","input":"ns#I"}"#,
            r#"{"type":"operation","input":"ns#I","output":"ns#O","errors":["ns#E"]}"#,
        ),
        (
            r#"{"resources":["ns#R"],"create":"ns#C","type":"resource","put":"ns#P","update":"ns#U","delete":"ns#D","operations":["ns#X"]}"#,
            r#"{"type":"resource","create":"ns#C","put":"ns#P","update":"ns#U","delete":"ns#D","operations":["ns#X"],"resources":["ns#R"]}"#,
        ),
        (
            r#"{"type":"structure"}"#,
            r#"{"type":"structure","members":{}}"#,
        ),
        (r#"{"type":"list"}"#, r#"{"type":"list"}"#),
    ];
    for (input, expected) in cases {
        let shape: Shape = from_json_str(input).unwrap_or_else(|e| panic!("{input}: {e}"));
        assert_eq!(to_json_string(&shape), expected);
    }
}
