//! Merging several models into one.
//!
//! Versions must agree on their major component, metadata arrays are
//! concatenated and any other metadata must be identical, and a shape may be
//! defined more than once only if every definition is equal. Every conflict
//! is collected; the error still carries everything that merged cleanly.

use std::collections::btree_map::Entry;

use thiserror::Error;
use tracing::debug;

use crate::model::Model;
use crate::shape_id::AbsShapeId;
use crate::value::OpaqueValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeConflict {
    #[error("no models to merge")]
    NoModels,
    #[error("model {model} has version {found:?}, incompatible with {expected:?}")]
    Version {
        model: usize,
        expected: String,
        found: String,
    },
    #[error("model {model} redefines metadata key {key:?} with a conflicting value")]
    Metadata { model: usize, key: String },
    #[error("model {model} redefines shape {id} differently")]
    Shape { model: usize, id: AbsShapeId },
}

#[derive(Debug, Error)]
#[error("{} conflict(s) while merging models", .conflicts.len())]
pub struct MergeError {
    pub conflicts: Vec<MergeConflict>,
    /// Everything that merged without conflict.
    pub model: Model,
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Merges `other` into `into`, or reports that the two cannot be combined.
fn merge_metadata_value(into: &mut OpaqueValue, other: &OpaqueValue) -> bool {
    match (into, other) {
        (OpaqueValue::Array(items), OpaqueValue::Array(more)) => {
            items.extend(more.iter().cloned());
            true
        }
        (into, other) => into == other,
    }
}

/// Merges `models` in order. The result takes the first model's version.
pub fn merge_models(models: &[Model]) -> Result<Model, MergeError> {
    let Some((first, rest)) = models.split_first() else {
        return Err(MergeError {
            conflicts: vec![MergeConflict::NoModels],
            model: Model::default(),
        });
    };

    let mut merged = first.clone();
    let mut conflicts = Vec::new();
    let major = major_version(&first.version.value);

    for (i, model) in rest.iter().enumerate() {
        let index = i + 1;

        if major_version(&model.version.value) != major {
            conflicts.push(MergeConflict::Version {
                model: index,
                expected: first.version.value.clone(),
                found: model.version.value.clone(),
            });
        }

        for (key, value) in &model.metadata {
            match merged.metadata.entry(key.clone()) {
                Entry::Vacant(e) => {
                    e.insert(value.clone());
                }
                Entry::Occupied(mut e) => {
                    if !merge_metadata_value(&mut e.get_mut().value, &value.value) {
                        conflicts.push(MergeConflict::Metadata {
                            model: index,
                            key: key.clone(),
                        });
                    }
                }
            }
        }

        for (id, shape) in &model.shapes {
            match merged.shapes.entry(id.clone()) {
                Entry::Vacant(e) => {
                    e.insert(shape.clone());
                }
                Entry::Occupied(e) => {
                    if e.get() != shape {
                        conflicts.push(MergeConflict::Shape {
                            model: index,
                            id: id.clone(),
                        });
                    }
                }
            }
        }
    }

    for conflict in &conflicts {
        debug!(%conflict, "merge conflict");
    }
    debug!(
        models = models.len(),
        shapes = merged.shapes.len(),
        conflicts = conflicts.len(),
        "merged models"
    );

    if conflicts.is_empty() {
        Ok(merged)
    } else {
        Err(MergeError {
            conflicts,
            model: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(text: &str) -> Model {
        Model::from_slice(text.as_bytes()).unwrap()
    }

    #[test]
    fn no_models() {
        let err = merge_models(&[]).unwrap_err();
        assert_eq!(err.conflicts, vec![MergeConflict::NoModels]);
    }

    #[test]
    fn disjoint_models_combine() {
        let a = model(r#"{"version":"1.0","shapes":{"ns#A":{"type":"string"}}}"#);
        let b = model(r#"{"version":"1.1","shapes":{"ns#B":{"type":"blob"}}}"#);
        let merged = merge_models(&[a, b]).unwrap();
        assert_eq!(merged.version.value, "1.0");
        assert_eq!(merged.shapes.len(), 2);
    }

    #[test]
    fn identical_shapes_are_not_conflicts() {
        let a = model(r#"{"version":"1.0","shapes":{"ns#A":{"type":"string"}}}"#);
        // Same definition, different layout and so different locations.
        let b = model("{\n\"shapes\": {\"ns#A\": {\"type\": \"string\"}},\n\"version\": \"1.0\"}");
        assert_eq!(merge_models(&[a, b]).unwrap().shapes.len(), 1);
    }

    #[test]
    fn metadata_arrays_concatenate() {
        let a = model(r#"{"version":"1.0","metadata":{"list":[1],"same":"x"}}"#);
        let b = model(r#"{"version":"1.0","metadata":{"list":[2,3],"same":"x","new":true}}"#);
        let merged = merge_models(&[a, b]).unwrap();
        assert_eq!(merged.metadata["list"].value, OpaqueValue::from(json!([1, 2, 3])));
        assert_eq!(merged.metadata["same"].value, OpaqueValue::from("x"));
        assert_eq!(merged.metadata["new"].value, OpaqueValue::Bool(true));
    }

    #[test]
    fn conflicts_are_all_collected() {
        let a = model(
            r#"{"version":"1.0","metadata":{"k":"a"},"shapes":{"ns#A":{"type":"string"},"ns#B":{"type":"blob"}}}"#,
        );
        let b = model(
            r#"{"version":"2.0","metadata":{"k":"b"},"shapes":{"ns#A":{"type":"long"},"ns#C":{"type":"blob"}}}"#,
        );
        let err = merge_models(&[a, b]).unwrap_err();
        assert_eq!(
            err.conflicts,
            vec![
                MergeConflict::Version {
                    model: 1,
                    expected: "1.0".into(),
                    found: "2.0".into(),
                },
                MergeConflict::Metadata {
                    model: 1,
                    key: "k".into(),
                },
                MergeConflict::Shape {
                    model: 1,
                    id: AbsShapeId::parse("ns#A").unwrap(),
                },
            ]
        );
        assert_eq!(err.to_string(), "3 conflict(s) while merging models");
        // The first definition is kept and the clean shape still merged.
        let best = &err.model;
        assert_eq!(best.shapes.len(), 3);
        assert_eq!(best.metadata["k"].value, OpaqueValue::from("a"));
    }
}
