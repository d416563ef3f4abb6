//! Rebuilds an [`Episode`] from a loaded subgraph.
//!
//! Database nodes do not carry relationship-derived fields (an actor's
//! `location_id`, an item's `holder_id`, a location's `landmark_id`) as
//! properties, so construction runs in phases: provisional records from
//! direct properties first, cross-references written from the edge list
//! second, and schema validation (required fields, enum membership, uid
//! prefixes) last, once everything is in place. The provisional types never
//! leave this module.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::StoreError;
use super::store::{REL_HOLDER, REL_JUNCTION, REL_LANDMARK, REL_LOCATION};
use crate::id::EntityKind;
use crate::model::{
    ActorEntity, ActorInternalState, Episode, ItemEntity, JunctionEntity, LandmarkEntity,
    LocationEntity,
};

#[derive(Debug)]
pub(crate) struct NodeRow {
    pub uid: String,
    pub labels: Vec<String>,
    pub name: String,
    pub fact: String,
    pub properties: Value,
}

#[derive(Debug)]
pub(crate) struct EdgeRow {
    pub from_uid: String,
    pub to_uid: String,
    pub rel_type: String,
    pub properties: Value,
}

#[derive(Debug, Clone, Copy)]
enum NodeLabel {
    Landmark,
    Location,
    Actor,
    Item,
}

/// Priority-ordered label table; the first known label on a node wins.
const LABEL_PRIORITY: &[(&str, NodeLabel)] = &[
    ("LandmarkNode", NodeLabel::Landmark),
    ("LocationNode", NodeLabel::Location),
    ("ActorNode", NodeLabel::Actor),
    ("ItemNode", NodeLabel::Item),
];

fn classify(labels: &[String]) -> Option<NodeLabel> {
    LABEL_PRIORITY
        .iter()
        .find(|(label, _)| labels.iter().any(|candidate| candidate == label))
        .map(|(_, node_label)| *node_label)
}

#[derive(Debug)]
struct ProvisionalLandmark {
    uid: String,
    name: String,
    fact: String,
}

#[derive(Debug)]
struct ProvisionalLocation {
    uid: String,
    name: String,
    fact: String,
    kind: Option<String>,
    condition: Option<String>,
    landmark_id: Option<String>,
}

#[derive(Debug)]
struct ProvisionalActor {
    uid: String,
    name: String,
    fact: String,
    kind: Option<String>,
    health: Option<String>,
    arousal: Option<String>,
    control: Option<String>,
    /// Opaque encoded blob, decoded only during validation.
    internal: Option<String>,
    location_id: Option<String>,
}

#[derive(Debug)]
struct ProvisionalItem {
    uid: String,
    name: String,
    fact: String,
    condition: Option<String>,
    holder_id: Option<String>,
}

#[derive(Debug)]
struct ProvisionalJunction {
    uid: Option<String>,
    name: Option<String>,
    fact: Option<String>,
    condition: Option<String>,
    accessibility: Option<String>,
    from_location_id: String,
    to_location_id: String,
}

fn prop_str(properties: &Value, key: &str) -> Option<String> {
    properties.get(key).and_then(Value::as_str).map(String::from)
}

fn required(uid: &str, field: &str, value: Option<String>) -> Result<String, StoreError> {
    value.ok_or_else(|| StoreError::Hydration(format!("{uid}: missing required field `{field}`")))
}

fn parse_enum<T: DeserializeOwned>(
    uid: &str,
    field: &str,
    value: Option<String>,
) -> Result<T, StoreError> {
    let raw = required(uid, field, value)?;
    serde_json::from_value(Value::String(raw.clone())).map_err(|_| {
        StoreError::Hydration(format!("{uid}: unknown `{field}` value `{raw}`"))
    })
}

fn check_prefix(uid: &str, expected: EntityKind) -> Result<(), StoreError> {
    if EntityKind::of_uid(uid) == Some(expected) {
        Ok(())
    } else {
        Err(StoreError::Hydration(format!(
            "`{uid}` is not a valid {} uid",
            expected.prefix()
        )))
    }
}

/// Turn a deduplicated node and edge set into a validated episode with empty
/// action/outcome logs.
pub(crate) fn build_episode(
    nodes: Vec<NodeRow>,
    edges: Vec<EdgeRow>,
) -> Result<Episode, StoreError> {
    // Phase 1: provisional records from direct node properties only.
    let mut landmark: Option<ProvisionalLandmark> = None;
    let mut locations: BTreeMap<String, ProvisionalLocation> = BTreeMap::new();
    let mut actors: BTreeMap<String, ProvisionalActor> = BTreeMap::new();
    let mut items: BTreeMap<String, ProvisionalItem> = BTreeMap::new();

    for node in nodes {
        match classify(&node.labels) {
            Some(NodeLabel::Landmark) => {
                if landmark.is_some() {
                    return Err(StoreError::Hydration(format!(
                        "subgraph contains more than one landmark node ({})",
                        node.uid
                    )));
                }
                landmark = Some(ProvisionalLandmark {
                    uid: node.uid,
                    name: node.name,
                    fact: node.fact,
                });
            }
            Some(NodeLabel::Location) => {
                locations.insert(
                    node.uid.clone(),
                    ProvisionalLocation {
                        kind: prop_str(&node.properties, "type"),
                        condition: prop_str(&node.properties, "condition"),
                        landmark_id: None,
                        uid: node.uid,
                        name: node.name,
                        fact: node.fact,
                    },
                );
            }
            Some(NodeLabel::Actor) => {
                actors.insert(
                    node.uid.clone(),
                    ProvisionalActor {
                        kind: prop_str(&node.properties, "type"),
                        health: prop_str(&node.properties, "health"),
                        arousal: prop_str(&node.properties, "arousal"),
                        control: prop_str(&node.properties, "control"),
                        internal: prop_str(&node.properties, "internal"),
                        location_id: None,
                        uid: node.uid,
                        name: node.name,
                        fact: node.fact,
                    },
                );
            }
            Some(NodeLabel::Item) => {
                items.insert(
                    node.uid.clone(),
                    ProvisionalItem {
                        condition: prop_str(&node.properties, "condition"),
                        holder_id: None,
                        uid: node.uid,
                        name: node.name,
                        fact: node.fact,
                    },
                );
            }
            None => {
                tracing::warn!(uid = %node.uid, labels = ?node.labels, "skipping node with no known label");
            }
        }
    }

    let landmark = landmark
        .ok_or_else(|| StoreError::Hydration("subgraph has no landmark node".to_string()))?;

    // Phase 2: one pass over edges writes the cross-reference fields.
    // Junctions have no node of their own and are synthesized here.
    let mut junctions: Vec<ProvisionalJunction> = Vec::new();
    for edge in &edges {
        match edge.rel_type.as_str() {
            REL_LANDMARK => {
                let location = locations.get_mut(&edge.from_uid).ok_or_else(|| {
                    StoreError::Hydration(format!(
                        "LANDMARK edge from unknown location {}",
                        edge.from_uid
                    ))
                })?;
                location.landmark_id = Some(edge.to_uid.clone());
            }
            REL_LOCATION => {
                if !locations.contains_key(&edge.to_uid) {
                    return Err(StoreError::Hydration(format!(
                        "LOCATION edge to unknown location {}",
                        edge.to_uid
                    )));
                }
                let actor = actors.get_mut(&edge.from_uid).ok_or_else(|| {
                    StoreError::Hydration(format!(
                        "LOCATION edge from unknown actor {}",
                        edge.from_uid
                    ))
                })?;
                actor.location_id = Some(edge.to_uid.clone());
            }
            REL_HOLDER => {
                if !locations.contains_key(&edge.to_uid) && !actors.contains_key(&edge.to_uid) {
                    return Err(StoreError::Hydration(format!(
                        "HOLDER edge to {} which is neither a location nor an actor",
                        edge.to_uid
                    )));
                }
                let item = items.get_mut(&edge.from_uid).ok_or_else(|| {
                    StoreError::Hydration(format!(
                        "HOLDER edge from unknown item {}",
                        edge.from_uid
                    ))
                })?;
                item.holder_id = Some(edge.to_uid.clone());
            }
            REL_JUNCTION => {
                for endpoint in [&edge.from_uid, &edge.to_uid] {
                    if !locations.contains_key(endpoint) {
                        return Err(StoreError::Hydration(format!(
                            "JUNCTION edge endpoint {endpoint} is not a location"
                        )));
                    }
                }
                junctions.push(ProvisionalJunction {
                    uid: prop_str(&edge.properties, "uid"),
                    name: prop_str(&edge.properties, "name"),
                    fact: prop_str(&edge.properties, "fact"),
                    condition: prop_str(&edge.properties, "condition"),
                    accessibility: prop_str(&edge.properties, "accessibility"),
                    from_location_id: edge.from_uid.clone(),
                    to_location_id: edge.to_uid.clone(),
                });
            }
            other => {
                tracing::warn!(rel_type = other, "skipping edge of unknown type");
            }
        }
    }

    // Phase 3: full schema validation into the final episode.
    check_prefix(&landmark.uid, EntityKind::Landmark)?;
    let mut episode = Episode::new(LandmarkEntity {
        uid: landmark.uid,
        name: landmark.name,
        fact: landmark.fact,
    });

    for provisional in locations.into_values() {
        check_prefix(&provisional.uid, EntityKind::Location)?;
        let location = LocationEntity {
            kind: parse_enum(&provisional.uid, "type", provisional.kind)?,
            condition: parse_enum(&provisional.uid, "condition", provisional.condition)?,
            landmark_id: provisional.landmark_id,
            uid: provisional.uid,
            name: provisional.name,
            fact: provisional.fact,
        };
        episode.locations.insert(location.uid.clone(), location);
    }

    for provisional in junctions {
        let uid = required("junction", "uid", provisional.uid)?;
        check_prefix(&uid, EntityKind::Junction)?;
        let junction = JunctionEntity {
            name: required(&uid, "name", provisional.name)?,
            fact: required(&uid, "fact", provisional.fact)?,
            condition: parse_enum(&uid, "condition", provisional.condition)?,
            accessibility: parse_enum(&uid, "accessibility", provisional.accessibility)?,
            from_location_id: provisional.from_location_id,
            to_location_id: provisional.to_location_id,
            uid,
        };
        episode.junctions.insert(junction.uid.clone(), junction);
    }

    for provisional in actors.into_values() {
        check_prefix(&provisional.uid, EntityKind::Actor)?;
        let blob = required(&provisional.uid, "internal", provisional.internal)?;
        let internal: ActorInternalState = serde_json::from_str(&blob).map_err(|err| {
            StoreError::Hydration(format!(
                "{}: undecodable internal state: {err}",
                provisional.uid
            ))
        })?;
        let actor = ActorEntity {
            kind: parse_enum(&provisional.uid, "type", provisional.kind)?,
            health: parse_enum(&provisional.uid, "health", provisional.health)?,
            arousal: parse_enum(&provisional.uid, "arousal", provisional.arousal)?,
            control: parse_enum(&provisional.uid, "control", provisional.control)?,
            location_id: required(&provisional.uid, "location_id", provisional.location_id)?,
            internal,
            uid: provisional.uid,
            name: provisional.name,
            fact: provisional.fact,
        };
        episode.actors.insert(actor.uid.clone(), actor);
    }

    for provisional in items.into_values() {
        check_prefix(&provisional.uid, EntityKind::Item)?;
        let item = ItemEntity {
            condition: parse_enum(&provisional.uid, "condition", provisional.condition)?,
            holder_id: required(&provisional.uid, "holder_id", provisional.holder_id)?,
            uid: provisional.uid,
            name: provisional.name,
            fact: provisional.fact,
        };
        episode.items.insert(item.uid.clone(), item);
    }

    Ok(episode)
}
