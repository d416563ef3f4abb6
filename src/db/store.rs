//! Postgres implementation of the graph store.
//!
//! Entities are nodes with a label set and a JSONB property document;
//! relationships are typed rows in `edges`. Edge creation uses
//! `INSERT … SELECT` against the `nodes` table so a missing endpoint
//! silently yields no edge rather than an error, mirroring match-then-merge
//! semantics. Exactly-one relationships (actor LOCATION, item HOLDER,
//! location LANDMARK) are dropped and recreated on every upsert.

use serde_json::json;
use sqlx::{PgPool, Row};

use super::hydrate::{self, EdgeRow, NodeRow};
use super::{GraphStore, StoreError};
use crate::id::EntityKind;
use crate::model::{
    ActorEntity, Episode, ItemEntity, JunctionEntity, LandmarkEntity, LocationEntity, LocationType,
};

pub const REL_LANDMARK: &str = "LANDMARK";
pub const REL_LOCATION: &str = "LOCATION";
pub const REL_JUNCTION: &str = "JUNCTION";
pub const REL_HOLDER: &str = "HOLDER";

const LANDMARK_LABELS: &[&str] = &["LandmarkNode", "EntityNode"];
const LOCATION_LABELS: &[&str] = &["LocationNode", "HolderNode", "EntityNode"];
const ACTOR_LABELS: &[&str] = &["ActorNode", "HolderNode", "EntityNode"];
const ITEM_LABELS: &[&str] = &["ItemNode", "EntityNode"];

const UPSERT_NODE: &str = "\
    INSERT INTO nodes (uid, labels, name, fact, properties) \
    VALUES ($1, $2, $3, $4, $5) \
    ON CONFLICT (uid) DO UPDATE \
    SET labels = EXCLUDED.labels, \
        name = EXCLUDED.name, \
        fact = EXCLUDED.fact, \
        properties = EXCLUDED.properties";

const DELETE_OUTGOING_EDGES: &str = "DELETE FROM edges WHERE from_uid = $1 AND rel_type = $2";

/// Creates the edge only when both endpoint nodes exist; a re-run merges
/// properties onto the matched edge. The key is (from, type, to), so an
/// upsert can never repoint an existing edge at different endpoints.
const MERGE_EDGE: &str = "\
    INSERT INTO edges (from_uid, to_uid, rel_type, properties) \
    SELECT f.uid, t.uid, $3, $4 \
    FROM nodes f, nodes t \
    WHERE f.uid = $1 AND t.uid = $2 \
    ON CONFLICT (from_uid, rel_type, to_uid) \
    DO UPDATE SET properties = EXCLUDED.properties";

const REACHABLE_NODES: &str = "\
    WITH RECURSIVE reach(uid) AS ( \
        SELECT uid FROM nodes WHERE uid = $1 \
        UNION \
        SELECT CASE WHEN e.from_uid = r.uid THEN e.to_uid ELSE e.from_uid END \
        FROM edges e JOIN reach r ON r.uid IN (e.from_uid, e.to_uid) \
        WHERE e.rel_type IN ('LOCATION', 'LANDMARK', 'JUNCTION', 'HOLDER') \
    ) \
    SELECT n.uid, n.labels, n.name, n.fact, n.properties \
    FROM nodes n JOIN reach ON reach.uid = n.uid";

const REACHABLE_EDGES: &str = "\
    WITH RECURSIVE reach(uid) AS ( \
        SELECT uid FROM nodes WHERE uid = $1 \
        UNION \
        SELECT CASE WHEN e.from_uid = r.uid THEN e.to_uid ELSE e.from_uid END \
        FROM edges e JOIN reach r ON r.uid IN (e.from_uid, e.to_uid) \
        WHERE e.rel_type IN ('LOCATION', 'LANDMARK', 'JUNCTION', 'HOLDER') \
    ) \
    SELECT e.from_uid, e.to_uid, e.rel_type, e.properties \
    FROM edges e \
    WHERE e.rel_type IN ('LOCATION', 'LANDMARK', 'JUNCTION', 'HOLDER') \
      AND e.from_uid IN (SELECT uid FROM reach) \
      AND e.to_uid IN (SELECT uid FROM reach)";

#[derive(Debug, Clone)]
pub struct PgGraphStore {
    pool: PgPool,
}

impl PgGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn upsert_node(
        &self,
        uid: &str,
        labels: &[&str],
        name: &str,
        fact: &str,
        properties: serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(UPSERT_NODE)
            .bind(uid)
            .bind(labels)
            .bind(name)
            .bind(fact)
            .bind(properties)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn drop_outgoing(&self, from_uid: &str, rel_type: &str) -> Result<(), StoreError> {
        sqlx::query(DELETE_OUTGOING_EDGES)
            .bind(from_uid)
            .bind(rel_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn merge_edge(
        &self,
        from_uid: &str,
        to_uid: &str,
        rel_type: &str,
        properties: serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(MERGE_EDGE)
            .bind(from_uid)
            .bind(to_uid)
            .bind(rel_type)
            .bind(properties)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl GraphStore for PgGraphStore {
    async fn upsert_landmarks(&self, batch: &[LandmarkEntity]) -> Result<(), StoreError> {
        for landmark in batch {
            self.upsert_node(
                &landmark.uid,
                LANDMARK_LABELS,
                &landmark.name,
                &landmark.fact,
                json!({}),
            )
            .await?;
        }
        Ok(())
    }

    async fn upsert_locations(&self, batch: &[LocationEntity]) -> Result<(), StoreError> {
        for location in batch {
            self.upsert_node(
                &location.uid,
                LOCATION_LABELS,
                &location.name,
                &location.fact,
                json!({
                    "type": location.kind,
                    "condition": location.condition,
                }),
            )
            .await?;

            // Landmark anchor is exactly-one and applies only to open exteriors
            self.drop_outgoing(&location.uid, REL_LANDMARK).await?;
            if location.kind == LocationType::ExteriorOpen {
                if let Some(landmark_id) = &location.landmark_id {
                    self.merge_edge(&location.uid, landmark_id, REL_LANDMARK, json!({}))
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn upsert_junctions(&self, batch: &[JunctionEntity]) -> Result<(), StoreError> {
        for junction in batch {
            self.merge_edge(
                &junction.from_location_id,
                &junction.to_location_id,
                REL_JUNCTION,
                json!({
                    "uid": junction.uid,
                    "name": junction.name,
                    "fact": junction.fact,
                    "condition": junction.condition,
                    "accessibility": junction.accessibility,
                }),
            )
            .await?;
        }
        Ok(())
    }

    async fn upsert_actors(&self, batch: &[ActorEntity]) -> Result<(), StoreError> {
        for actor in batch {
            let internal =
                serde_json::to_string(&actor.internal).expect("internal state serialization");
            self.upsert_node(
                &actor.uid,
                ACTOR_LABELS,
                &actor.name,
                &actor.fact,
                json!({
                    "type": actor.kind,
                    "health": actor.health,
                    "arousal": actor.arousal,
                    "control": actor.control,
                    "internal": internal,
                }),
            )
            .await?;

            self.drop_outgoing(&actor.uid, REL_LOCATION).await?;
            self.merge_edge(&actor.uid, &actor.location_id, REL_LOCATION, json!({}))
                .await?;
        }
        Ok(())
    }

    async fn upsert_items(&self, batch: &[ItemEntity]) -> Result<(), StoreError> {
        for item in batch {
            self.upsert_node(
                &item.uid,
                ITEM_LABELS,
                &item.name,
                &item.fact,
                json!({ "condition": item.condition }),
            )
            .await?;

            self.drop_outgoing(&item.uid, REL_HOLDER).await?;
            self.merge_edge(&item.uid, &item.holder_id, REL_HOLDER, json!({}))
                .await?;
        }
        Ok(())
    }

    async fn load_episode(&self, landmark_id: &str) -> Result<Option<Episode>, StoreError> {
        // Only a landmark uid may root a traversal; any other uid in the
        // subgraph would walk back to the real landmark and load under the
        // wrong id.
        if EntityKind::of_uid(landmark_id) != Some(EntityKind::Landmark) {
            tracing::debug!(landmark_id, "not a landmark uid, nothing to load");
            return Ok(None);
        }
        let node_rows = sqlx::query(REACHABLE_NODES)
            .bind(landmark_id)
            .fetch_all(&self.pool)
            .await?;
        if node_rows.is_empty() {
            return Ok(None);
        }

        let edge_rows = sqlx::query(REACHABLE_EDGES)
            .bind(landmark_id)
            .fetch_all(&self.pool)
            .await?;

        let nodes: Vec<NodeRow> = node_rows
            .iter()
            .map(|row| NodeRow {
                uid: row.get("uid"),
                labels: row.get("labels"),
                name: row.get("name"),
                fact: row.get("fact"),
                properties: row.get("properties"),
            })
            .collect();
        let edges: Vec<EdgeRow> = edge_rows
            .iter()
            .map(|row| EdgeRow {
                from_uid: row.get("from_uid"),
                to_uid: row.get("to_uid"),
                rel_type: row.get("rel_type"),
                properties: row.get("properties"),
            })
            .collect();

        tracing::debug!(
            landmark_id,
            nodes = nodes.len(),
            edges = edges.len(),
            "loaded episode subgraph"
        );
        hydrate::build_episode(nodes, edges).map(Some)
    }
}
