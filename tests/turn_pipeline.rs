mod common;

use std::sync::Mutex;

use outbreak_sim::db::{GraphStore, StoreError};
use outbreak_sim::engine::{ActorPolicy, EngineError, OutcomeOracle, RunConfig, TurnEngine, run};
use outbreak_sim::model::*;

/// In-memory store that records which entity batches were pushed.
#[derive(Default)]
struct RecordingStore {
    upserts: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn record(&self, what: &str, count: usize) {
        self.upserts
            .lock()
            .unwrap()
            .push(format!("{what}:{count}"));
    }

    fn recorded(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }
}

impl GraphStore for RecordingStore {
    async fn upsert_landmarks(&self, batch: &[LandmarkEntity]) -> Result<(), StoreError> {
        self.record("landmarks", batch.len());
        Ok(())
    }
    async fn upsert_locations(&self, batch: &[LocationEntity]) -> Result<(), StoreError> {
        self.record("locations", batch.len());
        Ok(())
    }
    async fn upsert_junctions(&self, batch: &[JunctionEntity]) -> Result<(), StoreError> {
        self.record("junctions", batch.len());
        Ok(())
    }
    async fn upsert_actors(&self, batch: &[ActorEntity]) -> Result<(), StoreError> {
        self.record("actors", batch.len());
        Ok(())
    }
    async fn upsert_items(&self, batch: &[ItemEntity]) -> Result<(), StoreError> {
        self.record("items", batch.len());
        Ok(())
    }
    async fn load_episode(&self, _landmark_id: &str) -> Result<Option<Episode>, StoreError> {
        Ok(None)
    }
}

/// Returns a fixed action list on every call and logs who asked.
struct ScriptedPolicy {
    actions: Vec<Action>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPolicy {
    fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ActorPolicy for ScriptedPolicy {
    async fn generate_actions(
        &self,
        _episode: &Episode,
        actor_id: &str,
    ) -> Result<Vec<Action>, EngineError> {
        self.calls.lock().unwrap().push(actor_id.to_string());
        Ok(self.actions.clone())
    }
}

struct ScriptedOracle {
    outcomes: Vec<Outcome>,
    calls: Mutex<usize>,
}

impl ScriptedOracle {
    fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            calls: Mutex::new(0),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl OutcomeOracle for ScriptedOracle {
    async fn evaluate_actions(
        &self,
        _episode: &Episode,
        _actions: &[Action],
    ) -> Result<Vec<Outcome>, EngineError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.outcomes.clone())
    }
}

fn mara_actions() -> Vec<Action> {
    vec![
        Action {
            uid: "action_1000010".to_string(),
            kind: ActionType::Inspect,
            location_id: "location_1000002".to_string(),
            source_actor_id: "actor_1000003".to_string(),
            target_entity_id: "junction_1000005".to_string(),
            target_entity_type: EntityType::Junction,
            fact: "Mara tests the chain on the side gate.".to_string(),
        },
        Action {
            uid: "action_1000011".to_string(),
            kind: ActionType::Prepare,
            location_id: "location_1000002".to_string(),
            source_actor_id: "actor_1000003".to_string(),
            target_entity_id: "item_1000007".to_string(),
            target_entity_type: EntityType::Item,
            fact: "Mara wedges the crowbar under the chain.".to_string(),
        },
    ]
}

fn mara_hurt_outcome() -> Outcome {
    let mut hurt = common::build_test_episode().actors["actor_1000003"].clone();
    hurt.health = ActorHealth::FairHealth;
    hurt.fact = "Mara nurses a wrenched shoulder at the gate.".to_string();
    Outcome {
        action_id: "action_1000011".to_string(),
        kind: OutcomeType::Failure,
        attention: 6,
        resulting_source_entity_status: Some(EntityUpdate::Actor(hurt)),
        resulting_target_entity_status: None,
        fact: "The chain holds and the crowbar slips.".to_string(),
    }
}

#[tokio::test]
async fn human_turn_appends_logs_and_applies_status() {
    let engine = TurnEngine::new(
        ScriptedPolicy::new(mara_actions()),
        ScriptedOracle::new(vec![mara_hurt_outcome()]),
        RecordingStore::default(),
    );
    let episode = common::build_test_episode();

    let after = engine.invoke(episode, "actor_1000003").await.unwrap();

    assert_eq!(after.actions.len(), 2);
    assert_eq!(after.outcomes.len(), 1);
    assert_eq!(
        after.actors["actor_1000003"].health,
        ActorHealth::FairHealth
    );
    // One touched entity, one actor batch of one
    assert_eq!(engine.store().recorded(), vec!["actors:1".to_string()]);
}

#[tokio::test]
async fn dead_actor_turn_is_a_noop() {
    let policy = ScriptedPolicy::new(mara_actions());
    let engine = TurnEngine::new(
        policy,
        ScriptedOracle::new(vec![mara_hurt_outcome()]),
        RecordingStore::default(),
    );
    let mut episode = common::build_test_episode();
    episode.actors.get_mut("actor_1000003").unwrap().health = ActorHealth::Dead;

    let before = episode.clone();
    let after = engine.invoke(episode, "actor_1000003").await.unwrap();

    assert_eq!(after, before);
    assert!(engine.store().recorded().is_empty());
}

#[tokio::test]
async fn unknown_actor_is_a_lookup_error() {
    let engine = TurnEngine::new(
        ScriptedPolicy::new(vec![]),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let err = engine
        .invoke(common::build_test_episode(), "actor_9999999")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Lookup(_)));
}

#[tokio::test]
async fn zombie_must_produce_exactly_one_action() {
    // Two actions from a zombie is a contract violation
    let mut actions = mara_actions();
    for action in &mut actions {
        action.source_actor_id = "actor_1000006".to_string();
        action.location_id = "location_1000004".to_string();
    }
    let engine = TurnEngine::new(
        ScriptedPolicy::new(actions),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let err = engine
        .invoke(common::build_test_episode(), "actor_1000006")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn empty_action_list_short_circuits_before_evaluation() {
    let oracle = ScriptedOracle::new(vec![mara_hurt_outcome()]);
    let engine = TurnEngine::new(ScriptedPolicy::new(vec![]), oracle, RecordingStore::default());
    let before = common::build_test_episode();

    let after = engine.invoke(before.clone(), "actor_1000003").await.unwrap();

    assert_eq!(after, before);
    assert_eq!(engine_oracle_calls(&engine), 0);
}

#[tokio::test]
async fn empty_outcomes_extend_actions_only() {
    let engine = TurnEngine::new(
        ScriptedPolicy::new(mara_actions()),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let after = engine
        .invoke(common::build_test_episode(), "actor_1000003")
        .await
        .unwrap();

    assert_eq!(after.actions.len(), 2);
    assert!(after.outcomes.is_empty());
    assert_eq!(
        after.actors["actor_1000003"].health,
        ActorHealth::GoodHealth
    );
    assert!(engine.store().recorded().is_empty());
}

#[tokio::test]
async fn action_target_prefix_must_match_declared_type() {
    let mut actions = mara_actions();
    actions[0].target_entity_type = EntityType::Item;
    let engine = TurnEngine::new(
        ScriptedPolicy::new(actions),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let err = engine
        .invoke(common::build_test_episode(), "actor_1000003")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn outcome_for_foreign_action_is_rejected() {
    let mut outcome = mara_hurt_outcome();
    outcome.action_id = "action_1000099".to_string();
    let engine = TurnEngine::new(
        ScriptedPolicy::new(mara_actions()),
        ScriptedOracle::new(vec![outcome]),
        RecordingStore::default(),
    );
    let err = engine
        .invoke(common::build_test_episode(), "actor_1000003")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn source_status_must_be_an_actor_update() {
    let mut outcome = mara_hurt_outcome();
    let crowbar = common::build_test_episode().items["item_1000007"].clone();
    outcome.resulting_source_entity_status = Some(EntityUpdate::Item(crowbar));
    let engine = TurnEngine::new(
        ScriptedPolicy::new(mara_actions()),
        ScriptedOracle::new(vec![outcome]),
        RecordingStore::default(),
    );
    let err = engine
        .invoke(common::build_test_episode(), "actor_1000003")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn runner_round_robins_sorted_actors_up_to_budget() {
    let engine = TurnEngine::new(
        ScriptedPolicy::new(vec![]),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let config = RunConfig {
        turn_limit: 5,
        turn_delay: None,
    };

    let mut episode = common::build_test_episode();
    run(&engine, &mut episode, &config).await.unwrap();

    let calls = engine_policy_calls(&engine);
    assert_eq!(
        calls,
        [
            "actor_1000003",
            "actor_1000006",
            "actor_1000003",
            "actor_1000006",
            "actor_1000003",
        ]
    );
}

#[tokio::test]
async fn runner_halts_on_first_error() {
    // A human producing one action fails validation on the very first turn
    let one_action = vec![mara_actions().remove(0)];
    let engine = TurnEngine::new(
        ScriptedPolicy::new(one_action),
        ScriptedOracle::new(vec![]),
        RecordingStore::default(),
    );
    let config = RunConfig {
        turn_limit: 4,
        turn_delay: None,
    };

    let mut episode = common::build_test_episode();
    let before = episode.clone();
    let err = run(&engine, &mut episode, &config).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(engine_policy_calls(&engine).len(), 1);
    // The failed turn left nothing behind
    assert_eq!(episode, before);
}

#[tokio::test]
async fn runner_error_preserves_committed_turns() {
    // Mara's turn commits; the zombie then gets her two-action script, which
    // breaks the one-action contract and halts the run
    let engine = TurnEngine::new(
        ScriptedPolicy::new(mara_actions()),
        ScriptedOracle::new(vec![mara_hurt_outcome()]),
        RecordingStore::default(),
    );
    let config = RunConfig {
        turn_limit: 4,
        turn_delay: None,
    };

    let mut episode = common::build_test_episode();
    let err = run(&engine, &mut episode, &config).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(engine_policy_calls(&engine).len(), 2);

    // The caller still holds turn 1's committed snapshot, logs included
    assert_eq!(episode.actions.len(), 2);
    assert_eq!(episode.outcomes.len(), 1);
    assert_eq!(
        episode.actors["actor_1000003"].health,
        ActorHealth::FairHealth
    );
}

fn engine_policy_calls(
    engine: &TurnEngine<ScriptedPolicy, ScriptedOracle, RecordingStore>,
) -> Vec<String> {
    engine.policy().calls()
}

fn engine_oracle_calls(
    engine: &TurnEngine<ScriptedPolicy, ScriptedOracle, RecordingStore>,
) -> usize {
    engine.oracle().call_count()
}
