use outbreak_sim::model::*;

/// A small two-location scenario at an abandoned clinic: one human in the
/// courtyard holding a crowbar, one zombie in the ward with a dropped med
/// kit, and a locked side gate between the two.
pub fn build_test_episode() -> Episode {
    let mut episode = Episode::new(LandmarkEntity {
        uid: "landmark_1000001".to_string(),
        name: "Hillcrest Clinic".to_string(),
        fact: "The clinic has been abandoned for days.".to_string(),
    });

    episode.add_location(LocationEntity {
        uid: "location_1000002".to_string(),
        name: "Courtyard".to_string(),
        fact: "The courtyard is overgrown and quiet.".to_string(),
        kind: LocationType::ExteriorOpen,
        condition: LocationCondition::Functional,
        landmark_id: Some("landmark_1000001".to_string()),
    });
    episode.add_location(LocationEntity {
        uid: "location_1000004".to_string(),
        name: "Ward".to_string(),
        fact: "The ward reeks of antiseptic and rot.".to_string(),
        kind: LocationType::Interior,
        condition: LocationCondition::Damaged,
        landmark_id: None,
    });
    episode.add_junction(JunctionEntity {
        uid: "junction_1000005".to_string(),
        name: "Side Gate".to_string(),
        fact: "The side gate is chained shut.".to_string(),
        condition: JunctionCondition::Functional,
        accessibility: JunctionAccessibility::Locked,
        from_location_id: "location_1000004".to_string(),
        to_location_id: "location_1000002".to_string(),
    });

    episode.add_actor(ActorEntity {
        uid: "actor_1000003".to_string(),
        name: "Mara Voss".to_string(),
        fact: "Mara is studying the gate from the courtyard.".to_string(),
        kind: ActorType::Human,
        health: ActorHealth::GoodHealth,
        arousal: ActorArousal::Alert,
        control: ActorControl::Composed,
        location_id: "location_1000002".to_string(),
        internal: ActorInternalState {
            actor_id: "actor_1000003".to_string(),
            campaign_goal: "Reach the evacuation zone".to_string(),
            episode_goal: "Search the clinic for supplies".to_string(),
            immediate_goal: "Get through the side gate".to_string(),
            emotion: "wary".to_string(),
            is_infected: false,
        },
    });
    episode.add_actor(ActorEntity {
        uid: "actor_1000006".to_string(),
        name: "The Orderly".to_string(),
        fact: "The orderly shuffles between the ward beds.".to_string(),
        kind: ActorType::Zombie,
        health: ActorHealth::PoorHealth,
        arousal: ActorArousal::Passive,
        control: ActorControl::Submissive,
        location_id: "location_1000004".to_string(),
        internal: ActorInternalState {
            actor_id: "actor_1000006".to_string(),
            campaign_goal: "Feed".to_string(),
            episode_goal: "Feed".to_string(),
            immediate_goal: "Follow the noise".to_string(),
            emotion: "hunger".to_string(),
            is_infected: true,
        },
    });

    episode.add_item(ItemEntity {
        uid: "item_1000007".to_string(),
        name: "Crowbar".to_string(),
        fact: "The crowbar is rusty but solid.".to_string(),
        condition: ItemCondition::Functional,
        holder_id: "actor_1000003".to_string(),
    });
    episode.add_item(ItemEntity {
        uid: "item_1000008".to_string(),
        name: "Med Kit".to_string(),
        fact: "The med kit lies spilled under a bed.".to_string(),
        condition: ItemCondition::GoodCondition,
        holder_id: "location_1000004".to_string(),
    });

    episode
}

#[allow(dead_code)]
pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
