use std::collections::BTreeSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// Inclusive bounds for the numeric half of a uid.
pub const UID_NUMBER_MIN: u32 = 1_000_000;
pub const UID_NUMBER_MAX: u32 = 9_999_999;

/// The five kinds of entity a uid can name.
///
/// The uid prefix is authoritative: any field that references another entity
/// is checked against the prefix of the id it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Landmark,
    Location,
    Junction,
    Actor,
    Item,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Landmark => "landmark",
            EntityKind::Location => "location",
            EntityKind::Junction => "junction",
            EntityKind::Actor => "actor",
            EntityKind::Item => "item",
        }
    }

    /// The kind declared by a uid's prefix, if the uid is well-formed.
    pub fn of_uid(uid: &str) -> Option<EntityKind> {
        parse_uid(uid).map(|(kind, _)| kind)
    }
}

/// Split a uid of the form `{kind}_{7-digit number}` into its parts.
/// Returns `None` if the prefix is unknown or the number is out of range.
pub fn parse_uid(uid: &str) -> Option<(EntityKind, u32)> {
    let (prefix, digits) = uid.split_once('_')?;
    let kind = match prefix {
        "landmark" => EntityKind::Landmark,
        "location" => EntityKind::Location,
        "junction" => EntityKind::Junction,
        "actor" => EntityKind::Actor,
        "item" => EntityKind::Item,
        _ => return None,
    };
    if digits.len() != 7 {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    if !(UID_NUMBER_MIN..=UID_NUMBER_MAX).contains(&number) {
        return None;
    }
    Some((kind, number))
}

pub fn is_valid_uid(uid: &str) -> bool {
    parse_uid(uid).is_some()
}

/// Random uid generator shared across all entity kinds.
/// The numeric half is globally unique — no two objects of any kind share a
/// number, so a uid can never be confused for another entity by prefix swap.
#[derive(Debug)]
pub struct IdGenerator {
    rng: SmallRng,
    issued: BTreeSet<u32>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Deterministic generator for reproducible world generation and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            issued: BTreeSet::new(),
        }
    }

    pub fn next_id(&mut self, kind: EntityKind) -> String {
        loop {
            let number = self.rng.random_range(UID_NUMBER_MIN..=UID_NUMBER_MAX);
            if self.issued.insert(number) {
                return format!("{}_{}", kind.prefix(), number);
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
