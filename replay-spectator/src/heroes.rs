//! Hero classification table
//!
//! Attribution rules only care about how a hero moves: melee heroes are worth
//! following after a kill, ranged heroes are not, and split-unit heroes have
//! no single body to follow at all. The classification is decided once, when
//! a participant's hero name is resolved against a [`HeroTable`].

use crate::types::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Movement classification of a hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClass {
    /// Fights up close; the camera follows the hero after a kill
    Melee,
    /// Fights at range; the camera follows the victims instead
    Ranged,
    /// Controls detached units with no fixed visual form
    SplitUnit,
}

/// A resolved hero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hero {
    /// Canonical hero name
    pub name: String,
    /// Movement classification
    pub class: HeroClass,
}

impl Hero {
    pub fn new(name: impl Into<String>, class: HeroClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

/// Capability to resolve a participant's hero
///
/// Implementations must be deterministic: the same participant always
/// resolves to the same answer for the lifetime of the lookup.
pub trait HeroLookup: Send + Sync {
    /// Resolve the participant's hero, or `None` if it is not (yet) known
    fn resolve(&self, participant: &Participant) -> Option<&Hero>;

    /// Convenience: classification of the participant's hero
    fn hero_class(&self, participant: &Participant) -> Option<HeroClass> {
        self.resolve(participant).map(|hero| hero.class)
    }
}

/// Built-in roster: (name, class)
const STANDARD_ROSTER: &[(&str, HeroClass)] = &[
    ("Abathur", HeroClass::SplitUnit),
    ("Alarak", HeroClass::Melee),
    ("Alexstrasza", HeroClass::Ranged),
    ("Amazon", HeroClass::Ranged),
    ("Ana", HeroClass::Ranged),
    ("Anduin", HeroClass::Ranged),
    ("Anubarak", HeroClass::Melee),
    ("Artanis", HeroClass::Melee),
    ("Arthas", HeroClass::Melee),
    ("Auriel", HeroClass::Ranged),
    ("Azmodan", HeroClass::Ranged),
    ("Barbarian", HeroClass::Melee),
    ("Butcher", HeroClass::Melee),
    ("Chen", HeroClass::Melee),
    ("Cho", HeroClass::Melee),
    ("Chromie", HeroClass::Ranged),
    ("Crusader", HeroClass::Melee),
    ("Deathwing", HeroClass::Melee),
    ("Deckard", HeroClass::Melee),
    ("Dehaka", HeroClass::Melee),
    ("DemonHunter", HeroClass::Ranged),
    ("Diablo", HeroClass::Melee),
    ("Dryad", HeroClass::Ranged),
    ("DVa", HeroClass::Ranged),
    ("FaerieDragon", HeroClass::Ranged),
    ("Falstad", HeroClass::Ranged),
    ("Fenix", HeroClass::Ranged),
    ("Firebat", HeroClass::Ranged),
    ("Gall", HeroClass::Ranged),
    ("Garrosh", HeroClass::Melee),
    ("Genji", HeroClass::Ranged),
    ("Greymane", HeroClass::Ranged),
    ("Guldan", HeroClass::Ranged),
    ("Hanzo", HeroClass::Ranged),
    ("Illidan", HeroClass::Melee),
    ("Imperius", HeroClass::Melee),
    ("Jaina", HeroClass::Ranged),
    ("Junkrat", HeroClass::Ranged),
    ("Kaelthas", HeroClass::Ranged),
    ("KelThuzad", HeroClass::Ranged),
    ("Kerrigan", HeroClass::Melee),
    ("L90ETC", HeroClass::Melee),
    ("Leoric", HeroClass::Melee),
    ("LiLi", HeroClass::Ranged),
    ("LostVikings", HeroClass::Melee),
    ("Lucio", HeroClass::Ranged),
    ("Maiev", HeroClass::Melee),
    ("Malfurion", HeroClass::Ranged),
    ("MalGanis", HeroClass::Melee),
    ("Malthael", HeroClass::Melee),
    ("Medic", HeroClass::Ranged),
    ("Medivh", HeroClass::Ranged),
    ("Mephisto", HeroClass::Ranged),
    ("Monk", HeroClass::Melee),
    ("Muradin", HeroClass::Melee),
    ("Murky", HeroClass::Melee),
    ("Necromancer", HeroClass::Melee),
    ("NexusHunter", HeroClass::Ranged),
    ("Nova", HeroClass::Ranged),
    ("Orphea", HeroClass::Ranged),
    ("Probius", HeroClass::Ranged),
    ("Ragnaros", HeroClass::Melee),
    ("Raynor", HeroClass::Ranged),
    ("Rehgar", HeroClass::Melee),
    ("Rexxar", HeroClass::Ranged),
    ("Samuro", HeroClass::Melee),
    ("SgtHammer", HeroClass::Ranged),
    ("Stitches", HeroClass::Melee),
    ("Stukov", HeroClass::Melee),
    ("Sylvanas", HeroClass::Ranged),
    ("Tassadar", HeroClass::Ranged),
    ("Thrall", HeroClass::Melee),
    ("Tinker", HeroClass::Melee),
    ("Tracer", HeroClass::Ranged),
    ("Tychus", HeroClass::Ranged),
    ("Tyrael", HeroClass::Melee),
    ("Tyrande", HeroClass::Ranged),
    ("Uther", HeroClass::Melee),
    ("Valeera", HeroClass::Melee),
    ("Varian", HeroClass::Melee),
    ("Whitemane", HeroClass::Ranged),
    ("WitchDoctor", HeroClass::Ranged),
    ("Wizard", HeroClass::Ranged),
    ("Yrel", HeroClass::Melee),
    ("Zagara", HeroClass::Ranged),
    ("Zarya", HeroClass::Ranged),
    ("Zeratul", HeroClass::Melee),
    ("Zuljin", HeroClass::Ranged),
];

/// Immutable hero reference table, keyed case-insensitively by hero name
#[derive(Debug, Clone, Default)]
pub struct HeroTable {
    /// Key: lowercased hero name
    heroes: HashMap<String, Hero>,
}

impl HeroTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the built-in roster
    pub fn standard() -> Self {
        let mut table = Self::new();
        for (name, class) in STANDARD_ROSTER {
            table.insert(Hero::new(*name, *class));
        }
        table
    }

    /// Add or replace a hero definition
    pub fn insert(&mut self, hero: Hero) {
        self.heroes.insert(hero.name.to_lowercase(), hero);
    }

    /// Builder method: add or replace a hero definition
    pub fn with_hero(mut self, name: impl Into<String>, class: HeroClass) -> Self {
        self.insert(Hero::new(name, class));
        self
    }

    /// Look up a hero by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Hero> {
        self.heroes.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

impl HeroLookup for HeroTable {
    fn resolve(&self, participant: &Participant) -> Option<&Hero> {
        participant.hero.as_deref().and_then(|name| self.get(name))
    }
}

/// Per-match cache of resolved heroes, keyed by participant
///
/// Once a participant's hero is resolved it is never replaced; participants
/// that did not resolve are retried by [`HeroCache::refresh`].
#[derive(Debug, Clone, Default)]
pub struct HeroCache {
    resolved: HashMap<ParticipantId, Hero>,
}

impl HeroCache {
    /// Resolve every participant against `lookup`
    pub fn build(participants: &[Participant], lookup: &dyn HeroLookup) -> Self {
        let mut cache = Self::default();
        cache.refresh(participants, lookup);
        cache
    }

    /// Resolve participants that are still unresolved; returns how many were added
    pub fn refresh(&mut self, participants: &[Participant], lookup: &dyn HeroLookup) -> usize {
        let mut added = 0;

        for participant in participants {
            if self.resolved.contains_key(&participant.id) {
                continue;
            }

            match lookup.resolve(participant) {
                Some(hero) => {
                    log::debug!(
                        "Resolved {} ({}) as {} ({:?})",
                        participant.id,
                        participant.name,
                        hero.name,
                        hero.class
                    );
                    self.resolved.insert(participant.id, hero.clone());
                    added += 1;
                }
                None => {
                    if let Some(name) = &participant.hero {
                        log::warn!(
                            "Unknown hero '{}' for {} ({}), following the participant",
                            name,
                            participant.id,
                            participant.name
                        );
                    }
                }
            }
        }

        added
    }

    /// Number of participants with a resolved hero
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl HeroLookup for HeroCache {
    fn resolve(&self, participant: &Participant) -> Option<&Hero> {
        self.resolved.get(&participant.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Team;

    #[test]
    fn test_standard_table_lookup_is_case_insensitive() {
        let table = HeroTable::standard();

        assert_eq!(table.get("muradin").map(|h| h.class), Some(HeroClass::Melee));
        assert_eq!(table.get("JAINA").map(|h| h.class), Some(HeroClass::Ranged));
        assert_eq!(table.get("abathur").map(|h| h.class), Some(HeroClass::SplitUnit));
        assert!(table.get("NotAHero").is_none());
        assert_eq!(table.len(), STANDARD_ROSTER.len());
    }

    #[test]
    fn test_table_resolves_participant_hero() {
        let table = HeroTable::new().with_hero("Brawler", HeroClass::Melee);

        let known = Participant::new(0, "alice", Team::Blue).with_hero("brawler");
        let unknown = Participant::new(1, "bob", Team::Red).with_hero("Sniper");
        let unassigned = Participant::new(2, "carol", Team::Red);

        assert_eq!(table.hero_class(&known), Some(HeroClass::Melee));
        assert_eq!(table.hero_class(&unknown), None);
        assert_eq!(table.hero_class(&unassigned), None);
    }

    #[test]
    fn test_cache_keeps_first_resolution() {
        let participants = vec![
            Participant::new(0, "alice", Team::Blue).with_hero("Brawler"),
            Participant::new(1, "bob", Team::Red).with_hero("Sniper"),
        ];

        let first = HeroTable::new().with_hero("Brawler", HeroClass::Melee);
        let mut cache = HeroCache::build(&participants, &first);
        assert_eq!(cache.len(), 1);

        // A later table reclassifies Brawler and learns Sniper
        let second = HeroTable::new()
            .with_hero("Brawler", HeroClass::Ranged)
            .with_hero("Sniper", HeroClass::Ranged);
        assert_eq!(cache.refresh(&participants, &second), 1);

        assert_eq!(cache.hero_class(&participants[0]), Some(HeroClass::Melee));
        assert_eq!(cache.hero_class(&participants[1]), Some(HeroClass::Ranged));
    }
}
