//! Companion creature types and their training quests.

use serde::{Deserialize, Serialize};

use crate::constants::objectives;
use crate::ids::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Raven,
    Owl,
    Hawk,
    Dragon,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 4] = [
        CreatureKind::Raven,
        CreatureKind::Owl,
        CreatureKind::Hawk,
        CreatureKind::Dragon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CreatureKind::Raven => "Raven",
            CreatureKind::Owl => "Owl",
            CreatureKind::Hawk => "Hawk",
            CreatureKind::Dragon => "Dragon",
        }
    }

    /// Resource id of this creature's egg.
    pub fn egg_id(self) -> &'static str {
        match self {
            CreatureKind::Raven => "raven_egg",
            CreatureKind::Owl => "owl_egg",
            CreatureKind::Hawk => "hawk_egg",
            CreatureKind::Dragon => "dragon_egg",
        }
    }

    pub fn egg(self) -> ResourceId {
        ResourceId::from(self.egg_id())
    }
}

/// One objective inside a training quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub key: String,
    pub description: String,
    pub required: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingQuest {
    pub title: String,
    pub objectives: Vec<QuestObjective>,
}

impl TrainingQuest {
    pub fn objective(&self, key: &str) -> Option<&QuestObjective> {
        self.objectives.iter().find(|o| o.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureDef {
    pub kind: CreatureKind,
    pub name: String,
    pub incubation_secs: f64,
    pub growth_secs: f64,
    /// Extra spawn radius while active, meters.
    pub vision_bonus: f64,
    /// Extra nodes allowed in the outer ring while active.
    pub bonus_nodes: usize,
    pub max_fetch_charges: u32,
    pub fetch_cooldown_secs: f64,
    /// Passive feather production once trained.
    pub feathers_per_hour: f64,
    pub quest: TrainingQuest,
}

fn objective(key: &str, description: &str, required: u32) -> QuestObjective {
    QuestObjective {
        key: key.to_string(),
        description: description.to_string(),
        required,
    }
}

/// The four companion types.
pub fn standard_creatures() -> Vec<CreatureDef> {
    vec![
        CreatureDef {
            kind: CreatureKind::Raven,
            name: "Raven".to_string(),
            incubation_secs: 30.0 * 60.0,
            growth_secs: 2.0 * 3600.0,
            vision_bonus: 50.0,
            bonus_nodes: 2,
            max_fetch_charges: 3,
            fetch_cooldown_secs: 20.0 * 60.0,
            feathers_per_hour: 0.5,
            quest: TrainingQuest {
                title: "Raven's Errand".to_string(),
                objectives: vec![
                    objective(objectives::GATHER_ANY, "Gather any resource", 25),
                    objective(objectives::FORAGE_HERB, "Forage herbs", 10),
                ],
            },
        },
        CreatureDef {
            kind: CreatureKind::Owl,
            name: "Owl".to_string(),
            incubation_secs: 3600.0,
            growth_secs: 4.0 * 3600.0,
            vision_bonus: 75.0,
            bonus_nodes: 3,
            max_fetch_charges: 2,
            fetch_cooldown_secs: 30.0 * 60.0,
            feathers_per_hour: 0.3,
            quest: TrainingQuest {
                title: "Night Watch".to_string(),
                objectives: vec![
                    objective(objectives::FORAGE_HERB, "Forage herbs", 20),
                    objective(objectives::CRAFT_COMPONENT, "Craft components", 10),
                ],
            },
        },
        CreatureDef {
            kind: CreatureKind::Hawk,
            name: "Hawk".to_string(),
            incubation_secs: 3600.0,
            growth_secs: 4.0 * 3600.0,
            vision_bonus: 100.0,
            bonus_nodes: 3,
            max_fetch_charges: 2,
            fetch_cooldown_secs: 25.0 * 60.0,
            feathers_per_hour: 0.4,
            quest: TrainingQuest {
                title: "Hunter's Bond".to_string(),
                objectives: vec![
                    objective(objectives::HUNT_SUCCESS, "Successful hunts", 10),
                    objective(objectives::GATHER_WOOD, "Chop wood", 15),
                ],
            },
        },
        CreatureDef {
            kind: CreatureKind::Dragon,
            name: "Dragon".to_string(),
            incubation_secs: 6.0 * 3600.0,
            growth_secs: 24.0 * 3600.0,
            vision_bonus: 150.0,
            bonus_nodes: 5,
            max_fetch_charges: 1,
            fetch_cooldown_secs: 3600.0,
            feathers_per_hour: 0.0,
            quest: TrainingQuest {
                title: "Trial of Flame".to_string(),
                objectives: vec![
                    objective(objectives::CRAFT_TOOL_T10, "Forge a tier 10+ tool", 1),
                    objective(objectives::SMELT_INGOT_T6, "Smelt tier 6+ ingots", 20),
                    objective(objectives::HUNT_SUCCESS, "Successful hunts", 15),
                ],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_definition() {
        let defs = standard_creatures();
        for kind in CreatureKind::ALL {
            assert_eq!(defs.iter().filter(|d| d.kind == kind).count(), 1);
        }
    }

    #[test]
    fn dragon_quest_has_three_objectives() {
        let defs = standard_creatures();
        let dragon = defs.iter().find(|d| d.kind == CreatureKind::Dragon).unwrap();
        assert_eq!(dragon.quest.objectives.len(), 3);
        assert_eq!(
            dragon.quest.objective(objectives::SMELT_INGOT_T6).unwrap().required,
            20
        );
        assert!(dragon.quest.objective(objectives::GATHER_ANY).is_none());
    }

    #[test]
    fn egg_ids() {
        assert_eq!(CreatureKind::Owl.egg().as_str(), "owl_egg");
    }
}
