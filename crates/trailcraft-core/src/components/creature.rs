//! Companion creatures and the incubator.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use trailcraft_logic::catalog::CreatureKind;
use trailcraft_logic::ids::ResourceId;

/// Lifecycle stage. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureState {
    Hatchling,
    UntrainedAdult,
    TrainedAdult,
}

impl CreatureState {
    pub fn is_adult(self) -> bool {
        !matches!(self, CreatureState::Hatchling)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub kind: CreatureKind,
    pub state: CreatureState,
    /// Set while a hatchling; cleared on maturing.
    pub growth_started_at: Option<f64>,
    /// Seconds of growth credited by treats.
    pub growth_reduction: f64,
    /// Objective key → progress, only while an untrained adult.
    pub quest_progress: BTreeMap<String, u32>,
    pub fetch_charges: u32,
    /// Times at which spent charges come back.
    pub pending_restores: Vec<f64>,
}

impl Creature {
    pub fn hatch(id: u32, kind: CreatureKind, now: f64, charges: u32) -> Self {
        Self {
            id,
            kind,
            state: CreatureState::Hatchling,
            growth_started_at: Some(now),
            growth_reduction: 0.0,
            quest_progress: BTreeMap::new(),
            fetch_charges: charges,
            pending_restores: Vec::new(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state == CreatureState::TrainedAdult
    }
}

/// All owned creatures, the selected companion and the unlock registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Companions {
    pub creatures: Vec<Creature>,
    pub active: Option<u32>,
    pub next_id: u32,
}

impl Companions {
    pub fn get(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    pub fn active(&self) -> Option<&Creature> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Creature> {
        match self.active {
            Some(id) => self.get_mut(id),
            None => None,
        }
    }

    /// Whether the selected companion is a trained adult of `kind`.
    pub fn active_trained(&self, kind: CreatureKind) -> bool {
        self.active()
            .map_or(false, |c| c.kind == kind && c.is_trained())
    }
}

/// Egg warming in the incubator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncubationSlot {
    pub egg: ResourceId,
    pub kind: CreatureKind,
    pub started_at: f64,
}

impl IncubationSlot {
    pub fn ready(&self, now: f64, incubation_secs: f64) -> bool {
        now - self.started_at >= incubation_secs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incubator {
    pub slots: Vec<IncubationSlot>,
}

impl Incubator {
    pub fn holds(&self, kind: CreatureKind) -> bool {
        self.slots.iter().any(|s| s.kind == kind)
    }
}

/// Creature types the player has ever hatched.
pub type UnlockedPets = BTreeSet<CreatureKind>;
