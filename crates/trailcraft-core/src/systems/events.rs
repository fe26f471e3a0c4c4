//! Event stream - feedback, level-ups, quest progress and world changes
//!
//! Systems push events as they mutate state. The host drains them after
//! each call and renders them however it likes.

use serde::{Deserialize, Serialize};
use trailcraft_logic::catalog::CreatureKind;
use trailcraft_logic::ids::ResourceId;
use trailcraft_logic::skills::Skill;

use crate::components::NodeId;

/// What a feedback message is about, for UI grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCategory {
    Gather,
    Hunt,
    Craft,
    Build,
    Equipment,
    Companion,
    World,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// User-facing message.
    Feedback {
        message: String,
        positive: bool,
        category: FeedbackCategory,
    },
    LevelUp {
        skill: Skill,
        level: u32,
    },
    QuestProgress {
        quest: String,
        objective: String,
        progress: u32,
        required: u32,
    },
    CompanionMatured {
        creature: u32,
        kind: CreatureKind,
    },
    CompanionTrained {
        creature: u32,
        kind: CreatureKind,
    },
    NodeSpawned {
        node: NodeId,
        resource: ResourceId,
    },
    NodeDespawned {
        node: NodeId,
    },
}

/// Pending events, oldest first.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn feedback(&mut self, message: impl Into<String>, positive: bool, category: FeedbackCategory) {
        self.events.push(SimEvent::Feedback {
            message: message.into(),
            positive,
            category,
        });
    }

    /// Take every pending event.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
