//! Multi-criteria stop-arrival store: an arena of labels plus, per round and
//! stop, a Pareto-optimal frontier of arena indices. The arena lets a label
//! carry only a parent index rather than a full ancestor chain, and lets
//! `path` walk a result back to its access leg by following `parent` links
//! (the "arena + index" layout a pointer-chasing store wants).

use hashbrown::HashMap;

use super::Leg;
use crate::model::StopId;
use crate::pareto::Dominance;

struct LabelRecord<T> {
    criteria: T,
    leg: Leg,
    parent: Option<u32>,
    round: usize,
    stop: StopId,
}

/// Outcome of [`MultiCriteriaState::try_insert`], mirroring
/// [`crate::pareto::InsertResult`] but over arena indices so the caller can
/// still reach the dropped labels' criteria for a debug event.
pub enum MultiCriteriaInsert {
    Accepted { idx: u32, dropped: Vec<u32> },
    Rejected { dominated_by: u32 },
}

impl MultiCriteriaInsert {
    pub fn was_accepted(&self) -> bool {
        matches!(self, MultiCriteriaInsert::Accepted { .. })
    }
}

/// Labels never move once pushed; indices returned by `try_insert` stay
/// valid for the state's whole lifetime, even after later inserts prune them
/// from their round/stop frontier.
pub struct MultiCriteriaState<T> {
    dominance: Dominance<T>,
    arena: Vec<LabelRecord<T>>,
    frontiers: Vec<HashMap<StopId, Vec<u32>>>,
}

impl<T: Clone> MultiCriteriaState<T> {
    pub fn new(dominance: Dominance<T>) -> Self {
        Self {
            dominance,
            arena: Vec::new(),
            frontiers: Vec::new(),
        }
    }

    fn ensure_round(&mut self, round: usize) {
        while self.frontiers.len() <= round {
            self.frontiers.push(HashMap::new());
        }
    }

    pub fn frontier(&self, round: usize, stop: StopId) -> &[u32] {
        self.frontiers
            .get(round)
            .and_then(|m| m.get(&stop))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn criteria(&self, idx: u32) -> &T {
        &self.arena[idx as usize].criteria
    }

    pub fn leg(&self, idx: u32) -> &Leg {
        &self.arena[idx as usize].leg
    }

    pub fn parent(&self, idx: u32) -> Option<u32> {
        self.arena[idx as usize].parent
    }

    pub fn stop_of(&self, idx: u32) -> StopId {
        self.arena[idx as usize].stop
    }

    pub fn round_of(&self, idx: u32) -> usize {
        self.arena[idx as usize].round
    }

    /// Tries to add a label at `(round, stop)`. Rejects it if an existing
    /// member of that stop's frontier dominates it; otherwise appends it to
    /// the arena and prunes whatever it dominates out of the frontier.
    pub fn try_insert(
        &mut self,
        round: usize,
        stop: StopId,
        criteria: T,
        leg: Leg,
        parent: Option<u32>,
    ) -> MultiCriteriaInsert {
        self.ensure_round(round);
        let existing: Vec<u32> = self.frontiers[round]
            .get(&stop)
            .cloned()
            .unwrap_or_default();

        if let Some(&dominator) = existing
            .iter()
            .find(|&&i| self.dominance.dominates(&self.arena[i as usize].criteria, &criteria))
        {
            return MultiCriteriaInsert::Rejected {
                dominated_by: dominator,
            };
        }

        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(existing.len() + 1);
        for i in existing {
            if self
                .dominance
                .dominates(&criteria, &self.arena[i as usize].criteria)
            {
                dropped.push(i);
            } else {
                kept.push(i);
            }
        }

        let idx = self.arena.len() as u32;
        self.arena.push(LabelRecord {
            criteria,
            leg,
            parent,
            round,
            stop,
        });
        kept.push(idx);
        self.frontiers[round].insert(stop, kept);

        MultiCriteriaInsert::Accepted { idx, dropped }
    }

    pub fn rounds_recorded(&self) -> usize {
        self.frontiers.len()
    }
}
