//! A generic Pareto-optimal container.
//!
//! Axes are configured as `(extract, strictly_better)` pairs rather than
//! hard-coded per use site, so the same container serves the per-stop
//! frontier (multi-criteria), the destination frontier, and the
//! scalar result set, each with its own axis list.

/// One comparison axis: pulls a value out of `T` and says whether one value
/// strictly beats another on that axis alone.
pub struct DominanceAxis<T> {
    extract: Box<dyn Fn(&T) -> i64 + Send + Sync>,
    strictly_better: Box<dyn Fn(i64, i64) -> bool + Send + Sync>,
}

impl<T> DominanceAxis<T> {
    pub fn new(
        extract: impl Fn(&T) -> i64 + Send + Sync + 'static,
        strictly_better: impl Fn(i64, i64) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            extract: Box::new(extract),
            strictly_better: Box::new(strictly_better),
        }
    }

    /// A "smaller is better" axis — the common case (arrival time, cost,
    /// transfer count, travel duration all minimize).
    pub fn minimize(extract: impl Fn(&T) -> i64 + Send + Sync + 'static) -> Self {
        Self::new(extract, |a, b| a < b)
    }
}

/// A composed dominance predicate over one or more axes.
pub struct Dominance<T> {
    axes: Vec<DominanceAxis<T>>,
}

impl<T> Dominance<T> {
    pub fn new(axes: Vec<DominanceAxis<T>>) -> Self {
        assert!(!axes.is_empty(), "a dominance predicate needs at least one axis");
        Self { axes }
    }

    /// `a` dominates `b`: not worse than `b` on every axis, strictly better
    /// on at least one.
    pub fn dominates(&self, a: &T, b: &T) -> bool {
        let mut strictly_better_on_some = false;
        for axis in &self.axes {
            let av = (axis.extract)(a);
            let bv = (axis.extract)(b);
            if (axis.strictly_better)(bv, av) {
                return false;
            }
            if (axis.strictly_better)(av, bv) {
                strictly_better_on_some = true;
            }
        }
        strictly_better_on_some
    }

    /// `a` and `b` land on the same point: neither strictly better than the
    /// other on any axis. Two such points never dominate each other under
    /// `dominates`, so without this check exact duplicates (the same
    /// outcome re-discovered, e.g. from a different departure minute) would
    /// pile up in a `ParetoSet` forever.
    pub fn ties(&self, a: &T, b: &T) -> bool {
        self.axes.iter().all(|axis| {
            let av = (axis.extract)(a);
            let bv = (axis.extract)(b);
            !(axis.strictly_better)(av, bv) && !(axis.strictly_better)(bv, av)
        })
    }
}

/// Opaque position in the set's insertion order, returned by
/// [`ParetoSet::mark`] and consumed by [`ParetoSet::since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(u64);

struct Entry<T> {
    value: T,
    seq: u64,
}

/// Outcome of one [`ParetoSet::insert`] call, carrying exactly the payload
/// the debug channel needs: accepted members report what
/// they dropped, rejected candidates report the witness that dominated
/// them.
pub enum InsertResult<T> {
    Accepted { dropped: Vec<T> },
    Rejected { dominated_by: T },
}

impl<T> InsertResult<T> {
    pub fn was_accepted(&self) -> bool {
        matches!(self, InsertResult::Accepted { .. })
    }
}

/// An append-only, Pareto-optimal collection: no two members
/// dominate each other; every insert either gets rejected by an existing
/// dominator or displaces the members it dominates.
pub struct ParetoSet<T> {
    dominance: Dominance<T>,
    members: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T: Clone> ParetoSet<T> {
    pub fn new(dominance: Dominance<T>) -> Self {
        Self {
            dominance,
            members: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter().map(|e| &e.value)
    }

    /// Captures the current insertion position. Combine with [`Self::since`]
    /// to read only members inserted after this call — used by the worker
    /// to feed each round's new transit arrivals onward without re-reading
    /// arrivals already consumed.
    pub fn mark(&self) -> Marker {
        Marker(self.next_seq)
    }

    pub fn since(&self, marker: Marker) -> impl Iterator<Item = &T> {
        self.members
            .iter()
            .filter(move |e| e.seq >= marker.0)
            .map(|e| &e.value)
    }

    /// Inserts `item`. If any existing member dominates it, it is rejected
    /// and the set is unchanged; otherwise it is inserted and every existing
    /// member it dominates is dropped.
    pub fn insert(&mut self, item: T) -> InsertResult<T> {
        if let Some(dominator) = self
            .members
            .iter()
            .find(|e| self.dominance.dominates(&e.value, &item) || self.dominance.ties(&e.value, &item))
        {
            return InsertResult::Rejected {
                dominated_by: dominator.value.clone(),
            };
        }

        let dominance = &self.dominance;
        let mut dropped = Vec::new();
        self.members.retain(|existing| {
            if dominance.dominates(&item, &existing.value) {
                dropped.push(existing.value.clone());
                false
            } else {
                true
            }
        });

        let seq = self.next_seq;
        self.next_seq += 1;
        self.members.push(Entry { value: item, seq });

        InsertResult::Accepted { dropped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Candidate {
        arrival: i64,
        transfers: i64,
    }

    fn dominance() -> Dominance<Candidate> {
        Dominance::new(vec![
            DominanceAxis::minimize(|c: &Candidate| c.arrival),
            DominanceAxis::minimize(|c: &Candidate| c.transfers),
        ])
    }

    #[test]
    fn rejects_dominated_candidate() {
        let mut set = ParetoSet::new(dominance());
        set.insert(Candidate {
            arrival: 100,
            transfers: 0,
        });
        let result = set.insert(Candidate {
            arrival: 110,
            transfers: 1,
        });
        assert!(!result.was_accepted());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn keeps_tradeoffs() {
        let mut set = ParetoSet::new(dominance());
        set.insert(Candidate {
            arrival: 100,
            transfers: 3,
        });
        let result = set.insert(Candidate {
            arrival: 110,
            transfers: 0,
        });
        assert!(result.was_accepted());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn drops_members_the_new_one_dominates() {
        let mut set = ParetoSet::new(dominance());
        set.insert(Candidate {
            arrival: 120,
            transfers: 2,
        });
        let result = set.insert(Candidate {
            arrival: 100,
            transfers: 1,
        });
        match result {
            InsertResult::Accepted { dropped } => assert_eq!(dropped.len(), 1),
            InsertResult::Rejected { .. } => panic!("expected acceptance"),
        }
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn marker_excludes_older_members() {
        let mut set = ParetoSet::new(dominance());
        set.insert(Candidate {
            arrival: 100,
            transfers: 0,
        });
        let marker = set.mark();
        set.insert(Candidate {
            arrival: 50,
            transfers: 5,
        });
        assert_eq!(set.since(marker).count(), 1);
        assert_eq!(set.iter().count(), 2);
    }
}
