use std::collections::HashSet;

/// Insertion-ordered collection keyed by integer id.
///
/// Rejects ids it has already seen and ids it was told to block, so a value can
/// appear at most once and blocked ids never appear at all.
#[derive(Debug, Clone)]
pub struct OrderedIdSet<T> {
    entries: Vec<(i64, T)>,
    seen: HashSet<i64>,
    blocked: HashSet<i64>,
}

impl<T> Default for OrderedIdSet<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), seen: HashSet::new(), blocked: HashSet::new() }
    }
}

impl<T> OrderedIdSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding(blocked: impl IntoIterator<Item = i64>) -> Self {
        Self { blocked: blocked.into_iter().collect(), ..Self::default() }
    }

    /// Returns false when `id` was already present or is blocked.
    pub fn insert(&mut self, id: i64, value: T) -> bool {
        if self.blocked.contains(&id) || !self.seen.insert(id) {
            return false;
        }
        self.entries.push((id, value));
        true
    }

    pub fn contains(&self, id: i64) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blocked ids followed by collected ids; what a query must leave out.
    pub fn exclusions(&self) -> Vec<i64> {
        let mut out: Vec<i64> = self.blocked.iter().copied().collect();
        out.sort_unstable();
        out.extend(self.entries.iter().map(|(id, _)| *id));
        out
    }

    pub fn truncate(&mut self, len: usize) {
        for (id, _) in self.entries.drain(len.min(self.entries.len())..) {
            self.seen.remove(&id);
        }
    }

    pub fn into_values(self) -> Vec<T> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order_and_rejects_repeats() {
        let mut set = OrderedIdSet::new();
        assert!(set.insert(3, "c"));
        assert!(set.insert(1, "a"));
        assert!(!set.insert(3, "c again"));
        assert!(set.insert(2, "b"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.into_values(), vec!["c", "a", "b"]);
    }

    #[test]
    fn blocked_ids_never_enter() {
        let mut set = OrderedIdSet::excluding([7]);
        assert!(!set.insert(7, ()));
        assert!(set.insert(8, ()));
        assert!(!set.contains(7));
        assert_eq!(set.exclusions(), vec![7, 8]);
    }

    #[test]
    fn truncate_forgets_dropped_ids() {
        let mut set = OrderedIdSet::new();
        for id in 1..=5 {
            set.insert(id, id * 10);
        }
        set.truncate(2);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(4));
        assert!(set.insert(4, 40));
        assert_eq!(set.into_values(), vec![10, 20, 40]);
    }
}
