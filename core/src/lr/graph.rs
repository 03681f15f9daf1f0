use std::collections::VecDeque;

use crate::{first::FirstSets, ItemSet, ItemSetId, RuleSet, Symbol, TablrResult};

/// The canonical collection: every discovered state and the transition edges
/// between them. States are numbered in discovery order, so every retained
/// state is reachable from #0.
pub struct Graph<'sid, 'sym, 'rule, const K: usize> {
    rules: &'rule RuleSet<'sid, 'sym>,
    pub(super) sets: Vec<ItemSet<'sid, 'rule, K>>,
    pub(super) edges: Vec<(ItemSetId, Symbol<'sid>, ItemSetId)>,
}

impl<'sid, 'sym, 'rule, const K: usize> Graph<'sid, 'sym, 'rule, K> {
    pub fn new(rules: &'rule RuleSet<'sid, 'sym>) -> Self {
        Self {
            rules,
            sets: vec![rules.start_item_set()],
            edges: vec![],
        }
    }

    /// Returns true if a set with the same kernel exists.
    fn contains(&self, set: &ItemSet<'sid, 'rule, K>) -> bool {
        self.sets.iter().any(|s| s == set)
    }

    fn get_mut(&mut self, id: ItemSetId) -> Option<&mut ItemSet<'sid, 'rule, K>> {
        self.sets.get_mut(id)
    }

    fn get(&self, id: ItemSetId) -> Option<&ItemSet<'sid, 'rule, K>> {
        self.sets.get(id)
    }

    fn get_id(&self, kernel: &ItemSet<'sid, 'rule, K>) -> Option<ItemSetId> {
        self.sets.iter().find(|set| *set == kernel).map(|set| set.id)
    }

    /// Push a new set in the graph, if it does not yet exist.
    fn push(&mut self, mut set: ItemSet<'sid, 'rule, K>) -> ItemSetId {
        if !self.contains(&set) {
            let id = self.sets.len();
            set.id = id;
            self.sets.push(set);
            return id;
        }

        self.get_id(&set).expect("the set was just checked for")
    }

    /// Breadth-first fixed point: close every discovered state and follow
    /// its transitions until no new state or edge appears.
    pub fn build<Error>(&mut self) -> TablrResult<(), Error> {
        let rules = self.rules;
        let first = FirstSets::new(rules);

        let mut stack = VecDeque::from_iter([0]);

        while let Some(set_id) = stack.pop_front() {
            self.get_mut(set_id)
                .unwrap_or_else(|| panic!("missing state {set_id}"))
                .close(rules, &first);

            for (symbol, kernel) in self
                .get(set_id)
                .unwrap_or_else(|| panic!("missing state {set_id}"))
                .reachable_sets(rules)
            {
                let to_id = if !self.contains(&kernel) {
                    let id = self.push(kernel);
                    stack.push_back(id);
                    id
                } else {
                    self.get_id(&kernel).expect("the kernel is known")
                };

                self.edges.push((set_id, symbol, to_id));
            }
        }

        log::debug!(
            "canonical collection: {} states, {} transitions",
            self.sets.len(),
            self.edges.len()
        );

        Ok(())
    }
}
