use std::{
    collections::{BTreeSet, HashSet},
    hash::Hash,
};

use itertools::Itertools;

use crate::{first::FirstSets, traits::SymbolSlice as _, Rule, RuleSet, Symbol};

pub type ItemSetId = usize;

impl<'sid> Rule<'sid> {
    /// Returns the item of this rule with the dot at `position`, if the
    /// position is in range.
    pub fn at<'rule, const K: usize>(&'rule self, position: usize) -> Option<Item<'sid, 'rule, K>> {
        Item::new(self, position)
    }
}

impl<'sid, 'sym> RuleSet<'sid, 'sym> {
    /// Returns the kernel of state #0: the augmented item with the dot at
    /// position 0, with lookahead `{<eos>}` when lookaheads are tracked.
    pub fn start_item_set<const K: usize>(&self) -> ItemSet<'sid, '_, K> {
        let mut start = self
            .augmented_rule()
            .at::<K>(0)
            .expect("position 0 is always in range");

        if K > 0 {
            start.lookaheads = BTreeSet::from_iter([self.as_symbol_slice().eos()]);
        }

        [start].into_iter().collect()
    }
}

/// A rule item: a rule paired with a dot position, plus a lookahead set when
/// `K == 1`. `K` decides whether lookaheads are tracked; the construction is
/// otherwise identical for both modes.
///
/// # Example
/// A -> w • <eos>
#[derive(Debug, Clone, Eq)]
pub struct Item<'sid, 'rule, const K: usize> {
    pub rule: &'rule Rule<'sid>,
    pub position: usize,
    pub lookaheads: BTreeSet<Symbol<'sid>>,
}

impl<const K: usize> PartialEq for Item<'_, '_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.rule.id == other.rule.id
            && self.position == other.position
            && self.lookaheads == other.lookaheads
    }
}

impl<const K: usize> Hash for Item<'_, '_, K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rule.id.hash(state);
        self.position.hash(state);
        self.lookaheads.hash(state);
    }
}

impl<const K: usize> std::fmt::Display for Item<'_, '_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rhs = self
            .rule
            .rhs
            .iter()
            .map(ToString::to_string)
            .enumerate()
            .map(|(pos, mut s)| {
                if pos == self.position {
                    s.insert_str(0, "• ");
                }
                s
            })
            .join(" ");

        if self.is_exhausted() {
            rhs.push_str(" •");
        }

        write!(f, "[({}) {} -> {}", self.rule.id, self.rule.lhs, rhs)?;

        if !self.lookaheads.is_empty() {
            write!(f, ", {}]", self.lookaheads.iter().join("/"))
        } else {
            write!(f, "]")
        }
    }
}

impl<'sid, 'rule, const K: usize> Item<'sid, 'rule, K> {
    fn new(rule: &'rule Rule<'sid>, position: usize) -> Option<Self> {
        (position <= rule.rhs.len()).then_some(Self {
            rule,
            position,
            lookaheads: BTreeSet::default(),
        })
    }

    /// Check if we reached the end of the rule.
    ///
    /// # Example
    /// A -> w •
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.rule.rhs.len()
    }

    /// The item is reaching the end of stream (<eos>).
    pub fn is_reaching_end(&self) -> bool {
        self.symbol().map(|sym| sym.is_eos()).unwrap_or(false)
    }

    pub fn is_symbol_terminal(&self) -> bool {
        self.symbol().map(|sym| sym.is_terminal()).unwrap_or(false)
    }

    pub fn is_symbol_non_terminal(&self) -> bool {
        self.symbol()
            .map(|sym| sym.is_non_terminal())
            .unwrap_or(false)
    }

    /// Returns the symbol right after the dot.
    /// If A -> w •, returns None.
    pub fn symbol(&self) -> Option<Symbol<'sid>> {
        self.rule.rhs.get(self.position).copied()
    }

    /// The symbols after the dotted one (the β of `A → α · B β`).
    pub fn tail(&self) -> &'rule [Symbol<'sid>] {
        self.rule.rhs.get(self.position + 1..).unwrap_or(&[])
    }

    /// Returns the item with the dot moved past the current symbol,
    /// lookaheads carried through unchanged.
    ///
    /// Returns None if the rule is exhausted.
    ///
    /// # Example
    /// (A -> • w).next() -> (A -> w •)
    pub fn next(&self) -> Option<Self> {
        Self::new(self.rule, self.position + 1).map(|mut item| {
            item.lookaheads = self.lookaheads.clone();
            item
        })
    }
}

/// A state of the automaton: a unique kernel, plus the items added by
/// closure.
#[derive(Debug, Default)]
pub struct ItemSet<'sid, 'rule, const K: usize> {
    /// Identifier of the item set, in discovery order.
    pub id: ItemSetId,
    kernel: HashSet<Item<'sid, 'rule, K>>,
    items: Vec<Item<'sid, 'rule, K>>,
}

impl<const K: usize> std::fmt::Display for ItemSet<'_, '_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}{{", self.id)?;
        write!(f, "{}", self.iter().map(ToString::to_string).join(", "))?;
        write!(f, "}}")
    }
}

/// Compares kernel sets.
impl<const K: usize> PartialEq for ItemSet<'_, '_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.kernel.eq(&other.kernel)
    }
}

impl<const K: usize> Eq for ItemSet<'_, '_, K> {}

impl<'sid, 'rule, const K: usize> FromIterator<Item<'sid, 'rule, K>>
    for ItemSet<'sid, 'rule, K>
{
    /// Collect the iterator as a kernel set.
    fn from_iter<T: IntoIterator<Item = Item<'sid, 'rule, K>>>(iter: T) -> Self {
        Self {
            id: 0,
            kernel: iter.into_iter().collect(),
            items: vec![],
        }
    }
}

impl<'sid, 'rule, const K: usize> ItemSet<'sid, 'rule, K> {
    /// Iterate over all items within the set, kernel first.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'sid, 'rule, K>> {
        self.kernel.iter().chain(self.items.iter())
    }

    pub fn contains(&self, item: &Item<'sid, 'rule, K>) -> bool {
        self.kernel.contains(item) || self.items.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.kernel.is_empty() && self.items.is_empty()
    }

    /// Iterate over all exhausted items (A -> w •).
    pub fn iter_exhausted_items(&self) -> impl Iterator<Item = &Item<'sid, 'rule, K>> {
        self.iter().filter(|item| item.is_exhausted())
    }

    /// Returns true if one of the items has its dot before <eos>, meaning
    /// the state accepts.
    pub fn has_item_reaching_eos(&self) -> bool {
        self.iter().any(|item| item.is_reaching_end())
    }

    /// Close the item set.
    ///
    /// For every item `A → α · B β` with `B` non-terminal, add one item per
    /// rule producing `B`, with lookahead `FIRST(β · a)` when lookaheads are
    /// tracked. Lookahead sets of items sharing a core are unioned, and the
    /// item is requeued whenever its set grows, until the fixed point.
    pub fn close(&mut self, rules: &'rule RuleSet<'sid, '_>, first: &FirstSets<'sid>) {
        let mut stack: Vec<Item<'sid, 'rule, K>> = self.kernel.iter().cloned().collect();

        while let Some(item) = stack.pop() {
            let Some(symbol) = item.symbol() else {
                continue;
            };

            if !symbol.is_non_terminal() {
                continue;
            }

            let lookaheads = if K > 0 {
                first.of_sequence(item.tail(), &item.lookaheads)
            } else {
                BTreeSet::default()
            };

            for rule in rules.iter_by_symbol(&symbol) {
                match self
                    .items
                    .iter()
                    .position(|i| i.rule.id == rule.id && i.position == 0)
                {
                    Some(idx) => {
                        let existing = &mut self.items[idx];
                        let before = existing.lookaheads.len();
                        existing.lookaheads.extend(lookaheads.iter().copied());

                        if existing.lookaheads.len() > before {
                            stack.push(existing.clone());
                        }
                    }
                    None => {
                        let mut added = rule.at::<K>(0).expect("position 0 is always in range");
                        added.lookaheads = lookaheads.clone();
                        stack.push(added.clone());
                        self.items.push(added);
                    }
                }
            }
        }
    }

    /// All the sets reachable from the current one, as `(symbol, kernel)`
    /// pairs in symbol declaration order. There is never a transition over
    /// <eos>.
    pub fn reachable_sets(
        &self,
        rules: &'rule RuleSet<'sid, '_>,
    ) -> Vec<(Symbol<'sid>, ItemSet<'sid, 'rule, K>)> {
        rules
            .iter_symbols()
            .filter(|sym| !(sym.is_eos() || sym.is_epsilon() || sym.is_start()))
            .map(|sym| {
                (
                    sym,
                    self.iter()
                        .filter(|item| item.symbol() == Some(sym))
                        .flat_map(Item::next)
                        .collect::<ItemSet<'sid, 'rule, K>>(),
                )
            })
            .filter(|(_, set)| !set.is_empty())
            .collect()
    }
}
