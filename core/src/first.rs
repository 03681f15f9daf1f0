use std::collections::{BTreeSet, HashMap};

use crate::{traits::SymbolSlice as _, RuleSet, Symbol};

/// FIRST sets of every grammar symbol, computed once per construction and
/// cached for its whole duration.
///
/// Membership of `<eps>` records that a symbol derives the empty string.
#[derive(Debug)]
pub struct FirstSets<'sid> {
    sets: HashMap<Symbol<'sid>, BTreeSet<Symbol<'sid>>>,
    epsilon: Symbol<'sid>,
}

impl<'sid> FirstSets<'sid> {
    /// Fixed point over the rule set.
    pub fn new(rules: &RuleSet<'sid, '_>) -> Self {
        let epsilon = rules.as_symbol_slice().epsilon();

        let mut sets: HashMap<Symbol<'sid>, BTreeSet<Symbol<'sid>>> = rules
            .iter_symbols()
            .map(|sym| {
                if sym.is_terminal() || sym.is_epsilon() {
                    (sym, BTreeSet::from_iter([sym]))
                } else {
                    (sym, BTreeSet::default())
                }
            })
            .collect();

        loop {
            let mut changed = false;

            for rule in rules.iter() {
                let firsts = sequence_first(&sets, epsilon, &rule.rhs);
                let set = sets
                    .get_mut(&rule.lhs)
                    .expect("every rule lhs is a declared symbol");

                let before = set.len();
                set.extend(firsts);
                changed |= set.len() > before;
            }

            if !changed {
                break;
            }
        }

        Self { sets, epsilon }
    }

    /// FIRST of a single symbol.
    ///
    /// # Panics
    /// Panics if the symbol does not belong to the grammar.
    pub fn of(&self, symbol: &Symbol<'sid>) -> &BTreeSet<Symbol<'sid>> {
        self.sets
            .get(symbol)
            .unwrap_or_else(|| panic!("the grammar does not include symbol {}", symbol))
    }

    /// FIRST(β · a): the terminals that can start `symbols`, falling back on
    /// the `tail` lookahead set when `symbols` derives the empty string.
    pub fn of_sequence(
        &self,
        symbols: &[Symbol<'sid>],
        tail: &BTreeSet<Symbol<'sid>>,
    ) -> BTreeSet<Symbol<'sid>> {
        let mut out = sequence_first(&self.sets, self.epsilon, symbols);

        if out.remove(&self.epsilon) {
            out.extend(tail.iter().copied());
        }

        out
    }
}

/// FIRST of a symbol sequence; `<eps>` is in the result iff the whole
/// sequence is nullable.
fn sequence_first<'sid>(
    sets: &HashMap<Symbol<'sid>, BTreeSet<Symbol<'sid>>>,
    epsilon: Symbol<'sid>,
    symbols: &[Symbol<'sid>],
) -> BTreeSet<Symbol<'sid>> {
    let mut out = BTreeSet::default();

    for symbol in symbols {
        let Some(first) = sets.get(symbol) else {
            return out;
        };

        out.extend(first.iter().copied().filter(|sym| !sym.is_epsilon()));

        if !first.contains(&epsilon) {
            return out;
        }
    }

    out.insert(epsilon);
    out
}
