use prettytable::{Cell, Row as PtRow, Table as PtTable};
use std::collections::HashMap;

use crate::{
    traits::SymbolSlice as _, ErrorKind, Grammar, ItemSetId, RuleSet, Symbol, TablrResult,
};

use super::{Action, Graph, Transition};

pub mod traits {
    use crate::{lr::Action, ItemSetId, Symbol};

    /// Read-only view over compiled ACTION/GOTO tables.
    pub trait LrTable<'sid> {
        fn action<'a>(&'a self, state: ItemSetId, symbol: &Symbol<'_>) -> Option<&'a Action>;

        fn goto(&self, state: ItemSetId, symbol: &Symbol<'_>) -> Option<ItemSetId>;

        /// The number of rows in the table.
        fn len(&self) -> usize;

        fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// The terminals holding an action in the given state.
        fn iter_terminals<'a>(
            &'a self,
            state: ItemSetId,
        ) -> impl Iterator<Item = Symbol<'sid>> + 'a;

        /// The non-terminals holding a goto in the given state.
        fn iter_non_terminals<'a>(
            &'a self,
            state: ItemSetId,
        ) -> impl Iterator<Item = Symbol<'sid>> + 'a;

        /// Every outgoing transition of the given state: shift targets and
        /// gotos alike.
        fn iter_transitions<'a>(
            &'a self,
            state: ItemSetId,
        ) -> impl Iterator<Item = (Symbol<'sid>, ItemSetId)> + 'a;
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Row<'sid> {
    actions: HashMap<Symbol<'sid>, Action>,
    goto: HashMap<Symbol<'sid>, ItemSetId>,
}

impl<'sid> Row<'sid> {
    fn new() -> Self {
        Self {
            actions: HashMap::default(),
            goto: HashMap::default(),
        }
    }

    fn action(&self, symbol: &Symbol<'_>) -> Option<&Action> {
        self.actions.get(symbol.id)
    }

    fn goto(&self, symbol: &Symbol<'_>) -> Option<ItemSetId> {
        self.goto.get(symbol.id).copied()
    }

    /// Every ACTION write goes through here: a second, different action for
    /// the same terminal aborts the construction with a conflict.
    fn try_set_action<Error>(
        &mut self,
        state: ItemSetId,
        symbol: Symbol<'sid>,
        action: Action,
    ) -> TablrResult<(), Error> {
        match self.actions.get(&symbol) {
            None => {
                self.actions.insert(symbol, action);
                Ok(())
            }
            Some(existing) if *existing == action => Ok(()),
            Some(existing) => Err(conflict(state, symbol, *existing, action).into()),
        }
    }
}

/// Classifies the clash between the action already in the cell and the
/// incoming one. Accept is the shift of <eos>.
fn conflict<Error>(
    state: ItemSetId,
    symbol: Symbol<'_>,
    existing: Action,
    incoming: Action,
) -> ErrorKind<Error> {
    match (existing, incoming) {
        (Action::Reduce(a), Action::Reduce(b)) => {
            ErrorKind::reduce_reduce_conflict(state, symbol, a, b)
        }
        (shift, Action::Reduce(_)) => ErrorKind::shift_reduce_conflict(state, symbol, shift, incoming),
        (Action::Reduce(_), shift) => ErrorKind::shift_reduce_conflict(state, symbol, shift, existing),
        // Transitions are deterministic, so two shifts never disagree.
        (a, b) => ErrorKind::shift_reduce_conflict(state, symbol, a, b),
    }
}

impl<'sid> Row<'sid> {
    /// Builds one table row out of a state and its outgoing edges.
    ///
    /// LR(0) and LR(1) follow the same path; `K` only gates the terminals a
    /// reduce applies to.
    fn from_transition<const K: usize, Error>(
        transition: Transition<'sid, '_, '_, K>,
        symbols: &[Symbol<'sid>],
    ) -> TablrResult<Self, Error> {
        if K > 1 {
            return Err(ErrorKind::UnsupportedAlgorithm.into());
        }

        let state = transition.from.id;
        let mut row = Self::new();

        // The dot sits before <eos>: the next end of input accepts.
        if transition.from.has_item_reaching_eos() {
            row.try_set_action(state, symbols.eos(), Action::Accept)?;
        }

        for (sym, to) in transition.edges.iter().filter(|(sym, _)| sym.is_terminal()) {
            row.try_set_action(state, *sym, Action::Shift(to.id))?;
        }

        for item in transition.from.iter_exhausted_items() {
            if K == 0 {
                for sym in symbols.iter_terminals() {
                    row.try_set_action(state, sym, Action::Reduce(item.rule.id))?;
                }
            } else {
                for sym in item.lookaheads.iter() {
                    row.try_set_action(state, *sym, Action::Reduce(item.rule.id))?;
                }
            }
        }

        row.goto.extend(
            transition
                .edges
                .iter()
                .filter(|(sym, _)| sym.is_non_terminal())
                .map(|(sym, to)| (*sym, to.id)),
        );

        Ok(row)
    }
}

/// Compiled ACTION/GOTO tables. Immutable once built, and shareable
/// read-only across concurrently running parsers.
#[derive(PartialEq)]
pub struct LrTable<'sid, 'sym> {
    symbols: &'sym [Symbol<'sid>],
    rows: Vec<Row<'sid>>,
}

impl std::fmt::Debug for LrTable<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::fmt::Display for LrTable<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        let mut header = vec![Cell::new("#")];
        header.extend(
            self.symbols
                .iter_terminals()
                .chain(self.symbols.iter_non_terminals())
                .map(|sym| Cell::new(sym.id)),
        );
        table.add_row(PtRow::new(header));

        for (id, row) in self.rows.iter().enumerate() {
            let mut cells = vec![Cell::new(&id.to_string())];
            cells.extend(self.symbols.iter_terminals().map(|sym| {
                Cell::new(
                    &row.actions
                        .get(&sym)
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                )
            }));
            cells.extend(self.symbols.iter_non_terminals().map(|sym| {
                Cell::new(
                    &row.goto
                        .get(&sym)
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                )
            }));
            table.add_row(PtRow::new(cells));
        }

        write!(f, "{}", table)
    }
}

impl<'sid> traits::LrTable<'sid> for LrTable<'sid, '_> {
    fn action<'a>(&'a self, state: ItemSetId, symbol: &Symbol<'_>) -> Option<&'a Action> {
        self.rows.get(state).and_then(|row| row.action(symbol))
    }

    fn goto(&self, state: ItemSetId, symbol: &Symbol<'_>) -> Option<ItemSetId> {
        self.rows.get(state).and_then(|row| row.goto(symbol))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn iter_terminals<'a>(&'a self, state: ItemSetId) -> impl Iterator<Item = Symbol<'sid>> + 'a {
        self.rows
            .get(state)
            .into_iter()
            .flat_map(|row| row.actions.keys().copied())
    }

    fn iter_non_terminals<'a>(
        &'a self,
        state: ItemSetId,
    ) -> impl Iterator<Item = Symbol<'sid>> + 'a {
        self.rows
            .get(state)
            .into_iter()
            .flat_map(|row| row.goto.keys().copied())
    }

    fn iter_transitions<'a>(
        &'a self,
        state: ItemSetId,
    ) -> impl Iterator<Item = (Symbol<'sid>, ItemSetId)> + 'a {
        self.rows.get(state).into_iter().flat_map(|row| {
            row.actions
                .iter()
                .filter_map(|(sym, action)| match action {
                    Action::Shift(to) => Some((*sym, *to)),
                    _ => None,
                })
                .chain(row.goto.iter().map(|(sym, to)| (*sym, *to)))
        })
    }
}

impl<'sid, 'sym> LrTable<'sid, 'sym>
where
    'sid: 'sym,
{
    fn from_graph<const K: usize, Error>(
        graph: &Graph<'sid, 'sym, '_, K>,
        symbols: &'sym [Symbol<'sid>],
    ) -> TablrResult<Self, Error> {
        Ok(Self {
            symbols,
            rows: graph
                .iter_transitions()
                .map(|t| Row::from_transition(t, symbols))
                .collect::<TablrResult<Vec<_>, Error>>()?,
        })
    }

    /// Build the LR table of a grammar.
    ///
    /// `K` selects the construction: 0 for LR(0), 1 for LR(1). Any
    /// ambiguity of the grammar under the chosen mode is a construction
    /// error, never a silent resolution.
    pub fn build<const K: usize, Error>(grammar: &'sym Grammar<'sid>) -> TablrResult<Self, Error> {
        let rules = RuleSet::new(grammar)?;

        let mut graph = Graph::<K>::new(&rules);
        graph.build()?;

        LrTable::from_graph(&graph, grammar.as_symbol_slice())
    }
}
