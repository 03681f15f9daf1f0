use std::marker::PhantomData;

use crate::{
    lexer::traits::Lexer,
    parser::traits::{Ast, Parser},
    rule::traits::RuleReducer,
    token::traits::Token,
    traits::SymbolSlice as _,
    ErrorKind, Grammar, ItemSetId, RuleSet, TablrError, TablrResult,
};

mod action;
mod graph;
mod table;
mod transition;

pub use action::*;
use graph::*;
pub use table::*;
use transition::*;

/// Table-driven shift-reduce parser.
///
/// The parser borrows the frozen table and keeps no mutable state across
/// invocations: every [Parser::parse] call owns a fresh stack pair, so one
/// parser can be reused across independent inputs, or shared across threads.
pub struct LrParser<'sid, 'sym, 'table, 'reducers, Node, Table, Reducer, Error>
where
    Node: Ast,
    Table: self::traits::LrTable<'sid>,
    Reducer: RuleReducer<'sid, Error, Ast = Node>,
{
    rules: RuleSet<'sid, 'sym>,
    table: &'table Table,
    reducers: &'reducers [Reducer],
    _phantom: PhantomData<(Node, Error)>,
}

impl<'sid, 'sym, 'table, 'reducers, Node, Table, Reducer, Error>
    LrParser<'sid, 'sym, 'table, 'reducers, Node, Table, Reducer, Error>
where
    Node: Ast,
    Table: self::traits::LrTable<'sid>,
    Reducer: RuleReducer<'sid, Error, Ast = Node>,
{
    /// Builds a parser over a compiled table, one reducer per user rule.
    ///
    /// # Panics
    /// Panics if the number of reducers differs from the number of user
    /// rules.
    pub fn new(
        grammar: &'sym Grammar<'sid>,
        table: &'table Table,
        reducers: &'reducers [Reducer],
    ) -> TablrResult<Self, Error> {
        let rules = RuleSet::new(grammar)?;

        if reducers.len() != rules.user_rule_count() {
            panic!(
                "the number of reducers must match the number of grammar rules ({})",
                rules.user_rule_count()
            );
        }

        Ok(Self {
            rules,
            table,
            reducers,
            _phantom: PhantomData,
        })
    }
}

impl<'sid, 'sym, 'table, 'reducers, Node, Table, Reducer, Error> Parser<Error>
    for LrParser<'sid, 'sym, 'table, 'reducers, Node, Table, Reducer, Error>
where
    Error: Clone,
    Node: Ast,
    Table: self::traits::LrTable<'sid>,
    Reducer: RuleReducer<'sid, Error, Ast = Node>,
{
    type Ast = Node;

    fn parse<L: Lexer<Error>>(&self, lexer: &mut L) -> TablrResult<Self::Ast, Error>
    where
        Self::Ast: From<L::Token>,
    {
        let mut states: Vec<ItemSetId> = vec![0];
        let mut stack: Vec<Node> = Vec::default();

        let mut cursor = lexer.next();

        loop {
            let mut state = states.last().copied().expect("state #0 is never popped");

            let (symbol, token) = match &cursor {
                None => (self.rules.as_symbol_slice().eos(), None),
                Some(Ok(tok)) => (
                    self.rules
                        .as_symbol_slice()
                        .try_get_symbol(tok.symbol_id())
                        .ok_or_else(|| {
                            TablrError::new(
                                ErrorKind::unknown_symbol(tok.symbol_id()),
                                Some(tok.span()),
                            )
                        })?,
                    Some(tok),
                ),
                Some(Err(err)) => return Err(err.clone()),
            };

            let action = self.table.action(state, &symbol).ok_or_else(|| {
                TablrError::new(
                    ErrorKind::unexpected_symbol(
                        symbol.id,
                        self.table.iter_terminals(state).map(|s| s.id.to_string()),
                    ),
                    Some(token.map(|t| t.span()).unwrap_or_else(|| lexer.span())),
                )
            })?;

            log::trace!("#{} {} :: {}", state, symbol, action);

            match action {
                // Push the token on top of the stack and shift to the
                // given state.
                Action::Shift(next_state) => {
                    if !symbol.is_eos() {
                        stack.push(token.cloned().expect("shifts always hold a token").into());
                        cursor = lexer.next();
                    }
                    states.push(*next_state);
                }

                // Reduce by the given rule: pop the rule's right-hand side
                // from both stacks, run the reducer, push its node back.
                Action::Reduce(rule_id) => {
                    let rule = self.rules.borrow_rule(*rule_id);
                    let consume = rule.rhs.len();

                    states.truncate(states.len().saturating_sub(consume));
                    state = states.last().copied().expect("state #0 is never popped");

                    let goto = self.table.goto(state, &rule.lhs).ok_or_else(|| {
                        TablrError::new(ErrorKind::MissingGoto(state, rule.lhs.into_owned()), None)
                    })?;
                    states.push(goto);

                    let node = {
                        let drained = stack.drain(stack.len().saturating_sub(consume)..);

                        drained
                            .as_slice()
                            .iter()
                            .zip(rule.rhs.iter())
                            .try_for_each(|(node, expected)| {
                                if node.symbol_id() != expected.id {
                                    Err(TablrError::new(
                                        ErrorKind::unexpected_symbol(
                                            node.symbol_id(),
                                            [expected.id],
                                        ),
                                        None,
                                    ))
                                } else {
                                    Ok(())
                                }
                            })?;

                        let reducer = &self.reducers[*rule_id];
                        reducer.reduce(rule, drained.into())
                    }?;

                    if node.symbol_id() != rule.lhs.id {
                        return Err(TablrError::new(
                            ErrorKind::unexpected_symbol(node.symbol_id(), [rule.lhs.id]),
                            None,
                        ));
                    }

                    stack.push(node);
                }

                Action::Accept => {
                    return stack
                        .pop()
                        .ok_or_else(|| ErrorKind::UnexpectedEndOfStream.into());
                }
            }
        }
    }
}
