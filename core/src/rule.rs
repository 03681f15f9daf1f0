use std::{hash::Hash, marker::PhantomData, vec::Drain};

use itertools::Itertools;

use crate::{traits::SymbolSlice as _, ErrorKind, Grammar, Symbol, TablrResult};

/// The rule's identifier in the grammar.
///
/// User rules keep their declaration ordinals `0..n`; the synthesized
/// augmented rule receives ordinal `n` and is never the target of a reduce.
pub type RuleId = usize;

/// An iterator over the right-hand-side values popped on a reduction.
pub struct RuleRhs<'a, Ast>(Drain<'a, Ast>);

impl<'a, Ast> From<Drain<'a, Ast>> for RuleRhs<'a, Ast> {
    fn from(value: Drain<'a, Ast>) -> Self {
        Self(value)
    }
}

impl<'a, Ast> Iterator for RuleRhs<'a, Ast> {
    type Item = Ast;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

pub mod traits {
    use crate::{Rule, RuleRhs, TablrResult};

    /// The semantic action attached to a grammar rule, invoked with the
    /// matched right-hand-side values on each reduction.
    pub trait RuleReducer<'sid, Error> {
        type Ast;

        fn reduce(&self, rule: &Rule<'sid>, rhs: RuleRhs<Self::Ast>) -> TablrResult<Self::Ast, Error>;
    }
}

/// A rule reducer backed by any closure.
pub struct RuleReducer<'sid, Ast, Error, Func>
where
    Func: Fn(&Rule<'sid>, RuleRhs<Ast>) -> TablrResult<Ast, Error>,
{
    f: Func,
    _phantom: PhantomData<&'sid (Ast, Error)>,
}

pub type RuleReducerFunc<'sid, Ast, Error> = fn(&Rule<'sid>, RuleRhs<Ast>) -> TablrResult<Ast, Error>;

/// A reducer backed by a plain function pointer, usable in const contexts.
pub type ConstRuleReducer<'sid, Ast, Error> =
    RuleReducer<'sid, Ast, Error, RuleReducerFunc<'sid, Ast, Error>>;

impl<'sid, Ast, Error, Func> RuleReducer<'sid, Ast, Error, Func>
where
    Func: Fn(&Rule<'sid>, RuleRhs<Ast>) -> TablrResult<Ast, Error>,
{
    pub const fn new(f: Func) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<'sid, Ast, Error, Func> traits::RuleReducer<'sid, Error> for RuleReducer<'sid, Ast, Error, Func>
where
    Func: Fn(&Rule<'sid>, RuleRhs<Ast>) -> TablrResult<Ast, Error>,
{
    type Ast = Ast;

    fn reduce(&self, rule: &Rule<'sid>, rhs: RuleRhs<Self::Ast>) -> TablrResult<Self::Ast, Error> {
        (self.f)(rule, rhs)
    }
}

/// Defines a grammar rule, as written by the caller.
///
/// X := A1..An
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef<'sid> {
    pub lhs: &'sid str,
    pub rhs: Vec<&'sid str>,
}

impl<'sid> RuleDef<'sid> {
    pub fn new<I>(lhs: &'sid str, rhs: I) -> Self
    where
        I: IntoIterator<Item = &'sid str>,
    {
        Self {
            lhs,
            rhs: rhs.into_iter().collect(),
        }
    }
}

/// A grammar rule with resolved symbols.
///
/// # Example
/// E -> E + B
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rule<'sid> {
    pub id: RuleId,
    pub lhs: Symbol<'sid>,
    pub rhs: Vec<Symbol<'sid>>,
}

impl std::fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}) {} => {}",
            self.id,
            self.lhs,
            self.rhs.iter().map(|s| s.to_string()).join(" ")
        )
    }
}

impl Hash for Rule<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

/// The resolved rule set driving table generation: every user rule in
/// declaration order, then the synthesized augmented rule `<start> → S <eos>`.
#[derive(Debug)]
pub struct RuleSet<'sid, 'sym> {
    rules: Vec<Rule<'sid>>,
    symbols: &'sym [Symbol<'sid>],
}

impl<'sid> AsRef<[Symbol<'sid>]> for RuleSet<'sid, '_> {
    fn as_ref(&self) -> &[Symbol<'sid>] {
        self.symbols
    }
}

impl<'sid, 'sym> RuleSet<'sid, 'sym> {
    /// Resolves the grammar into rules and synthesizes the augmented rule.
    ///
    /// Fails if the designated start symbol is unknown or has no producing
    /// rule.
    pub fn new<Error>(grammar: &'sym Grammar<'sid>) -> TablrResult<Self, Error> {
        let symbols = grammar.as_symbol_slice();

        let mut rules: Vec<Rule<'sid>> = grammar
            .iter_rule_defs()
            .enumerate()
            .map(|(id, def)| Rule {
                id,
                lhs: symbols.sym(def.lhs),
                rhs: def.rhs.iter().map(|id| symbols.sym(id)).collect(),
            })
            .collect();

        let start = symbols
            .try_get_symbol(grammar.start_id())
            .ok_or_else(|| ErrorKind::unknown_symbol(grammar.start_id()))?;

        if !rules.iter().any(|rule| rule.lhs == start) {
            return Err(ErrorKind::MissingStartRule(start.id.to_string()).into());
        }

        rules.push(Rule {
            id: rules.len(),
            lhs: symbols.start(),
            rhs: vec![start, symbols.eos()],
        });

        Ok(Self { rules, symbols })
    }

    /// The synthesized rule `<start> → S <eos>`.
    pub fn augmented_rule(&self) -> &Rule<'sid> {
        self.rules.last().expect("the rule set is never empty")
    }

    /// Number of rules written by the caller, the augmented rule excluded.
    pub fn user_rule_count(&self) -> usize {
        self.rules.len() - 1
    }

    /// Iterate over all symbols of the grammar, in declaration order.
    pub fn iter_symbols<'a>(&'a self) -> impl Iterator<Item = Symbol<'sid>> + 'a {
        self.symbols.iter().copied()
    }

    /// Iterate over all rules, augmented rule included.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<'sid>> {
        self.rules.iter()
    }

    /// Iterate over the rules producing the given symbol.
    pub fn iter_by_symbol<'a>(
        &'a self,
        sym: &Symbol<'sid>,
    ) -> impl Iterator<Item = &'a Rule<'sid>> + 'a
    where
        'sid: 'a,
    {
        let sym = *sym;
        self.iter().filter(move |rule| rule.lhs == sym)
    }

    pub fn borrow_rule(&self, id: RuleId) -> &Rule<'sid> {
        &self.rules[id]
    }
}
