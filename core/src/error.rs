use itertools::Itertools as _;
use thiserror::Error;

use crate::{lr::Action, ItemSetId, OwnedSymbol, RuleId, Span, Symbol};

/// Placeholder for parsers which do not define their own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCustomError;

impl std::fmt::Display for NoCustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no error")
    }
}

/// The terminals which would have been valid where the error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSymbols(Vec<String>);

impl ExpectedSymbols {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|sym| sym == id)
    }
}

impl std::fmt::Display for ExpectedSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().join(", ").fmt(f)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind<C> {
    #[error("a symbol with the same identifier is already defined: {0}")]
    DuplicatedSymbolId(String),

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("symbol {0} is reserved and cannot appear in a rule")]
    ReservedSymbol(String),

    #[error("the left-hand side of a rule must be a non-terminal symbol, got {0}")]
    InvalidRuleLhs(String),

    #[error("no rule produces the start symbol {0}")]
    MissingStartRule(String),

    #[error("unexpected symbol {got}, expecting {expecting}")]
    UnexpectedSymbol {
        got: String,
        expecting: ExpectedSymbols,
    },

    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    #[error("missing goto for non-terminal {1} (state #{0})")]
    MissingGoto(ItemSetId, OwnedSymbol),

    #[error("a shift-reduce conflict has occurred for symbol {symbol} [{conflict:?}], state=#{state}")]
    ShiftReduceConflict {
        state: ItemSetId,
        symbol: OwnedSymbol,
        conflict: [Action; 2],
    },

    #[error("a reduce-reduce conflict has occurred for symbol {symbol} between rules {rules:?}, state=#{state}")]
    ReduceReduceConflict {
        state: ItemSetId,
        symbol: OwnedSymbol,
        rules: [RuleId; 2],
    },

    #[error("the algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("{0}")]
    Other(C),
}

impl<C> ErrorKind<C> {
    pub fn unexpected_symbol<I, S>(got: &str, expecting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::UnexpectedSymbol {
            got: got.to_string(),
            expecting: ExpectedSymbols(expecting.into_iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn unknown_symbol(got: &str) -> Self {
        Self::UnknownSymbol(got.to_string())
    }

    /// The shift (or accept) action is stored first.
    pub fn shift_reduce_conflict(
        state: ItemSetId,
        symbol: Symbol<'_>,
        shift: Action,
        reduce: Action,
    ) -> Self {
        Self::ShiftReduceConflict {
            state,
            symbol: symbol.into_owned(),
            conflict: [shift, reduce],
        }
    }

    /// Rule indices are stored in ascending order.
    pub fn reduce_reduce_conflict(
        state: ItemSetId,
        symbol: Symbol<'_>,
        a: RuleId,
        b: RuleId,
    ) -> Self {
        Self::ReduceReduceConflict {
            state,
            symbol: symbol.into_owned(),
            rules: if a <= b { [a, b] } else { [b, a] },
        }
    }
}

/// Error raised during table construction or parsing.
///
/// The kind carries the full structural context (state ids, symbols, rule
/// indices), so callers can build diagnostics without re-deriving automaton
/// internals.
#[derive(Debug, Clone, PartialEq)]
pub struct TablrError<C> {
    kind: ErrorKind<C>,
    /// Location of the error in the stream, when one applies.
    pub(crate) span: Option<Span>,
}

impl<C> TablrError<C> {
    pub fn new(kind: impl Into<ErrorKind<C>>, span: Option<Span>) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    pub fn kind(&self) -> &ErrorKind<C> {
        &self.kind
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl<C> From<ErrorKind<C>> for TablrError<C> {
    fn from(kind: ErrorKind<C>) -> Self {
        Self { kind, span: None }
    }
}

impl<C: std::fmt::Display> std::fmt::Display for TablrError<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)?;
        if let Some(span) = &self.span {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}

impl<C> std::error::Error for TablrError<C> where C: std::fmt::Debug + std::fmt::Display {}
