use crate::{traits::SymbolSlice as _, ErrorKind, RuleDef, Symbol, TablrResult};

/// A grammar, built once from a static description and then frozen into a
/// [crate::RuleSet] at construction time.
///
/// # Example
///
/// For the following grammar :
///
/// ```grammar
/// 1. E := E * B
/// 2. E := E + B
/// 3. E := B
/// 4. B := 0
/// 5. B := 1
/// ```
///
/// ```
/// use tablr_core::{Grammar, NoCustomError, TablrResult};
///
/// fn build() -> TablrResult<Grammar<'static>, NoCustomError> {
///     let mut grammar = Grammar::new("E");
///
///     grammar
///         .add_terminal("0")?
///         .add_terminal("1")?
///         .add_terminal("*")?
///         .add_terminal("+")?
///         .add_non_terminal("E")?
///         .add_non_terminal("B")?;
///
///     grammar
///         .add_rule("E", ["E", "*", "B"])?
///         .add_rule("E", ["E", "+", "B"])?
///         .add_rule("E", ["B"])?
///         .add_rule("B", ["0"])?
///         .add_rule("B", ["1"])?;
///
///     Ok(grammar)
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar<'sid> {
    start: &'sid str,
    symbols: Vec<Symbol<'sid>>,
    rules: Vec<RuleDef<'sid>>,
}

impl<'sid> AsRef<[Symbol<'sid>]> for Grammar<'sid> {
    fn as_ref(&self) -> &[Symbol<'sid>] {
        &self.symbols
    }
}

impl<'sid> Grammar<'sid> {
    /// Creates an empty grammar whose designated start symbol is `start`.
    ///
    /// The reserved symbols `<start>`, `<eos>` and `<eps>` are seeded.
    pub fn new(start: &'sid str) -> Self {
        Self {
            start,
            symbols: vec![Symbol::start(), Symbol::eos(), Symbol::epsilon()],
            rules: Vec::default(),
        }
    }

    /// The identifier of the designated start symbol.
    pub fn start_id(&self) -> &'sid str {
        self.start
    }

    /// Add a terminal symbol to the grammar.
    ///
    /// Returns an error if a symbol with the same id already exists.
    pub fn add_terminal<Error>(&mut self, id: &'sid str) -> TablrResult<&mut Self, Error> {
        self.add_symbol(Symbol::term(id))
    }

    /// Add a non-terminal symbol to the grammar.
    ///
    /// Returns an error if a symbol with the same id already exists.
    pub fn add_non_terminal<Error>(&mut self, id: &'sid str) -> TablrResult<&mut Self, Error> {
        self.add_symbol(Symbol::nterm(id))
    }

    fn add_symbol<Error>(&mut self, symbol: Symbol<'sid>) -> TablrResult<&mut Self, Error> {
        if self.try_get_symbol(symbol.id).is_some() {
            return Err(ErrorKind::DuplicatedSymbolId(symbol.id.to_string()).into());
        }

        self.symbols.push(symbol);
        Ok(self)
    }

    /// Add a new rule.
    ///
    /// The left-hand side must be a declared non-terminal; every right-hand
    /// side symbol must be declared and not reserved. An empty right-hand
    /// side declares an ε-rule.
    pub fn add_rule<Error, I>(&mut self, lhs: &'sid str, rhs: I) -> TablrResult<&mut Self, Error>
    where
        I: IntoIterator<Item = &'sid str>,
    {
        let lhs_sym = self
            .try_get_symbol(lhs)
            .ok_or_else(|| ErrorKind::unknown_symbol(lhs))?;

        if !lhs_sym.is_non_terminal() {
            return Err(ErrorKind::InvalidRuleLhs(lhs.to_string()).into());
        }

        let mut def = RuleDef::new(lhs, []);

        for id in rhs {
            let sym = self
                .try_get_symbol(id)
                .ok_or_else(|| ErrorKind::unknown_symbol(id))?;

            if sym.is_start() || sym.is_eos() || sym.is_epsilon() {
                return Err(ErrorKind::ReservedSymbol(id.to_string()).into());
            }

            def.rhs.push(id);
        }

        self.rules.push(def);
        Ok(self)
    }

    /// Iterate over the rule definitions, in declaration order.
    pub fn iter_rule_defs(&self) -> impl Iterator<Item = &RuleDef<'sid>> {
        self.rules.iter()
    }
}
