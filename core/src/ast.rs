use crate::{parser::traits::Ast, rule::traits::RuleReducer, token::Token, Rule, RuleRhs, TablrResult};

/// Default structural parse-tree node, produced when a rule carries no
/// dedicated semantic action.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode<'kind> {
    pub kind: &'kind str,
    pub value: String,
    pub children: Vec<AstNode<'kind>>,
}

impl<'kind> AstNode<'kind> {
    pub fn new<I: IntoIterator<Item = Self>>(kind: &'kind str, children: I) -> Self {
        Self {
            kind,
            value: String::default(),
            children: children.into_iter().collect(),
        }
    }
}

/// Reduces every rule to a plain [AstNode].
pub struct AstNodeReducer;

impl<'kind, Error> RuleReducer<'kind, Error> for AstNodeReducer {
    type Ast = AstNode<'kind>;

    fn reduce(&self, rule: &Rule<'kind>, rhs: RuleRhs<Self::Ast>) -> TablrResult<Self::Ast, Error> {
        Ok(AstNode::new(rule.lhs.id, rhs))
    }
}

impl<'kind> Ast for AstNode<'kind> {
    fn symbol_id(&self) -> &str {
        self.kind
    }
}

impl<'kind> From<Token<'kind>> for AstNode<'kind> {
    fn from(token: Token<'kind>) -> Self {
        Self {
            kind: token.kind,
            value: token.value,
            children: vec![],
        }
    }
}
