mod common;

use common::SymbolLexer;

use tablr::traits::{Ast, Parser as _};
use tablr::{
    ConstRuleReducer, Cursor, ErrorKind, Grammar, LrParser, LrTable, NoCustomError, Rule, RuleRhs,
    Span, TablrResult, Token,
};

/// Node carrying the value computed for the expression so far.
#[derive(Debug, Clone)]
struct Num {
    kind: &'static str,
    value: i64,
}

impl Ast for Num {
    fn symbol_id(&self) -> &str {
        self.kind
    }
}

impl From<Token<'static>> for Num {
    fn from(token: Token<'static>) -> Self {
        Self {
            kind: token.kind,
            value: token.value.parse().unwrap_or_default(),
        }
    }
}

/// Left-recursive arithmetic over single digits. No precedence is declared
/// anywhere: the value follows the grammar's own left-to-right reduction
/// order.
///
/// 1. E := E + d
/// 2. E := E - d
/// 3. E := E * d
/// 4. E := E / d
/// 5. E := d
fn arithmetic_grammar() -> TablrResult<Grammar<'static>, NoCustomError> {
    let mut grammar = Grammar::new("E");

    grammar
        .add_terminal("d")?
        .add_terminal("+")?
        .add_terminal("-")?
        .add_terminal("*")?
        .add_terminal("/")?
        .add_non_terminal("E")?;

    grammar
        .add_rule("E", ["E", "+", "d"])?
        .add_rule("E", ["E", "-", "d"])?
        .add_rule("E", ["E", "*", "d"])?
        .add_rule("E", ["E", "/", "d"])?
        .add_rule("E", ["d"])?;

    Ok(grammar)
}

fn binary(
    rule: &Rule<'static>,
    mut rhs: RuleRhs<Num>,
    f: fn(i64, i64) -> i64,
) -> TablrResult<Num, NoCustomError> {
    let lhs = rhs.next().expect("the reduction pops E");
    let digit = rhs.nth(1).expect("the reduction pops d");

    Ok(Num {
        kind: rule.lhs.id,
        value: f(lhs.value, digit.value),
    })
}

fn reduce_add(rule: &Rule<'static>, rhs: RuleRhs<Num>) -> TablrResult<Num, NoCustomError> {
    binary(rule, rhs, |a, b| a + b)
}

fn reduce_sub(rule: &Rule<'static>, rhs: RuleRhs<Num>) -> TablrResult<Num, NoCustomError> {
    binary(rule, rhs, |a, b| a - b)
}

fn reduce_mul(rule: &Rule<'static>, rhs: RuleRhs<Num>) -> TablrResult<Num, NoCustomError> {
    binary(rule, rhs, |a, b| a * b)
}

fn reduce_div(rule: &Rule<'static>, rhs: RuleRhs<Num>) -> TablrResult<Num, NoCustomError> {
    binary(rule, rhs, |a, b| a / b)
}

fn reduce_digit(rule: &Rule<'static>, mut rhs: RuleRhs<Num>) -> TablrResult<Num, NoCustomError> {
    let digit = rhs.next().expect("the reduction pops d");

    Ok(Num {
        kind: rule.lhs.id,
        value: digit.value,
    })
}

const REDUCERS: [ConstRuleReducer<'static, Num, NoCustomError>; 5] = [
    ConstRuleReducer::new(reduce_add),
    ConstRuleReducer::new(reduce_sub),
    ConstRuleReducer::new(reduce_mul),
    ConstRuleReducer::new(reduce_div),
    ConstRuleReducer::new(reduce_digit),
];

fn lexer(input: &str) -> SymbolLexer<std::str::Chars<'_>> {
    SymbolLexer::new(&["+", "-", "*", "/"], input.chars())
}

fn eval<const K: usize>(input: &str) -> TablrResult<i64, NoCustomError> {
    let grammar = arithmetic_grammar()?;
    let table = LrTable::build::<K, NoCustomError>(&grammar)?;
    let parser = LrParser::new(&grammar, &table, &REDUCERS)?;

    let mut stream = lexer(input);
    parser.parse(&mut stream).map(|node| node.value)
}

#[test]
fn test_sums_reduce_left_to_right() {
    assert_eq!(eval::<1>("1 + 1 + 1").unwrap(), 3);
    assert_eq!(eval::<1>("1 - 1 - 1").unwrap(), -1);
}

#[test]
fn test_mixed_operators_follow_reduction_order() {
    assert_eq!(eval::<1>("1 * 1 * 1").unwrap(), 1);
    assert_eq!(eval::<1>("1 / 1 / 1").unwrap(), 1);
    // ((1 + 1) - 1) * 1, not operator precedence.
    assert_eq!(eval::<1>("1 + 1 - 1 * 1").unwrap(), 1);
    assert_eq!(eval::<1>("1 + 1 - 1 * 9").unwrap(), 9);
}

#[test]
fn test_grammar_builds_under_both_modes() {
    assert_eq!(eval::<0>("1 + 1 + 1").unwrap(), 3);
    assert_eq!(eval::<0>("1 - 1 - 1").unwrap(), -1);
}

#[test]
fn test_syntax_error_carries_context() {
    let err = eval::<1>("1 + + 1").unwrap_err();

    match err.kind() {
        ErrorKind::UnexpectedSymbol { got, expecting } => {
            assert_eq!(got, "+");
            assert!(expecting.contains("d"));
        }
        kind => panic!("unexpected error kind: {:?}", kind),
    }

    assert_eq!(
        err.span(),
        Some(Span::from(Cursor { line: 1, column: 5 }))
    );
}

#[test]
fn test_truncated_input_is_a_syntax_error() {
    let err = eval::<1>("1 +").unwrap_err();

    match err.kind() {
        ErrorKind::UnexpectedSymbol { got, expecting } => {
            assert_eq!(got, "<eos>");
            assert!(expecting.contains("d"));
        }
        kind => panic!("unexpected error kind: {:?}", kind),
    }
}

#[test]
fn test_tables_are_shared_across_threads() {
    let grammar = arithmetic_grammar().unwrap();
    let table = LrTable::build::<1, NoCustomError>(&grammar).unwrap();
    let parser = LrParser::new(&grammar, &table, &REDUCERS).unwrap();

    std::thread::scope(|scope| {
        let left = scope.spawn(|| {
            let mut stream = lexer("1 + 1 + 1");
            parser.parse(&mut stream).map(|node| node.value)
        });
        let right = scope.spawn(|| {
            let mut stream = lexer("1 - 1 - 1");
            parser.parse(&mut stream).map(|node| node.value)
        });

        assert_eq!(left.join().unwrap().unwrap(), 3);
        assert_eq!(right.join().unwrap().unwrap(), -1);
    });
}
