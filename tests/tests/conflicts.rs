mod common;

use common::SymbolLexer;

use tablr::lr::Action;
use tablr::traits::Parser as _;
use tablr::{
    AstNodeReducer, ErrorKind, Grammar, LrParser, LrTable, NoCustomError, TablrResult,
};

/// `A` and `B` both reduce from a single `a`: the clash is independent of
/// any lookahead.
fn reduce_reduce_grammar() -> TablrResult<Grammar<'static>, NoCustomError> {
    let mut grammar = Grammar::new("S");

    grammar
        .add_terminal("a")?
        .add_non_terminal("S")?
        .add_non_terminal("A")?
        .add_non_terminal("B")?;

    grammar
        .add_rule("S", ["A"])?
        .add_rule("S", ["B"])?
        .add_rule("A", ["a"])?
        .add_rule("B", ["a"])?;

    Ok(grammar)
}

/// The textbook ambiguous expression grammar: after `E + E` the parser can
/// either reduce or shift the next `+`, under any lookahead depth.
fn shift_reduce_grammar() -> TablrResult<Grammar<'static>, NoCustomError> {
    let mut grammar = Grammar::new("E");

    grammar
        .add_terminal("d")?
        .add_terminal("+")?
        .add_non_terminal("E")?;

    grammar
        .add_rule("E", ["E", "+", "E"])?
        .add_rule("E", ["d"])?;

    Ok(grammar)
}

#[test]
fn test_reduce_reduce_conflict_under_both_modes() {
    let grammar = reduce_reduce_grammar().unwrap();

    for err in [
        LrTable::build::<0, NoCustomError>(&grammar).unwrap_err(),
        LrTable::build::<1, NoCustomError>(&grammar).unwrap_err(),
    ] {
        match err.kind() {
            ErrorKind::ReduceReduceConflict { rules, .. } => {
                assert_eq!(rules, &[2, 3]);
            }
            kind => panic!("unexpected error kind: {:?}", kind),
        }
    }
}

#[test]
fn test_shift_reduce_conflict_under_both_modes() {
    let grammar = shift_reduce_grammar().unwrap();

    for err in [
        LrTable::build::<0, NoCustomError>(&grammar).unwrap_err(),
        LrTable::build::<1, NoCustomError>(&grammar).unwrap_err(),
    ] {
        match err.kind() {
            ErrorKind::ShiftReduceConflict {
                symbol, conflict, ..
            } => {
                assert_eq!(symbol.id, "+");
                assert!(matches!(conflict[0], Action::Shift(_)));
                assert_eq!(conflict[1], Action::Reduce(0));
            }
            kind => panic!("unexpected error kind: {:?}", kind),
        }
    }
}

#[test]
fn test_conflicts_never_reach_the_parser() {
    // Construction owns ambiguity detection: no table, no parser, nothing
    // left to parse with.
    let grammar = shift_reduce_grammar().unwrap();
    assert!(LrTable::build::<1, NoCustomError>(&grammar).is_err());
}

fn smoke_grammar() -> TablrResult<Grammar<'static>, NoCustomError> {
    let mut grammar = Grammar::new("S");

    grammar
        .add_terminal("a")?
        .add_terminal("b")?
        .add_non_terminal("S")?;

    grammar.add_rule("S", ["a", "b"])?;

    Ok(grammar)
}

#[test]
fn test_smoke_grammar_parses_ab_under_both_modes() {
    let grammar = smoke_grammar().unwrap();

    let lr0 = LrTable::build::<0, NoCustomError>(&grammar).expect("no conflict under LR(0)");
    let lr1 = LrTable::build::<1, NoCustomError>(&grammar).expect("no conflict under LR(1)");

    for table in [&lr0, &lr1] {
        let parser = LrParser::new(&grammar, table, &[AstNodeReducer]).unwrap();
        let mut lexer = SymbolLexer::new(&["a", "b"], "ab".chars());
        let ast = parser.parse(&mut lexer).unwrap();
        assert_eq!(ast.kind, "S");
    }
}
