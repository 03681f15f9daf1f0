pub mod traits {
    use crate::{lexer::traits::Lexer, TablrResult};

    /// A node of the produced parse tree.
    pub trait Ast {
        fn symbol_id(&self) -> &str;
    }

    pub trait Parser<Error: Clone> {
        type Ast: Ast;

        fn parse<L: Lexer<Error>>(&self, lexer: &mut L) -> TablrResult<Self::Ast, Error>
        where
            Self::Ast: From<L::Token>;
    }
}
