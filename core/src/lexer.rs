pub mod traits {
    use crate::{token::traits::Token, Span, TablrResult};

    /// A pull-based token source.
    ///
    /// The parser never inspects raw characters: it reads token kinds for
    /// table lookups and hands token values to the reducers. End of input is
    /// the iterator running dry.
    pub trait Lexer<Error>: Iterator<Item = TablrResult<Self::Token, Error>> {
        type Token: Token;

        /// Current position in the underlying stream.
        fn span(&self) -> Span;
    }
}
