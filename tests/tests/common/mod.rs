#![allow(dead_code)]

use tablr::traits::Lexer;
use tablr::{Cursor, ErrorKind, NoCustomError, Span, TablrError, TablrResult, Token};

/// The terminal id every digit is lexed into.
pub const DIGIT: &str = "d";

/// Whitespace-skipping single-char lexer: digits become `d` tokens carrying
/// their value, every other character must belong to the alphabet.
pub struct SymbolLexer<I>
where
    I: Iterator<Item = char>,
{
    alphabet: &'static [&'static str],
    stream: I,
    cursor: Cursor,
}

impl<I> SymbolLexer<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(alphabet: &'static [&'static str], stream: I) -> Self {
        Self {
            alphabet,
            stream,
            cursor: Cursor::default(),
        }
    }
}

impl<I> Iterator for SymbolLexer<I>
where
    I: Iterator<Item = char>,
{
    type Item = TablrResult<Token<'static>, NoCustomError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ch = self.stream.next()?;

            if ch == '\n' {
                self.cursor.next_line();
                continue;
            }

            self.cursor.next_column();

            if ch.is_whitespace() {
                continue;
            }

            let span = Span::from(self.cursor);

            if ch.is_ascii_digit() {
                return Some(Ok(Token::new(DIGIT, ch, span)));
            }

            return Some(
                self.alphabet
                    .iter()
                    .find(|id| id.chars().eq([ch]))
                    .map(|id| Token::new(id, ch, span))
                    .ok_or_else(|| {
                        TablrError::new(
                            ErrorKind::unknown_symbol(&ch.to_string()),
                            Some(span),
                        )
                    }),
            );
        }
    }
}

impl<I> Lexer<NoCustomError> for SymbolLexer<I>
where
    I: Iterator<Item = char>,
{
    type Token = Token<'static>;

    fn span(&self) -> Span {
        Span::from(self.cursor)
    }
}
