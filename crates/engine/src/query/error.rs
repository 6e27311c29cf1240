use snafu::Snafu;

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Path query is empty"))]
    EmptyExpression,

    #[snafu(display("Path query opens a template brace without closing it"))]
    UnbalancedBrace,

    #[snafu(display("Unexpected character '{character}' at position {position}"))]
    UnexpectedCharacter { character: char, position: usize },

    #[snafu(display("Missing field name at position {position}"))]
    EmptyField { position: usize },

    #[snafu(display("Bracket opened at position {position} is never closed"))]
    UnterminatedBracket { position: usize },

    #[snafu(display("Invalid bracket selector '{selector}' at position {position}"))]
    InvalidSelector { selector: String, position: usize },
}
