use thiserror::Error;

/// Errors raised while turning an infix pattern into an automaton.
///
/// Positions are character offsets into the pattern after explicit
/// concatenation operators have been inserted, so they may sit one or
/// two characters to the right of the original input.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum RegexError {
    #[error("empty pattern")]
    EmptyPattern,

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("operator '{operator}' at position {position} is missing an operand")]
    MissingOperand { operator: char, position: usize },

    #[error("unknown operator '{operator}' at position {position}")]
    UnknownOperator { operator: char, position: usize },

    #[error("malformed postfix expression left {automata} automata on the stack")]
    MalformedPostfix { automata: usize },
}
