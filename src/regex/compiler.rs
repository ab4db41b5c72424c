use log::debug;

use crate::error::RegexError;
use crate::nfa::NondeterministicFiniteAutomaton;
use crate::regex::ops::{self, Op, TokenKind};
use crate::regex::shunting;

/// Compiles an infix pattern into an NFA by Thompson's construction.
///
/// The pattern is rewritten to postfix first; the postfix form is then
/// folded over a stack of partial automata, one combinator per
/// operator.
#[derive(Debug)]
pub struct RegexCompiler<'a> {
    pattern: &'a str,
}

impl<'a> RegexCompiler<'a> {
    pub fn from_regex(pattern: &'a str) -> Self {
        Self { pattern }
    }

    pub fn compile(self) -> Result<NondeterministicFiniteAutomaton, RegexError> {
        if self.pattern.is_empty() {
            return Err(RegexError::EmptyPattern);
        }
        let postfix = shunting::to_postfix(self.pattern)?;
        debug!("compiling {:?} via postfix {:?}", self.pattern, postfix);
        build_nfa_from_postfix(&postfix)
    }
}

/// Lifts a postfix expression to a two-terminal NFA.
///
/// Operands push an atomic automaton; operators pop one or two and
/// push the combined result. A well-formed postfix expression leaves
/// exactly one automaton on the stack.
pub fn build_nfa_from_postfix(
    postfix: &str,
) -> Result<NondeterministicFiniteAutomaton, RegexError> {
    let mut stack: Vec<NondeterministicFiniteAutomaton> = Vec::new();

    for (position, c) in postfix.chars().enumerate() {
        match ops::classify(c) {
            TokenKind::Literal(literal) => {
                stack.push(NondeterministicFiniteAutomaton::from_char(literal));
            }
            TokenKind::Operator(op) => apply_operator(&mut stack, op, position)?,
            TokenKind::OpenParen | TokenKind::CloseParen => {
                return Err(RegexError::UnknownOperator {
                    operator: c,
                    position,
                });
            }
        }
    }

    let nfa = stack.pop().ok_or(RegexError::EmptyPattern)?;
    if !stack.is_empty() {
        return Err(RegexError::MalformedPostfix {
            automata: stack.len() + 1,
        });
    }
    Ok(nfa)
}

fn apply_operator(
    stack: &mut Vec<NondeterministicFiniteAutomaton>,
    op: Op,
    position: usize,
) -> Result<(), RegexError> {
    match op {
        Op::Union => {
            let b = pop_operand(stack, op, position)?;
            let a = pop_operand(stack, op, position)?;
            stack.push(a.union(b));
        }
        Op::Concat => {
            let b = pop_operand(stack, op, position)?;
            let a = pop_operand(stack, op, position)?;
            stack.push(a.concat(b));
        }
        Op::Star => {
            let a = pop_operand(stack, op, position)?;
            stack.push(a.closure());
        }
        Op::Plus => {
            let a = pop_operand(stack, op, position)?;
            stack.push(a.positive_closure());
        }
        Op::Optional => {
            let a = pop_operand(stack, op, position)?;
            stack.push(a.optional());
        }
    }
    Ok(())
}

fn pop_operand(
    stack: &mut Vec<NondeterministicFiniteAutomaton>,
    op: Op,
    position: usize,
) -> Result<NondeterministicFiniteAutomaton, RegexError> {
    stack.pop().ok_or(RegexError::MissingOperand {
        operator: op.to_char(),
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> NondeterministicFiniteAutomaton {
        RegexCompiler::from_regex(pattern)
            .compile()
            .unwrap_or_else(|e| panic!("{:?} should compile: {}", pattern, e))
    }

    #[test]
    fn compiles_literals_and_groups() {
        let nfa = compile("a(b|c)d");
        assert!(nfa.accepts("abd"));
        assert!(nfa.accepts("acd"));
        assert!(!nfa.accepts("ad"));
        assert!(!nfa.accepts("abcd"));
    }

    #[test]
    fn compiles_nested_closures() {
        let nfa = compile("(a*)*");
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaaa"));
        assert!(!nfa.accepts("b"));
    }

    #[test]
    fn empty_pattern_is_an_error() {
        assert_eq!(
            RegexCompiler::from_regex("").compile().unwrap_err(),
            RegexError::EmptyPattern
        );
    }

    #[test]
    fn unbalanced_pattern_is_an_error() {
        assert!(matches!(
            RegexCompiler::from_regex("(a|b").compile(),
            Err(RegexError::UnbalancedParenthesis { .. })
        ));
    }

    #[test]
    fn postfix_operator_without_operand_is_an_error() {
        assert_eq!(
            build_nfa_from_postfix("*").unwrap_err(),
            RegexError::MissingOperand {
                operator: '*',
                position: 0
            }
        );
        assert_eq!(
            build_nfa_from_postfix("a|").unwrap_err(),
            RegexError::MissingOperand {
                operator: '|',
                position: 1
            }
        );
    }

    #[test]
    fn leftover_automata_are_an_error() {
        assert_eq!(
            build_nfa_from_postfix("ab").unwrap_err(),
            RegexError::MalformedPostfix { automata: 2 }
        );
    }

    #[test]
    fn parentheses_are_not_postfix_operators() {
        assert_eq!(
            build_nfa_from_postfix("a(b").unwrap_err(),
            RegexError::UnknownOperator {
                operator: '(',
                position: 1
            }
        );
    }
}
