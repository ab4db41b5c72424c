pub mod dfa;
pub mod error;
pub mod nfa;
pub mod regex;

pub use dfa::DeterministicFiniteAutomaton;
pub use error::RegexError;
pub use nfa::NondeterministicFiniteAutomaton;
pub use regex::RegexCompiler;
