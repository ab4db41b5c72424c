pub mod compiler;
pub mod ops;
pub mod shunting;

pub use compiler::RegexCompiler;
pub use compiler::build_nfa_from_postfix;
pub use ops::Op;
pub use shunting::{insert_concatenation_operator, to_postfix};
