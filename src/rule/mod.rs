//! Rule-expression module
//!
//! This module tokenizes, parses and evaluates rule expressions such as
//! `age >= 65 AND (state == 'CA' OR lang NOT IN ['en', 'es'])` against an
//! answer snapshot. Parsing is fallible; evaluation of a parsed tree always
//! yields a boolean.

mod ast;
pub mod cache;
mod evaluator;
pub mod lexer;
pub mod parser;
mod token;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use lexer::*;
pub use parser::*;
pub use token::*;
