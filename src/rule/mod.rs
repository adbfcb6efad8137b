//! Rule compilation and evaluation
//!
//! This module turns rule strings like `age > 30 AND department = 'Sales'`
//! into an AST and evaluates that AST against a data record.

mod ast;
pub mod cache;
mod evaluator;
pub mod interchange;
pub mod parser;
pub mod tokenizer;
mod value;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use interchange::record_from_json;
pub use parser::*;
pub use tokenizer::*;
pub use value::*;
