pub mod ast;
pub mod environment;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;
