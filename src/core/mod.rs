//! Core types shared by the interpreter: the line tokenizer and its output.

pub mod parser;
