//! Data model shared by the assembler and its callers.

pub mod language;
pub mod package;
