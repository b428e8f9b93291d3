pub mod occurrence;
pub mod rule;
pub mod rule_exception;
