pub mod health;
pub mod rule;
pub mod slot;
