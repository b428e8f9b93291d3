pub mod sqlite_rule_repo;
pub mod sqlite_exception_repo;

pub mod postgres_rule_repo;
pub mod postgres_exception_repo;
