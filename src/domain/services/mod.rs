pub mod civil_time;
pub mod resolver;
pub mod schedule_service;
pub mod validator;
