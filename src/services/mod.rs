pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod homework;
pub mod schedule;
