pub mod budget;
pub mod dashboard;
pub mod expense;
pub mod postgres_repository;
pub mod savings;
pub mod session;
