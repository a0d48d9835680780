pub mod budget;
pub mod dashboard;
pub mod error;
pub mod expense;
pub mod health;
pub mod savings;
