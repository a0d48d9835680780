pub mod budget;
pub mod dashboard;
pub mod envelope;
pub mod expense;
pub mod savings;
pub mod session;
