pub mod albums;
pub mod categories;
pub mod dashboard;
pub mod workflow;
