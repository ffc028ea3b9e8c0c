pub mod ai;
pub mod health;
pub mod history;
pub mod projects;
pub mod support;
