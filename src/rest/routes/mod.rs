pub mod health;
pub mod note;
pub mod tasks;
