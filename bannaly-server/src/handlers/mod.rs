pub mod catalog;
pub mod collections;
pub mod comments;
pub mod health;
