//! Database models and the book record store

pub mod books;
pub mod init;
pub mod models;

pub use books::*;
pub use init::*;
pub use models::*;
