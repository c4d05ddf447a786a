pub mod error;
pub mod message;
pub mod mode;
pub mod reader;
pub mod writer;
