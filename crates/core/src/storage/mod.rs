pub mod reader;
pub mod skills;
pub mod writer;
