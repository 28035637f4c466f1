pub mod catalog;
pub mod code_table;
pub mod query;
pub mod raw_response;
