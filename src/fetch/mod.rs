pub mod metadata;
pub mod transport;
