pub mod categorical_decoder;
pub mod error;
pub mod interval_reference;
pub mod normalizer;
