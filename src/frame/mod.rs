pub mod plot;
pub mod pums_frame;
pub mod summary;
