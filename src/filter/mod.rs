pub mod types;

pub use types::{HomeFilter, PriceRange, SqlResult};
