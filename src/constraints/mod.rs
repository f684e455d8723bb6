pub mod boundary;

pub use boundary::resolve_boundaries;
