pub mod bins;
pub mod histogram;

pub use histogram::{Axis, Bin, Histogram};
