pub mod polygon;
pub mod check;
mod vtest;

pub use vtest::VTest;
