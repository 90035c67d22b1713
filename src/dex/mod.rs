pub mod coverage;
pub mod detail;
pub mod filter;
pub mod render;
