pub mod app;
pub mod bridge;
pub mod config;
pub mod data;
pub mod dex;
pub mod logging;
pub mod oracle;

#[cfg(feature = "python")]
pub use bridge::pymodule::neo_pokedex;
