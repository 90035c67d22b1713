#[cfg(feature = "python")]
pub mod pymodule;
