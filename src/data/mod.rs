pub mod loader;
pub mod record;
pub mod reference;
pub mod team;
