mod extract;
mod models;
mod navigator;
pub mod pob;
pub mod runner;

pub use models::RawRow;
