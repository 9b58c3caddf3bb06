pub mod db;

pub mod activation;
pub mod alerts;
pub mod constants;
pub mod discrepancy;
pub mod errors;
pub mod materials;
pub mod projects;
pub mod schema;
pub mod suppliers;

pub use errors::{Error, Result};
