pub mod database;
pub mod utils;
