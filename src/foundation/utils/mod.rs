mod date_utils;
mod string_utils;

pub use date_utils::*;
pub use string_utils::*;
