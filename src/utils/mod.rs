pub mod string_util;

pub use string_util::{StripCodeBlock, truncate_chars};
