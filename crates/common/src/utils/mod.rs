pub mod index;
pub mod strings;
