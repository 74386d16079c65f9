pub mod filter;
pub mod score;
pub mod validate;
