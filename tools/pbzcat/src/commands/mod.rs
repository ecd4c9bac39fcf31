pub mod dump;
pub mod types;
