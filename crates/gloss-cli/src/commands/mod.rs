pub mod cleanup;
pub mod export;
pub mod import;
