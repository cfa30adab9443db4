pub mod directory;
pub mod import;
