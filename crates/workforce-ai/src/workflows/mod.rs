pub mod import;
pub mod workforce;
