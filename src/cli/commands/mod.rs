pub mod build;
mod command_result;
pub mod helper;
pub mod import;
pub mod init;
pub mod keys;

pub use command_result::*;
