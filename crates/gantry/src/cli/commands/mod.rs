//! CLI commands

mod sign;
mod upload;

pub use sign::SignCommand;
pub use upload::UploadCommand;
