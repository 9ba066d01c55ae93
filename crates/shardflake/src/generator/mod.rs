mod atomic;
mod config;
mod decompose;
mod state;
mod status;

pub use atomic::*;
pub use config::*;
pub use decompose::*;
pub use status::*;
