pub mod config;
pub mod error;
pub mod inputs;
pub mod kernel;
pub mod outputs;
pub mod services;

pub use config::Config;
pub use error::{Error, Result};
pub use kernel::Dispatcher;
