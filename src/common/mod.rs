pub mod comment;
pub mod config;
pub mod draft;
pub mod env;
pub mod inquiry;
pub mod photo;
pub mod validation;

pub use comment::*;
pub use config::BoardConfig;
pub use draft::*;
pub use env::{EnvProvider, SystemEnvProvider};
pub use inquiry::*;
pub use photo::*;
pub use validation::*;

#[cfg(test)]
pub use env::MockEnvProvider;
