pub mod assets;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod export;
pub mod github;
pub mod io;
pub mod merge;
pub mod paths;
pub mod prefill;
pub mod schema;
pub mod snapshot;
pub mod template;
pub mod types;
pub mod validation;
pub mod workspace;

pub use error::{ReadmeError, Result};
