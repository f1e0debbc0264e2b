//! Configuration loading from mk.toml

mod mk_toml;

pub use mk_toml::{MkConfig, Mode};
