pub mod virtualenv;

pub use virtualenv::{CreateOptions, EnvState, Virtualenv};
