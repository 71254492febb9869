pub mod cli;
pub mod config;
pub mod core;
pub mod lifecycle;
pub mod python;
pub mod shell;

#[cfg(test)]
mod test_support;
