pub mod deployment;
pub mod server;
