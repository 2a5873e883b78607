//! Service container shared by the MCP server

pub mod services;

pub use services::Services;
