pub mod config;
pub mod db;
pub mod gateway;
pub mod mcp;
pub mod service;
