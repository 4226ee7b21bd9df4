//! Calora Library
//!
//! Calorie goal engine and diary storage behind the Calora MCP server.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
