//! LLM tool surface for Mosaic.
//!
//! This crate provides:
//! - Typed tool definitions with JSON parameter schemas
//! - A name-keyed dispatcher over the Mosaic client
//! - A line-delimited JSON request/response server on stdio

pub mod error;
pub mod router;
pub mod server;
pub mod tools;

pub use error::{ToolError, ToolResult};
pub use router::ToolRouter;
pub use server::{handle_line, serve_stdio, ToolRequest, ToolResponse};
pub use tools::{tool_catalog, ToolDef};
