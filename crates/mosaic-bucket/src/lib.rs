//! S3-compatible bucket access.
//!
//! This crate provides:
//! - Object listing under a watch prefix
//! - Byte upload/download for relay inputs and outputs
//! - A startup connectivity probe

pub mod client;
pub mod error;

pub use client::{BucketClient, BucketConfig, ObjectInfo};
pub use error::{BucketError, BucketResult};
