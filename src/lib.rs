// src/lib.rs
// calcbook - arithmetic over HTTP with a MongoDB result history and audit log

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod arithmetic;
pub mod config;
pub mod db;
pub mod error;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod web;

pub use error::{CalcError, Result, StoreError};
