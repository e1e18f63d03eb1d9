//! Test harness: mock provider backend, config builder, test server

#![allow(dead_code)]

pub mod config;
pub mod mock_llm;
pub mod server;
