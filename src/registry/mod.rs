// src/registry/mod.rs
pub mod client;
pub mod models;

pub use client::HttpSource;
