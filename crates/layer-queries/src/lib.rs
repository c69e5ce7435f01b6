//! layer-queries - saved attribute filter queries for map layers.
//!
//! This crate provides both a CLI application and a library for building
//! single-clause filter expressions, saving them by name in a JSON file, and
//! applying them to layers through a [`host::LayerHost`].

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod expression;
pub mod host;
pub mod search;
pub mod storage;

// Application context
pub mod app;

// Public CLI module (needed by binary)
pub mod cli;

// Output formatting
pub mod output;
