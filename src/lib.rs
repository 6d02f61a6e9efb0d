//! Stencil: configuration resolution for a template renderer.
//!
//! A library for turning a YAML config file and command-line flags into a
//! single validated configuration, with every datasource location
//! normalized to an absolute URL.

pub mod config;
