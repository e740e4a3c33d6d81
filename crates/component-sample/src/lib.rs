//! # Component Sample Library
//!
//! A small inventory application wired together by the component registry.
//! This library exposes its modules for integration testing.

pub mod components;
pub mod error;
pub mod lifecycle;
pub mod model;
