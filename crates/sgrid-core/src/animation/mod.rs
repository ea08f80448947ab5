#![forbid(unsafe_code)]

//! Animation primitives used for drag clone motion.

pub mod spring;

pub use spring::{Spring, SpringPoint};
