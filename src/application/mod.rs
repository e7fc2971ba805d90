//! Application layer - orchestrates domain operations through ports.

pub mod handlers;
