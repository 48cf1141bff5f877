//! `vendra-api` — HTTP binding for the analytics engine.

pub mod app;
