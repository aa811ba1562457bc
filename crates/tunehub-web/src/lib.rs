//! TuneHub web UI: a server-rendered front end for a music download backend.

pub mod action;
pub mod app;
pub mod app_state;
pub mod batch;
pub mod component;
pub mod components;
pub mod context;
pub mod error;
pub mod gateway;
pub mod http;
pub mod poller;
pub mod router;
pub mod widgets;

#[cfg(test)]
mod testing;
