//! Wire types shared between the TuneHub web front end and its backend,
//! plus the front end's configuration file.

pub mod config;
pub mod platform;
pub mod protocol;
pub mod songs;
