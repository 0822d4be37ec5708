//! docsense: store uploaded text files and analyse them over HTTP.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
