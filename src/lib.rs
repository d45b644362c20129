// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod csv;
pub mod data;
pub mod error;
pub mod export;
pub mod file;
pub mod log;
pub mod progress;
pub mod scrape;
pub mod store;
pub mod workbook;
