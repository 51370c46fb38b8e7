//! Marquee - movie and actor catalog
//!
//! - `server` + `storage`: REST API over a SQLite catalog
//! - `client`: typed REST client behind the [`client::CatalogApi`] seam
//! - `cache`, `selector`, `pages`: front-end core, free of any rendering
//! - `tui`: terminal front-end driving the pages
//! - `config`, `logging`, `cli`, `startup`: application plumbing

pub mod cache;
pub mod cli;
pub mod client;
pub mod color;
pub mod config;
pub mod logging;
pub mod model;
pub mod pages;
pub mod selector;
pub mod server;
pub mod startup;
pub mod storage;
pub mod tui;
