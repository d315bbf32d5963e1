//! calcweb Web Server
//!
//! Serves the calculator page and the four arithmetic endpoints the page
//! calls: `POST /add`, `/subtract`, `/multiply`, `/divide`.

pub mod config;
pub mod logging;
pub mod server;
pub mod static_files;

pub use config::WebConfig;
pub use server::{ApiError, WebServer};
