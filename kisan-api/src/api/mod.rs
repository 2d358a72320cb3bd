//! REST API implementation for the Kisan advisory service

pub mod accounts;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{build_router, run};
