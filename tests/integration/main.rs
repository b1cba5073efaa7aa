//! Integration tests for Domain-Crawler
//!
//! Origins are simulated with wiremock; the HTTP surface is exercised over a
//! real socket.

mod crawl_tests;
mod server_tests;
