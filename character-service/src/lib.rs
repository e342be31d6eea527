//! In-memory character service with a companion demo client.
//!
//! Each module focuses on a concrete responsibility:
//!
//! - [`character`] defines the record and the JSON bodies of the API.
//! - [`store`] owns records and hands out identifiers behind one lock.
//! - [`router`] maps method, path, query and body onto store operations.
//! - [`error`] renders router failures as `{"message": ...}` responses.
//! - [`server`] serves the router on a TCP listener until shutdown.
//! - [`client`] is a reqwest client for every route plus the scripted demo.
//! - [`cli`] parses the command-line interface for server and client modes.

pub mod character;
pub mod cli;
pub mod client;
pub mod error;
pub mod router;
pub mod server;
pub mod store;
