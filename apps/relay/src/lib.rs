//! Internals of the Moxo completion relay: configuration, error mapping, the
//! webhook client, and the HTTP surface served by the binary.

pub mod config;
pub mod cors;
pub mod error;
pub mod http;
pub mod moxo;
pub mod reqid;
