//! Response helpers

pub mod download;
