//! CLI command implementations.

pub(crate) mod download;
pub(crate) mod list;
pub(crate) mod stitch;
pub(crate) mod transfer;
pub(crate) mod upload;
