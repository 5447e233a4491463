//! Cross-module unit coverage that doesn't fit naturally inside a single `#[cfg(test)]`
//! module in `src/` — mostly integration between the protocol descriptors, the XML parser,
//! and the error hierarchy.

mod carddav_projection;
mod depth_encoding;
mod error_mapping;
