//! Built-in device support.
//!
//! - [`bladecenter`]: chassis with a per-blade command context
//! - [`ilo`]: management processor with a labelled status line
//! - [`wti`]: outlet strips with a tabular status listing

pub mod bladecenter;
pub mod ilo;
pub mod wti;
