//! Project-file collaborators that run after the tree migration:
//! descriptor hardening and fixed-content policy files.

pub mod descriptor;
pub mod policy;

pub use descriptor::{patch_file, patch_text};
pub use policy::{write_performance, write_rules};
