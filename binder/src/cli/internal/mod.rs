//! Helpers shared by the commands that read and print manifests.

mod manifest;

pub use self::manifest::{Manifest, render, type_of, write_stdout};
