//! File access for the Markdown vault.
//!
//! Every path handed to a [`Vault`] is relative to the vault root, for example
//! `Shopping List.md` or `Timestamps/2024-01-15.md`. Implementations resolve
//! those paths against their own root; callers never build absolute paths.
//!
//! ## Components
//!
//! - [`Vault`]: the file operations the assistant needs
//! - [`FsVault`]: a [`Vault`] over a directory on the local file system

#[cfg(test)]
pub(crate) mod memory;
mod vault;

pub use vault::{FsVault, Vault};
