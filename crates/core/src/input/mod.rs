//! Input classification.
//!
//! Turns the raw string a user pasted into a [`LaunchSpec`] describing how
//! the engine should be pointed at the content. Rules are checked in order:
//!
//! 1. `magnet:` prefix → [`LaunchSpec::Magnet`]
//! 2. `http://` or `https://` prefix → [`LaunchSpec::DirectUrl`]
//! 3. an existing regular file → [`LaunchSpec::LocalDescriptor`]
//! 4. anything else → [`InputError::Unrecognized`]

mod classifier;
mod types;

pub use classifier::classify;
pub use types::{InputError, LaunchSpec};
