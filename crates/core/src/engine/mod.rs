//! External download engine (aria2c) invocation.
//!
//! The engine does all the actual transferring. This module only decides
//! which arguments to pass it and supervises the child process:
//!
//! - [`build_args`] turns a [`LaunchSpec`](crate::input::LaunchSpec) and the
//!   pacing settings into an [`ArgumentList`] for a [`Profile`]
//! - [`ProcessSupervisor`] spawns the engine and hands back a
//!   [`ProcessHandle`] that yields merged stdout/stderr lines and the exit status
//! - [`Engine`] / [`EngineProcess`] are the seams the orchestrator depends on
//!
//! # Example
//!
//! ```ignore
//! use ariapilot_core::engine::{build_args, Engine, Profile, ProcessSupervisor};
//!
//! let args = build_args(&spec, &config.pacing, Profile::Normal);
//! let engine = ProcessSupervisor::new(config.engine.resolve_executable()?);
//! let mut process = engine.spawn(&args).await?;
//! while let Some(line) = process.next_line().await? {
//!     println!("{}", line);
//! }
//! let exit = process.wait().await?;
//! ```

mod args;
mod config;
mod error;
mod process;
mod traits;

pub use args::{build_args, ArgumentList, Profile, FALLBACK_FLAGS};
pub use config::EngineConfig;
pub use error::EngineError;
pub use process::{ProcessHandle, ProcessSupervisor};
pub use traits::{Engine, EngineExit, EngineProcess};
