//! # Core Module
//!
//! Shared-ownership primitives used by the renderer.
//!
//! ## Key Components
//! - `StSystem`: single-threaded shared handle with runtime borrow checking
//!
//! ## Usage
//! ```rust
//! use voxel_editor::core::StSystem;
//!
//! let system = StSystem::new(42u32);
//! assert_eq!(*system.get(), 42);
//! ```

pub mod st_system;

pub use st_system::StSystem;
