//! # Voxel Editor Entry Point
//!
//! Calls into the library's `run()` to open the editor window.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_editor::run();
}
