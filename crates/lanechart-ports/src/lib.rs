pub mod audio;
pub mod project;
pub mod storage;
pub mod types;
pub mod vfx;

pub use audio::*;
pub use project::*;
pub use storage::*;
pub use types::*;
pub use vfx::*;
