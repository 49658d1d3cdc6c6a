pub mod app;
pub mod clock;
pub mod dispatcher;
pub mod interaction;
pub mod ipc;
pub mod state;
pub mod vfx;
pub mod view;

pub use app::*;
pub use clock::*;
pub use dispatcher::*;
pub use interaction::*;
pub use ipc::*;
pub use state::*;
pub use vfx::*;
pub use view::*;
