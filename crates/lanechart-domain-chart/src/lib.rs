pub mod event_store;
pub mod lanes;
pub mod model;
pub mod segments;
pub mod time;
pub mod waveform;

pub use event_store::*;
pub use lanes::*;
pub use model::*;
pub use segments::*;
pub use time::*;
pub use waveform::*;
