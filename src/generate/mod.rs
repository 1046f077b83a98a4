//! Generation Module
//!
//! Sequential track generation on top of the layer pool:
//! - `MusicModel` trait for the remote music model, plus an offline mock
//! - `MixSession`, the long-lived owner of the mixer and its tracks

mod model;
mod session;

pub use model::{MockMusicModel, MusicModel};
pub use session::{GenerationOutcome, MixSession, TickReport};
