//! Domain models for the herdbook system.

mod bull;
mod calf;
mod cow;
mod entity;
mod location;
mod status;
mod treatment;

pub use bull::*;
pub use calf::*;
pub use cow::*;
pub use entity::*;
pub use location::*;
pub use status::*;
pub use treatment::*;
