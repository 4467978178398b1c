//! Data models

mod census;
mod leaf;
mod node;
mod operator;
mod problem;
mod state;

pub use census::*;
pub use leaf::*;
pub use node::*;
pub use operator::*;
pub use problem::*;
pub use state::*;
