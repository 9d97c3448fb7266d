//! The cipher engine: state mixing, the chaotic step, keystream
//! extraction, and the driver that composes them.

pub mod driver;
pub mod extract;
pub mod mixer;
pub mod params;
pub mod state;
pub mod stepper;

pub use driver::*;
pub use extract::*;
pub use mixer::*;
pub use params::*;
pub use state::*;
pub use stepper::*;
