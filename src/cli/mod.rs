pub mod crypt;
pub mod keygen;
pub mod keystream;
pub mod trace;

pub use crypt::*;
pub use keygen::*;
pub use keystream::*;
pub use trace::*;
