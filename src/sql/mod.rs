//! Safe SQL builder: identifiers from static schemas only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
