//! Safe SQL builder: identifiers from the resource model only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
