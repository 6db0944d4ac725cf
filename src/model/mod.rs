pub mod types;
pub mod resources;
pub mod validator;

pub use types::*;
pub use resources::*;
pub use validator::*;
