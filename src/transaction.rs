//! Transaction module split into wire types, validation and the call builder

pub mod builder;
pub mod types;
pub mod validation;

pub use builder::*;
pub use types::*;
pub use validation::*;
