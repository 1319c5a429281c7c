pub mod config;
pub mod structure_definition;
pub mod value;
pub mod version;

pub use config::*;
pub use structure_definition::*;
pub use value::*;
pub use version::*;
