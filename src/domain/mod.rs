pub mod commands;
pub mod email;
pub mod errors;
pub mod loan;
pub mod value_objects;

pub use commands::*;
pub use email::*;
pub use errors::*;
pub use loan::*;
pub use value_objects::*;
