pub mod error;

pub use error::{TaError, TaResult};
