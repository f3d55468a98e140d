pub mod team;
pub mod prediction;
pub mod chat;
pub mod requests;
pub mod error;

pub use team::*;
pub use prediction::*;
pub use chat::*;
pub use requests::*;
pub use error::*;
