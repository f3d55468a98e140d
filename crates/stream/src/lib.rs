pub mod decoder;
pub mod transcript;
pub mod chat_client;

pub use decoder::*;
pub use transcript::*;
pub use chat_client::*;
