pub mod routes;
pub mod handlers;
pub mod middleware;
pub mod error;

pub use routes::*;
pub use handlers::*;
pub use middleware::*;
pub use error::*;
