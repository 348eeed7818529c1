pub mod credentials;
pub mod handler;
pub mod types;

pub use credentials::*;
pub use handler::*;
pub use types::*;
