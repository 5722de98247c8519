//! HTTP handlers for the portfolio API. Each validates its input, calls one storage
//! operation (or the GitHub client) and maps the outcome to a response.

pub mod contact;
pub mod github;
pub mod resume;
pub mod subscriber;
pub use contact::*;
pub use github::*;
pub use resume::*;
pub use subscriber::*;
