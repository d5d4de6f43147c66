//! Auth-domain primitives: on-disk credentials, header helpers, scope sets, and secrets.

pub mod credentials;
pub mod header;
pub mod scope;
pub mod secret;

pub use credentials::*;
pub use header::*;
pub use scope::*;
pub use secret::*;
