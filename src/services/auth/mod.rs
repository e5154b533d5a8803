pub mod bearer;
pub mod error;
pub mod jwks;
pub mod permissions;
pub mod verify;

pub use error::AuthError;
pub use jwks::{JwksClient, JwksError};
pub use verify::{AuthService, Claims, VerifyError};
