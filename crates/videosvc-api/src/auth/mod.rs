pub mod jwt;
pub mod middleware;
pub mod models;
pub mod users;

pub use jwt::JwtService;
pub use middleware::{auth_middleware, AuthState};
pub use models::{JwtClaims, TokenRequest, TokenResponse, UserContext};
pub use users::UserDirectory;
