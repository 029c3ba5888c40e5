// Authentication and authorization
//
// The engineering core of the server:
// - password: Argon2id hashing/verification
// - jwt: token issuance and verification with typed rejection reasons
// - config: environment-injected secret and TTL (missing secret is fatal)
// - service: the single rollback-safe register/login implementation
// - middleware: bearer extraction and role gates for every protected route
// - routes: the /auth/* HTTP surface

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod service;

pub use config::{AuthConfig, JwtConfig};
pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{AdminAccount, AuthAccount, AuthError, AuthState};
pub use routes::routes;
pub use service::{AuthFlowError, AuthService, RegisterInput};
