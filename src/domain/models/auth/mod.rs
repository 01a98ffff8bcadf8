//! 인증 관련 값 객체

pub mod authenticated_user;
pub mod authentication_request;
pub mod token_claims;

pub use authenticated_user::{AuthenticatedUser, OptionalUser};
pub use authentication_request::{AuthMode, RequiredRole};
pub use token_claims::{TokenClaims, TokenResponse};
