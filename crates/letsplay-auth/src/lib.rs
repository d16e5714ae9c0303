//! # Let's Play Auth
//!
//! Authentication and authorization building blocks:
//!
//! - [`roles`]: the [`Role`] enum (`USER`, `ADMIN`)
//! - [`claims`]: token [`Claims`] and the verified caller [`Identity`]
//! - [`jwt`]: [`TokenService`] for issuing and verifying HS256 tokens
//! - [`policy`]: the pure [`decide`] rule table and [`authorize`]
//!
//! # Example
//!
//! ```ignore
//! use letsplay_auth::{Action, Principal, authorize};
//!
//! let principal = Principal::Authenticated(tokens.verify(bearer)?);
//! authorize(&principal, Action::UpdateProduct, Some(product.owner_id))?;
//! ```

pub mod claims;
pub mod jwt;
pub mod policy;
pub mod roles;

pub use claims::{Claims, Identity};
pub use jwt::{TokenError, TokenService};
pub use policy::{Action, Decision, DenyReason, Principal, authorize, decide};
pub use roles::{Role, RoleParseError};
