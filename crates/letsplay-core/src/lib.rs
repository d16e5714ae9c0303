//! # Let's Play Core
//!
//! Foundational types shared by every Let's Play crate:
//!
//! - [`errors`]: [`AppError`] and the JSON [`ErrorEnvelope`] every failure is rendered as
//! - [`pagination`]: list pagination parameters and [`Page`]
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: lenient query-string deserializers
//!
//! # Example
//!
//! ```ignore
//! use letsplay_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("correct horse battery staple")?;
//! if !verify_password("guess", &hash)? {
//!     return Err(AppError::unauthenticated("Invalid email or password"));
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorEnvelope};
pub use pagination::{Page, PaginationParams};
pub use password::{hash_password, verify_password};
