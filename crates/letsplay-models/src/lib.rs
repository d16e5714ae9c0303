//! # Let's Play Models
//!
//! Domain entities and request/response DTOs for the Let's Play API.
//!
//! # Modules
//!
//! - [`auth`]: registration and login payloads
//! - [`users`]: the public [`User`] view, stored credentials and user updates
//! - [`products`]: [`Product`] plus create, replace and patch payloads
//!
//! Request DTOs derive [`validator::Validate`]; the HTTP layer rejects
//! invalid input with a 400 before any service code runs.

pub mod auth;
pub mod products;
pub mod users;

pub use letsplay_auth::Role;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use products::{
    CreateProductDto, NewProduct, PatchProductDto, Product, ProductFilter, ProductFilterParams,
};
pub use users::{NewUser, UpdateUserDto, User, UserCredentials, UserUpdate};
