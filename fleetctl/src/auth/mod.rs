//! Authentication and authorization.
//!
//! Users log in with a username and password; the server answers with a signed session token,
//! returned both in the body and as an HTTP-only cookie. Later requests present the token as
//! `Authorization: Bearer <token>` or through the cookie.
//!
//! Authorization is role based: any authenticated user may read fleet data, while creating,
//! updating and deleting drivers, routes and orders (and reseeding) requires `Manager`.
//!
//! # Modules
//!
//! - [`current_user`]: axum extractor resolving the caller from a request
//! - [`password`]: Argon2id hashing and verification
//! - [`permissions`]: role checks for write operations
//! - [`session`]: JWT issuing and verification behind the [`session::SessionTokens`] trait
//!
//! # Usage in Handlers
//!
//! ```ignore
//! async fn delete_route(
//!     State(state): State<AppState>,
//!     Path(id): Path<RouteKey>,
//!     current_user: CurrentUser,
//! ) -> Result<Json<MessageResponse>> {
//!     require_manager(&current_user, Operation::Delete, Resource::Routes)?;
//!     // ...
//! }
//! ```

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
