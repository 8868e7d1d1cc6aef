//! Client core for the catalog API (users and products).
//!
//! # Overview
//! Four layers, each re-shaping but never retrying or caching:
//!
//! - [`client`]: the access layer. Builds requests from a shared
//!   configuration, dispatches them through a [`Transport`], and normalizes
//!   every failure into [`ApiError`].
//! - [`models`]: immutable records with derived fields, validators and pure
//!   business operations.
//! - [`services`]: one per resource, mapping domain operations to endpoints
//!   and validating input before any I/O.
//! - [`controller`]: UI state containers that call services and reconcile
//!   results into local state, discarding stale completions.
//!
//! # Design
//! - No singletons. Build one `ApiClient`, clone it into each service, and
//!   hand the services to whichever controllers need them.
//! - The network is reached only through the `Transport` trait. Production
//!   code uses `UreqTransport`; tests script responses in memory.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use controller::{ListController, Operation, ReconcilePolicy, RecordController, SessionController};
pub use error::{ApiError, ErrorCode, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use models::{
    Category, CreateProductRequest, CreateUserRequest, Identified, ListQuery, Product,
    ProductListParams, UpdateProductRequest, UpdateUserRequest, User, UserListParams, UserRole,
};
pub use services::{AuthService, LoginCredentials, ProductService, ResourceService, UserService};
pub use types::{ApiResponse, ListResponse, Pagination};
