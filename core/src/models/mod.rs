//! Resource records and the pure operations defined on them.
//!
//! # Design
//! Records are plain immutable values. Derived fields are computed on each
//! call and never cached. Every business operation takes `&self` and returns
//! a new record, so a record obtained from a controller or a service can be
//! shared freely without defensive copies.

pub mod product;
pub mod user;

pub use product::{
    Category, CreateProductRequest, Product, ProductListParams, ProductSortField, SortOrder,
    StockStatus, UpdateProductRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserListParams, UserRole};

use url::form_urlencoded;

/// A record with a server-assigned identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Query parameters of a list endpoint.
pub trait ListQuery: Clone + Default {
    /// `self` with every field set in `overrides` replaced.
    fn merged(&self, overrides: &Self) -> Self;

    /// URL-encoded query string without the leading `?`; empty when no field is set.
    fn to_query(&self) -> String;
}

/// Append `?query` to `endpoint` when `query` is non-empty.
pub(crate) fn with_query(endpoint: &str, query: &str) -> String {
    if query.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}?{query}")
    }
}

/// Percent-encode a single query value.
pub(crate) fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_query_skips_empty_query() {
        assert_eq!(with_query("/users", ""), "/users");
        assert_eq!(with_query("/users", "page=2"), "/users?page=2");
    }

    #[test]
    fn encode_component_escapes_reserved_characters() {
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
    }
}
