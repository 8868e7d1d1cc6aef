//! Loading/error bookkeeping around one arbitrary call.

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct Operation<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Operation<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Operation<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run `call`, keep its value on success, record and return its error on failure.
    ///
    /// A failed run leaves the previous value in place.
    pub fn execute<F>(&mut self, call: F) -> Result<&T, ApiError>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        self.loading = true;
        self.error = None;
        let result = call();
        self.loading = false;
        match result {
            Ok(value) => Ok(&*self.data.insert(value)),
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::{ApiClient, ClientConfig};
    use crate::models::Category;
    use crate::services::ProductService;
    use crate::testing::ScriptedTransport;

    #[test]
    fn keeps_value_and_error_separately() {
        let mut op: Operation<u32> = Operation::new();
        assert_eq!(*op.execute(|| Ok(7)).unwrap(), 7);
        assert!(op.execute(|| Err(ApiError::Network("offline".to_string()))).is_err());
        assert_eq!(op.data(), Some(&7));
        assert_eq!(op.error(), Some("offline"));

        op.clear_error();
        assert!(op.error().is_none());
        op.reset();
        assert!(op.data().is_none());
    }

    #[test]
    fn loads_categories_through_service() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, json!({"data": [
            {"id": "devices", "name": "devices", "description": "", "productCount": 2},
            {"id": "supplies", "name": "supplies", "description": "", "productCount": 5}
        ]}));
        let products = ProductService::new(ApiClient::new(
            ClientConfig::with_base_url("http://api.test"),
            transport,
        ));

        let mut categories: Operation<Vec<Category>> = Operation::new();
        let loaded = categories.execute(|| products.categories()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!categories.loading());
    }
}
