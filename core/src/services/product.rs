//! Product endpoints under `/products` and `/categories`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::product::validate_price;
use crate::models::{
    encode_component, with_query, Category, CreateProductRequest, ListQuery, Product,
    ProductListParams, UpdateProductRequest,
};
use crate::types::ListResponse;

use super::{ensure_valid, logged, ResourceService};

const PRODUCTS: &str = "/products";
const CATEGORIES: &str = "/categories";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StockBody {
    stock_quantity: u32,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: u32,
}

#[derive(Serialize)]
struct DiscountBody {
    #[serde(with = "rust_decimal::serde::float")]
    percentage: Decimal,
}

#[derive(Debug, Clone)]
pub struct ProductService {
    client: ApiClient,
}

impl ProductService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Set the absolute stock level.
    pub fn update_stock(&self, id: &str, quantity: u32) -> Result<Product, ApiError> {
        let body = StockBody { stock_quantity: quantity };
        let result = self.client.patch(&format!("{PRODUCTS}/{id}/stock"), &body);
        logged(result.map(|r| r.data), "update stock")
    }

    pub fn add_stock(&self, id: &str, quantity: u32) -> Result<Product, ApiError> {
        let result = self
            .client
            .patch(&format!("{PRODUCTS}/{id}/add-stock"), &QuantityBody { quantity });
        logged(result.map(|r| r.data), "add stock")
    }

    pub fn remove_stock(&self, id: &str, quantity: u32) -> Result<Product, ApiError> {
        let result = self
            .client
            .patch(&format!("{PRODUCTS}/{id}/remove-stock"), &QuantityBody { quantity });
        logged(result.map(|r| r.data), "remove stock")
    }

    /// Server-side price reduction by `percentage` (0 to 100 inclusive).
    pub fn apply_discount(&self, id: &str, percentage: Decimal) -> Result<Product, ApiError> {
        let result = if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            Err(ApiError::invalid("Discount percentage must be between 0 and 100"))
        } else {
            self.client
                .patch(&format!("{PRODUCTS}/{id}/discount"), &DiscountBody { percentage })
        };
        logged(result.map(|r| r.data), "apply discount")
    }

    pub fn by_category(
        &self,
        category: &str,
        params: &ProductListParams,
    ) -> Result<ListResponse<Product>, ApiError> {
        let params = params.merged(&ProductListParams {
            category: Some(category.to_string()),
            ..Default::default()
        });
        self.list(&params)
    }

    pub fn featured(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        let result = self
            .client
            .get::<ListResponse<Product>>(&format!("{PRODUCTS}/featured?limit={limit}"));
        logged(result.map(|r| r.data.data), "fetch featured products")
    }

    pub fn popular(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        let result = self
            .client
            .get::<ListResponse<Product>>(&format!("{PRODUCTS}/popular?limit={limit}"));
        logged(result.map(|r| r.data.data), "fetch popular products")
    }

    pub fn categories(&self) -> Result<Vec<Category>, ApiError> {
        logged(self.client.get(CATEGORIES).map(|r| r.data), "fetch categories")
    }
}

impl ResourceService for ProductService {
    type Record = Product;
    type ListParams = ProductListParams;
    type Create = CreateProductRequest;
    type Update = UpdateProductRequest;

    const RESOURCE: &'static str = "products";
    const DEFAULT_SEARCH_LIMIT: u32 = 20;

    fn list(&self, params: &ProductListParams) -> Result<ListResponse<Product>, ApiError> {
        let endpoint = with_query(PRODUCTS, &params.to_query());
        logged(self.client.get(&endpoint).map(|r| r.data), "fetch products")
    }

    fn get_by_id(&self, id: &str) -> Result<Product, ApiError> {
        logged(self.client.get(&format!("{PRODUCTS}/{id}")).map(|r| r.data), "fetch product")
    }

    fn create(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        let result =
            ensure_valid(request.validate()).and_then(|()| self.client.post(PRODUCTS, request));
        logged(result.map(|r| r.data), "create product")
    }

    fn update(&self, id: &str, updates: &UpdateProductRequest) -> Result<Product, ApiError> {
        let result = if updates.price.is_some_and(|price| !validate_price(price)) {
            Err(ApiError::invalid("Invalid price value"))
        } else {
            self.client.put(&format!("{PRODUCTS}/{id}"), updates)
        };
        logged(result.map(|r| r.data), "update product")
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        logged(self.client.delete(&format!("{PRODUCTS}/{id}")), "delete product")
    }

    fn search(&self, query: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        let endpoint = format!("{PRODUCTS}/search?q={}&limit={limit}", encode_component(query));
        let result = self.client.get::<ListResponse<Product>>(&endpoint);
        logged(result.map(|r| r.data.data), "search products")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::ClientConfig;
    use crate::http::HttpMethod;
    use crate::testing::ScriptedTransport;

    fn service() -> (ProductService, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new(ClientConfig::with_base_url("http://api.test"), transport.clone());
        (ProductService::new(client), transport)
    }

    fn product_json(id: &str, stock: u32) -> serde_json::Value {
        json!({
            "id": id, "name": "Thermometer", "description": "Digital",
            "price": 12.5, "category": "devices", "tags": [],
            "inStock": stock > 0, "stockQuantity": stock, "rating": 4.5,
            "reviewCount": 2, "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn create_with_invalid_price_never_hits_network() {
        let (svc, transport) = service();
        let err = svc
            .create(&CreateProductRequest {
                name: "Thermometer".to_string(),
                description: "Digital".to_string(),
                price: Decimal::ZERO,
                category: "devices".to_string(),
                tags: Vec::new(),
                image_url: None,
                stock_quantity: 1,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Price must be a positive number less than $999,999"
        );
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn update_rejects_out_of_range_price() {
        let (svc, transport) = service();
        let err = svc
            .update("p1", &UpdateProductRequest { price: Some(Decimal::from(1_000_000)), ..Default::default() })
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid price value");
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn update_stock_patches_absolute_quantity() {
        let (svc, transport) = service();
        transport.push_json(200, json!({"data": product_json("p1", 9)}));
        let p = svc.update_stock("p1", 9).unwrap();
        assert_eq!(p.stock_quantity, 9);
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://api.test/products/p1/stock");
        assert_eq!(req.body.as_deref(), Some(r#"{"stockQuantity":9}"#));
    }

    #[test]
    fn discount_outside_range_is_rejected_locally() {
        let (svc, transport) = service();
        assert!(svc.apply_discount("p1", Decimal::from(101)).is_err());
        assert!(svc.apply_discount("p1", Decimal::from(-1)).is_err());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn discount_sends_percentage_as_number() {
        let (svc, transport) = service();
        transport.push_json(200, json!({"data": product_json("p1", 3)}));
        svc.apply_discount("p1", Decimal::from(25)).unwrap();
        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["percentage"].as_f64(), Some(25.0));
    }

    #[test]
    fn by_category_overrides_category_filter() {
        let (svc, transport) = service();
        transport.push_json(200, json!({"data": {"data": [], "pagination": {"page": 2, "limit": 5, "total": 0, "totalPages": 0}}}));
        let params = ProductListParams { page: Some(2), category: Some("old".to_string()), ..Default::default() };
        svc.by_category("devices", &params).unwrap();
        assert_eq!(transport.requests()[0].url, "http://api.test/products?page=2&category=devices");
    }

    #[test]
    fn categories_unwrap_plain_array() {
        let (svc, transport) = service();
        transport.push_json(200, json!({
            "data": [{"id": "devices", "name": "devices", "description": "", "productCount": 4}]
        }));
        let categories = svc.categories().unwrap();
        assert_eq!(categories[0].product_count, 4);
        assert_eq!(transport.requests()[0].url, "http://api.test/categories");
    }

    #[test]
    fn featured_passes_limit() {
        let (svc, transport) = service();
        transport.push_json(200, json!({"data": {"data": [product_json("p1", 1)]}}));
        assert_eq!(svc.featured(3).unwrap().len(), 1);
        assert_eq!(transport.requests()[0].url, "http://api.test/products/featured?limit=3");
    }
}
