//! Product records, stock and pricing rules.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{encode_component, Identified, ListQuery};

pub const NAME_REQUIRED: &str = "Product name is required";
pub const NAME_TOO_LONG: &str = "Product name must be less than 100 characters";
pub const DESCRIPTION_REQUIRED: &str = "Product description is required";
pub const DESCRIPTION_TOO_LONG: &str = "Product description must be less than 1000 characters";
pub const PRICE_RULE: &str = "Price must be a positive number less than $999,999";
pub const CATEGORY_REQUIRED: &str = "Product category is required";

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_PRICE: i64 = 999_999;
const LOW_STOCK_THRESHOLD: u32 = 5;
const MAX_STARS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.in_stock && self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= LOW_STOCK_THRESHOLD
    }

    pub fn stock_status(&self) -> StockStatus {
        if !self.in_stock || self.stock_quantity == 0 {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// USD price with thousands separators, e.g. `$1,234.50`.
    pub fn formatted_price(&self) -> String {
        format_usd(self.price)
    }

    /// Five glyphs: one filled star per whole rating point, `☆` for the rest.
    /// A half point shows as `☆` as well.
    pub fn rating_stars(&self) -> String {
        let full = (self.rating.max(0.0).floor() as usize).min(MAX_STARS);
        format!("{}{}", "★".repeat(full), "☆".repeat(MAX_STARS - full))
    }

    pub fn display_image(&self) -> String {
        match &self.image_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "https://via.placeholder.com/300x200/e2e8f0/64748b?text={}",
                encode_component(&self.name)
            ),
        }
    }

    /// Copy with the price reduced by `percentage` percent, rounded to cents.
    pub fn with_discount(&self, percentage: Decimal) -> Product {
        let factor = (Decimal::ONE_HUNDRED - percentage) / Decimal::ONE_HUNDRED;
        Product {
            price: (self.price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            ..self.clone()
        }
    }

    /// Copy with `delta` added to the stock, clamped at zero.
    pub fn with_stock_change(&self, delta: i64) -> Product {
        let next = (i64::from(self.stock_quantity) + delta).max(0);
        let stock_quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Product {
            stock_quantity,
            in_stock: stock_quantity > 0,
            ..self.clone()
        }
    }

    /// Copy with one more review folded into the running mean.
    pub fn with_review(&self, score: f64) -> Product {
        let review_count = self.review_count.saturating_add(1);
        let total = self.rating * f64::from(self.review_count) + score;
        let mean = total / f64::from(review_count);
        Product {
            rating: (mean * 10.0).round() / 10.0,
            review_count,
            ..self.clone()
        }
    }

    /// Copy with every field present in `updates` applied. `in_stock` is
    /// forced off when the resulting quantity is zero.
    pub fn with_updates(&self, updates: &UpdateProductRequest) -> Product {
        let mut next = self.clone();
        if let Some(name) = &updates.name {
            next.name = name.clone();
        }
        if let Some(description) = &updates.description {
            next.description = description.clone();
        }
        if let Some(price) = updates.price {
            next.price = price;
        }
        if let Some(category) = &updates.category {
            next.category = category.clone();
        }
        if let Some(tags) = &updates.tags {
            next.tags = tags.clone();
        }
        if let Some(image_url) = &updates.image_url {
            next.image_url = Some(image_url.clone());
        }
        if let Some(in_stock) = updates.in_stock {
            next.in_stock = in_stock;
        }
        if let Some(stock_quantity) = updates.stock_quantity {
            next.stock_quantity = stock_quantity;
        }
        if next.stock_quantity == 0 {
            next.in_stock = false;
        }
        next
    }
}

fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn validate_price(price: Decimal) -> bool {
    price > Decimal::ZERO && price <= Decimal::from(MAX_PRICE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock_quantity: u32,
}

impl CreateProductRequest {
    /// Every rule the request violates. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(NAME_REQUIRED.to_string());
        } else if self.name.chars().count() > MAX_NAME_LEN {
            errors.push(NAME_TOO_LONG.to_string());
        }

        if self.description.trim().is_empty() {
            errors.push(DESCRIPTION_REQUIRED.to_string());
        } else if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(DESCRIPTION_TOO_LONG.to_string());
        }

        if !validate_price(self.price) {
            errors.push(PRICE_RULE.to_string());
        }

        if self.category.trim().is_empty() {
            errors.push(CATEGORY_REQUIRED.to_string());
        }

        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    Name,
    Price,
    Rating,
    CreatedAt,
}

impl ProductSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSortField::Name => "name",
            ProductSortField::Price => "price",
            ProductSortField::Rating => "rating",
            ProductSortField::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<ProductSortField>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery for ProductListParams {
    fn merged(&self, overrides: &Self) -> Self {
        Self {
            page: overrides.page.or(self.page),
            limit: overrides.limit.or(self.limit),
            category: overrides.category.clone().or_else(|| self.category.clone()),
            min_price: overrides.min_price.or(self.min_price),
            max_price: overrides.max_price.or(self.max_price),
            in_stock: overrides.in_stock.or(self.in_stock),
            search: overrides.search.clone().or_else(|| self.search.clone()),
            sort_by: overrides.sort_by.or(self.sort_by),
            sort_order: overrides.sort_order.or(self.sort_order),
        }
    }

    fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query.append_pair("category", category);
        }
        if let Some(min_price) = self.min_price {
            query.append_pair("minPrice", &min_price.to_string());
        }
        if let Some(max_price) = self.max_price {
            query.append_pair("maxPrice", &max_price.to_string());
        }
        if let Some(in_stock) = self.in_stock {
            query.append_pair("inStock", &in_stock.to_string());
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.append_pair("search", search);
        }
        if let Some(sort_by) = self.sort_by {
            query.append_pair("sortBy", sort_by.as_str());
        }
        if let Some(sort_order) = self.sort_order {
            query.append_pair("sortOrder", sort_order.as_str());
        }
        query.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Pulse Oximeter".to_string(),
            description: "Fingertip SpO2 monitor".to_string(),
            price: Decimal::new(4999, 2),
            category: "devices".to_string(),
            tags: vec!["clinic".to_string()],
            image_url: None,
            in_stock: stock > 0,
            stock_quantity: stock,
            rating: 4.0,
            review_count: 4,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn create_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Stethoscope".to_string(),
            description: "Dual head".to_string(),
            price: Decimal::new(8900, 2),
            category: "devices".to_string(),
            tags: Vec::new(),
            image_url: None,
            stock_quantity: 3,
        }
    }

    #[test]
    fn removing_more_than_stock_clamps_to_zero() {
        let p = product(3).with_stock_change(-10);
        assert_eq!(p.stock_quantity, 0);
        assert!(!p.in_stock);
        assert!(!p.is_available());
        assert_eq!(p.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn adding_stock_restores_availability() {
        let p = product(0).with_stock_change(7);
        assert_eq!(p.stock_quantity, 7);
        assert!(p.in_stock);
        assert_eq!(p.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        assert!(product(5).is_low_stock());
        assert_eq!(product(5).stock_status(), StockStatus::LowStock);
        assert!(!product(6).is_low_stock());
    }

    #[test]
    fn review_updates_weighted_mean_and_count() {
        let p = product(1).with_review(5.0);
        // (4.0 * 4 + 5) / 5 = 4.2
        assert_eq!(p.rating, 4.2);
        assert_eq!(p.review_count, 5);

        let p = p.with_review(1.0);
        // (4.2 * 5 + 1) / 6 = 3.666..
        assert_eq!(p.rating, 3.7);
        assert_eq!(p.review_count, 6);
    }

    #[test]
    fn review_count_saturates_at_max() {
        let mut base = product(1);
        base.rating = 4.0;
        base.review_count = u32::MAX;
        let p = base.with_review(4.0);
        assert_eq!(p.review_count, u32::MAX);
        assert_eq!(p.rating, 4.0);
    }

    #[test]
    fn first_review_sets_rating() {
        let mut base = product(1);
        base.rating = 0.0;
        base.review_count = 0;
        let p = base.with_review(3.0);
        assert_eq!(p.rating, 3.0);
        assert_eq!(p.review_count, 1);
    }

    #[test]
    fn discount_rounds_to_cents() {
        let p = product(1).with_discount(Decimal::new(15, 0));
        // 49.99 * 0.85 = 42.4915
        assert_eq!(p.price, Decimal::new(4249, 2));
        assert_eq!(product(1).price, Decimal::new(4999, 2));
    }

    #[test]
    fn formatted_price_groups_thousands() {
        let mut p = product(1);
        assert_eq!(p.formatted_price(), "$49.99");
        p.price = Decimal::new(123_456_75, 2);
        assert_eq!(p.formatted_price(), "$123,456.75");
        p.price = Decimal::new(1000, 0);
        assert_eq!(p.formatted_price(), "$1,000.00");
    }

    #[test]
    fn rating_stars_always_five_glyphs() {
        let mut p = product(1);
        p.rating = 3.6;
        assert_eq!(p.rating_stars(), "★★★☆☆");
        p.rating = 4.5;
        assert_eq!(p.rating_stars(), "★★★★☆");
        p.rating = 0.0;
        assert_eq!(p.rating_stars(), "☆☆☆☆☆");
        p.rating = 5.0;
        assert_eq!(p.rating_stars(), "★★★★★");
    }

    #[test]
    fn display_image_falls_back_to_placeholder() {
        let p = product(1);
        assert!(p.display_image().ends_with("?text=Pulse+Oximeter"));
        let mut q = p.clone();
        q.image_url = Some("https://cdn/img.png".to_string());
        assert_eq!(q.display_image(), "https://cdn/img.png");
    }

    #[test]
    fn price_bounds() {
        assert!(!validate_price(Decimal::ZERO));
        assert!(validate_price(Decimal::new(1, 2)));
        assert!(validate_price(Decimal::from(999_999)));
        assert!(!validate_price(Decimal::new(99_999_901, 2)));
    }

    #[test]
    fn create_request_violations() {
        assert!(create_request().validate().is_empty());

        let mut req = create_request();
        req.name = "x".repeat(101);
        assert_eq!(req.validate(), vec![NAME_TOO_LONG.to_string()]);

        let mut req = create_request();
        req.price = Decimal::new(-1, 0);
        req.category = " ".to_string();
        assert_eq!(
            req.validate(),
            vec![PRICE_RULE.to_string(), CATEGORY_REQUIRED.to_string()]
        );
    }

    #[test]
    fn zero_stock_update_forces_out_of_stock() {
        let p = product(4).with_updates(&UpdateProductRequest {
            stock_quantity: Some(0),
            in_stock: Some(true),
            ..Default::default()
        });
        assert!(!p.in_stock);
    }

    #[test]
    fn price_travels_as_json_number() {
        let json = serde_json::to_value(product(2)).unwrap();
        assert!((json["price"].as_f64().unwrap() - 49.99).abs() < 1e-9);
        assert_eq!(json["stockQuantity"], 2);
        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.price.round_dp(2), Decimal::new(4999, 2));
        assert_eq!(back.tags, product(2).tags);
    }

    #[test]
    fn list_params_encode_filters_and_sorting() {
        let params = ProductListParams {
            category: Some("devices".to_string()),
            min_price: Some(Decimal::new(10, 0)),
            in_stock: Some(true),
            sort_by: Some(ProductSortField::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            "category=devices&minPrice=10&inStock=true&sortBy=createdAt&sortOrder=desc"
        );
    }
}
