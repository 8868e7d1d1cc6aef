use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Moderator,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub product_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub stock_quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
    pub stock_quantity: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStock {
    pub stock_quantity: u32,
}

#[derive(Deserialize)]
pub struct StockDelta {
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct Discount {
    pub percentage: f64,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: Vec<Account>,
    products: Vec<Product>,
    sessions: HashMap<String, String>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/search", get(search_users))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/activate", patch(activate_user))
        .route("/users/{id}/deactivate", patch(deactivate_user))
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route("/products/featured", get(featured_products))
        .route("/products/popular", get(popular_products))
        .route("/products/{id}", get(get_product).put(update_product).delete(delete_product))
        .route("/products/{id}/stock", patch(set_stock))
        .route("/products/{id}/add-stock", patch(add_stock))
        .route("/products/{id}/remove-stock", patch(remove_stock))
        .route("/products/{id}/discount", patch(apply_discount))
        .route("/categories", get(list_categories))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile).put(update_profile));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, &format!("{what} not found"))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"message": self.message, "success": false})),
        )
            .into_response()
    }
}

type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), Failure>;

fn reply<T>(status: StatusCode, data: T, message: &str) -> Reply<T> {
    Ok((
        status,
        Json(Envelope {
            data,
            message: message.to_string(),
            success: true,
        }),
    ))
}

fn paginate<T: Clone>(items: &[T], page: Option<u32>, limit: Option<u32>) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(u64::from(limit)) as u32;
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let data = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    Page {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }
}

fn single_page<T>(data: Vec<T>) -> Page<T> {
    let count = data.len() as u32;
    Page {
        data,
        pagination: Pagination {
            page: 1,
            limit: count,
            total: u64::from(count),
            total_pages: 1,
        },
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn user_matches(user: &User, search: &str) -> bool {
    contains_ci(&user.username, search)
        || contains_ci(&user.email, search)
        || contains_ci(&user.first_name, search)
        || contains_ci(&user.last_name, search)
}

fn apply_user_update(user: &mut User, input: UpdateUser) {
    if let Some(username) = input.username {
        user.username = username;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(first_name) = input.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = input.last_name {
        user.last_name = last_name;
    }
    if let Some(avatar) = input.avatar {
        user.avatar = Some(avatar);
    }
    if let Some(role) = input.role {
        user.role = role;
    }
    if let Some(is_active) = input.is_active {
        user.is_active = is_active;
    }
    user.updated_at = Utc::now();
}

fn find_account<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Account, Failure> {
    store
        .accounts
        .iter_mut()
        .find(|a| a.user.id == id)
        .ok_or_else(|| Failure::not_found("User"))
}

async fn list_users(State(db): State<Db>, Query(q): Query<UserQuery>) -> Reply<Page<User>> {
    let store = db.read().await;
    let users: Vec<User> = store
        .accounts
        .iter()
        .map(|a| &a.user)
        .filter(|u| q.role.is_none_or(|role| u.role == role))
        .filter(|u| q.is_active.is_none_or(|active| u.is_active == active))
        .filter(|u| q.search.as_deref().is_none_or(|s| user_matches(u, s)))
        .cloned()
        .collect();
    reply(StatusCode::OK, paginate(&users, q.page, q.limit), "Users retrieved")
}

async fn search_users(State(db): State<Db>, Query(q): Query<SearchQuery>) -> Reply<Page<User>> {
    let store = db.read().await;
    let needle = q.q.unwrap_or_default();
    let found = store
        .accounts
        .iter()
        .map(|a| &a.user)
        .filter(|u| user_matches(u, &needle))
        .take(q.limit.unwrap_or(10))
        .cloned()
        .collect();
    reply(StatusCode::OK, single_page(found), "Users found")
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Reply<User> {
    let mut store = db.write().await;
    let account = find_account(&mut store, &id)?;
    reply(StatusCode::OK, account.user.clone(), "User retrieved")
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Reply<User> {
    let mut store = db.write().await;
    if store.accounts.iter().any(|a| a.user.username == input.username) {
        return Err(Failure::new(StatusCode::CONFLICT, "Username already taken"));
    }
    if input.password.len() < 6 {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Password too short"));
    }
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        avatar: None,
        role: input.role.unwrap_or(Role::User),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    store.accounts.push(Account {
        user: user.clone(),
        password: input.password,
    });
    reply(StatusCode::CREATED, user, "User created")
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Reply<User> {
    let mut store = db.write().await;
    let account = find_account(&mut store, &id)?;
    apply_user_update(&mut account.user, input);
    reply(StatusCode::OK, account.user.clone(), "User updated")
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> Reply<Option<()>> {
    let mut store = db.write().await;
    let before = store.accounts.len();
    store.accounts.retain(|a| a.user.id != id);
    if store.accounts.len() == before {
        return Err(Failure::not_found("User"));
    }
    store.sessions.retain(|_, user_id| *user_id != id);
    reply(StatusCode::OK, None, "User deleted")
}

async fn set_active(db: Db, id: String, active: bool) -> Reply<User> {
    let mut store = db.write().await;
    let account = find_account(&mut store, &id)?;
    account.user.is_active = active;
    account.user.updated_at = Utc::now();
    reply(StatusCode::OK, account.user.clone(), "User status updated")
}

async fn activate_user(State(db): State<Db>, Path(id): Path<String>) -> Reply<User> {
    set_active(db, id, true).await
}

async fn deactivate_user(State(db): State<Db>, Path(id): Path<String>) -> Reply<User> {
    set_active(db, id, false).await
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

fn product_matches(product: &Product, search: &str) -> bool {
    contains_ci(&product.name, search) || contains_ci(&product.description, search)
}

fn find_product<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Product, Failure> {
    store
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Failure::not_found("Product"))
}

fn set_quantity(product: &mut Product, quantity: u32) {
    product.stock_quantity = quantity;
    product.in_stock = quantity > 0;
    product.updated_at = Utc::now();
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn list_products(State(db): State<Db>, Query(q): Query<ProductQuery>) -> Reply<Page<Product>> {
    let store = db.read().await;
    let mut products: Vec<Product> = store
        .products
        .iter()
        .filter(|p| q.category.as_deref().is_none_or(|c| p.category == c))
        .filter(|p| q.min_price.is_none_or(|min| p.price >= min))
        .filter(|p| q.max_price.is_none_or(|max| p.price <= max))
        .filter(|p| q.in_stock.is_none_or(|in_stock| p.in_stock == in_stock))
        .filter(|p| q.search.as_deref().is_none_or(|s| product_matches(p, s)))
        .cloned()
        .collect();

    match q.sort_by.as_deref() {
        Some("name") => products.sort_by(|a, b| a.name.cmp(&b.name)),
        Some("price") => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Some("rating") => products.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
        Some("createdAt") => products.sort_by_key(|p| p.created_at),
        _ => {}
    }
    if q.sort_order.as_deref() == Some("desc") {
        products.reverse();
    }

    reply(StatusCode::OK, paginate(&products, q.page, q.limit), "Products retrieved")
}

async fn search_products(State(db): State<Db>, Query(q): Query<SearchQuery>) -> Reply<Page<Product>> {
    let store = db.read().await;
    let needle = q.q.unwrap_or_default();
    let found = store
        .products
        .iter()
        .filter(|p| product_matches(p, &needle))
        .take(q.limit.unwrap_or(20))
        .cloned()
        .collect();
    reply(StatusCode::OK, single_page(found), "Products found")
}

async fn ranked_products<K: Ord>(
    db: Db,
    limit: Option<usize>,
    key: impl Fn(&Product) -> K,
) -> Reply<Page<Product>> {
    let store = db.read().await;
    let mut products = store.products.clone();
    products.sort_by_key(|p| std::cmp::Reverse(key(p)));
    products.truncate(limit.unwrap_or(10));
    reply(StatusCode::OK, single_page(products), "Products retrieved")
}

async fn featured_products(State(db): State<Db>, Query(q): Query<SearchQuery>) -> Reply<Page<Product>> {
    ranked_products(db, q.limit, |p| (p.rating * 10.0).round() as i64).await
}

async fn popular_products(State(db): State<Db>, Query(q): Query<SearchQuery>) -> Reply<Page<Product>> {
    ranked_products(db, q.limit, |p| p.review_count).await
}

async fn get_product(State(db): State<Db>, Path(id): Path<String>) -> Reply<Product> {
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    reply(StatusCode::OK, product.clone(), "Product retrieved")
}

async fn create_product(State(db): State<Db>, Json(input): Json<CreateProduct>) -> Reply<Product> {
    if input.price <= 0.0 || input.price > 999_999.0 {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Invalid price"));
    }
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        price: input.price,
        category: input.category,
        tags: input.tags,
        image_url: input.image_url,
        in_stock: input.stock_quantity > 0,
        stock_quantity: input.stock_quantity,
        rating: 0.0,
        review_count: 0,
        created_at: now,
        updated_at: now,
    };
    db.write().await.products.push(product.clone());
    reply(StatusCode::CREATED, product, "Product created")
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Reply<Product> {
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(category) = input.category {
        product.category = category;
    }
    if let Some(tags) = input.tags {
        product.tags = tags;
    }
    if let Some(image_url) = input.image_url {
        product.image_url = Some(image_url);
    }
    if let Some(in_stock) = input.in_stock {
        product.in_stock = in_stock;
    }
    if let Some(quantity) = input.stock_quantity {
        set_quantity(product, quantity);
    }
    if product.stock_quantity == 0 {
        product.in_stock = false;
    }
    product.updated_at = Utc::now();
    reply(StatusCode::OK, product.clone(), "Product updated")
}

async fn delete_product(State(db): State<Db>, Path(id): Path<String>) -> Reply<Option<()>> {
    let mut store = db.write().await;
    let before = store.products.len();
    store.products.retain(|p| p.id != id);
    if store.products.len() == before {
        return Err(Failure::not_found("Product"));
    }
    reply(StatusCode::OK, None, "Product deleted")
}

async fn set_stock(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<SetStock>,
) -> Reply<Product> {
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    set_quantity(product, input.stock_quantity);
    reply(StatusCode::OK, product.clone(), "Stock updated")
}

async fn add_stock(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<StockDelta>,
) -> Reply<Product> {
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    let quantity = product.stock_quantity.saturating_add(input.quantity);
    set_quantity(product, quantity);
    reply(StatusCode::OK, product.clone(), "Stock added")
}

async fn remove_stock(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<StockDelta>,
) -> Reply<Product> {
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    let quantity = product.stock_quantity.saturating_sub(input.quantity);
    set_quantity(product, quantity);
    reply(StatusCode::OK, product.clone(), "Stock removed")
}

async fn apply_discount(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Discount>,
) -> Reply<Product> {
    if !(0.0..=100.0).contains(&input.percentage) {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "Discount percentage must be between 0 and 100",
        ));
    }
    let mut store = db.write().await;
    let product = find_product(&mut store, &id)?;
    product.price = round_cents(product.price * (1.0 - input.percentage / 100.0));
    product.updated_at = Utc::now();
    reply(StatusCode::OK, product.clone(), "Discount applied")
}

async fn list_categories(State(db): State<Db>) -> Reply<Vec<Category>> {
    let store = db.read().await;
    let mut counts: Vec<(String, u32)> = Vec::new();
    for product in &store.products {
        match counts.iter_mut().find(|(name, _)| *name == product.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((product.category.clone(), 1)),
        }
    }
    let categories = counts
        .into_iter()
        .map(|(name, product_count)| Category {
            id: name.clone(),
            description: String::new(),
            name,
            product_count,
        })
        .collect();
    reply(StatusCode::OK, categories, "Categories retrieved")
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> Reply<serde_json::Value> {
    let mut store = db.write().await;
    let user_id = store
        .accounts
        .iter()
        .find(|a| a.user.email == input.email && a.password == input.password)
        .map(|a| a.user.id.clone())
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user_id);
    reply(StatusCode::OK, json!({"token": token}), "Logged in")
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Reply<Option<()>> {
    if let Some(token) = bearer(&headers) {
        db.write().await.sessions.remove(token);
    }
    reply(StatusCode::OK, None, "Logged out")
}

fn session_user_id(store: &Store, headers: &HeaderMap) -> Result<String, Failure> {
    bearer(headers)
        .and_then(|token| store.sessions.get(token))
        .cloned()
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

async fn profile(State(db): State<Db>, headers: HeaderMap) -> Reply<User> {
    let mut store = db.write().await;
    let id = session_user_id(&store, &headers)?;
    let account = find_account(&mut store, &id)?;
    reply(StatusCode::OK, account.user.clone(), "Profile retrieved")
}

async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UpdateUser>,
) -> Reply<User> {
    let mut store = db.write().await;
    let id = session_user_id(&store, &headers)?;
    let account = find_account(&mut store, &id)?;
    apply_user_update(&mut account.user, input);
    reply(StatusCode::OK, account.user.clone(), "Profile updated")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_reports_total_pages() {
        let items: Vec<u32> = (0..23).collect();
        let page = paginate(&items, Some(3), Some(10));
        assert_eq!(page.data, vec![20, 21, 22]);
        assert_eq!(
            page.pagination,
            Pagination { page: 3, limit: 10, total: 23, total_pages: 3 }
        );
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let items = vec![1, 2, 3];
        let page = paginate(&items, Some(5), Some(2));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn paginate_clamps_zero_page_and_limit() {
        let items = vec![1, 2, 3];
        let page = paginate(&items, Some(0), Some(0));
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 1);
        assert_eq!(page.data, vec![1]);
    }

    #[test]
    fn create_user_defaults_role_to_user() {
        let input: CreateUser = serde_json::from_str(
            r#"{"username":"ada","email":"a@b.co","firstName":"Ada","lastName":"L","password":"secret"}"#,
        )
        .unwrap();
        assert!(input.role.is_none());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<UpdateUser, _> = serde_json::from_str(r#"{"role":"root"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn discount_rounds_to_cents() {
        assert_eq!(round_cents(49.99 * 0.85), 42.49);
    }

    #[test]
    fn failure_body_carries_message() {
        let resp = Failure::not_found("User").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
