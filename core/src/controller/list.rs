//! Paged list state for one resource.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ApiError;
use crate::models::{Identified, ListQuery, Product, User};
use crate::services::{ProductService, ResourceService, UserService};
use crate::types::{ListResponse, Pagination};

use super::ReconcilePolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: Pagination::default(),
        }
    }
}

/// An in-flight list load. Carries the merged parameters to send.
#[derive(Debug)]
#[must_use]
pub struct FetchTicket<P> {
    generation: u64,
    params: P,
}

impl<P> FetchTicket<P> {
    pub fn params(&self) -> &P {
        &self.params
    }
}

/// An in-flight search.
#[derive(Debug)]
#[must_use]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// An in-flight update of one entry.
#[derive(Debug)]
#[must_use]
pub struct UpdateTicket {
    generation: u64,
    id: String,
}

impl UpdateTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// List, loading flag, error and pagination for one resource.
pub struct ListController<S: ResourceService> {
    service: S,
    state: ListState<S::Record>,
    params: S::ListParams,
    policy: ReconcilePolicy,
    next_generation: u64,
    list_generation: u64,
    entry_generations: HashMap<String, u64>,
}

impl<S: ResourceService> ListController<S> {
    /// Controller with empty state. Nothing is fetched.
    pub fn new(service: S, initial_params: S::ListParams) -> Self {
        Self {
            service,
            state: ListState::default(),
            params: initial_params,
            policy: ReconcilePolicy::default(),
            next_generation: 0,
            list_generation: 0,
            entry_generations: HashMap::new(),
        }
    }

    /// Controller that has performed its single initial fetch.
    pub fn mount(service: S, initial_params: S::ListParams) -> Self {
        let mut controller = Self::new(service, initial_params);
        controller.refresh();
        controller
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &ListState<S::Record> {
        &self.state
    }

    pub fn items(&self) -> &[S::Record] {
        &self.state.items
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.pagination
    }

    /// Parameters of the most recent fetch.
    pub fn params(&self) -> &S::ListParams {
        &self.params
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn issue(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn discard(&self, what: &str) {
        debug!(resource = S::RESOURCE, what, "discarding stale completion");
    }

    /// Merge `overrides` over the last-used parameters and mark a load in flight.
    pub fn begin_fetch(&mut self, overrides: &S::ListParams) -> FetchTicket<S::ListParams> {
        self.params = self.params.merged(overrides);
        self.state.loading = true;
        self.state.error = None;
        self.list_generation = self.issue();
        FetchTicket {
            generation: self.list_generation,
            params: self.params.clone(),
        }
    }

    /// Apply a list load. Returns `false` when the ticket was stale and the
    /// state was left untouched.
    ///
    /// On failure the previous items stay in place.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket<S::ListParams>,
        result: Result<ListResponse<S::Record>, ApiError>,
    ) -> bool {
        if ticket.generation != self.list_generation {
            self.discard("fetch");
            return false;
        }
        match result {
            Ok(page) => {
                self.state.items = page.data;
                self.state.pagination = page.pagination;
            }
            Err(err) => self.state.error = Some(err.to_string()),
        }
        self.state.loading = false;
        true
    }

    pub fn fetch(&mut self, overrides: &S::ListParams) {
        let ticket = self.begin_fetch(overrides);
        let result = self.service.list(ticket.params());
        self.complete_fetch(ticket, result);
    }

    /// Fetch again with the last-used parameters.
    pub fn refresh(&mut self) {
        self.fetch(&S::ListParams::default());
    }

    /// Replace the stored parameters outright and fetch.
    ///
    /// `fetch` only merges, so a field once set stays set there. Fields left
    /// `None` here are dropped from the query.
    pub fn set_params(&mut self, params: S::ListParams) {
        self.params = params;
        self.refresh();
    }

    /// Drop every filter and fetch the unfiltered list.
    pub fn reset_params(&mut self) {
        self.set_params(S::ListParams::default());
    }

    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.state.loading = true;
        self.state.error = None;
        self.list_generation = self.issue();
        SearchTicket {
            generation: self.list_generation,
            query: query.to_string(),
        }
    }

    /// Replace the list with search results collapsed onto a single page.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<S::Record>, ApiError>,
    ) -> bool {
        if ticket.generation != self.list_generation {
            self.discard("search");
            return false;
        }
        match result {
            Ok(found) => {
                self.state.pagination = Pagination::single_page(found.len());
                self.state.items = found;
            }
            Err(err) => self.state.error = Some(err.to_string()),
        }
        self.state.loading = false;
        true
    }

    pub fn search(&mut self, query: &str) {
        let ticket = self.begin_search(query);
        let result = self.service.search(ticket.query(), S::DEFAULT_SEARCH_LIMIT);
        self.complete_search(ticket, result);
    }

    pub fn create(&mut self, request: &S::Create) -> Result<S::Record, ApiError> {
        self.state.error = None;
        match self.service.create(request) {
            Ok(created) => {
                match self.policy {
                    ReconcilePolicy::Resync => self.refresh(),
                    ReconcilePolicy::LocalPatch => {
                        self.state.items.push(created.clone());
                        let total = self.state.pagination.total.saturating_add(1);
                        self.state.pagination = self.state.pagination.with_total(total);
                    }
                }
                Ok(created)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn begin_update(&mut self, id: &str) -> UpdateTicket {
        self.state.error = None;
        let generation = self.issue();
        self.entry_generations.insert(id.to_string(), generation);
        UpdateTicket {
            generation,
            id: id.to_string(),
        }
    }

    /// Reconcile an update. The result is returned unchanged; state is only
    /// touched when no newer update for the same id was issued since.
    pub fn complete_update(
        &mut self,
        ticket: UpdateTicket,
        result: Result<S::Record, ApiError>,
    ) -> Result<S::Record, ApiError> {
        if self.entry_generations.get(&ticket.id) != Some(&ticket.generation) {
            self.discard("update");
            return result;
        }
        self.entry_generations.remove(&ticket.id);
        match result {
            Ok(updated) => {
                match self.policy {
                    ReconcilePolicy::Resync => self.refresh(),
                    ReconcilePolicy::LocalPatch => {
                        for item in &mut self.state.items {
                            if item.id() == ticket.id {
                                *item = updated.clone();
                            }
                        }
                    }
                }
                Ok(updated)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn update(&mut self, id: &str, updates: &S::Update) -> Result<S::Record, ApiError> {
        let ticket = self.begin_update(id);
        let result = self.service.update(id, updates);
        self.complete_update(ticket, result)
    }

    /// Delete on the server, then reconcile.
    ///
    /// Under `LocalPatch`, `total` is decremented only when an entry was
    /// actually removed from the current page.
    pub fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.error = None;
        match self.service.delete(id) {
            Ok(()) => {
                self.entry_generations.remove(id);
                match self.policy {
                    ReconcilePolicy::Resync => self.refresh(),
                    ReconcilePolicy::LocalPatch => {
                        let before = self.state.items.len();
                        self.state.items.retain(|item| item.id() != id);
                        if self.state.items.len() < before {
                            let total = self.state.pagination.total.saturating_sub(1);
                            self.state.pagination = self.state.pagination.with_total(total);
                        }
                    }
                }
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Invalidate every outstanding ticket. Completions arriving afterwards
    /// are discarded.
    pub fn cancel_pending(&mut self) {
        self.list_generation = self.issue();
        self.entry_generations.clear();
        self.state.loading = false;
    }

    fn fail(&mut self, err: ApiError) -> ApiError {
        self.state.error = Some(err.to_string());
        err
    }

    fn apply_entry<F>(&mut self, id: &str, call: F) -> Result<S::Record, ApiError>
    where
        F: FnOnce(&S) -> Result<S::Record, ApiError>,
    {
        let ticket = self.begin_update(id);
        let result = call(&self.service);
        self.complete_update(ticket, result)
    }
}

impl ListController<ProductService> {
    pub fn update_stock(&mut self, id: &str, quantity: u32) -> Result<Product, ApiError> {
        self.apply_entry(id, |service| service.update_stock(id, quantity))
    }

    pub fn apply_discount(&mut self, id: &str, percentage: rust_decimal::Decimal) -> Result<Product, ApiError> {
        self.apply_entry(id, |service| service.apply_discount(id, percentage))
    }
}

impl ListController<UserService> {
    pub fn set_active(&mut self, id: &str, active: bool) -> Result<User, ApiError> {
        self.apply_entry(id, |service| {
            if active {
                service.activate(id)
            } else {
                service.deactivate(id)
            }
        })
    }
}
