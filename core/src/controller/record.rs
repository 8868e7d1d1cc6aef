//! State for a single loaded record.

use crate::error::ApiError;
use crate::models::{Identified, Product};
use crate::services::{ProductService, ResourceService};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordState<R> {
    pub record: Option<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for RecordState<R> {
    fn default() -> Self {
        Self {
            record: None,
            loading: false,
            error: None,
        }
    }
}

pub struct RecordController<S: ResourceService> {
    service: S,
    state: RecordState<S::Record>,
}

impl<S: ResourceService> RecordController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: RecordState::default(),
        }
    }

    /// Controller that loads `id` immediately when one is given.
    pub fn mount(service: S, id: Option<&str>) -> Self {
        let mut controller = Self::new(service);
        if let Some(id) = id {
            controller.fetch(id);
        }
        controller
    }

    pub fn state(&self) -> &RecordState<S::Record> {
        &self.state
    }

    pub fn record(&self) -> Option<&S::Record> {
        self.state.record.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn fetch(&mut self, id: &str) {
        self.state.loading = true;
        self.state.error = None;
        match self.service.get_by_id(id) {
            Ok(record) => self.state.record = Some(record),
            Err(err) => self.state.error = Some(err.to_string()),
        }
        self.state.loading = false;
    }

    pub fn update(&mut self, updates: &S::Update) -> Result<S::Record, ApiError> {
        self.apply(|service, id| service.update(id, updates))
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    pub fn clear(&mut self) {
        self.state = RecordState::default();
    }

    fn apply<F>(&mut self, call: F) -> Result<S::Record, ApiError>
    where
        F: FnOnce(&S, &str) -> Result<S::Record, ApiError>,
    {
        let id = match &self.state.record {
            Some(record) => record.id().to_string(),
            None => return Err(ApiError::NotLoaded),
        };
        self.state.error = None;
        match call(&self.service, &id) {
            Ok(record) => {
                self.state.record = Some(record.clone());
                Ok(record)
            }
            Err(err) => {
                self.state.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

impl RecordController<ProductService> {
    pub fn update_stock(&mut self, quantity: u32) -> Result<Product, ApiError> {
        self.apply(|service, id| service.update_stock(id, quantity))
    }
}
