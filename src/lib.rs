// Telco Catalog - Core Library
// Synthetic B2B customer/service catalog with query and analytics engines.
// Exposed for use in the CLI, the API server, and tests.

pub mod error;
pub mod model;      // Business + Service entities and payload types
pub mod reference;  // Static weighted reference tables
pub mod generator;  // Seeded synthetic dataset generator
pub mod catalog;    // Authoritative indexed store
pub mod query;      // Filters, search, pagination
pub mod analytics;  // Aggregate metrics over a snapshot
pub mod export;     // JSON / flat-CSV bulk forms

// Re-export commonly used types
pub use analytics::{
    combined_summary, customer_summary, revenue_summary, AnalyticsFilter, CombinedSummary,
    CustomerSummary, RevenueSummary,
};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use generator::{Generator, GeneratorConfig};
pub use model::{
    AccountStatus, Address, Business, BusinessUpdate, Industry, NewBusiness, NewService,
    PaymentMethod, Service, ServiceDetails, ServiceStatus, ServiceType, ServiceUpdate,
};
pub use query::{businesses, services, BusinessQuery, Page, ServiceQuery};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
