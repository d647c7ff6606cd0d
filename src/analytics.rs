// 📊 Analytics engine - aggregate metrics over a consistent catalog snapshot
//
// Every summary is computed under a single read guard, so a long aggregate
// pass can never mix state from before and after a concurrent write.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogState};
use crate::model::{round_cents, AccountStatus, Business, Industry, ServiceStatus};

// ============================================================================
// FILTER
// ============================================================================

/// Optional subset restriction for analytics (same axes as the business
/// filters, without pagination)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsFilter {
    pub industry: Option<Industry>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub account_status: Option<AccountStatus>,
}

impl AnalyticsFilter {
    fn matches(&self, business: &Business) -> bool {
        self.industry.is_none_or(|i| business.industry == i)
            && self
                .province
                .as_ref()
                .is_none_or(|p| business.address.province == *p)
            && self.city.as_ref().is_none_or(|c| business.address.city == *c)
            && self
                .account_status
                .is_none_or(|s| business.account_status == s)
    }
}

// ============================================================================
// SUMMARY TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_monthly_revenue: f64,
    /// Average over zero businesses is 0.0, never a division fault
    pub average_monthly_revenue: f64,
    pub by_industry: BTreeMap<String, f64>,
    pub by_province: BTreeMap<String, f64>,
    /// Active services' prices summed per service type
    pub by_service_type: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub total_customers: usize,
    pub by_account_status: BTreeMap<String, usize>,
    pub by_industry: BTreeMap<String, usize>,
    pub by_province: BTreeMap<String, usize>,
    /// Acquisition trend: customer-since dates bucketed by year
    pub acquisitions_by_year: BTreeMap<i32, usize>,
    pub average_services_per_customer: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_customers: usize,
    pub total_monthly_revenue: f64,
    pub average_revenue_per_customer: f64,
}

/// Revenue and customer summaries computed from one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSummary {
    pub revenue: RevenueSummary,
    pub customers: CustomerSummary,
    pub overall: OverallSummary,
}

// ============================================================================
// COMPUTATION
// ============================================================================

fn filtered<'a>(
    state: &'a CatalogState,
    filter: Option<&'a AnalyticsFilter>,
) -> impl Iterator<Item = &'a Business> {
    state
        .businesses
        .values()
        .filter(move |b| filter.is_none_or(|f| f.matches(b)))
}

fn revenue_from(state: &CatalogState, filter: Option<&AnalyticsFilter>) -> RevenueSummary {
    let mut total = 0.0;
    let mut count = 0usize;
    let mut by_industry: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_province: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_service_type: BTreeMap<String, f64> = BTreeMap::new();

    for business in filtered(state, filter) {
        total += business.total_monthly_revenue;
        count += 1;
        *by_industry
            .entry(business.industry.as_str().to_string())
            .or_default() += business.total_monthly_revenue;
        *by_province
            .entry(business.address.province.clone())
            .or_default() += business.total_monthly_revenue;

        for service in state.owned_services(&business.id) {
            if service.status == ServiceStatus::Active {
                *by_service_type
                    .entry(service.service_type.as_str().to_string())
                    .or_default() += service.monthly_price;
            }
        }
    }

    for value in by_industry
        .values_mut()
        .chain(by_province.values_mut())
        .chain(by_service_type.values_mut())
    {
        *value = round_cents(*value);
    }

    RevenueSummary {
        total_monthly_revenue: round_cents(total),
        average_monthly_revenue: if count > 0 {
            round_cents(total / count as f64)
        } else {
            0.0
        },
        by_industry,
        by_province,
        by_service_type,
    }
}

fn customers_from(state: &CatalogState, filter: Option<&AnalyticsFilter>) -> CustomerSummary {
    use chrono::Datelike;

    let mut total = 0usize;
    let mut services = 0usize;
    let mut by_account_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_industry: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_province: BTreeMap<String, usize> = BTreeMap::new();
    let mut acquisitions_by_year: BTreeMap<i32, usize> = BTreeMap::new();

    for business in filtered(state, filter) {
        total += 1;
        services += state
            .services_by_business
            .get(&business.id)
            .map(|ids| ids.len())
            .unwrap_or(0);
        *by_account_status
            .entry(business.account_status.as_str().to_string())
            .or_default() += 1;
        *by_industry
            .entry(business.industry.as_str().to_string())
            .or_default() += 1;
        *by_province
            .entry(business.address.province.clone())
            .or_default() += 1;
        *acquisitions_by_year
            .entry(business.customer_since.year())
            .or_default() += 1;
    }

    CustomerSummary {
        total_customers: total,
        by_account_status,
        by_industry,
        by_province,
        acquisitions_by_year,
        average_services_per_customer: if total > 0 {
            services as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// Revenue metrics over the catalog (or a filtered subset)
pub fn revenue_summary(catalog: &Catalog, filter: Option<&AnalyticsFilter>) -> RevenueSummary {
    revenue_from(&catalog.read(), filter)
}

/// Customer-composition metrics over the catalog (or a filtered subset)
pub fn customer_summary(catalog: &Catalog, filter: Option<&AnalyticsFilter>) -> CustomerSummary {
    customers_from(&catalog.read(), filter)
}

/// Both summaries plus the overall rollup, from one lock acquisition
pub fn combined_summary(catalog: &Catalog, filter: Option<&AnalyticsFilter>) -> CombinedSummary {
    let state = catalog.read();
    let revenue = revenue_from(&state, filter);
    let customers = customers_from(&state, filter);
    let overall = OverallSummary {
        total_customers: customers.total_customers,
        total_monthly_revenue: revenue.total_monthly_revenue,
        average_revenue_per_customer: if customers.total_customers > 0 {
            round_cents(revenue.total_monthly_revenue / customers.total_customers as f64)
        } else {
            0.0
        },
    };
    CombinedSummary {
        revenue,
        customers,
        overall,
    }
}

// ============================================================================
// TESTS
// ============================================================================
