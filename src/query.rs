// 🔎 Query engine - conjunctive filters, search, stable pagination
//
// Filters narrow through the catalog's secondary indices; results are always
// ordered by id ascending so repeated calls partition the same match set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{business_seq_key, Catalog};
use crate::error::{CatalogError, Result};
use crate::model::{AccountStatus, Business, Industry, Service, ServiceStatus, ServiceType};

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// A page of results plus the size of the whole match set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Filter specification for businesses. Absent filters impose no constraint;
/// present ones combine with AND.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessQuery {
    pub industry: Option<Industry>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub account_status: Option<AccountStatus>,
    /// Case-insensitive substring over company name, email and phone
    pub search: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for BusinessQuery {
    fn default() -> Self {
        BusinessQuery {
            industry: None,
            province: None,
            city: None,
            account_status: None,
            search: None,
            skip: 0,
            limit: 100,
        }
    }
}

/// Filter specification for services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceQuery {
    pub service_type: Option<ServiceType>,
    pub status: Option<ServiceStatus>,
    pub business_id: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for ServiceQuery {
    fn default() -> Self {
        ServiceQuery {
            service_type: None,
            status: None,
            business_id: None,
            skip: 0,
            limit: 100,
        }
    }
}

fn validate_page(skip: i64, limit: i64) -> Result<(usize, usize)> {
    if skip < 0 {
        return Err(CatalogError::validation("skip must not be negative"));
    }
    if limit <= 0 {
        return Err(CatalogError::validation("limit must be positive"));
    }
    Ok((skip as usize, limit as usize))
}

// ============================================================================
// BUSINESS QUERIES
// ============================================================================

/// Resolve a business filter to a deterministic page (id ascending)
pub fn businesses(catalog: &Catalog, query: &BusinessQuery) -> Result<Page<Business>> {
    let (skip, limit) = validate_page(query.skip, query.limit)?;
    let state = catalog.read();

    // Index sets for the present filters; the empty set short-circuits
    let mut index_sets: Vec<&BTreeSet<String>> = Vec::new();
    static EMPTY: BTreeSet<String> = BTreeSet::new();
    if let Some(industry) = query.industry {
        index_sets.push(state.by_industry.get(&industry).unwrap_or(&EMPTY));
    }
    if let Some(province) = &query.province {
        index_sets.push(state.by_province.get(province).unwrap_or(&EMPTY));
    }
    if let Some(city) = &query.city {
        index_sets.push(state.by_city.get(city).unwrap_or(&EMPTY));
    }
    if let Some(status) = query.account_status {
        index_sets.push(state.by_account_status.get(&status).unwrap_or(&EMPTY));
    }

    let needle = query.search.as_ref().map(|s| s.to_lowercase());
    let matches_search = |b: &Business| {
        needle.as_ref().is_none_or(|needle| {
            b.company_name.to_lowercase().contains(needle)
                || b.email.to_lowercase().contains(needle)
                || b.phone.to_lowercase().contains(needle)
        })
    };

    // Walk the narrowest index (or the full table) in ascending id order,
    // testing membership in the remaining sets
    let mut matching: Vec<&Business> = Vec::new();
    match index_sets.iter().min_by_key(|set| set.len()) {
        Some(smallest) => {
            for id in smallest.iter() {
                if !index_sets.iter().all(|set| set.contains(id)) {
                    continue;
                }
                if let Some(business) = state.businesses.get(id) {
                    if matches_search(business) {
                        matching.push(business);
                    }
                }
            }
        }
        None => {
            for business in state.businesses.values() {
                if matches_search(business) {
                    matching.push(business);
                }
            }
        }
    }
    // Map/index iteration is lexicographic; restore numeric order for ids
    // past the zero-padding width
    matching.sort_by(|a, b| business_seq_key(&a.id).cmp(&business_seq_key(&b.id)));

    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|b| state.with_services(b))
        .collect();

    Ok(Page { items, total })
}

// ============================================================================
// SERVICE QUERIES
// ============================================================================

/// Resolve a service filter to a deterministic page (id ascending)
pub fn services(catalog: &Catalog, query: &ServiceQuery) -> Result<Page<Service>> {
    let (skip, limit) = validate_page(query.skip, query.limit)?;
    let state = catalog.read();

    let mut index_sets: Vec<&BTreeSet<u64>> = Vec::new();
    static EMPTY: BTreeSet<u64> = BTreeSet::new();
    if let Some(ty) = query.service_type {
        index_sets.push(state.by_service_type.get(&ty).unwrap_or(&EMPTY));
    }
    if let Some(status) = query.status {
        index_sets.push(state.by_service_status.get(&status).unwrap_or(&EMPTY));
    }
    if let Some(business_id) = &query.business_id {
        index_sets.push(state.services_by_business.get(business_id).unwrap_or(&EMPTY));
    }

    let mut matching: Vec<&Service> = Vec::new();
    match index_sets.iter().min_by_key(|set| set.len()) {
        Some(smallest) => {
            for id in smallest.iter() {
                if !index_sets.iter().all(|set| set.contains(id)) {
                    continue;
                }
                if let Some(service) = state.services.get(id) {
                    matching.push(service);
                }
            }
        }
        None => matching.extend(state.services.values()),
    }

    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(skip)
        .take(limit)
        .cloned()
        .collect();

    Ok(Page { items, total })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, GeneratorConfig};
    use crate::model::{Address, NewBusiness, PaymentMethod};
    use chrono::NaiveDate;

    fn seeded_catalog(count: usize) -> Catalog {
        let generator = Generator::new(GeneratorConfig {
            id_prefix: "B2B".to_string(),
            today: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            multi_plan_per_type: false,
        });
        let catalog = Catalog::new();
        catalog.load(generator.generate(count, Some(21)).unwrap()).unwrap();
        catalog
    }

    fn named_business(name: &str, city: &str, province: &str) -> NewBusiness {
        NewBusiness {
            company_name: name.to_string(),
            industry: Industry::Consulting,
            employee_count: 5,
            annual_revenue: 400_000.0,
            address: Address {
                street_number: 10,
                street_name: "Main Street".to_string(),
                city: city.to_string(),
                province: province.to_string(),
                postal_code: "M1A 1A1".to_string(),
                country: "Canada".to_string(),
            },
            phone: "+1-416-555-0000".to_string(),
            email: format!("info@{}.ca", name.to_lowercase().replace(' ', "")),
            website: "www.example.ca".to_string(),
            customer_since: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            account_manager: "Manager 1".to_string(),
            payment_method: PaymentMethod::AutoPay,
            account_status: AccountStatus::Active,
            last_contact: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_pagination_partitions_match_set() {
        let catalog = seeded_catalog(57);
        let full = businesses(&catalog, &BusinessQuery { limit: 1000, ..Default::default() }).unwrap();
        assert_eq!(full.total, 57);

        let mut paged: Vec<String> = Vec::new();
        let page_size = 10;
        let mut skip = 0;
        loop {
            let page = businesses(
                &catalog,
                &BusinessQuery { skip, limit: page_size, ..Default::default() },
            )
            .unwrap();
            assert_eq!(page.total, 57);
            if page.items.is_empty() {
                break;
            }
            paged.extend(page.items.iter().map(|b| b.id.clone()));
            skip += page_size;
        }

        let full_ids: Vec<String> = full.items.iter().map(|b| b.id.clone()).collect();
        assert_eq!(paged, full_ids);
    }

    #[test]
    fn test_skip_beyond_match_count() {
        let catalog = seeded_catalog(50);
        let page = businesses(
            &catalog,
            &BusinessQuery { skip: 1_000_000, limit: 10, ..Default::default() },
        )
        .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 50);
    }

    #[test]
    fn test_bad_pagination_rejected() {
        let catalog = seeded_catalog(5);
        assert!(businesses(&catalog, &BusinessQuery { skip: -1, ..Default::default() }).is_err());
        assert!(businesses(&catalog, &BusinessQuery { limit: 0, ..Default::default() }).is_err());
        assert!(services(&catalog, &ServiceQuery { limit: -5, ..Default::default() }).is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::new();
        catalog
            .create_business(named_business("Advanced Solutions Inc.", "Toronto", "ON"))
            .unwrap();
        catalog
            .create_business(named_business("Peak Media Group", "Vancouver", "BC"))
            .unwrap();

        for term in ["advanced", "ADVANCED", "Solutions"] {
            let page = businesses(
                &catalog,
                &BusinessQuery { search: Some(term.to_string()), ..Default::default() },
            )
            .unwrap();
            assert_eq!(page.total, 1, "term {:?}", term);
            assert_eq!(page.items[0].company_name, "Advanced Solutions Inc.");
        }
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let catalog = Catalog::new();
        catalog
            .create_business(named_business("Northern Consulting", "Toronto", "ON"))
            .unwrap();
        catalog
            .create_business(named_business("Harbour Consulting", "Vancouver", "BC"))
            .unwrap();

        let page = businesses(
            &catalog,
            &BusinessQuery {
                province: Some("ON".to_string()),
                city: Some("Toronto".to_string()),
                industry: Some(Industry::Consulting),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].company_name, "Northern Consulting");

        // Same filters with a province that matches nothing
        let none = businesses(
            &catalog,
            &BusinessQuery {
                province: Some("QC".to_string()),
                city: Some("Toronto".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(none.total, 0);
    }

    #[test]
    fn test_unknown_filter_value_matches_nothing() {
        let catalog = seeded_catalog(10);
        let page = businesses(
            &catalog,
            &BusinessQuery { city: Some("Gotham".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_service_filters_and_business_join() {
        let catalog = seeded_catalog(40);
        let with_services = catalog
            .all_businesses()
            .into_iter()
            .find(|b| !b.services.is_empty())
            .expect("seeded dataset has services");

        let page = services(
            &catalog,
            &ServiceQuery {
                business_id: Some(with_services.id.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, with_services.services.len());
        assert!(page.items.iter().all(|s| s.business_id == with_services.id));

        let active_internet = services(
            &catalog,
            &ServiceQuery {
                service_type: Some(ServiceType::Internet),
                status: Some(ServiceStatus::Active),
                limit: 1000,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(active_internet.items.iter().all(|s| {
            s.service_type == ServiceType::Internet && s.status == ServiceStatus::Active
        }));
    }

    #[test]
    fn test_order_holds_past_padding_width() {
        let catalog = Catalog::new();
        let seven_digit = Business::from_new("B2B-1000000", named_business("Wide Corp", "Toronto", "ON"));
        let six_digit = Business::from_new("B2B-999999", named_business("Narrow Corp", "Toronto", "ON"));
        catalog.load(vec![seven_digit, six_digit]).unwrap();

        let page = businesses(&catalog, &BusinessQuery::default()).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["B2B-999999", "B2B-1000000"]);
    }

    #[test]
    fn test_results_ordered_by_id() {
        let catalog = seeded_catalog(30);
        let page = businesses(&catalog, &BusinessQuery { limit: 1000, ..Default::default() }).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|b| b.id.as_str()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let svc = services(&catalog, &ServiceQuery { limit: 1000, ..Default::default() }).unwrap();
        let svc_ids: Vec<u64> = svc.items.iter().map(|s| s.id).collect();
        assert!(svc_ids.windows(2).all(|w| w[0] < w[1]));
    }
}
