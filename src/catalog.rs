// 🗄️ Catalog - authoritative indexed store of businesses and services
//
// One RwLock over the whole state: readers share, every mutation holds the
// write lock for its full validate-then-apply-then-re-derive span, so no
// reader ever observes a service without the owner's revenue updated.
// Every mutating operation validates fully before touching state.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::error::{CatalogError, Result};
use crate::model::{
    active_monthly_revenue, AccountStatus, Business, BusinessUpdate, Industry, NewBusiness,
    NewService, Service, ServiceStatus, ServiceType, ServiceUpdate,
};
use crate::reference;

// ============================================================================
// STATE
// ============================================================================

/// Ordering key for business ids: parsed sequence first, raw id as
/// tie-break. Lexicographic order on the zero-padded form breaks once the
/// padding width overflows ("B2B-1000000" sorts before "B2B-999999"), so
/// every ordered surface sorts by this key instead.
pub(crate) fn business_seq_key(id: &str) -> (u64, &str) {
    let seq = id
        .rsplit('-')
        .next()
        .and_then(|tail| tail.parse().ok())
        .unwrap_or(u64::MAX);
    (seq, id)
}

/// Catalog state behind the lock. Ordered surfaces sort businesses by
/// business_seq_key; service ids are numeric, so their BTreeMaps and index
/// sets iterate in ascending order already.
#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub(crate) businesses: BTreeMap<String, Business>,
    pub(crate) services: BTreeMap<u64, Service>,

    // Secondary indices over businesses
    pub(crate) by_industry: HashMap<Industry, BTreeSet<String>>,
    pub(crate) by_province: HashMap<String, BTreeSet<String>>,
    pub(crate) by_city: HashMap<String, BTreeSet<String>>,
    pub(crate) by_account_status: HashMap<AccountStatus, BTreeSet<String>>,

    // Secondary indices over services
    pub(crate) services_by_business: HashMap<String, BTreeSet<u64>>,
    pub(crate) by_service_type: HashMap<ServiceType, BTreeSet<u64>>,
    pub(crate) by_service_status: HashMap<ServiceStatus, BTreeSet<u64>>,

    // Monotone id counters; never move backwards, so ids are never reused
    next_business_seq: u64,
    next_service_id: u64,
}

impl CatalogState {
    /// Attach a business's services to a cloned copy (ascending service id)
    pub(crate) fn with_services(&self, business: &Business) -> Business {
        let mut out = business.clone();
        out.services = self.owned_services(&business.id);
        out
    }

    /// All businesses in sequence order (see business_seq_key)
    pub(crate) fn ordered_businesses(&self) -> Vec<&Business> {
        let mut out: Vec<&Business> = self.businesses.values().collect();
        out.sort_by(|a, b| business_seq_key(&a.id).cmp(&business_seq_key(&b.id)));
        out
    }

    pub(crate) fn owned_services(&self, business_id: &str) -> Vec<Service> {
        self.services_by_business
            .get(business_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.services.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn index_business(&mut self, business: &Business) {
        let id = business.id.clone();
        self.by_industry
            .entry(business.industry)
            .or_default()
            .insert(id.clone());
        self.by_province
            .entry(business.address.province.clone())
            .or_default()
            .insert(id.clone());
        self.by_city
            .entry(business.address.city.clone())
            .or_default()
            .insert(id.clone());
        self.by_account_status
            .entry(business.account_status)
            .or_default()
            .insert(id);
    }

    fn unindex_business(&mut self, business: &Business) {
        if let Some(set) = self.by_industry.get_mut(&business.industry) {
            set.remove(&business.id);
        }
        if let Some(set) = self.by_province.get_mut(&business.address.province) {
            set.remove(&business.id);
        }
        if let Some(set) = self.by_city.get_mut(&business.address.city) {
            set.remove(&business.id);
        }
        if let Some(set) = self.by_account_status.get_mut(&business.account_status) {
            set.remove(&business.id);
        }
    }

    fn index_service(&mut self, service: &Service) {
        self.services_by_business
            .entry(service.business_id.clone())
            .or_default()
            .insert(service.id);
        self.by_service_type
            .entry(service.service_type)
            .or_default()
            .insert(service.id);
        self.by_service_status
            .entry(service.status)
            .or_default()
            .insert(service.id);
    }

    fn unindex_service(&mut self, service: &Service) {
        if let Some(set) = self.services_by_business.get_mut(&service.business_id) {
            set.remove(&service.id);
        }
        if let Some(set) = self.by_service_type.get_mut(&service.service_type) {
            set.remove(&service.id);
        }
        if let Some(set) = self.by_service_status.get_mut(&service.status) {
            set.remove(&service.id);
        }
    }

    /// The single re-derivation point: a business's total_monthly_revenue
    /// equals the sum over its Active services. Called from every mutation
    /// path touching that business's services.
    fn recompute_revenue(&mut self, business_id: &str) {
        let total = active_monthly_revenue(&self.owned_services(business_id));
        if let Some(business) = self.businesses.get_mut(business_id) {
            business.total_monthly_revenue = total;
        }
    }

    fn advance_business_seq(&mut self, id: &str) {
        if let Some(seq) = id.rsplit('-').next().and_then(|tail| tail.parse::<u64>().ok()) {
            self.next_business_seq = self.next_business_seq.max(seq + 1);
        }
    }

    fn advance_service_id(&mut self, id: u64) {
        self.next_service_id = self.next_service_id.max(id + 1);
    }

    /// Insert a pre-validated business and its embedded services
    fn commit_business(&mut self, mut business: Business) {
        let services = std::mem::take(&mut business.services);
        let id = business.id.clone();

        self.advance_business_seq(&id);
        self.index_business(&business);
        self.businesses.insert(id.clone(), business);

        for service in services {
            self.advance_service_id(service.id);
            self.index_service(&service);
            self.services.insert(service.id, service);
        }

        self.recompute_revenue(&id);
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_business(business: &Business) -> Result<()> {
    if business.company_name.trim().is_empty() {
        return Err(CatalogError::validation("company name must not be empty"));
    }
    if business.employee_count == 0 {
        return Err(CatalogError::validation("employee count must be positive"));
    }
    if business.annual_revenue <= 0.0 {
        return Err(CatalogError::validation("annual revenue must be positive"));
    }
    if !reference::is_city_province_pair(&business.address.city, &business.address.province) {
        return Err(CatalogError::validation(format!(
            "unknown city/province pair: {} / {}",
            business.address.city, business.address.province
        )));
    }
    Ok(())
}

fn validate_service(service: &Service) -> Result<()> {
    if service.monthly_price < 0.0 {
        return Err(CatalogError::validation("monthly price must not be negative"));
    }
    if service.details.service_type() != service.service_type {
        return Err(CatalogError::validation(format!(
            "details do not match service type {}",
            service.service_type.as_str()
        )));
    }
    if let (Some(start), Some(end)) = (service.contract_start, service.contract_end) {
        if start > end {
            return Err(CatalogError::validation(format!(
                "contract_start {} is after contract_end {}",
                start, end
            )));
        }
    }
    Ok(())
}

// ============================================================================
// CATALOG HANDLE
// ============================================================================

/// Shared handle over the catalog state. Cheap to clone; constructed once at
/// startup and passed by reference, never held in a static.
#[derive(Clone)]
pub struct Catalog {
    state: Arc<RwLock<CatalogState>>,
    id_prefix: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_prefix("B2B")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        let state = CatalogState {
            next_business_seq: 1,
            next_service_id: 1,
            ..CatalogState::default()
        };
        Catalog {
            state: Arc::new(RwLock::new(state)),
            id_prefix: prefix.to_string(),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap()
    }

    // ------------------------------------------------------------------
    // Bulk load
    // ------------------------------------------------------------------

    /// Publish a generated dataset. All-or-nothing: the whole batch is
    /// validated before anything is applied.
    pub fn load(&self, businesses: Vec<Business>) -> Result<()> {
        let mut state = self.state.write().unwrap();

        let mut business_ids: BTreeSet<&str> = BTreeSet::new();
        let mut service_ids: BTreeSet<u64> = BTreeSet::new();
        for business in &businesses {
            if state.businesses.contains_key(&business.id) || !business_ids.insert(&business.id) {
                return Err(CatalogError::Conflict {
                    kind: "business",
                    id: business.id.clone(),
                });
            }
            validate_business(business)?;
            for service in &business.services {
                if service.business_id != business.id {
                    return Err(CatalogError::validation(format!(
                        "service {} does not reference its owner {}",
                        service.id, business.id
                    )));
                }
                if state.services.contains_key(&service.id) || !service_ids.insert(service.id) {
                    return Err(CatalogError::Conflict {
                        kind: "service",
                        id: service.id.to_string(),
                    });
                }
                validate_service(service)?;
            }
        }

        for business in businesses {
            state.commit_business(business);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Businesses
    // ------------------------------------------------------------------

    /// Create a business with a fresh id, no services, zero derived revenue
    pub fn create_business(&self, new: NewBusiness) -> Result<Business> {
        let mut state = self.state.write().unwrap();
        let id = format!("{}-{:06}", self.id_prefix, state.next_business_seq);
        let business = Business::from_new(id, new);
        validate_business(&business)?;

        let created = business.clone();
        state.commit_business(business);
        Ok(created)
    }

    /// Insert a fully-formed business (with embedded services), e.g. from a
    /// bulk form. Fails with Conflict when the id is already present.
    pub fn insert_business(&self, business: Business) -> Result<()> {
        self.load(vec![business])
    }

    pub fn get_business(&self, id: &str) -> Result<Business> {
        let state = self.read();
        let business = state
            .businesses
            .get(id)
            .ok_or_else(|| CatalogError::business_not_found(id))?;
        Ok(state.with_services(business))
    }

    /// Apply a partial update. City and province must change together and
    /// form a known reference pair. Applied to a copy, validated, then
    /// committed - a failed update leaves no trace.
    pub fn update_business(&self, id: &str, update: BusinessUpdate) -> Result<Business> {
        let mut state = self.state.write().unwrap();
        let current = state
            .businesses
            .get(id)
            .ok_or_else(|| CatalogError::business_not_found(id))?
            .clone();

        if update.city.is_some() != update.province.is_some() {
            return Err(CatalogError::validation(
                "city and province must be updated together",
            ));
        }

        let mut next = current.clone();
        if let Some(v) = update.company_name { next.company_name = v; }
        if let Some(v) = update.industry { next.industry = v; }
        if let Some(v) = update.employee_count { next.employee_count = v; }
        if let Some(v) = update.annual_revenue { next.annual_revenue = v; }
        if let Some(v) = update.street_number { next.address.street_number = v; }
        if let Some(v) = update.street_name { next.address.street_name = v; }
        if let Some(v) = update.city { next.address.city = v; }
        if let Some(v) = update.province { next.address.province = v; }
        if let Some(v) = update.postal_code { next.address.postal_code = v; }
        if let Some(v) = update.phone { next.phone = v; }
        if let Some(v) = update.email { next.email = v; }
        if let Some(v) = update.website { next.website = v; }
        if let Some(v) = update.account_manager { next.account_manager = v; }
        if let Some(v) = update.payment_method { next.payment_method = v; }
        if let Some(v) = update.account_status { next.account_status = v; }
        if let Some(v) = update.last_contact { next.last_contact = v; }
        if let Some(v) = update.notes { next.notes = v; }
        validate_business(&next)?;

        state.unindex_business(&current);
        state.index_business(&next);
        state.businesses.insert(id.to_string(), next.clone());

        Ok(state.with_services(&next))
    }

    /// Delete a business; cascades to all its services
    pub fn delete_business(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().unwrap();
        let business = state
            .businesses
            .remove(id)
            .ok_or_else(|| CatalogError::business_not_found(id))?;
        state.unindex_business(&business);

        let owned: Vec<u64> = state
            .services_by_business
            .get(id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        for service_id in owned {
            if let Some(service) = state.services.remove(&service_id) {
                state.unindex_service(&service);
            }
        }
        state.services_by_business.remove(id);

        Ok(())
    }

    /// All business ids in stable ascending order, optionally filtered
    pub fn business_ids(&self, predicate: Option<&dyn Fn(&Business) -> bool>) -> Vec<String> {
        let state = self.read();
        state
            .ordered_businesses()
            .into_iter()
            .filter(|b| predicate.is_none_or(|p| p(b)))
            .map(|b| b.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    /// Append a service to an existing business and re-derive its revenue
    pub fn create_service(&self, business_id: &str, new: NewService) -> Result<Service> {
        let mut state = self.state.write().unwrap();
        if !state.businesses.contains_key(business_id) {
            return Err(CatalogError::business_not_found(business_id));
        }

        let service = Service {
            id: state.next_service_id,
            business_id: business_id.to_string(),
            service_type: new.service_type,
            service_name: new.service_name,
            monthly_price: new.monthly_price,
            details: new.details,
            contract_start: new.contract_start,
            contract_end: new.contract_end,
            status: new.status,
        };
        validate_service(&service)?;

        state.next_service_id += 1;
        state.index_service(&service);
        state.services.insert(service.id, service.clone());
        state.recompute_revenue(business_id);

        Ok(service)
    }

    pub fn get_service(&self, id: u64) -> Result<Service> {
        let state = self.read();
        state
            .services
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::service_not_found(id))
    }

    /// Apply a partial update and re-derive the owner's revenue
    pub fn update_service(&self, id: u64, update: ServiceUpdate) -> Result<Service> {
        let mut state = self.state.write().unwrap();
        let current = state
            .services
            .get(&id)
            .ok_or_else(|| CatalogError::service_not_found(id))?
            .clone();

        let mut next = current.clone();
        if let Some(v) = update.service_type { next.service_type = v; }
        if let Some(v) = update.service_name { next.service_name = v; }
        if let Some(v) = update.monthly_price { next.monthly_price = v; }
        if let Some(v) = update.details { next.details = v; }
        if let Some(v) = update.contract_start { next.contract_start = v; }
        if let Some(v) = update.contract_end { next.contract_end = v; }
        if let Some(v) = update.status { next.status = v; }
        validate_service(&next)?;

        state.unindex_service(&current);
        state.index_service(&next);
        state.services.insert(id, next.clone());
        state.recompute_revenue(&next.business_id);

        Ok(next)
    }

    /// Delete a service and re-derive the owner's revenue
    pub fn delete_service(&self, id: u64) -> Result<()> {
        let mut state = self.state.write().unwrap();
        let service = state
            .services
            .remove(&id)
            .ok_or_else(|| CatalogError::service_not_found(id))?;
        state.unindex_service(&service);
        state.recompute_revenue(&service.business_id);
        Ok(())
    }

    /// All services owned by a business, via the business_id index.
    /// An unknown or deleted id yields an empty list, not an error; the
    /// HTTP layer checks existence itself when it wants a 404.
    pub fn services_for_business(&self, business_id: &str) -> Vec<Service> {
        let state = self.read();
        state.owned_services(business_id)
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// All businesses with embedded services, id ascending (the bulk form)
    pub fn all_businesses(&self) -> Vec<Business> {
        let state = self.read();
        state
            .ordered_businesses()
            .into_iter()
            .map(|b| state.with_services(b))
            .collect()
    }

    /// (business count, service count)
    pub fn counts(&self) -> (usize, usize) {
        let state = self.read();
        (state.businesses.len(), state.services.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, PaymentMethod, ServiceDetails};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_business(name: &str) -> NewBusiness {
        NewBusiness {
            company_name: name.to_string(),
            industry: Industry::Technology,
            employee_count: 12,
            annual_revenue: 1_500_000.0,
            address: Address {
                street_number: 42,
                street_name: "King Street".to_string(),
                city: "Toronto".to_string(),
                province: "ON".to_string(),
                postal_code: "M5V 2T6".to_string(),
                country: "Canada".to_string(),
            },
            phone: "+1-416-555-0123".to_string(),
            email: "info@example.ca".to_string(),
            website: "www.example.ca".to_string(),
            customer_since: date(2020, 3, 1),
            account_manager: "Manager 7".to_string(),
            payment_method: PaymentMethod::Invoice,
            account_status: AccountStatus::Active,
            last_contact: date(2026, 1, 15),
            notes: String::new(),
        }
    }

    fn new_service(price: f64, status: ServiceStatus) -> NewService {
        NewService {
            service_type: ServiceType::Internet,
            service_name: "Fiber 100".to_string(),
            monthly_price: price,
            details: ServiceDetails::Internet {
                speed: "100 Mbps".to_string(),
            },
            contract_start: Some(date(2023, 1, 1)),
            contract_end: Some(date(2026, 1, 1)),
            status,
        }
    }

    fn business_with_id(id: &str, name: &str) -> Business {
        Business::from_new(id, new_business(name))
    }

    #[test]
    fn test_create_business_assigns_sequential_ids() {
        let catalog = Catalog::new();
        let a = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let b = catalog.create_business(new_business("Beta Ltd.")).unwrap();
        assert_eq!(a.id, "B2B-000001");
        assert_eq!(b.id, "B2B-000002");
        assert_eq!(a.total_monthly_revenue, 0.0);
        assert!(a.services.is_empty());
    }

    #[test]
    fn test_ordering_survives_padding_overflow() {
        let catalog = Catalog::new();
        catalog
            .load(vec![
                business_with_id("B2B-1000000", "Alpha Inc."),
                business_with_id("B2B-999999", "Beta Ltd."),
            ])
            .unwrap();

        assert_eq!(catalog.business_ids(None), vec!["B2B-999999", "B2B-1000000"]);
        let names: Vec<String> = catalog
            .all_businesses()
            .into_iter()
            .map(|b| b.company_name)
            .collect();
        assert_eq!(names, vec!["Beta Ltd.", "Alpha Inc."]);

        let next = catalog.create_business(new_business("Gamma Corp.")).unwrap();
        assert_eq!(next.id, "B2B-1000001");
    }

    #[test]
    fn test_insert_conflict() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        assert!(matches!(
            catalog.insert_business(business),
            Err(CatalogError::Conflict { .. })
        ));
    }

    #[test]
    fn test_get_missing_business_is_not_found() {
        let catalog = Catalog::new();
        assert!(matches!(
            catalog.get_business("B2B-999999"),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn test_revenue_rederived_through_service_lifecycle() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        assert_eq!(business.total_monthly_revenue, 0.0);

        let service = catalog
            .create_service(&business.id, new_service(15.0, ServiceStatus::Active))
            .unwrap();
        let after_add = catalog.get_business(&business.id).unwrap();
        assert!((after_add.total_monthly_revenue - 15.0).abs() < 1e-6);

        let update = ServiceUpdate {
            status: Some(ServiceStatus::Inactive),
            ..ServiceUpdate::default()
        };
        catalog.update_service(service.id, update).unwrap();
        let after_deactivate = catalog.get_business(&business.id).unwrap();
        assert_eq!(after_deactivate.total_monthly_revenue, 0.0);
    }

    #[test]
    fn test_delete_service_rederives_owner() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let service = catalog
            .create_service(&business.id, new_service(89.99, ServiceStatus::Active))
            .unwrap();
        catalog.delete_service(service.id).unwrap();
        let after = catalog.get_business(&business.id).unwrap();
        assert_eq!(after.total_monthly_revenue, 0.0);
        assert!(after.services.is_empty());
    }

    #[test]
    fn test_cascade_delete() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        catalog
            .create_service(&business.id, new_service(10.0, ServiceStatus::Active))
            .unwrap();
        let kept = catalog.create_business(new_business("Beta Ltd.")).unwrap();
        let kept_service = catalog
            .create_service(&kept.id, new_service(20.0, ServiceStatus::Active))
            .unwrap();

        catalog.delete_business(&business.id).unwrap();

        assert!(catalog.get_business(&business.id).is_err());
        assert!(catalog.services_for_business(&business.id).is_empty());
        let (businesses, services) = catalog.counts();
        assert_eq!(businesses, 1);
        assert_eq!(services, 1);
        assert!(catalog.get_service(kept_service.id).is_ok());
    }

    #[test]
    fn test_list_for_deleted_business_is_empty() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        catalog
            .create_service(&business.id, new_service(10.0, ServiceStatus::Active))
            .unwrap();
        catalog.delete_business(&business.id).unwrap();
        assert!(catalog.services_for_business(&business.id).is_empty());
        // Same answer for an id that never existed
        assert!(catalog.services_for_business("B2B-999999").is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let catalog = Catalog::new();
        let a = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let s = catalog
            .create_service(&a.id, new_service(10.0, ServiceStatus::Active))
            .unwrap();
        catalog.delete_business(&a.id).unwrap();

        let b = catalog.create_business(new_business("Beta Ltd.")).unwrap();
        let t = catalog
            .create_service(&b.id, new_service(10.0, ServiceStatus::Active))
            .unwrap();
        assert_eq!(b.id, "B2B-000002");
        assert!(t.id > s.id);
    }

    #[test]
    fn test_contract_window_validated() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let mut bad = new_service(10.0, ServiceStatus::Active);
        bad.contract_start = Some(date(2026, 1, 1));
        bad.contract_end = Some(date(2025, 1, 1));
        assert!(matches!(
            catalog.create_service(&business.id, bad),
            Err(CatalogError::Validation(_))
        ));
        // Failed create must leave no trace
        assert!(catalog.services_for_business(&business.id).is_empty());
    }

    #[test]
    fn test_details_must_match_type() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let mut bad = new_service(10.0, ServiceStatus::Active);
        bad.details = ServiceDetails::Tv { channels: 100 };
        assert!(matches!(
            catalog.create_service(&business.id, bad),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_city_province_must_change_together() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();

        let lone_city = BusinessUpdate {
            city: Some("Vancouver".to_string()),
            ..BusinessUpdate::default()
        };
        assert!(matches!(
            catalog.update_business(&business.id, lone_city),
            Err(CatalogError::Validation(_))
        ));

        let mismatched = BusinessUpdate {
            city: Some("Vancouver".to_string()),
            province: Some("ON".to_string()),
            ..BusinessUpdate::default()
        };
        assert!(matches!(
            catalog.update_business(&business.id, mismatched),
            Err(CatalogError::Validation(_))
        ));

        let joint = BusinessUpdate {
            city: Some("Vancouver".to_string()),
            province: Some("BC".to_string()),
            ..BusinessUpdate::default()
        };
        let updated = catalog.update_business(&business.id, joint).unwrap();
        assert_eq!(updated.address.city, "Vancouver");
        assert_eq!(updated.address.province, "BC");
    }

    #[test]
    fn test_update_is_idempotent() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let update = BusinessUpdate {
            account_status: Some(AccountStatus::Suspended),
            notes: Some("review pending".to_string()),
            ..BusinessUpdate::default()
        };

        let once = catalog.update_business(&business.id, update.clone()).unwrap();
        let twice = catalog.update_business(&business.id, update).unwrap();
        assert_eq!(once, twice);
        assert_eq!(catalog.get_business(&business.id).unwrap(), twice);
    }

    #[test]
    fn test_update_moves_index_membership() {
        let catalog = Catalog::new();
        let business = catalog.create_business(new_business("Alpha Inc.")).unwrap();
        catalog
            .update_business(
                &business.id,
                BusinessUpdate {
                    account_status: Some(AccountStatus::Cancelled),
                    ..BusinessUpdate::default()
                },
            )
            .unwrap();

        let state = catalog.read();
        assert!(!state.by_account_status[&AccountStatus::Active].contains(&business.id));
        assert!(state.by_account_status[&AccountStatus::Cancelled].contains(&business.id));
    }

    #[test]
    fn test_business_ids_with_predicate() {
        let catalog = Catalog::new();
        catalog.create_business(new_business("Alpha Inc.")).unwrap();
        let b = catalog.create_business(new_business("Beta Ltd.")).unwrap();
        catalog
            .update_business(
                &b.id,
                BusinessUpdate {
                    account_status: Some(AccountStatus::Suspended),
                    ..BusinessUpdate::default()
                },
            )
            .unwrap();

        let suspended = catalog.business_ids(Some(
            &(|b: &Business| b.account_status == AccountStatus::Suspended),
        ));
        assert_eq!(suspended, vec![b.id]);

        let all = catalog.business_ids(None);
        assert_eq!(all.len(), 2);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_load_advances_counters() {
        let catalog = Catalog::new();
        let generator = crate::generator::Generator::new(crate::generator::GeneratorConfig {
            id_prefix: "B2B".to_string(),
            today: date(2026, 6, 1),
            multi_plan_per_type: false,
        });
        let dataset = generator.generate(5, Some(3)).unwrap();
        let max_service_id = dataset
            .iter()
            .flat_map(|b| &b.services)
            .map(|s| s.id)
            .max()
            .unwrap_or(0);
        catalog.load(dataset).unwrap();

        let fresh = catalog.create_business(new_business("Next Corp.")).unwrap();
        assert_eq!(fresh.id, "B2B-000006");
        let service = catalog
            .create_service(&fresh.id, new_service(10.0, ServiceStatus::Active))
            .unwrap();
        assert!(service.id > max_service_id);
    }
}
