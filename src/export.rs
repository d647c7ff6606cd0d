// 💾 Bulk forms: ordered JSON (businesses embedding services) and a flat CSV
// with one row per service joined with its business's columns. The two forms
// are losslessly interconvertible; a business with zero services contributes
// one CSV row with empty service columns.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::model::{
    active_monthly_revenue, AccountStatus, Business, Industry, PaymentMethod, Service,
    ServiceDetails, ServiceStatus, ServiceType,
};

// ============================================================================
// JSON FORM
// ============================================================================

pub fn to_json(businesses: &[Business]) -> Result<String> {
    Ok(serde_json::to_string_pretty(businesses)?)
}

pub fn from_json(json: &str) -> Result<Vec<Business>> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// CSV FORM
// ============================================================================

/// One CSV row: a service joined with its business's attributes, or a
/// service-less business with the service columns empty
#[derive(Debug, Serialize, Deserialize)]
struct FlatRow {
    id: String,
    company_name: String,
    industry: Industry,
    employee_count: u32,
    annual_revenue: f64,
    street_number: u32,
    street_name: String,
    city: String,
    province: String,
    postal_code: String,
    country: String,
    phone: String,
    email: String,
    website: String,
    customer_since: NaiveDate,
    account_manager: String,
    payment_method: PaymentMethod,
    account_status: AccountStatus,
    last_contact: NaiveDate,
    notes: String,
    total_monthly_revenue: f64,
    service_id: Option<u64>,
    service_type: Option<ServiceType>,
    service_name: Option<String>,
    monthly_price: Option<f64>,
    /// Type-specific details as a JSON fragment
    service_details: Option<String>,
    contract_start: Option<NaiveDate>,
    contract_end: Option<NaiveDate>,
    service_status: Option<ServiceStatus>,
}

impl FlatRow {
    fn from_business(business: &Business, service: Option<&Service>) -> Result<Self> {
        Ok(FlatRow {
            id: business.id.clone(),
            company_name: business.company_name.clone(),
            industry: business.industry,
            employee_count: business.employee_count,
            annual_revenue: business.annual_revenue,
            street_number: business.address.street_number,
            street_name: business.address.street_name.clone(),
            city: business.address.city.clone(),
            province: business.address.province.clone(),
            postal_code: business.address.postal_code.clone(),
            country: business.address.country.clone(),
            phone: business.phone.clone(),
            email: business.email.clone(),
            website: business.website.clone(),
            customer_since: business.customer_since,
            account_manager: business.account_manager.clone(),
            payment_method: business.payment_method,
            account_status: business.account_status,
            last_contact: business.last_contact,
            notes: business.notes.clone(),
            total_monthly_revenue: business.total_monthly_revenue,
            service_id: service.map(|s| s.id),
            service_type: service.map(|s| s.service_type),
            service_name: service.map(|s| s.service_name.clone()),
            monthly_price: service.map(|s| s.monthly_price),
            service_details: service
                .map(|s| serde_json::to_string(&s.details))
                .transpose()?,
            contract_start: service.and_then(|s| s.contract_start),
            contract_end: service.and_then(|s| s.contract_end),
            service_status: service.map(|s| s.status),
        })
    }

    fn into_business(self) -> Business {
        Business {
            id: self.id,
            company_name: self.company_name,
            industry: self.industry,
            employee_count: self.employee_count,
            annual_revenue: self.annual_revenue,
            address: crate::model::Address {
                street_number: self.street_number,
                street_name: self.street_name,
                city: self.city,
                province: self.province,
                postal_code: self.postal_code,
                country: self.country,
            },
            phone: self.phone,
            email: self.email,
            website: self.website,
            customer_since: self.customer_since,
            account_manager: self.account_manager,
            payment_method: self.payment_method,
            account_status: self.account_status,
            last_contact: self.last_contact,
            notes: self.notes,
            total_monthly_revenue: self.total_monthly_revenue,
            services: Vec::new(),
        }
    }

    fn service(&self, business_id: &str) -> Result<Option<Service>> {
        let (Some(id), Some(service_type), Some(name), Some(price), Some(details), Some(status)) = (
            self.service_id,
            self.service_type,
            self.service_name.as_ref(),
            self.monthly_price,
            self.service_details.as_ref(),
            self.service_status,
        ) else {
            return Ok(None);
        };

        let details: ServiceDetails = serde_json::from_str(details)?;
        Ok(Some(Service {
            id,
            business_id: business_id.to_string(),
            service_type,
            service_name: name.clone(),
            monthly_price: price,
            details,
            contract_start: self.contract_start,
            contract_end: self.contract_end,
            status,
        }))
    }
}

/// Flatten businesses into the tabular form
pub fn to_csv(businesses: &[Business]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for business in businesses {
        if business.services.is_empty() {
            writer.serialize(FlatRow::from_business(business, None)?)?;
        } else {
            for service in &business.services {
                writer.serialize(FlatRow::from_business(business, Some(service))?)?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::validation(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CatalogError::validation(format!("CSV not UTF-8: {}", e)))
}

/// Rebuild the embedded form from the tabular one. Rows are grouped by
/// business id in first-seen order; derived revenue is recomputed so the
/// round trip re-establishes the invariant.
pub fn from_csv(data: &str) -> Result<Vec<Business>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut businesses: Vec<Business> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for row in reader.deserialize::<FlatRow>() {
        let row = row?;
        let service = row.service(&row.id)?;
        let index = match index_by_id.get(&row.id) {
            Some(&index) => index,
            None => {
                index_by_id.insert(row.id.clone(), businesses.len());
                businesses.push(row.into_business());
                businesses.len() - 1
            }
        };
        if let Some(service) = service {
            businesses[index].services.push(service);
        }
    }

    for business in &mut businesses {
        business.total_monthly_revenue = active_monthly_revenue(&business.services);
    }
    Ok(businesses)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, GeneratorConfig};
    use crate::model::Address;

    fn dataset() -> Vec<Business> {
        let generator = Generator::new(GeneratorConfig {
            id_prefix: "B2B".to_string(),
            today: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            multi_plan_per_type: false,
        });
        generator.generate(30, Some(77)).unwrap()
    }

    fn serviceless_business() -> Business {
        Business {
            id: "B2B-000099".to_string(),
            company_name: "Quiet Ventures Ltd.".to_string(),
            industry: Industry::Media,
            employee_count: 3,
            annual_revenue: 120_000.0,
            address: Address {
                street_number: 9,
                street_name: "Elm Lane".to_string(),
                city: "Regina".to_string(),
                province: "SK".to_string(),
                postal_code: "S4P 3Y2".to_string(),
                country: "Canada".to_string(),
            },
            phone: "+1-306-555-0042".to_string(),
            email: "info@quietventures.ca".to_string(),
            website: "www.quietventures.ca".to_string(),
            customer_since: NaiveDate::from_ymd_opt(2019, 8, 1).unwrap(),
            account_manager: "Manager 12".to_string(),
            payment_method: PaymentMethod::Invoice,
            account_status: AccountStatus::Active,
            last_contact: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            notes: "Satisfied with current services".to_string(),
            total_monthly_revenue: 0.0,
            services: Vec::new(),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let businesses = dataset();
        let json = to_json(&businesses).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(businesses, back);
    }

    #[test]
    fn test_csv_round_trip() {
        let mut businesses = dataset();
        businesses.push(serviceless_business());

        let csv = to_csv(&businesses).unwrap();
        let back = from_csv(&csv).unwrap();
        assert_eq!(businesses, back);
    }

    #[test]
    fn test_csv_row_count_is_one_per_service_or_business() {
        let mut businesses = dataset();
        businesses.push(serviceless_business());
        let expected_rows: usize = businesses
            .iter()
            .map(|b| b.services.len().max(1))
            .sum();

        let csv = to_csv(&businesses).unwrap();
        // Header plus data rows; notes columns never contain newlines
        assert_eq!(csv.lines().count(), expected_rows + 1);
    }

    #[test]
    fn test_from_csv_groups_non_adjacent_rows() {
        let businesses = dataset();
        let csv = to_csv(&businesses).unwrap();

        // Interleave data rows so a business's services are no longer
        // adjacent; grouping must still resolve by id, not by adjacency
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        let rows: Vec<&str> = lines.collect();
        let mut reordered = vec![header];
        reordered.extend(rows.iter().step_by(2));
        reordered.extend(rows.iter().skip(1).step_by(2));
        let back = from_csv(&reordered.join("\n")).unwrap();

        let mut expected: Vec<(String, usize)> = businesses
            .iter()
            .map(|b| (b.id.clone(), b.services.len()))
            .collect();
        let mut got: Vec<(String, usize)> = back
            .iter()
            .map(|b| (b.id.clone(), b.services.len()))
            .collect();
        expected.sort();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_every_csv_service_maps_to_one_business() {
        let businesses = dataset();
        let back = from_csv(&to_csv(&businesses).unwrap()).unwrap();

        let total_services: usize = businesses.iter().map(|b| b.services.len()).sum();
        let back_services: usize = back.iter().map(|b| b.services.len()).sum();
        assert_eq!(total_services, back_services);

        for business in &back {
            for service in &business.services {
                assert_eq!(service.business_id, business.id);
            }
        }
    }
}
