// 🏢 Business + Service entities
//
// Identity: zero-padded sequential ids (never reused after deletion)
// Values: descriptive / address / contact / relationship attributes
// Derived: total_monthly_revenue - always recomputed from Active services,
// never independently set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CatalogError;

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// Industry of a business customer (fixed vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Manufacturing,
    Retail,
    Education,
    Legal,
    Consulting,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Construction,
    Transportation,
    Hospitality,
    Media,
    #[serde(rename = "Non-Profit")]
    NonProfit,
    Government,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Manufacturing => "Manufacturing",
            Industry::Retail => "Retail",
            Industry::Education => "Education",
            Industry::Legal => "Legal",
            Industry::Consulting => "Consulting",
            Industry::RealEstate => "Real Estate",
            Industry::Construction => "Construction",
            Industry::Transportation => "Transportation",
            Industry::Hospitality => "Hospitality",
            Industry::Media => "Media",
            Industry::NonProfit => "Non-Profit",
            Industry::Government => "Government",
        }
    }
}

impl FromStr for Industry {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::reference::INDUSTRY_WEIGHTS
            .iter()
            .map(|(industry, _)| *industry)
            .find(|industry| industry.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::validation(format!("unknown industry: {}", s)))
    }
}

/// Account status of a business customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Suspended,
    Cancelled,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 3] = [
        AccountStatus::Active,
        AccountStatus::Suspended,
        AccountStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Suspended => "Suspended",
            AccountStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::validation(format!("unknown account status: {}", s)))
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Invoice,
    #[serde(rename = "Auto-Pay")]
    AutoPay,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::Invoice,
        PaymentMethod::AutoPay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Invoice => "Invoice",
            PaymentMethod::AutoPay => "Auto-Pay",
        }
    }
}

/// Category of a subscribed service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceType {
    Internet,
    Phone,
    Mobile,
    #[serde(rename = "TV")]
    Tv,
    Cloud,
    Security,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::Internet,
        ServiceType::Phone,
        ServiceType::Mobile,
        ServiceType::Tv,
        ServiceType::Cloud,
        ServiceType::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Internet => "Internet",
            ServiceType::Phone => "Phone",
            ServiceType::Mobile => "Mobile",
            ServiceType::Tv => "TV",
            ServiceType::Cloud => "Cloud",
            ServiceType::Security => "Security",
        }
    }
}

impl FromStr for ServiceType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::validation(format!("unknown service type: {}", s)))
    }
}

/// Lifecycle status of a single service subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceStatus {
    Pending,
    Active,
    Inactive,
    Cancelled,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 4] = [
        ServiceStatus::Pending,
        ServiceStatus::Active,
        ServiceStatus::Inactive,
        ServiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "Pending",
            ServiceStatus::Active => "Active",
            ServiceStatus::Inactive => "Inactive",
            ServiceStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::validation(format!("unknown service status: {}", s)))
    }
}

// ============================================================================
// SERVICE DETAILS
// ============================================================================

/// Type-specific attributes of a service. One strongly-typed variant per
/// service type instead of an open-ended attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceDetails {
    Internet { speed: String },
    Phone { features: String },
    Mobile { data: String, number_of_lines: u32 },
    Tv { channels: u32 },
    Cloud { storage: String },
    Security { features: String },
}

impl ServiceDetails {
    /// The service type this variant belongs to. A service whose `details`
    /// disagree with its `service_type` is rejected by the catalog.
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::Internet { .. } => ServiceType::Internet,
            ServiceDetails::Phone { .. } => ServiceType::Phone,
            ServiceDetails::Mobile { .. } => ServiceType::Mobile,
            ServiceDetails::Tv { .. } => ServiceType::Tv,
            ServiceDetails::Cloud { .. } => ServiceType::Cloud,
            ServiceDetails::Security { .. } => ServiceType::Security,
        }
    }
}

// ============================================================================
// ENTITIES
// ============================================================================

/// Mailing address of a business (city/province always drawn as a pair from
/// the reference table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street_number: u32,
    pub street_name: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

/// A subscribed service belonging to exactly one business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Process-wide sequential id, never reused
    pub id: u64,

    /// Owning business
    pub business_id: String,

    pub service_type: ServiceType,

    /// Specific plan/tier within the type (e.g. "Fiber 500")
    pub service_name: String,

    pub monthly_price: f64,

    pub details: ServiceDetails,

    /// Contract window; start <= end whenever both are present
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,

    pub status: ServiceStatus,
}

/// A business customer account, owning zero or more services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    /// Stable zero-padded sequential id (e.g. "B2B-000042"), never reused
    pub id: String,

    pub company_name: String,
    pub industry: Industry,

    /// Positive headcount; annual revenue correlates with it
    pub employee_count: u32,
    pub annual_revenue: f64,

    pub address: Address,

    pub phone: String,
    pub email: String,
    pub website: String,

    pub customer_since: NaiveDate,
    pub account_manager: String,
    pub payment_method: PaymentMethod,
    pub account_status: AccountStatus,
    pub last_contact: NaiveDate,
    pub notes: String,

    /// Derived: sum of monthly_price over this business's Active services,
    /// rounded to cents. Recomputed by the catalog on every service mutation.
    pub total_monthly_revenue: f64,

    /// Owned services (populated in the bulk form and in catalog reads;
    /// the catalog's service table is authoritative)
    #[serde(default)]
    pub services: Vec<Service>,
}

/// Round a monetary amount to cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Sum of monthly_price over Active services, rounded to cents
pub fn active_monthly_revenue(services: &[Service]) -> f64 {
    round_cents(
        services
            .iter()
            .filter(|s| s.status == ServiceStatus::Active)
            .map(|s| s.monthly_price)
            .sum(),
    )
}

// ============================================================================
// CREATE / UPDATE PAYLOADS
// ============================================================================

/// Fields for creating a business. The catalog assigns the id; the new
/// business starts with no services and zero derived revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBusiness {
    pub company_name: String,
    pub industry: Industry,
    pub employee_count: u32,
    pub annual_revenue: f64,
    pub address: Address,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub customer_since: NaiveDate,
    pub account_manager: String,
    pub payment_method: PaymentMethod,
    pub account_status: AccountStatus,
    pub last_contact: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl Business {
    /// Build a business from creation fields under an assigned id. Derived
    /// revenue starts at zero; the catalog recomputes it as services land.
    pub fn from_new(id: impl Into<String>, new: NewBusiness) -> Business {
        Business {
            id: id.into(),
            company_name: new.company_name,
            industry: new.industry,
            employee_count: new.employee_count,
            annual_revenue: new.annual_revenue,
            address: new.address,
            phone: new.phone,
            email: new.email,
            website: new.website,
            customer_since: new.customer_since,
            account_manager: new.account_manager,
            payment_method: new.payment_method,
            account_status: new.account_status,
            last_contact: new.last_contact,
            notes: new.notes,
            total_monthly_revenue: 0.0,
            services: Vec::new(),
        }
    }
}

/// Partial business update; absent fields are left untouched.
/// City and province must be changed together (they are validated as a pair).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessUpdate {
    pub company_name: Option<String>,
    pub industry: Option<Industry>,
    pub employee_count: Option<u32>,
    pub annual_revenue: Option<f64>,
    pub street_number: Option<u32>,
    pub street_name: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub account_manager: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub account_status: Option<AccountStatus>,
    pub last_contact: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Fields for creating a service under an existing business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub service_type: ServiceType,
    pub service_name: String,
    pub monthly_price: f64,
    pub details: ServiceDetails,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub status: ServiceStatus,
}

/// Partial service update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub service_type: Option<ServiceType>,
    pub service_name: Option<String>,
    pub monthly_price: Option<f64>,
    pub details: Option<ServiceDetails>,
    /// Some(None) clears the date, Some(Some(d)) sets it
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub contract_start: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<Option<NaiveDate>>,
    pub status: Option<ServiceStatus>,
}

/// Serde helper: distinguish "field absent" from "field set to null"
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service(price: f64, status: ServiceStatus) -> Service {
        Service {
            id: 1,
            business_id: "B2B-000001".to_string(),
            service_type: ServiceType::Internet,
            service_name: "Fiber 100".to_string(),
            monthly_price: price,
            details: ServiceDetails::Internet {
                speed: "100 Mbps".to_string(),
            },
            contract_start: None,
            contract_end: None,
            status,
        }
    }

    #[test]
    fn test_active_monthly_revenue_skips_non_active() {
        let services = vec![
            service(10.0, ServiceStatus::Active),
            service(20.0, ServiceStatus::Active),
            service(5.0, ServiceStatus::Inactive),
            service(7.0, ServiceStatus::Pending),
        ];

        assert!((active_monthly_revenue(&services) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_active_monthly_revenue_empty_is_zero() {
        assert_eq!(active_monthly_revenue(&[]), 0.0);
    }

    #[test]
    fn test_round_cents() {
        assert!((round_cents(89.99 + 49.99) - 139.98).abs() < 1e-9);
    }

    #[test]
    fn test_details_service_type_agreement() {
        let details = ServiceDetails::Mobile {
            data: "10GB".to_string(),
            number_of_lines: 3,
        };
        assert_eq!(details.service_type(), ServiceType::Mobile);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(
            "active".parse::<AccountStatus>().unwrap(),
            AccountStatus::Active
        );
        assert_eq!("tv".parse::<ServiceType>().unwrap(), ServiceType::Tv);
        assert!("Frozen".parse::<AccountStatus>().is_err());
    }
}
