// Reference tables: static weighted enumerations consumed by the generator
// and exposed read-only at the API boundary. Pure data, no behavior beyond
// lookups.

use crate::model::{AccountStatus, Industry, PaymentMethod, ServiceDetails, ServiceStatus, ServiceType};

// ============================================================================
// GEOGRAPHY
// ============================================================================

/// A (city, province) tuple with its postal-code prefix. City and province
/// are always drawn jointly from this table, never independently.
#[derive(Debug, Clone, Copy)]
pub struct CityRef {
    pub city: &'static str,
    pub province: &'static str,
    pub postal_prefix: &'static str,
}

pub const CITIES: &[CityRef] = &[
    CityRef { city: "Toronto", province: "ON", postal_prefix: "M" },
    CityRef { city: "Montreal", province: "QC", postal_prefix: "H" },
    CityRef { city: "Vancouver", province: "BC", postal_prefix: "V" },
    CityRef { city: "Calgary", province: "AB", postal_prefix: "T" },
    CityRef { city: "Edmonton", province: "AB", postal_prefix: "T" },
    CityRef { city: "Ottawa", province: "ON", postal_prefix: "K" },
    CityRef { city: "Winnipeg", province: "MB", postal_prefix: "R" },
    CityRef { city: "Quebec City", province: "QC", postal_prefix: "G" },
    CityRef { city: "Hamilton", province: "ON", postal_prefix: "L" },
    CityRef { city: "Kitchener", province: "ON", postal_prefix: "N" },
    CityRef { city: "London", province: "ON", postal_prefix: "N" },
    CityRef { city: "Victoria", province: "BC", postal_prefix: "V" },
    CityRef { city: "Halifax", province: "NS", postal_prefix: "B" },
    CityRef { city: "Saskatoon", province: "SK", postal_prefix: "S" },
    CityRef { city: "Regina", province: "SK", postal_prefix: "S" },
    CityRef { city: "St. John's", province: "NL", postal_prefix: "A" },
    CityRef { city: "Fredericton", province: "NB", postal_prefix: "E" },
    CityRef { city: "Charlottetown", province: "PE", postal_prefix: "C" },
    CityRef { city: "Whitehorse", province: "YT", postal_prefix: "Y" },
    CityRef { city: "Yellowknife", province: "NT", postal_prefix: "X" },
    CityRef { city: "Iqaluit", province: "NU", postal_prefix: "X" },
];

/// Telephone area codes by province
pub const AREA_CODES: &[(&str, &[&str])] = &[
    ("ON", &["416", "647", "437", "905", "289", "365", "343", "613"]),
    ("QC", &["514", "438", "450", "579", "418", "581", "819", "873"]),
    ("BC", &["604", "778", "236", "250", "672"]),
    ("AB", &["403", "587", "780", "825"]),
    ("MB", &["204", "431"]),
    ("SK", &["306", "639"]),
    ("NS", &["902", "782"]),
    ("NB", &["506"]),
    ("NL", &["709"]),
    ("PE", &["902", "782"]),
    ("YT", &["867"]),
    ("NT", &["867"]),
    ("NU", &["867"]),
];

/// Letters valid in Canadian postal codes (no D, F, I, O, Q, U)
pub const POSTAL_LETTERS: &[u8] = b"ABCEGHJKLMNPRSTVWXYZ";

/// True when (city, province) is one of the reference tuples
pub fn is_city_province_pair(city: &str, province: &str) -> bool {
    CITIES
        .iter()
        .any(|c| c.city == city && c.province == province)
}

/// Area codes for a province (province "ON" -> ["416", ...])
pub fn area_codes_for(province: &str) -> &'static [&'static str] {
    AREA_CODES
        .iter()
        .find(|(p, _)| *p == province)
        .map(|(_, codes)| *codes)
        .unwrap_or(&["800"])
}

// ============================================================================
// INDUSTRIES
// ============================================================================

/// Industries with market-composition weights (not uniform)
pub const INDUSTRY_WEIGHTS: &[(Industry, u32)] = &[
    (Industry::Technology, 14),
    (Industry::Healthcare, 10),
    (Industry::Finance, 9),
    (Industry::Manufacturing, 9),
    (Industry::Retail, 12),
    (Industry::Education, 6),
    (Industry::Legal, 5),
    (Industry::Consulting, 8),
    (Industry::RealEstate, 6),
    (Industry::Construction, 7),
    (Industry::Transportation, 5),
    (Industry::Hospitality, 4),
    (Industry::Media, 2),
    (Industry::NonProfit, 2),
    (Industry::Government, 1),
];

// ============================================================================
// SERVICE PLAN CATALOG
// ============================================================================

/// Type-specific attribute template of a plan
#[derive(Debug, Clone, Copy)]
enum PlanDetail {
    Speed(&'static str),
    Features(&'static str),
    Data(&'static str),
    Channels(u32),
    Storage(&'static str),
}

/// A named plan/tier within a service type, with its list price
#[derive(Debug, Clone, Copy)]
pub struct ServicePlan {
    pub service_type: ServiceType,
    pub name: &'static str,
    pub monthly_price: f64,
    detail: PlanDetail,
}

impl ServicePlan {
    /// Materialize the plan's details. `number_of_lines` only affects
    /// Mobile plans (price scales with line count).
    pub fn details(&self, number_of_lines: u32) -> ServiceDetails {
        match self.detail {
            PlanDetail::Speed(speed) => ServiceDetails::Internet { speed: speed.to_string() },
            PlanDetail::Features(features) => match self.service_type {
                ServiceType::Security => ServiceDetails::Security { features: features.to_string() },
                _ => ServiceDetails::Phone { features: features.to_string() },
            },
            PlanDetail::Data(data) => ServiceDetails::Mobile {
                data: data.to_string(),
                number_of_lines,
            },
            PlanDetail::Channels(channels) => ServiceDetails::Tv { channels },
            PlanDetail::Storage(storage) => ServiceDetails::Cloud { storage: storage.to_string() },
        }
    }
}

pub const SERVICE_PLANS: &[ServicePlan] = &[
    // Internet
    ServicePlan { service_type: ServiceType::Internet, name: "Fiber 100", monthly_price: 89.99, detail: PlanDetail::Speed("100 Mbps") },
    ServicePlan { service_type: ServiceType::Internet, name: "Fiber 500", monthly_price: 119.99, detail: PlanDetail::Speed("500 Mbps") },
    ServicePlan { service_type: ServiceType::Internet, name: "Fiber 1G", monthly_price: 149.99, detail: PlanDetail::Speed("1 Gbps") },
    ServicePlan { service_type: ServiceType::Internet, name: "Fiber 3G", monthly_price: 199.99, detail: PlanDetail::Speed("3 Gbps") },
    ServicePlan { service_type: ServiceType::Internet, name: "Business DSL", monthly_price: 69.99, detail: PlanDetail::Speed("25 Mbps") },
    // Phone
    ServicePlan { service_type: ServiceType::Phone, name: "Basic Business Line", monthly_price: 29.99, detail: PlanDetail::Features("Local calling") },
    ServicePlan { service_type: ServiceType::Phone, name: "Business Bundle", monthly_price: 49.99, detail: PlanDetail::Features("Local + Long distance") },
    ServicePlan { service_type: ServiceType::Phone, name: "Unlimited Canada", monthly_price: 79.99, detail: PlanDetail::Features("Unlimited Canada calling") },
    ServicePlan { service_type: ServiceType::Phone, name: "International Bundle", monthly_price: 129.99, detail: PlanDetail::Features("Canada + US + International") },
    // Mobile
    ServicePlan { service_type: ServiceType::Mobile, name: "Business Basic", monthly_price: 45.00, detail: PlanDetail::Data("2GB") },
    ServicePlan { service_type: ServiceType::Mobile, name: "Business Plus", monthly_price: 65.00, detail: PlanDetail::Data("10GB") },
    ServicePlan { service_type: ServiceType::Mobile, name: "Business Unlimited", monthly_price: 85.00, detail: PlanDetail::Data("Unlimited") },
    ServicePlan { service_type: ServiceType::Mobile, name: "Enterprise Plan", monthly_price: 120.00, detail: PlanDetail::Data("Unlimited + Hotspot") },
    // TV
    ServicePlan { service_type: ServiceType::Tv, name: "Basic TV", monthly_price: 39.99, detail: PlanDetail::Channels(50) },
    ServicePlan { service_type: ServiceType::Tv, name: "Popular TV", monthly_price: 59.99, detail: PlanDetail::Channels(100) },
    ServicePlan { service_type: ServiceType::Tv, name: "Premium TV", monthly_price: 89.99, detail: PlanDetail::Channels(200) },
    ServicePlan { service_type: ServiceType::Tv, name: "Ultimate TV", monthly_price: 129.99, detail: PlanDetail::Channels(400) },
    // Cloud
    ServicePlan { service_type: ServiceType::Cloud, name: "Basic Cloud", monthly_price: 19.99, detail: PlanDetail::Storage("100GB") },
    ServicePlan { service_type: ServiceType::Cloud, name: "Business Cloud", monthly_price: 49.99, detail: PlanDetail::Storage("1TB") },
    ServicePlan { service_type: ServiceType::Cloud, name: "Enterprise Cloud", monthly_price: 99.99, detail: PlanDetail::Storage("5TB") },
    // Security
    ServicePlan { service_type: ServiceType::Security, name: "Basic Security", monthly_price: 14.99, detail: PlanDetail::Features("Firewall + Antivirus") },
    ServicePlan { service_type: ServiceType::Security, name: "Advanced Security", monthly_price: 29.99, detail: PlanDetail::Features("Firewall + Antivirus + VPN") },
    ServicePlan { service_type: ServiceType::Security, name: "Enterprise Security", monthly_price: 59.99, detail: PlanDetail::Features("Full security suite") },
];

/// Plans available for a given service type
pub fn plans_for(service_type: ServiceType) -> Vec<&'static ServicePlan> {
    SERVICE_PLANS
        .iter()
        .filter(|p| p.service_type == service_type)
        .collect()
}

/// Probability that a business subscribes to each service type
pub const ATTACH_PROBABILITY: &[(ServiceType, f64)] = &[
    (ServiceType::Internet, 0.95),
    (ServiceType::Phone, 0.85),
    (ServiceType::Mobile, 0.60),
    (ServiceType::Tv, 0.40),
    (ServiceType::Cloud, 0.35),
    (ServiceType::Security, 0.30),
];

// ============================================================================
// STATUS / PAYMENT WEIGHTS
// ============================================================================

pub const ACCOUNT_STATUS_WEIGHTS: &[(AccountStatus, u32)] = &[
    (AccountStatus::Active, 8),
    (AccountStatus::Suspended, 1),
    (AccountStatus::Cancelled, 1),
];

pub const SERVICE_STATUS_WEIGHTS: &[(ServiceStatus, u32)] = &[
    (ServiceStatus::Active, 7),
    (ServiceStatus::Pending, 1),
    (ServiceStatus::Inactive, 1),
    (ServiceStatus::Cancelled, 1),
];

pub const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod::CreditCard,
    PaymentMethod::BankTransfer,
    PaymentMethod::Invoice,
    PaymentMethod::AutoPay,
];

// ============================================================================
// NAMES AND TEXT
// ============================================================================

pub const COMPANY_PREFIXES: &[&str] = &[
    "Advanced", "Canadian", "Global", "Premier", "Elite", "Professional",
    "Innovative", "Strategic", "Dynamic", "Excellence", "Quality", "Reliable",
    "Trusted", "Leading", "Modern", "Digital", "Smart", "Future", "Next",
    "Peak", "Summit", "Prime", "Core", "Central", "Metro", "Urban", "Regional",
];

pub const COMPANY_MAINS: &[&str] = &[
    "Solutions", "Systems", "Technologies", "Services", "Consulting", "Group",
    "Partners", "Associates", "Enterprises", "Corporation", "Industries",
    "Manufacturing", "Trading", "Import", "Export", "Distribution", "Logistics",
    "Healthcare", "Medical", "Dental", "Legal", "Financial", "Insurance",
    "Real Estate", "Construction", "Engineering", "Architecture", "Design",
    "Marketing", "Advertising", "Media", "Communications", "Education",
    "Training", "Development", "Research", "Laboratories", "Pharmaceuticals",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "Inc.", "Ltd.", "Corp.", "LLC", "Partnership", "Associates", "Group",
    "International", "Canada", "North", "West", "East", "Central",
];

pub const STREET_NAMES: &[&str] = &[
    "Main", "King", "Queen", "Broadway", "Central", "First", "Second",
    "Oak", "Maple", "Pine", "Cedar", "Elm", "Birch", "Spruce", "Willow",
    "Victoria", "Albert", "George", "Edward", "Charles", "William",
    "University", "College", "Church", "Market", "Commerce",
    "Business", "Industrial", "Technology", "Innovation", "Progress",
];

pub const STREET_TYPES: &[&str] = &[
    "Street", "Avenue", "Road", "Boulevard", "Drive", "Way", "Lane",
];

pub const ACCOUNT_NOTES: &[&str] = &[
    "Excellent customer, always pays on time",
    "Interested in upgrading services",
    "Has been a customer for many years",
    "Recently expanded business",
    "May need additional services",
    "Contacted about new offerings",
    "Satisfied with current services",
    "Potential for upselling",
    "Regular maintenance customer",
    "High-value customer",
];

// ============================================================================
// READ-ONLY PROJECTIONS (API boundary)
// ============================================================================

/// All industry names
pub fn industries() -> Vec<&'static str> {
    INDUSTRY_WEIGHTS.iter().map(|(i, _)| i.as_str()).collect()
}

/// All province codes, sorted and deduplicated
pub fn provinces() -> Vec<&'static str> {
    let mut provinces: Vec<&'static str> = CITIES.iter().map(|c| c.province).collect();
    provinces.sort_unstable();
    provinces.dedup();
    provinces
}

/// All cities, optionally scoped to a province
pub fn cities(province: Option<&str>) -> Vec<&'static str> {
    CITIES
        .iter()
        .filter(|c| province.is_none_or(|p| c.province == p))
        .map(|c| c.city)
        .collect()
}

/// All service type names
pub fn service_types() -> Vec<&'static str> {
    ServiceType::ALL.iter().map(|t| t.as_str()).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_province_pairs() {
        assert!(is_city_province_pair("Toronto", "ON"));
        assert!(is_city_province_pair("Edmonton", "AB"));
        assert!(!is_city_province_pair("Toronto", "BC"));
        assert!(!is_city_province_pair("Atlantis", "ON"));
    }

    #[test]
    fn test_every_service_type_has_plans() {
        for ty in crate::model::ServiceType::ALL {
            assert!(!plans_for(ty).is_empty(), "no plans for {}", ty.as_str());
        }
    }

    #[test]
    fn test_every_province_has_area_codes() {
        for city in CITIES {
            assert!(!area_codes_for(city.province).is_empty());
        }
    }

    #[test]
    fn test_cities_scoped_to_province() {
        let on = cities(Some("ON"));
        assert!(on.contains(&"Toronto"));
        assert!(!on.contains(&"Vancouver"));
        assert!(cities(None).len() >= on.len());
    }

    #[test]
    fn test_industry_weights_nonzero() {
        assert_eq!(INDUSTRY_WEIGHTS.len(), 15);
        assert!(INDUSTRY_WEIGHTS.iter().all(|(_, w)| *w > 0));
    }
}
