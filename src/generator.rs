// 🎲 Synthetic dataset generator
//
// Produces an ordered sequence of internally consistent businesses with
// their services. The RNG is threaded explicitly so a fixed seed (plus a
// pinned `today` anchor) reproduces the dataset bit for bit.

use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CatalogError, Result};
use crate::model::{
    active_monthly_revenue, round_cents, Address, Business, Service, ServiceType,
};
use crate::reference;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Prefix of business ids ("B2B" -> "B2B-000001")
    pub id_prefix: String,

    /// Anchor date all generated dates are drawn relative to. Defaults to
    /// the current date; pin it for reproducible runs.
    pub today: NaiveDate,

    /// Whether one business may hold several plans of the same service type.
    /// Off by default; when on, Mobile may attach a second plan.
    pub multi_plan_per_type: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            id_prefix: "B2B".to_string(),
            today: Utc::now().date_naive(),
            multi_plan_per_type: false,
        }
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Generator { config }
    }

    /// Generate `count` businesses with their services. Deterministic for a
    /// fixed seed; seeded from the OS otherwise.
    pub fn generate(&self, count: usize, seed: Option<u64>) -> Result<Vec<Business>> {
        if count == 0 {
            return Err(CatalogError::Configuration(
                "generation count must be positive".to_string(),
            ));
        }
        if reference::CITIES.is_empty()
            || reference::INDUSTRY_WEIGHTS.is_empty()
            || reference::SERVICE_PLANS.is_empty()
        {
            return Err(CatalogError::Configuration(
                "reference tables must not be empty".to_string(),
            ));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut businesses = Vec::with_capacity(count);
        let mut next_service_id: u64 = 1;

        for seq in 1..=count {
            let id = format!("{}-{:06}", self.config.id_prefix, seq);
            businesses.push(self.generate_business(&mut rng, id, &mut next_service_id));
        }

        Ok(businesses)
    }

    fn generate_business(
        &self,
        rng: &mut StdRng,
        id: String,
        next_service_id: &mut u64,
    ) -> Business {
        let today = self.config.today;
        let company_name = generate_company_name(rng);
        let address = generate_address(rng);
        let industry = weighted(rng, reference::INDUSTRY_WEIGHTS);

        let employee_count = draw_employee_count(rng);
        let annual_revenue = draw_annual_revenue(rng, employee_count);

        // Relationship window: customer for 1-10 years, contacted since
        let customer_since = today - Days::new(rng.random_range(365..=3650));
        let contact_span = (today - customer_since).num_days() as u64;
        let last_contact = customer_since + Days::new(rng.random_range(0..=contact_span));

        let services = self.generate_services(rng, &id, customer_since, next_service_id);
        let total_monthly_revenue = active_monthly_revenue(&services);

        let slug = slugify(&company_name);
        let phone = generate_phone(rng, address.province.as_str());

        Business {
            id,
            company_name,
            industry,
            employee_count,
            annual_revenue,
            email: format!("info@{}.ca", slug),
            website: format!("www.{}.ca", slug),
            phone,
            address,
            customer_since,
            account_manager: format!("Manager {}", rng.random_range(1..=50)),
            payment_method: reference::PAYMENT_METHODS[rng.random_range(0..reference::PAYMENT_METHODS.len())],
            account_status: weighted(rng, reference::ACCOUNT_STATUS_WEIGHTS),
            last_contact,
            notes: reference::ACCOUNT_NOTES[rng.random_range(0..reference::ACCOUNT_NOTES.len())]
                .to_string(),
            total_monthly_revenue,
            services,
        }
    }

    fn generate_services(
        &self,
        rng: &mut StdRng,
        business_id: &str,
        customer_since: NaiveDate,
        next_service_id: &mut u64,
    ) -> Vec<Service> {
        let mut services = Vec::new();

        for &(service_type, probability) in reference::ATTACH_PROBABILITY {
            if !rng.random_bool(probability) {
                continue;
            }

            services.push(self.generate_service(
                rng,
                business_id,
                service_type,
                customer_since,
                next_service_id,
            ));

            // Policy: a second plan of the same type only for Mobile, and
            // only when explicitly enabled
            if self.config.multi_plan_per_type
                && service_type == ServiceType::Mobile
                && rng.random_bool(0.25)
            {
                services.push(self.generate_service(
                    rng,
                    business_id,
                    service_type,
                    customer_since,
                    next_service_id,
                ));
            }
        }

        services
    }

    fn generate_service(
        &self,
        rng: &mut StdRng,
        business_id: &str,
        service_type: ServiceType,
        customer_since: NaiveDate,
        next_service_id: &mut u64,
    ) -> Service {
        let plans = reference::plans_for(service_type);
        let plan = plans[rng.random_range(0..plans.len())];

        // Mobile plans are priced per line
        let number_of_lines = if service_type == ServiceType::Mobile {
            rng.random_range(1..=10)
        } else {
            1
        };
        let monthly_price = round_cents(plan.monthly_price * number_of_lines as f64);

        // Contract starts within the customer relationship, runs 1-5 years
        let window = (self.config.today - customer_since).num_days().max(0) as u64;
        let contract_start = customer_since + Days::new(rng.random_range(0..=window));
        let contract_end = contract_start + Days::new(rng.random_range(365..=1825));

        let id = *next_service_id;
        *next_service_id += 1;

        Service {
            id,
            business_id: business_id.to_string(),
            service_type,
            service_name: plan.name.to_string(),
            monthly_price,
            details: plan.details(number_of_lines),
            contract_start: Some(contract_start),
            contract_end: Some(contract_end),
            status: weighted(rng, reference::SERVICE_STATUS_WEIGHTS),
        }
    }
}

// ============================================================================
// DRAW HELPERS
// ============================================================================

/// Pick from a weighted table (weights need not be normalized)
fn weighted<T: Copy>(rng: &mut StdRng, table: &[(T, u32)]) -> T {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (value, weight) in table {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    table[table.len() - 1].0
}

/// Headcount buckets: most businesses small, a long tail of large ones
const EMPLOYEE_BUCKETS: &[(std::ops::RangeInclusive<u32>, u32)] = &[
    (1..=4, 30),
    (5..=19, 30),
    (20..=99, 22),
    (100..=499, 12),
    (500..=2499, 5),
    (2500..=10000, 1),
];

fn draw_employee_count(rng: &mut StdRng) -> u32 {
    let total: u32 = EMPLOYEE_BUCKETS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (range, weight) in EMPLOYEE_BUCKETS {
        if roll < *weight {
            return rng.random_range(range.clone());
        }
        roll -= weight;
    }
    1
}

/// Annual revenue as a function of headcount with multiplicative noise,
/// clamped positive and rounded to the nearest thousand
fn draw_annual_revenue(rng: &mut StdRng, employee_count: u32) -> f64 {
    let per_head = rng.random_range(60_000.0..180_000.0);
    let noise = 0.6 + rng.random::<f64>() * 0.9;
    let revenue = employee_count as f64 * per_head * noise;
    (revenue.max(25_000.0) / 1000.0).round() * 1000.0
}

fn generate_company_name(rng: &mut StdRng) -> String {
    let prefix = reference::COMPANY_PREFIXES[rng.random_range(0..reference::COMPANY_PREFIXES.len())];
    let main = reference::COMPANY_MAINS[rng.random_range(0..reference::COMPANY_MAINS.len())];
    let suffix = reference::COMPANY_SUFFIXES[rng.random_range(0..reference::COMPANY_SUFFIXES.len())];

    // Sometimes skip prefix or suffix for variety
    let style: f64 = rng.random();
    if style < 0.3 {
        format!("{} {}", main, suffix)
    } else if style < 0.5 {
        format!("{} {}", prefix, main)
    } else {
        format!("{} {} {}", prefix, main, suffix)
    }
}

fn generate_address(rng: &mut StdRng) -> Address {
    // City and province come from the same tuple (never drawn independently)
    let city = reference::CITIES[rng.random_range(0..reference::CITIES.len())];
    let street_name = reference::STREET_NAMES[rng.random_range(0..reference::STREET_NAMES.len())];
    let street_type = reference::STREET_TYPES[rng.random_range(0..reference::STREET_TYPES.len())];

    Address {
        street_number: rng.random_range(1..=9999),
        street_name: format!("{} {}", street_name, street_type),
        city: city.city.to_string(),
        province: city.province.to_string(),
        postal_code: generate_postal_code(rng, city.postal_prefix),
        country: "Canada".to_string(),
    }
}

fn generate_postal_code(rng: &mut StdRng, prefix: &str) -> String {
    let letter = |rng: &mut StdRng| {
        reference::POSTAL_LETTERS[rng.random_range(0..reference::POSTAL_LETTERS.len())] as char
    };
    format!(
        "{}{}{} {}{}{}",
        prefix,
        rng.random_range(1..=9),
        letter(rng),
        rng.random_range(1..=9),
        letter(rng),
        rng.random_range(1..=9),
    )
}

fn generate_phone(rng: &mut StdRng, province: &str) -> String {
    let codes = reference::area_codes_for(province);
    let area = codes[rng.random_range(0..codes.len())];
    format!(
        "+1-{}-{}-{}",
        area,
        rng.random_range(200..=999),
        rng.random_range(1000..=9999),
    )
}

/// Lowercase a company name into a domain label ("Peak Media Inc." -> "peakmediainc")
fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::is_city_province_pair;

    fn pinned_config() -> GeneratorConfig {
        GeneratorConfig {
            id_prefix: "B2B".to_string(),
            today: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            multi_plan_per_type: false,
        }
    }

    #[test]
    fn test_zero_count_is_configuration_error() {
        let generator = Generator::new(pinned_config());
        assert!(matches!(
            generator.generate(0, Some(1)),
            Err(CatalogError::Configuration(_))
        ));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let generator = Generator::new(pinned_config());
        let a = generator.generate(25, Some(42)).unwrap();
        let b = generator.generate(25, Some(42)).unwrap();
        assert_eq!(a, b);

        let c = generator.generate(25, Some(43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_ids_are_sequential_and_zero_padded() {
        let generator = Generator::new(pinned_config());
        let businesses = generator.generate(3, Some(7)).unwrap();
        let ids: Vec<&str> = businesses.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["B2B-000001", "B2B-000002", "B2B-000003"]);
    }

    #[test]
    fn test_revenue_invariant_holds_for_generated_data() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(200, Some(99)).unwrap() {
            let expected = active_monthly_revenue(&business.services);
            assert!(
                (business.total_monthly_revenue - expected).abs() < 1e-6,
                "business {} revenue {} != {}",
                business.id,
                business.total_monthly_revenue,
                expected
            );
        }
    }

    #[test]
    fn test_city_province_pairs_come_from_reference_table() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(200, Some(5)).unwrap() {
            assert!(is_city_province_pair(
                &business.address.city,
                &business.address.province
            ));
        }
    }

    #[test]
    fn test_generated_dates_are_ordered() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(100, Some(11)).unwrap() {
            assert!(business.last_contact >= business.customer_since);
            for service in &business.services {
                let start = service.contract_start.unwrap();
                let end = service.contract_end.unwrap();
                assert!(start <= end);
                assert!(start >= business.customer_since);
            }
        }
    }

    #[test]
    fn test_details_match_service_type() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(100, Some(13)).unwrap() {
            for service in &business.services {
                assert_eq!(service.details.service_type(), service.service_type);
            }
        }
    }

    #[test]
    fn test_positive_fields() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(100, Some(17)).unwrap() {
            assert!(business.employee_count > 0);
            assert!(business.annual_revenue > 0.0);
            for service in &business.services {
                assert!(service.monthly_price >= 0.0);
            }
        }
    }

    #[test]
    fn test_single_plan_per_type_by_default() {
        let generator = Generator::new(pinned_config());
        for business in generator.generate(100, Some(19)).unwrap() {
            let mut types: Vec<ServiceType> =
                business.services.iter().map(|s| s.service_type).collect();
            types.sort_unstable();
            let before = types.len();
            types.dedup();
            assert_eq!(before, types.len(), "duplicate type in {}", business.id);
        }
    }
}
