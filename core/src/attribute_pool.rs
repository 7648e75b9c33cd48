//! Deterministic identifiers and contact attributes from curated lists.
//!
//! Every generator that needs a name, address, phone, VIN or date draws it
//! here. All generation is deterministic (same stage RNG = same values).

use crate::rng::StageRng;
use chrono::{Duration, NaiveDate};

/// Symbols legal in a VIN (no I, O or Q).
const VIN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Deterministic attribute pool using curated lists.
pub struct AttributePool;

impl AttributePool {
    // ── People ──────────────────────────────────────────────────────

    pub fn full_name(rng: &mut StageRng) -> String {
        let first = Self::first_name(rng);
        let last = Self::last_name(rng);
        format!("{first} {last}")
    }

    pub fn first_name(rng: &mut StageRng) -> &'static str {
        Self::draw(rng, FIRST_NAMES)
    }

    pub fn last_name(rng: &mut StageRng) -> &'static str {
        Self::draw(rng, LAST_NAMES)
    }

    /// SSN-shaped national id: AAA-GG-SSSS, area never 000/666/9xx.
    pub fn national_id(rng: &mut StageRng) -> String {
        let mut area = rng.range_inclusive(1, 899);
        if area == 666 {
            area = 667;
        }
        let group = rng.range_inclusive(1, 99);
        let serial = rng.range_inclusive(1, 9999);
        format!("{area:03}-{group:02}-{serial:04}")
    }

    /// A birth date for someone aged between `min_age` and `max_age` on `as_of`.
    pub fn date_of_birth(
        rng: &mut StageRng,
        as_of: NaiveDate,
        min_age: i64,
        max_age: i64,
    ) -> NaiveDate {
        let days = rng.range_inclusive(min_age * 365, max_age * 365 + 364);
        as_of - Duration::days(days)
    }

    pub fn email(rng: &mut StageRng, full_name: &str) -> String {
        let local: String = full_name
            .to_ascii_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");
        let n = rng.range_inclusive(1, 999);
        let domain = Self::draw(rng, EMAIL_DOMAINS);
        format!("{local}{n}@{domain}")
    }

    pub fn license_number(rng: &mut StageRng) -> String {
        format!("DL{}", rng.digits(8))
    }

    // ── Contact ─────────────────────────────────────────────────────

    /// Single-line postal address: "1234 Oak Street, Springfield, IL 62704".
    pub fn address(rng: &mut StageRng) -> String {
        let number = rng.range_inclusive(1, 9999);
        let street = Self::draw(rng, STREETS);
        let suffix = Self::draw(rng, STREET_SUFFIXES);
        let (city, state) = *rng.pick(CITIES).unwrap_or(&CITIES[0]);
        let zip = rng.range_inclusive(10000, 99999);
        format!("{number} {street} {suffix}, {city}, {state} {zip}")
    }

    /// Ten-digit North American number: "(312) 555-0147".
    pub fn phone(rng: &mut StageRng) -> String {
        let area = rng.range_inclusive(201, 989);
        let exchange = rng.range_inclusive(200, 999);
        let line = rng.range_inclusive(0, 9999);
        format!("({area}) {exchange}-{line:04}")
    }

    pub fn city(rng: &mut StageRng) -> &'static str {
        rng.pick(CITIES).map(|(city, _)| *city).unwrap_or(CITIES[0].0)
    }

    // ── Vehicles ────────────────────────────────────────────────────

    pub fn vin(rng: &mut StageRng) -> String {
        rng.symbols(VIN_ALPHABET, 17)
    }

    pub fn license_plate(rng: &mut StageRng) -> String {
        format!("{}{}", rng.symbols(LETTERS, 2), rng.digits(4))
    }

    pub fn color(rng: &mut StageRng) -> &'static str {
        Self::draw(rng, COLORS)
    }

    pub fn make_and_model(rng: &mut StageRng) -> (&'static str, &'static str) {
        let (make, models) = *rng.pick(VEHICLES).unwrap_or(&VEHICLES[0]);
        (make, Self::draw(rng, models))
    }

    // ── Organisations ───────────────────────────────────────────────

    pub fn company(rng: &mut StageRng) -> String {
        let prefix = Self::draw(rng, COMPANY_PREFIXES);
        let stem = Self::draw(rng, COMPANY_STEMS);
        format!("{prefix} {stem}")
    }

    pub fn specialty(rng: &mut StageRng) -> &'static str {
        Self::draw(rng, SPECIALTIES)
    }

    /// A day offset back from `as_of`, `lo..=hi` days.
    pub fn days_before(rng: &mut StageRng, as_of: NaiveDate, lo: i64, hi: i64) -> NaiveDate {
        as_of - Duration::days(rng.range_inclusive(lo, hi))
    }

    fn draw(rng: &mut StageRng, list: &'static [&'static str]) -> &'static str {
        rng.pick(list).copied().unwrap_or_default()
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
    "Thomas", "Charles", "Christopher", "Daniel", "Matthew", "Anthony", "Mark",
    "Donald", "Steven", "Paul", "Andrew", "Joshua", "Kenneth", "Kevin", "Brian",
    "George", "Timothy", "Ronald", "Edward", "Jason", "Jeffrey", "Ryan", "Jacob",
    "Gary", "Nicholas", "Eric", "Jonathan", "Stephen", "Larry", "Justin", "Scott",
    "Brandon", "Benjamin", "Samuel", "Raymond", "Gregory", "Frank", "Patrick",
    "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan",
    "Jessica", "Sarah", "Karen", "Lisa", "Nancy", "Betty", "Margaret", "Sandra",
    "Ashley", "Kimberly", "Emily", "Donna", "Michelle", "Carol", "Amanda",
    "Melissa", "Deborah", "Stephanie", "Rebecca", "Sharon", "Laura", "Cynthia",
    "Kathleen", "Amy", "Angela", "Anna", "Brenda", "Pamela", "Nicole", "Helen",
    "Samantha", "Katherine", "Christine", "Rachel", "Janet", "Maria", "Heather",
    "Diane", "Ruth", "Julie", "Olivia", "Victoria", "Kelly", "Lauren", "Megan",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
    "Walker", "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen",
    "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera",
    "Campbell", "Mitchell", "Carter", "Roberts", "Gomez", "Phillips", "Evans",
    "Turner", "Diaz", "Parker", "Cruz", "Edwards", "Collins", "Reyes", "Stewart",
    "Morris", "Morales", "Murphy", "Cook", "Rogers", "Gutierrez", "Ortiz", "Morgan",
    "Cooper", "Peterson", "Bailey", "Reed", "Kelly", "Howard", "Ramos", "Kim",
    "Cox", "Ward", "Richardson", "Watson", "Brooks", "Chavez", "Wood", "Bennett",
    "Gray", "Mendoza", "Ruiz", "Hughes", "Price", "Alvarez", "Castillo", "Patel",
];

const STREETS: &[&str] = &[
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park",
    "Main", "Church", "Highland", "Sunset", "Jefferson", "Lincoln", "Madison",
    "Franklin", "Ridge", "River", "Spring", "Walnut", "Chestnut", "Willow",
    "Meadow", "Forest", "Valley", "Jackson", "Adams", "Center", "Mill",
    "Prospect", "Union", "Locust", "Dogwood", "Birch", "Hickory", "Magnolia",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Drive", "Court", "Boulevard", "Way",
];

const CITIES: &[(&str, &str)] = &[
    ("Springfield", "IL"), ("Columbus", "OH"), ("Austin", "TX"), ("Denver", "CO"),
    ("Phoenix", "AZ"), ("Portland", "OR"), ("Nashville", "TN"), ("Raleigh", "NC"),
    ("Tampa", "FL"), ("Atlanta", "GA"), ("Sacramento", "CA"), ("Omaha", "NE"),
    ("Tulsa", "OK"), ("Madison", "WI"), ("Boise", "ID"), ("Richmond", "VA"),
    ("Albany", "NY"), ("Trenton", "NJ"), ("Dayton", "OH"), ("Fresno", "CA"),
    ("Reno", "NV"), ("Spokane", "WA"), ("Memphis", "TN"), ("Louisville", "KY"),
    ("Orlando", "FL"), ("El Paso", "TX"), ("Tucson", "AZ"), ("Wichita", "KS"),
    ("Lansing", "MI"), ("Akron", "OH"), ("Mobile", "AL"), ("Savannah", "GA"),
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.net", "example.org", "mail.example.com",
];

const COLORS: &[&str] = &[
    "Black", "White", "Silver", "Gray", "Red", "Blue", "Green", "Maroon",
    "Navy", "Beige", "Gold", "Orange", "Brown", "Teal",
];

const VEHICLES: &[(&str, &[&str])] = &[
    ("Toyota", &["Camry", "Corolla", "RAV4", "Highlander"]),
    ("Honda", &["Accord", "Civic", "CR-V", "Pilot"]),
    ("Ford", &["F-150", "Escape", "Explorer", "Mustang"]),
    ("Chevrolet", &["Silverado", "Equinox", "Malibu", "Tahoe"]),
    ("Nissan", &["Altima", "Rogue", "Sentra", "Pathfinder"]),
];

const COMPANY_PREFIXES: &[&str] = &[
    "Premier", "Elite", "First", "Superior", "Quality", "Precision", "Metro",
    "Valley", "Coastal", "Central", "United", "National", "Prime", "Reliable",
];

const COMPANY_STEMS: &[&str] = &[
    "Motors", "Collision", "Automotive", "Partners", "Works", "Group", "Holdings",
    "Enterprises", "Brothers", "Services",
];

const SPECIALTIES: &[&str] = &[
    "Orthopedics", "Neurology", "Physical Therapy", "Chiropractic", "Pain Management",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    fn rng(seed: u64) -> StageRng {
        RngBank::new(seed).for_stage(StageSlot::Population)
    }

    #[test]
    fn names_are_deterministic() {
        let a = AttributePool::full_name(&mut rng(12345));
        let b = AttributePool::full_name(&mut rng(12345));
        assert_eq!(a, b, "Same seed should produce same name");
    }

    #[test]
    fn vin_has_seventeen_legal_symbols() {
        let mut rng = rng(9);
        for _ in 0..200 {
            let vin = AttributePool::vin(&mut rng);
            assert_eq!(vin.len(), 17);
            assert!(
                vin.chars().all(|c| c.is_ascii_alphanumeric() && !"IOQ".contains(c)),
                "illegal VIN {vin}"
            );
        }
    }

    #[test]
    fn national_id_is_ssn_shaped() {
        let mut rng = rng(4);
        for _ in 0..200 {
            let id = AttributePool::national_id(&mut rng);
            let parts: Vec<&str> = id.split('-').collect();
            assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![3, 2, 4]);
            assert_ne!(parts[0], "000");
            assert_ne!(parts[0], "666");
        }
    }

    #[test]
    fn birth_dates_respect_age_window() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut rng = rng(5);
        for _ in 0..200 {
            let dob = AttributePool::date_of_birth(&mut rng, as_of, 18, 80);
            let age_days = (as_of - dob).num_days();
            assert!((18 * 365..=81 * 365).contains(&age_days), "age days {age_days}");
        }
    }

    #[test]
    fn email_is_derived_from_name() {
        let email = AttributePool::email(&mut rng(2), "Ada Lovelace");
        assert!(email.starts_with("ada.lovelace"), "{email}");
        assert!(email.contains('@'));
    }
}
