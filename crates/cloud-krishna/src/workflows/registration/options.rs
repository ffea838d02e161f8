use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CountryCode, FormFieldBundle, OptionCategory, OTHER_OPTION};
use super::repository::FormFieldSource;

pub(crate) const COUNTRY_CODE_SEPARATOR: &str = " - ";

const DEFAULT_COLLEGES: &[&str] = &[
    "IIT Delhi",
    "IIT Bombay",
    "IIT Madras",
    "IIT Kanpur",
    "IIT Kharagpur",
    "IIT Roorkee",
    "IIT Guwahati",
    "NIT Trichy",
    "NIT Warangal",
    "NIT Surathkal",
    "BITS Pilani",
    "Delhi University",
    "Mumbai University",
    "Anna University",
    "VIT Vellore",
    "SRM University",
    "Amity University",
    "Manipal University",
    "Jadavpur University",
    "Pune University",
    "Rungta International Skills University",
    OTHER_OPTION,
];

const DEFAULT_COURSES: &[&str] = &["B.Tech.", "B.E.", "BCA", "MCA", "B.Sc", "M.Tech", OTHER_OPTION];

const DEFAULT_YEARS: &[&str] = &[
    "1st Year",
    "2nd Year",
    "3rd Year",
    "4th Year",
    "Graduated",
    OTHER_OPTION,
];

const DEFAULT_INTERESTS: &[&str] = &[
    "Cloud Computing",
    "DevOps",
    "Data Engineering",
    "Data Science",
    "Data Analyst",
    "A.I. / M.L. Engineering",
    "Security",
    "Need Guidance",
];

const DEFAULT_COUNTRY_CODES: &[(&str, &str)] = &[
    ("+1", "United States"),
    ("+44", "United Kingdom"),
    ("+91", "India"),
    ("+92", "Pakistan"),
    ("+880", "Bangladesh"),
    ("+977", "Nepal"),
    ("+975", "Bhutan"),
    ("+94", "Sri Lanka"),
    ("+95", "Myanmar"),
    ("+55", "Brazil"),
    ("+27", "South Africa"),
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Read-only enumerations backing the dropdown and autocomplete fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSet {
    pub colleges: Vec<String>,
    pub courses: Vec<String>,
    pub years: Vec<String>,
    pub interests: Vec<String>,
    pub country_codes: Vec<CountryCode>,
    /// Categories populated from the hardcoded defaults rather than the config service.
    pub defaulted: BTreeSet<OptionCategory>,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl OptionSet {
    /// Hardcoded lists used whenever the config service cannot be reached.
    pub fn defaults() -> Self {
        Self {
            colleges: owned(DEFAULT_COLLEGES),
            courses: owned(DEFAULT_COURSES),
            years: owned(DEFAULT_YEARS),
            interests: owned(DEFAULT_INTERESTS),
            country_codes: DEFAULT_COUNTRY_CODES
                .iter()
                .map(|(code, country)| CountryCode::new(*code, *country))
                .collect(),
            defaulted: OptionCategory::ALL.into_iter().collect(),
        }
    }

    /// Merge a fetched bundle, substituting defaults per empty category.
    pub fn from_bundle(bundle: FormFieldBundle) -> Self {
        let defaults = Self::defaults();
        let mut defaulted = BTreeSet::new();

        let colleges = with_other_sentinel(bundle.colleges).unwrap_or_else(|| {
            defaulted.insert(OptionCategory::Colleges);
            defaults.colleges
        });
        let courses = with_other_sentinel(bundle.courses).unwrap_or_else(|| {
            defaulted.insert(OptionCategory::Courses);
            defaults.courses
        });
        let years = non_empty(bundle.years).unwrap_or_else(|| {
            defaulted.insert(OptionCategory::Years);
            defaults.years
        });
        let interests = non_empty(bundle.interests).unwrap_or_else(|| {
            defaulted.insert(OptionCategory::Interests);
            defaults.interests
        });
        let country_codes = non_empty(bundle.country_codes)
            .map(|entries| entries.iter().map(|entry| parse_country_code(entry)).collect())
            .unwrap_or_else(|| {
                defaulted.insert(OptionCategory::CountryCodes);
                defaults.country_codes
            });

        Self {
            colleges,
            courses,
            years,
            interests,
            country_codes,
            defaulted,
        }
    }

    pub fn values(&self, category: OptionCategory) -> Vec<&str> {
        match category {
            OptionCategory::Colleges => self.colleges.iter().map(String::as_str).collect(),
            OptionCategory::Courses => self.courses.iter().map(String::as_str).collect(),
            OptionCategory::Years => self.years.iter().map(String::as_str).collect(),
            OptionCategory::Interests => self.interests.iter().map(String::as_str).collect(),
            OptionCategory::CountryCodes => self
                .country_codes
                .iter()
                .map(|entry| entry.code.as_str())
                .collect(),
        }
    }

    pub fn contains(&self, category: OptionCategory, value: &str) -> bool {
        self.values(category).contains(&value)
    }

    pub fn is_defaulted(&self, category: OptionCategory) -> bool {
        self.defaulted.contains(&category)
    }

    /// Case-insensitive substring search backing the autocomplete dropdowns.
    pub fn filter(&self, category: OptionCategory, query: &str) -> Vec<&str> {
        if category == OptionCategory::CountryCodes {
            return self
                .filter_country_codes(query)
                .into_iter()
                .map(|entry| entry.code.as_str())
                .collect();
        }

        let needle = query.to_lowercase();
        self.values(category)
            .into_iter()
            .filter(|value| value.to_lowercase().contains(&needle))
            .collect()
    }

    /// Country codes whose dial code or country name contains the query.
    pub fn filter_country_codes(&self, query: &str) -> Vec<&CountryCode> {
        let needle = query.to_lowercase();
        self.country_codes
            .iter()
            .filter(|entry| {
                entry.code.to_lowercase().contains(&needle)
                    || entry.country.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn with_other_sentinel(values: Vec<String>) -> Option<Vec<String>> {
    non_empty(values).map(|mut values| {
        values.push(OTHER_OPTION.to_string());
        values
    })
}

/// Parse `"<code> - <country>"`; entries without the separator keep an empty country.
pub fn parse_country_code(entry: &str) -> CountryCode {
    let parts: Vec<&str> = entry.split(COUNTRY_CODE_SEPARATOR).collect();
    match parts.as_slice() {
        [code, country] => CountryCode::new(code.trim(), country.trim()),
        _ => CountryCode::new(entry.trim(), ""),
    }
}

/// Single attempt to populate the option set; any failure yields the defaults.
pub async fn load_options(source: &dyn FormFieldSource) -> OptionSet {
    match source.fetch_form_fields().await {
        Ok(bundle) => {
            let options = OptionSet::from_bundle(bundle);
            info!(
                defaulted = ?options.defaulted,
                colleges = options.colleges.len(),
                courses = options.courses.len(),
                "form options loaded"
            );
            options
        }
        Err(error) => {
            warn!(%error, "form options unavailable; using defaults");
            OptionSet::defaults()
        }
    }
}
