// src/seo/schema.rs

//! Structured-data (JSON-LD) generation for job postings.
//!
//! Maps a [`ListingRecord`] into the schema.org JobPosting vocabulary. The
//! builder is total and defensive: each optional record field is guarded
//! independently and every required field degrades to a fallback value, so
//! the output is always a complete, consumable document.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::models::ListingRecord;
use crate::seo::url::canonical_url;

/// Default validity window in days after `datePosted`.
const VALID_DAYS_DEFAULT: i64 = 90;
/// Shortened window for listings flagged urgent.
const VALID_DAYS_URGENT: i64 = 14;
/// Extended window for internship-type listings.
const VALID_DAYS_INTERN: i64 = 120;

/// Minimum description length before the call-to-action padding kicks in.
const MIN_DESCRIPTION_LEN: usize = 200;
/// Hard cap on description length in the emitted document.
const MAX_DESCRIPTION_LEN: usize = 2000;

const DESCRIPTION_FALLBACK: &str = "İş tanımı";
const DESCRIPTION_PADDING: &str = " Detaylı bilgi için ilan sayfasını ziyaret edin. \
     Bu pozisyon için hemen başvurun ve kariyerinize yeni bir yön verin.";

/// Parsed salary information extracted from the free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryAmount {
    /// A single fixed monthly amount
    Fixed(u64),
    /// A min/max monthly range
    Range { min: u64, max: u64 },
}

/// Builds JobPosting documents against a site configuration.
///
/// Carries the generation instant explicitly so output is deterministic
/// under test.
pub struct SchemaBuilder<'a> {
    config: &'a SiteConfig,
    now: DateTime<Utc>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self::at(config, Utc::now())
    }

    /// Create a builder pinned to a fixed generation instant.
    pub fn at(config: &'a SiteConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    /// Build the JobPosting document for one listing.
    pub fn job_posting(&self, record: &ListingRecord) -> Value {
        let date_posted = self.date_posted(record);
        let employment_type = map_employment_type(&record.employment_type);
        let valid_through = self.valid_through(record, date_posted, employment_type);
        let (locality, region) = self.parse_location(&record.location);
        let url = canonical_url(&self.config.site.base_url, &record.id, &record.title);

        let title = non_empty(&record.title).unwrap_or("İş İlanı");
        let company = non_empty(&record.company).unwrap_or(&self.config.site.organization);

        let mut doc = json!({
            "@context": "https://schema.org/",
            "@type": "JobPosting",
            "title": title,
            "description": self.clean_description(&record.description),
            "datePosted": date_posted.format("%Y-%m-%d").to_string(),
            "validThrough": valid_through.format("%Y-%m-%dT00:00").to_string(),
            "employmentType": employment_type,
            "hiringOrganization": {
                "@type": "Organization",
                "name": company,
                "sameAs": self.config.site.base_url,
                "logo": record
                    .company_logo
                    .as_deref()
                    .and_then(non_empty)
                    .unwrap_or(&self.config.site.logo_url),
            },
            "jobLocation": {
                "@type": "Place",
                "address": {
                    "@type": "PostalAddress",
                    "addressLocality": locality,
                    "addressRegion": region,
                    "addressCountry": self.config.location.country,
                }
            },
            "identifier": {
                "@type": "PropertyValue",
                "name": company,
                "value": record.id,
            },
            "url": url,
            "directApply": true,
            "applicationContact": {
                "@type": "ContactPoint",
                "contactType": "HR Department",
                "email": record
                    .contact_email
                    .as_deref()
                    .and_then(non_empty)
                    .unwrap_or(&self.config.site.contact_email),
                "telephone": record
                    .contact_phone
                    .as_deref()
                    .and_then(non_empty)
                    .unwrap_or(&self.config.site.contact_phone),
            },
        });

        // Optional fields below are guarded independently: absence of one
        // never blocks inclusion of the others.
        if let Some(salary) = parse_salary(&record.salary) {
            doc["baseSalary"] = base_salary(salary);
        }

        if let Some(level) = record.experience_level.as_deref().and_then(non_empty) {
            doc["experienceRequirements"] = json!({
                "@type": "OccupationalExperienceRequirements",
                "monthsOfExperience": experience_months(level),
            });
        }

        if let Some(level) = record.education_level.as_deref().and_then(non_empty) {
            doc["educationRequirements"] = json!({
                "@type": "EducationalOccupationalCredential",
                "credentialCategory": education_credential(level),
            });
        }

        if is_remote(record) {
            doc["jobLocationType"] = json!("TELECOMMUTE");
        }

        if let Some(industry) = record
            .industry
            .as_deref()
            .and_then(non_empty)
            .or_else(|| non_empty(&record.category))
        {
            doc["industry"] = json!(industry);
        }

        if let Some(sub) = non_empty(&record.sub_category) {
            doc["occupationalCategory"] = json!(sub);
        }

        if let Some(skills) = record.skills.as_deref().filter(|s| !s.is_empty()) {
            doc["skills"] = json!(skills.join(", "));
        }

        if let Some(benefits) = record.benefits.as_deref().filter(|b| !b.is_empty()) {
            doc["jobBenefits"] = json!(benefits.join(", "));
        }

        doc
    }

    /// Normalize `createdAt` to a calendar date; missing or non-positive
    /// timestamps substitute the current date.
    fn date_posted(&self, record: &ListingRecord) -> NaiveDate {
        record
            .created_at
            .filter(|ms| *ms > 0)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or(self.now)
            .date_naive()
    }

    fn valid_through(
        &self,
        record: &ListingRecord,
        date_posted: NaiveDate,
        employment_type: &str,
    ) -> NaiveDate {
        let days = if record.urgent == Some(true) {
            VALID_DAYS_URGENT
        } else if employment_type == "INTERN" {
            VALID_DAYS_INTERN
        } else {
            VALID_DAYS_DEFAULT
        };
        date_posted + Duration::days(days)
    }

    /// Split the free-text location into (locality, region).
    ///
    /// First comma/dash segment becomes the locality, the second the region;
    /// a single segment serves as both. An empty field substitutes the
    /// configured defaults.
    fn parse_location(&self, location: &str) -> (String, String) {
        let parts: Vec<&str> = location
            .split([',', '-'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [] => (
                self.config.location.locality.clone(),
                self.config.location.region.clone(),
            ),
            [single] => (single.to_string(), single.to_string()),
            [first, second, ..] => (first.to_string(), second.to_string()),
        }
    }

    /// Strip markup, collapse whitespace, pad short bodies, cap length.
    fn clean_description(&self, description: &str) -> String {
        static TAG_RE: OnceLock<Regex> = OnceLock::new();
        let tags = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"));
        let stripped = tags.replace_all(description, " ");
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        let base = if collapsed.is_empty() {
            DESCRIPTION_FALLBACK.to_string()
        } else {
            collapsed
        };

        let padded = if base.chars().count() < MIN_DESCRIPTION_LEN {
            format!("{base}{DESCRIPTION_PADDING}")
        } else {
            base
        };

        padded.chars().take(MAX_DESCRIPTION_LEN).collect()
    }
}

/// Map the site's free-text employment type to the fixed schema vocabulary.
///
/// Unrecognized input maps to `FULL_TIME`; the field is never blank and
/// never an error.
pub fn map_employment_type(site_type: &str) -> &'static str {
    match site_type.trim() {
        "Tam Zamanlı" | "Tam Zamanli" | "Full Time" | "Full-time" => "FULL_TIME",
        "Yarı Zamanlı" | "Yari Zamanli" | "Part Time" | "Part-time" => "PART_TIME",
        "Uzaktan" | "Remote" | "Freelance" | "Sözleşmeli" | "Sozlesmeli" => "CONTRACTOR",
        "Geçici" | "Gecici" | "Dönemsel" | "Temporary" => "TEMPORARY",
        "Staj" | "Stajyer" | "İntern" | "Intern" => "INTERN",
        "Gönüllü" | "Gonullu" | "Volunteer" => "VOLUNTEER",
        "Diğer" | "Diger" | "Other" => "OTHER",
        _ => "FULL_TIME",
    }
}

/// Months of experience implied by the site's experience-level labels.
fn experience_months(level: &str) -> u32 {
    match level.trim() {
        "Yeni Mezun" | "Deneyimsiz" => 0,
        "0-1 Yıl" | "0-1 Yil" => 6,
        "1-2 Yıl" | "1-2 Yil" => 18,
        "2-5 Yıl" | "2-5 Yil" => 36,
        "5+ Yıl" | "5+ Yil" => 60,
        "5-10 Yıl" | "5-10 Yil" => 84,
        "Uzman" => 96,
        "Yönetici" | "Yonetici" => 120,
        _ => 0,
    }
}

/// Credential category for the site's education-level labels.
fn education_credential(level: &str) -> &'static str {
    match level.trim() {
        "İlkokul" | "Ilkokul" | "Ortaokul" | "Lise" => "high-school",
        "Ön Lisans" | "On Lisans" | "Önlisans" | "Onlisans" => "associate-degree",
        "Lisans" => "bachelor-degree",
        "Yüksek Lisans" | "Yuksek Lisans" => "master-degree",
        "Doktora" => "doctorate-degree",
        _ => "unspecified",
    }
}

fn is_remote(record: &ListingRecord) -> bool {
    record.remote == Some(true)
        || matches!(record.employment_type.trim(), "Uzaktan" | "Remote")
}

/// Extract a salary amount from the free-text salary field.
///
/// Currency symbols and thousands separators are removed first; the
/// remaining numeric groups become a range (two groups), a fixed value (one
/// group) or nothing. "Belirtilmemiş", "0" and unparseable input all yield
/// `None` so the caller omits `baseSalary` entirely.
pub fn parse_salary(salary: &str) -> Option<SalaryAmount> {
    let trimmed = salary.trim();
    if trimmed.is_empty()
        || trimmed == "0"
        || trimmed.eq_ignore_ascii_case("belirtilmemis")
        || trimmed.to_lowercase() == "belirtilmemiş"
    {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '₺' | '$' | '€' | '.' | ',' | ' ' | '\u{a0}'))
        .collect();

    static DIGITS_RE: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS_RE.get_or_init(|| Regex::new(r"\d+").expect("static pattern"));
    let groups: Vec<u64> = digits
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .take(2)
        .collect();

    match groups.as_slice() {
        [] => None,
        [value] => Some(SalaryAmount::Fixed(*value)),
        [a, b, ..] => Some(SalaryAmount::Range {
            min: (*a).min(*b),
            max: (*a).max(*b),
        }),
    }
}

fn base_salary(amount: SalaryAmount) -> Value {
    let value = match amount {
        SalaryAmount::Fixed(v) => json!({
            "@type": "QuantitativeValue",
            "value": v,
            "unitText": "MONTH",
        }),
        SalaryAmount::Range { min, max } => json!({
            "@type": "QuantitativeValue",
            "minValue": min,
            "maxValue": max,
            "unitText": "MONTH",
        }),
    };

    json!({
        "@type": "MonetaryAmount",
        "currency": "TRY",
        "value": value,
    })
}

/// Build a BreadcrumbList document for a trail of (name, path) pairs.
pub fn breadcrumb_list(base_url: &str, items: &[(&str, &str)]) -> Value {
    let base = base_url.trim_end_matches('/');
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (name, path))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": format!("{base}{path}"),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn config() -> SiteConfig {
        SiteConfig::default()
    }

    fn sample_record() -> ListingRecord {
        ListingRecord {
            id: "-Nxa12".into(),
            title: "Şoför Aranıyor".into(),
            company: "Acme Lojistik".into(),
            location: "İzmir, Konak".into(),
            employment_type: "Tam Zamanlı".into(),
            salary: "15.000 TL - 25.000 TL".into(),
            description: "Deneyimli şoför aranıyor.".into(),
            created_at: Some(1_749_000_000_000),
            ..Default::default()
        }
    }

    #[test]
    fn required_fields_always_present_on_empty_record() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());
        let doc = builder.job_posting(&ListingRecord::default());

        assert_eq!(doc["datePosted"], "2025-06-15");
        assert!(doc["validThrough"].is_string());
        assert_eq!(doc["employmentType"], "FULL_TIME");
        assert_eq!(doc["hiringOrganization"]["name"], "İşveren");

        let address = &doc["jobLocation"]["address"];
        assert_eq!(address["addressLocality"], "İzmir");
        assert_eq!(address["addressRegion"], "İzmir");
        assert_eq!(address["addressCountry"], "TR");

        assert!(doc.get("baseSalary").is_none());
    }

    #[test]
    fn valid_through_strictly_postdates_date_posted() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());

        let mut records = vec![ListingRecord::default(), sample_record()];
        records.push(ListingRecord {
            urgent: Some(true),
            ..sample_record()
        });
        records.push(ListingRecord {
            employment_type: "Staj".into(),
            ..sample_record()
        });

        for record in records {
            let doc = builder.job_posting(&record);
            let posted =
                NaiveDate::parse_from_str(doc["datePosted"].as_str().unwrap(), "%Y-%m-%d").unwrap();
            let through = NaiveDate::parse_from_str(
                doc["validThrough"].as_str().unwrap(),
                "%Y-%m-%dT00:00",
            )
            .unwrap();
            assert!(through > posted, "validThrough must postdate datePosted");
        }
    }

    #[test]
    fn urgent_and_intern_windows() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());

        let urgent = builder.job_posting(&ListingRecord {
            created_at: None,
            urgent: Some(true),
            ..Default::default()
        });
        assert_eq!(urgent["validThrough"], "2025-06-29T00:00");

        let intern = builder.job_posting(&ListingRecord {
            created_at: None,
            employment_type: "Staj".into(),
            ..Default::default()
        });
        assert_eq!(intern["validThrough"], "2025-10-13T00:00");

        let normal = builder.job_posting(&ListingRecord {
            created_at: None,
            ..Default::default()
        });
        assert_eq!(normal["validThrough"], "2025-09-13T00:00");
    }

    #[test]
    fn negative_created_at_falls_back_to_today() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());
        let doc = builder.job_posting(&ListingRecord {
            created_at: Some(-5),
            ..Default::default()
        });
        assert_eq!(doc["datePosted"], "2025-06-15");
    }

    #[test]
    fn employment_type_vocabulary() {
        assert_eq!(map_employment_type("Tam Zamanlı"), "FULL_TIME");
        assert_eq!(map_employment_type("Yarı Zamanlı"), "PART_TIME");
        assert_eq!(map_employment_type("Freelance"), "CONTRACTOR");
        assert_eq!(map_employment_type("Geçici"), "TEMPORARY");
        assert_eq!(map_employment_type("Stajyer"), "INTERN");
        assert_eq!(map_employment_type("Gönüllü"), "VOLUNTEER");
        assert_eq!(map_employment_type("Diğer"), "OTHER");
        assert_eq!(map_employment_type("garip bir şey"), "FULL_TIME");
        assert_eq!(map_employment_type(""), "FULL_TIME");
    }

    #[test]
    fn salary_range_extraction() {
        assert_eq!(
            parse_salary("15.000 TL - 25.000 TL"),
            Some(SalaryAmount::Range {
                min: 15_000,
                max: 25_000
            })
        );
    }

    #[test]
    fn salary_fixed_value() {
        assert_eq!(parse_salary("22000"), Some(SalaryAmount::Fixed(22_000)));
        assert_eq!(parse_salary("30.000₺"), Some(SalaryAmount::Fixed(30_000)));
    }

    #[test]
    fn salary_unspecified_suppressed() {
        assert_eq!(parse_salary("Belirtilmemiş"), None);
        assert_eq!(parse_salary("0"), None);
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("maaş dolgun"), None);
    }

    #[test]
    fn salary_range_field_shape() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());
        let doc = builder.job_posting(&sample_record());
        let value = &doc["baseSalary"]["value"];
        assert_eq!(value["minValue"], 15_000);
        assert_eq!(value["maxValue"], 25_000);
        assert_eq!(doc["baseSalary"]["currency"], "TRY");
    }

    #[test]
    fn location_split_on_comma_and_dash() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());

        let doc = builder.job_posting(&ListingRecord {
            location: "İstanbul - Kadıköy".into(),
            ..Default::default()
        });
        let address = &doc["jobLocation"]["address"];
        assert_eq!(address["addressLocality"], "İstanbul");
        assert_eq!(address["addressRegion"], "Kadıköy");

        let doc = builder.job_posting(&ListingRecord {
            location: "Ankara".into(),
            ..Default::default()
        });
        let address = &doc["jobLocation"]["address"];
        assert_eq!(address["addressLocality"], "Ankara");
        assert_eq!(address["addressRegion"], "Ankara");
    }

    #[test]
    fn canonical_url_comes_from_url_builder() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());
        let doc = builder.job_posting(&sample_record());
        assert_eq!(
            doc["url"],
            "https://isilanlarim.org/listing/-Nxa12/sofor-araniyor"
        );
        assert_eq!(doc["identifier"]["value"], "-Nxa12");
    }

    #[test]
    fn optional_fields_independent() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());
        let doc = builder.job_posting(&ListingRecord {
            skills: Some(vec!["Excel".into(), "SAP".into()]),
            remote: Some(true),
            ..ListingRecord::default()
        });

        // skills and remote flag present, others absent
        assert_eq!(doc["skills"], "Excel, SAP");
        assert_eq!(doc["jobLocationType"], "TELECOMMUTE");
        assert!(doc.get("educationRequirements").is_none());
        assert!(doc.get("experienceRequirements").is_none());
        assert!(doc.get("jobBenefits").is_none());
    }

    #[test]
    fn breadcrumb_positions_and_absolute_items() {
        let trail = breadcrumb_list(
            "https://isilanlarim.org/",
            &[("Ana Sayfa", "/"), ("Garson", "/listing/a1/garson")],
        );
        let elements = trail["itemListElement"].as_array().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0]["position"], 1);
        assert_eq!(elements[1]["item"], "https://isilanlarim.org/listing/a1/garson");
    }

    #[test]
    fn description_padded_and_capped() {
        let cfg = config();
        let builder = SchemaBuilder::at(&cfg, fixed_now());

        let doc = builder.job_posting(&ListingRecord {
            description: "<p>Kısa açıklama</p>".into(),
            ..Default::default()
        });
        let description = doc["description"].as_str().unwrap();
        assert!(description.starts_with("Kısa açıklama"));
        assert!(!description.contains('<'));
        assert!(description.len() > "Kısa açıklama".len());

        let doc = builder.job_posting(&ListingRecord {
            description: "uzun ".repeat(1000),
            ..Default::default()
        });
        assert!(doc["description"].as_str().unwrap().chars().count() <= 2000);
    }
}
