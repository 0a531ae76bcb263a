// src/extractors/patterns.rs
//! Everything that encodes how the registry marks up its pages.

use regex::Regex;
use scraper::Selector;

use crate::extractors::field;
use crate::registry::models::Field;
use crate::utils::error::ExtractError;

// --- Node selectors ---
const OFFICER_RESULT: &str = "li.type-officer";
const LINK: &str = "a";
const OFFICER_NAME: &str = "h1#officer-name";
const DATE_OF_BIRTH: &str = "dd#officer-date-of-birth-value";
const APPOINTMENT_HEADING: &str = "h2";

// --- Text formats ---
pub const COMPANY_PATH_PREFIX: &str = "/company/";
pub const APPOINTMENT_DATE_FORMAT: &str = "%d %B %Y"; // "2 January 2006"
pub const SEARCH_PATH: &str = "/search/officers";

const OFFICER_ID_PATTERN: &str = r"/officers/(?P<officer_id>\w+)/appointments";

/// Where one appointment field lives relative to its heading block.
///
/// The registry does not give fields unique ids. Instead the n-th linked
/// heading on the page owns the definition nodes whose id ends in `n`, and
/// those nodes sit inside the `hop`-th element sibling after the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub field: Field,
    pub hop: usize,
    id_prefix: &'static str,
}

impl FieldSlot {
    const fn new(field: Field, hop: usize, id_prefix: &'static str) -> Self {
        Self { field, hop, id_prefix }
    }

    /// Id of the definition node for the appointment at `index` (1-based).
    pub fn node_id(&self, index: usize) -> String {
        format!("{}{}", self.id_prefix, index)
    }

    /// Selector for the definition node of the appointment at `index`.
    pub fn selector(&self, index: usize) -> Result<Selector, ExtractError> {
        field::selector(&format!(r#"dd[id="{}"]"#, self.node_id(index)))
    }
}

pub const STATUS: FieldSlot = FieldSlot::new(Field::Status, 1, "company-status-value-");
pub const ADDRESS: FieldSlot = FieldSlot::new(Field::Address, 1, "correspondence-address-value-");
pub const ROLE: FieldSlot = FieldSlot::new(Field::Role, 2, "appointment-type-value");
pub const APPOINTED_ON: FieldSlot = FieldSlot::new(Field::AppointedOn, 2, "appointed-value");
pub const RESIGNED_ON: FieldSlot = FieldSlot::new(Field::ResignedOn, 2, "resigned-value");
pub const NATIONALITY: FieldSlot = FieldSlot::new(Field::Nationality, 3, "nationality-value");
pub const COUNTRY_OF_RESIDENCE: FieldSlot = FieldSlot::new(Field::CountryOfResidence, 3, "country-of-residence-value");
pub const OCCUPATION: FieldSlot = FieldSlot::new(Field::Occupation, 3, "occupation-value-");

/// Furthest sibling any slot reaches.
pub const MAX_HOP: usize = 3;

/// Compiled patterns, built once per engine and handed to the extractors.
#[derive(Debug, Clone)]
pub struct ExtractionPatterns {
    officer_id: Regex,
    pub officer_result: Selector,
    pub link: Selector,
    pub officer_name: Selector,
    pub date_of_birth: Selector,
    pub appointment_heading: Selector,
}

impl ExtractionPatterns {
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_officer_id(OFFICER_ID_PATTERN)
    }

    /// Uses a custom officer id pattern, which must capture exactly one group.
    pub fn with_officer_id(pattern: &str) -> Result<Self, ExtractError> {
        let officer_id = Regex::new(pattern)?;
        let groups = officer_id.captures_len() - 1;
        if groups != 1 {
            return Err(ExtractError::PatternGroups {
                name: "officer_id",
                expected: 1,
                found: groups,
            });
        }
        Ok(Self {
            officer_id,
            officer_result: field::selector(OFFICER_RESULT)?,
            link: field::selector(LINK)?,
            officer_name: field::selector(OFFICER_NAME)?,
            date_of_birth: field::selector(DATE_OF_BIRTH)?,
            appointment_heading: field::selector(APPOINTMENT_HEADING)?,
        })
    }

    /// The officer id embedded in a detail URL.
    pub fn officer_id<'h>(&self, url: &'h str) -> Option<&'h str> {
        self.officer_id
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
