// src/registry/models.rs
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// One officer found by a search, with every appointment listed on their detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerRecord {
    pub id: String,
    pub name: String,
    pub detail_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<MonthYear>,
    pub appointments: Vec<AppointmentRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl OfficerRecord {
    /// A record with only the identity known before the detail page is fetched.
    pub fn shell(id: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            detail_url: detail_url.into(),
            date_of_birth: None,
            appointments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics recorded against a given appointment index.
    #[cfg(test)]
    pub fn diagnostics_for(&self, index: usize) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.appointment == Some(index))
    }
}

/// A single officer-to-company appointment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub company_id: String,
    pub company_name: String,
    pub company_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_appointed_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resigned_on: Option<NaiveDate>,
    pub status: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

/// A month and year; the registry never publishes the day of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub const FORMAT: &'static str = "%B %Y";

    /// Parses text such as "January 1970".
    pub fn parse(text: &str) -> Option<Self> {
        NaiveDate::parse_from_str(&format!("1 {}", text.trim()), "%d %B %Y")
            .ok()
            .map(Self)
    }

}

#[cfg(test)]
impl MonthYear {
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.0)
    }

    pub fn month(&self) -> u32 {
        chrono::Datelike::month(&self.0)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which record field a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    DateOfBirth,
    CompanyLink,
    CompanyId,
    Role,
    AppointedOn,
    ResignedOn,
    Status,
    Address,
    Nationality,
    CountryOfResidence,
    Occupation,
}

impl Field {
    /// Fields most pages carry; a miss is worth a warning.
    pub fn is_expected(self) -> bool {
        !matches!(
            self,
            Field::ResignedOn | Field::Nationality | Field::CountryOfResidence | Field::Occupation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DiagnosticKind {
    /// The node holding the field was not in the page.
    Missing,
    /// The sibling block that should contain the node was not in the page.
    ScopeMissing,
    /// The node was there but its text could not be parsed.
    Unparseable { text: String },
    /// A heading block had no link and produced no appointment.
    NoLink,
}

/// A field-level miss recorded while extracting an officer page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub field: Field,
    /// 1-based positional index of the appointment, when the miss belongs to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<usize>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}
