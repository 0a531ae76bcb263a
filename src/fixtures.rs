// src/fixtures.rs
//! Test doubles and page builders. Compiled only for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::registry::client::DocumentSource;
use crate::utils::error::FetchError;

pub const ROOT: &str = "http://registry.test";

#[derive(Debug, Clone)]
pub enum Page {
    Body(String),
    Delayed(Duration, String),
    Status(u16),
    Hang,
}

/// In-memory `DocumentSource` keyed by exact URL.
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<String, Page>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, page: Page) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn body(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.page(url, Page::Body(body.into()))
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.pages.get(url).cloned() {
            Some(Page::Body(body)) => Ok(body),
            Some(Page::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(Page::Status(code)) => Err(FetchError::Http(
                reqwest::StatusCode::from_u16(code).unwrap(),
            )),
            Some(Page::Hang) => std::future::pending().await,
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}

pub fn detail_url(officer_id: &str) -> String {
    format!("{}/officers/{}/appointments", ROOT, officer_id)
}

/// A search results page listing the given relative hrefs as officer results.
pub fn search_page(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="type-officer"><h3><a class="govuk-link" href="{}">SOMEONE</a></h3><p class="meta">Born 1970</p></li>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><body><ul id="results" class="results-list">
        <li class="type-company"><h3><a href="/company/99999999">NOT AN OFFICER LTD</a></h3></li>
        {}
        </ul></body></html>"#,
        items
    )
}

/// One appointment as the registry lays it out.
#[derive(Debug, Clone, Default)]
pub struct Appt {
    pub company_id: &'static str,
    pub company_name: &'static str,
    pub status: &'static str,
    pub address: &'static str,
    pub role: &'static str,
    pub appointed: &'static str,
    pub resigned: Option<&'static str>,
    pub nationality: Option<&'static str>,
    pub country: Option<&'static str>,
    pub occupation: Option<&'static str>,
}

impl Appt {
    pub fn new(company_id: &'static str, company_name: &'static str) -> Self {
        Self {
            company_id,
            company_name,
            status: "Active",
            address: "1 High Street, London, EC1A 1AA",
            role: "Director",
            appointed: "2 January 2006",
            ..Default::default()
        }
    }

    pub fn render(&self, index: usize) -> String {
        let resigned = self
            .resigned
            .map(|r| format!(r#"<dt>Resigned on</dt><dd id="resigned-value{}">{}</dd>"#, index, r))
            .unwrap_or_default();
        let mut extra = String::new();
        if let Some(n) = self.nationality {
            extra.push_str(&format!(r#"<dt>Nationality</dt><dd id="nationality-value{}">{}</dd>"#, index, n));
        }
        if let Some(c) = self.country {
            extra.push_str(&format!(
                r#"<dt>Country of residence</dt><dd id="country-of-residence-value{}">{}</dd>"#,
                index, c
            ));
        }
        if let Some(o) = self.occupation {
            extra.push_str(&format!(r#"<dt>Occupation</dt><dd id="occupation-value-{}">{}</dd>"#, index, o));
        }
        format!(
            r#"
      <div class="appointment-{index}">
        <h2 class="heading-medium">
          <a class="govuk-link" href="/company/{id}">{name} ({id})</a>
        </h2>
        <dl>
          <dt>Company status</dt>
          <dd id="company-status-value-{index}" class="data">
            {status}
          </dd>
          <dt>Correspondence address</dt>
          <dd id="correspondence-address-value-{index}" class="data">
            {address}
          </dd>
        </dl>
        <div class="grid-row">
          <dl>
            <dt>Role</dt>
            <dd id="appointment-type-value{index}" class="data">
              {role}
            </dd>
            <dt>Appointed on</dt>
            <dd id="appointed-value{index}" class="data">
              {appointed}
            </dd>
            {resigned}
          </dl>
        </div>
        <div class="grid-row">
          <dl>{extra}</dl>
        </div>
      </div>"#,
            index = index,
            id = self.company_id,
            name = self.company_name,
            status = self.status,
            address = self.address,
            role = self.role,
            appointed = self.appointed,
            resigned = resigned,
            extra = extra,
        )
    }
}

/// An officer detail page with the given appointments numbered from 1.
pub fn officer_page(name: &str, date_of_birth: Option<&str>, appointments: &[Appt]) -> String {
    let dob = date_of_birth
        .map(|d| format!(r#"<dl><dt>Date of birth</dt><dd id="officer-date-of-birth-value">{}</dd></dl>"#, d))
        .unwrap_or_default();
    let blocks: String = appointments
        .iter()
        .enumerate()
        .map(|(i, a)| a.render(i + 1))
        .collect();
    format!(
        r#"<html><body>
    <h1 id="officer-name" class="heading-xlarge">
      {name}
    </h1>
    {dob}
    <div class="appointments-list">{blocks}
    </div>
    </body></html>"#,
        name = name,
        dob = dob,
        blocks = blocks,
    )
}
