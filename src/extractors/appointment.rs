// src/extractors/appointment.rs
use chrono::NaiveDate;
use scraper::ElementRef;

use crate::extractors::field::{self, FieldMiss};
use crate::extractors::patterns::{self, FieldSlot, MAX_HOP};
use crate::registry::models::{AppointmentRecord, Diagnostic, Field};

/// A linked heading and the element siblings that follow it.
#[derive(Debug, Clone)]
pub struct LinkedBlock<'a> {
    pub link: ElementRef<'a>,
    scopes: [Option<ElementRef<'a>>; MAX_HOP],
}

impl<'a> LinkedBlock<'a> {
    pub fn new(heading: ElementRef<'a>, link: ElementRef<'a>) -> Self {
        let mut scopes = [None; MAX_HOP];
        let mut current = Some(heading);
        for scope in scopes.iter_mut() {
            current = current.and_then(field::next_element_sibling);
            *scope = current;
        }
        Self { link, scopes }
    }

    /// The `hop`-th element sibling after the heading (1-based).
    pub fn scope(&self, hop: usize) -> Option<ElementRef<'a>> {
        hop.checked_sub(1)
            .and_then(|i| self.scopes.get(i).copied())
            .flatten()
    }
}

/// Positional index -> linked block, built once per detail page.
///
/// Only blocks that carry a company link are numbered, so the index here
/// is the suffix the registry uses on that block's field ids.
#[derive(Debug, Clone, Default)]
pub struct BlockTable<'a> {
    blocks: Vec<LinkedBlock<'a>>,
}

impl<'a> BlockTable<'a> {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Adds a block and returns the positional index it was given.
    pub fn push(&mut self, heading: ElementRef<'a>, link: ElementRef<'a>) -> usize {
        self.blocks.push(LinkedBlock::new(heading, link));
        self.blocks.len()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&LinkedBlock<'a>> {
        index.checked_sub(1).and_then(|i| self.blocks.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &LinkedBlock<'a>)> {
        self.blocks.iter().enumerate().map(|(i, block)| (i + 1, block))
    }
}

/// Builds one `AppointmentRecord` from a linked block and its positional index.
pub struct AppointmentExtractor<'c> {
    root_url: &'c str,
}

impl<'c> AppointmentExtractor<'c> {
    pub fn new(root_url: &'c str) -> Self {
        Self { root_url }
    }

    pub fn extract(&self, block: &LinkedBlock<'_>, index: usize, diagnostics: &mut Vec<Diagnostic>) -> AppointmentRecord {
        let href = block.link.value().attr("href").unwrap_or_default();
        let company_id = match href.strip_prefix(patterns::COMPANY_PATH_PREFIX) {
            Some(id) => id.to_string(),
            None => {
                field::note_miss(diagnostics, Field::CompanyId, Some(index), FieldMiss::NodeAbsent);
                href.trim_start_matches('/').to_string()
            }
        };
        let company_name = field::text_of(block.link)
            .replace(&format!(" ({})", company_id), "")
            .trim()
            .to_string();

        let mut record = AppointmentRecord {
            company_url: format!("{}{}", self.root_url, href),
            company_id,
            company_name,
            ..Default::default()
        };

        record.status = lookup(block, patterns::STATUS, index, diagnostics).unwrap_or_default();
        record.address = lookup(block, patterns::ADDRESS, index, diagnostics).unwrap_or_default();
        record.role = lookup(block, patterns::ROLE, index, diagnostics);
        record.role_appointed_on = lookup_date(block, patterns::APPOINTED_ON, index, diagnostics);
        record.resigned_on = lookup_date(block, patterns::RESIGNED_ON, index, diagnostics);
        record.nationality = lookup(block, patterns::NATIONALITY, index, diagnostics);
        record.country_of_residence = lookup(block, patterns::COUNTRY_OF_RESIDENCE, index, diagnostics);
        record.occupation = lookup(block, patterns::OCCUPATION, index, diagnostics);

        tracing::trace!(index, company_id = %record.company_id, "Extracted appointment");
        record
    }
}

fn lookup(block: &LinkedBlock<'_>, slot: FieldSlot, index: usize, diagnostics: &mut Vec<Diagnostic>) -> Option<String> {
    let selector = match slot.selector(index) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!(field = ?slot.field, index, "{}", e);
            field::note_miss(diagnostics, slot.field, Some(index), FieldMiss::NodeAbsent);
            return None;
        }
    };
    match field::find_text(block.scope(slot.hop), &selector) {
        Ok(text) => Some(text),
        Err(miss) => {
            field::note_miss(diagnostics, slot.field, Some(index), miss);
            None
        }
    }
}

fn lookup_date(block: &LinkedBlock<'_>, slot: FieldSlot, index: usize, diagnostics: &mut Vec<Diagnostic>) -> Option<NaiveDate> {
    let text = lookup(block, slot, index, diagnostics)?;
    match NaiveDate::parse_from_str(&text, patterns::APPOINTMENT_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            field::note_unparseable(diagnostics, slot.field, Some(index), &text);
            None
        }
    }
}
