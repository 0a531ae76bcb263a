// src/extractors/officer.rs
use scraper::Html;

use crate::extractors::appointment::{AppointmentExtractor, BlockTable};
use crate::extractors::field;
use crate::extractors::patterns::ExtractionPatterns;
use crate::registry::models::{Diagnostic, DiagnosticKind, Field, MonthYear, OfficerRecord};

/// Fills an officer record from its detail page. Never fails: every miss is
/// logged and recorded in the record's diagnostics instead.
pub struct OfficerExtractor<'c> {
    patterns: &'c ExtractionPatterns,
    appointments: AppointmentExtractor<'c>,
}

impl<'c> OfficerExtractor<'c> {
    pub fn new(patterns: &'c ExtractionPatterns, root_url: &'c str) -> Self {
        Self {
            patterns,
            appointments: AppointmentExtractor::new(root_url),
        }
    }

    /// Parses `body` and extracts into `record`.
    pub fn extract_page(&self, body: &str, mut record: OfficerRecord) -> OfficerRecord {
        let document = Html::parse_document(body);
        self.extract(&document, &mut record);
        record
    }

    pub fn extract(&self, document: &Html, record: &mut OfficerRecord) {
        let root = document.root_element();

        match field::find_text(Some(root), &self.patterns.officer_name) {
            Ok(name) => record.name = name,
            Err(miss) => field::note_miss(&mut record.diagnostics, Field::Name, None, miss),
        }

        match field::find_text(Some(root), &self.patterns.date_of_birth) {
            Ok(text) => match MonthYear::parse(&text) {
                Some(dob) => record.date_of_birth = Some(dob),
                None => field::note_unparseable(&mut record.diagnostics, Field::DateOfBirth, None, &text),
            },
            Err(miss) => field::note_miss(&mut record.diagnostics, Field::DateOfBirth, None, miss),
        }

        let headings = field::find_all(root, &self.patterns.appointment_heading);
        tracing::debug!("{} company heading blocks found", headings.len());

        // The index only advances for headings that carry a link.
        let mut table = BlockTable::new();
        for heading in headings {
            match field::find(heading, &self.patterns.link) {
                Some(link) => {
                    table.push(heading, link);
                }
                None => {
                    tracing::warn!(html = %heading.html(), "Skipping company heading block without a link");
                    record.diagnostics.push(Diagnostic {
                        field: Field::CompanyLink,
                        appointment: None,
                        kind: DiagnosticKind::NoLink,
                    });
                }
            }
        }

        for (index, block) in table.iter() {
            let appointment = self.appointments.extract(block, index, &mut record.diagnostics);
            record.appointments.push(appointment);
        }

        tracing::debug!(
            appointments = record.appointments.len(),
            diagnostics = record.diagnostics.len(),
            "Extracted officer '{}'",
            record.name
        );
    }
}
