//! Per-mailing statistics.
//!
//! All stats end points hang off
//! `/promotions/{promotion_id}/mailings/{mailing_id}` and differ only in the
//! report suffix, so one variant covers them with a `Report` selector.

use super::pagination::{Paginated, Pagination};
use super::{encode_segment, require_id, Options, Params, RequestType};
use crate::error::{MadMimiError, Result};

/// Promotion and mailing identifiers for mailing-scoped end points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingIds {
    promotion_id: Option<String>,
    mailing_id: Option<String>,
}

impl MailingIds {
    pub fn promotion_id(&self) -> Option<&str> {
        self.promotion_id.as_deref()
    }

    pub fn mailing_id(&self) -> Option<&str> {
        self.mailing_id.as_deref()
    }

    /// `/promotions/{promotion_id}/mailings/{mailing_id}` followed by `suffix`.
    pub fn path(&self, suffix: &str, variant: &str) -> Result<String> {
        let promotion = require_id(&self.promotion_id, "promotion id", variant)?;
        let mailing = require_id(&self.mailing_id, "mailing id", variant)?;
        Ok(format!(
            "/promotions/{}/mailings/{}{suffix}",
            encode_segment(promotion),
            encode_segment(mailing)
        ))
    }
}

/// Setters for variants keyed by a promotion and a mailing.
pub trait Mailing: Sized {
    fn mailing_ids_mut(&mut self) -> &mut MailingIds;

    fn promotion_id(mut self, id: impl Into<String>) -> Self {
        self.mailing_ids_mut().promotion_id = Some(id.into());
        self
    }

    fn mailing_id(mut self, id: impl Into<String>) -> Self {
        self.mailing_ids_mut().mailing_id = Some(id.into());
        self
    }
}

/// Which report of a mailing to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Report {
    /// Totals for the mailing. Not paginated.
    #[default]
    Summary,
    /// Clicked links.
    Links,
    Reads,
    Unsubscribes,
    Bounces,
    Forwards,
    Sent,
}

impl Report {
    pub fn suffix(&self) -> &'static str {
        match self {
            Report::Summary => ".xml",
            Report::Links => "/clicked.xml",
            Report::Reads => "/read.xml",
            Report::Unsubscribes => "/unsubscribed.xml",
            Report::Bounces => "/bounced.xml",
            Report::Forwards => "/forwarded.xml",
            Report::Sent => "/sent.xml",
        }
    }

    pub fn is_paginated(&self) -> bool {
        !matches!(self, Report::Summary)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingStats {
    report: Report,
    ids: MailingIds,
    pagination: Pagination,
}

impl MailingStats {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            ..Self::default()
        }
    }

    pub fn summary() -> Self {
        Self::new(Report::Summary)
    }

    pub fn links() -> Self {
        Self::new(Report::Links)
    }

    pub fn report(&self) -> Report {
        self.report
    }

    pub fn ids(&self) -> &MailingIds {
        &self.ids
    }
}

impl Mailing for MailingStats {
    fn mailing_ids_mut(&mut self) -> &mut MailingIds {
        &mut self.ids
    }
}

impl Paginated for MailingStats {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}

impl Options for MailingStats {
    fn name(&self) -> &'static str {
        "MailingStats"
    }

    fn end_point(&self) -> Result<String> {
        self.ids.path(self.report.suffix(), self.name())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        let mut params = Params::new();
        if self.report.is_paginated() {
            self.pagination.write_into(&mut params);
        } else if self.pagination != Pagination::default() {
            return Err(MadMimiError::Configuration(
                "the summary report is not paginated".to_string(),
            ));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_end_point_substitutes_ids() {
        let stats = MailingStats::links().promotion_id("5").mailing_id("9");
        assert_eq!(
            stats.end_point().unwrap(),
            "/promotions/5/mailings/9/clicked.xml"
        );
    }

    #[test]
    fn summary_end_point() {
        let stats = MailingStats::summary().promotion_id("5").mailing_id("9");
        assert_eq!(stats.end_point().unwrap(), "/promotions/5/mailings/9.xml");
    }

    #[test]
    fn missing_mailing_id_is_configuration_error() {
        let stats = MailingStats::new(Report::Reads).promotion_id("5");
        let err = stats.end_point().unwrap_err();
        assert!(matches!(err, MadMimiError::Configuration(ref msg) if msg.contains("mailing id")));
    }

    #[test]
    fn pagination_is_populated_for_reports() {
        let stats = MailingStats::new(Report::Bounces)
            .promotion_id("1")
            .mailing_id("2")
            .page(4)
            .per_page(25);
        let params = stats.populated().unwrap();
        assert_eq!(params["page"], "4");
        assert_eq!(params["per_page"], "25");
    }

    #[test]
    fn unset_pagination_is_omitted() {
        let stats = MailingStats::links().promotion_id("1").mailing_id("2");
        assert!(stats.populated().unwrap().is_empty());
    }

    #[test]
    fn summary_rejects_pagination() {
        let stats = MailingStats::summary().promotion_id("1").mailing_id("2").page(2);
        assert!(matches!(
            stats.populated().unwrap_err(),
            MadMimiError::Configuration(_)
        ));
    }

    #[test]
    fn every_report_is_a_get() {
        for report in [
            Report::Summary,
            Report::Links,
            Report::Reads,
            Report::Unsubscribes,
            Report::Bounces,
            Report::Forwards,
            Report::Sent,
        ] {
            assert_eq!(MailingStats::new(report).request_type(), RequestType::Get);
        }
    }
}
