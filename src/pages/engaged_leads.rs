//! Engaged leads: followers most likely to collaborate, and how to reach them.

#[cfg(test)]
#[path = "engaged_leads_test.rs"]
mod engaged_leads_test;

use serde::Serialize;

use super::{PageContext, Section};
use crate::net::types::{ContactSuggestions, EngagedLead, EngagedLeadsReport};

pub const DEFAULT_LEAD_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngagedLeadsPage {
    pub report: Section<EngagedLeadsReport>,
}

impl EngagedLeadsPage {
    pub async fn load(ctx: &PageContext, limit: u32) -> Option<Self> {
        let report = ctx.fetch(move |api| async move { api.engaged_leads(limit).await });
        let report = match ctx.settle(report, "engaged leads").await? {
            Section::Loaded(report) if report.engaged_leads.is_empty() => Section::Empty,
            other => other,
        };
        Some(Self { report })
    }

    #[must_use]
    pub fn leads(&self) -> &[EngagedLead] {
        self.report.value().map_or(&[][..], |report| report.engaged_leads.as_slice())
    }

    #[must_use]
    pub fn lead(&self, username: &str) -> Option<&EngagedLead> {
        let username = username.trim_start_matches('@');
        self.leads().iter().find(|lead| lead.username == username)
    }

    /// Outreach templates for one lead.
    pub async fn contact_suggestions(ctx: &PageContext, username: &str) -> Option<Section<ContactSuggestions>> {
        let username = username.trim().trim_start_matches('@').to_owned();
        let suggestions = ctx.fetch(move |api| async move { api.contact_suggestions(&username).await });
        ctx.settle(suggestions, "contact suggestions").await
    }
}
