//! Audit methods for [`EiamClient`].

use tracing::warn;

use crate::client::EiamClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{AuditEventRecord, AuditEventTypeGroup, AuditQuery, Page};

/// Everything the audit screen needs on first load.
#[derive(Debug, Clone)]
pub struct AuditView {
    /// Filter options; empty when the taxonomy could not be loaded.
    pub event_types: Vec<AuditEventTypeGroup>,
    pub page: Page<AuditEventRecord>,
}

impl AuditView {
    /// Display name of an event type code, when the taxonomy knows it.
    pub fn event_type_name(&self, code: &str) -> Option<&str> {
        self.event_types
            .iter()
            .flat_map(|group| group.types.iter())
            .find(|t| t.code == code)
            .map(|t| t.name.as_str())
    }
}

impl EiamClient {
    /// Fetch the grouped event-type taxonomy.
    pub async fn fetch_event_type_taxonomy(&mut self) -> Result<Vec<AuditEventTypeGroup>> {
        let token = self.auth_token().await?;
        let result = endpoints::fetch_event_type_taxonomy(
            &self.http,
            &self.base_url,
            &token,
            self.metrics.as_ref(),
        )
        .await;

        if let Err(e) = &result {
            self.note_failure(e);
        }
        result
    }

    /// Event-type filter options, or an empty list when they cannot be loaded.
    ///
    /// The audit list stays usable without its filter, so the failure is only
    /// logged.
    pub async fn event_type_options(&mut self) -> Vec<AuditEventTypeGroup> {
        match self.fetch_event_type_taxonomy().await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "Audit event types unavailable; filter options disabled");
                Vec::new()
            }
        }
    }

    /// Fetch one page of audit records matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::InvalidQuery`] before any request when
    /// the query is invalid.
    pub async fn fetch_audit_page(&mut self, query: &AuditQuery) -> Result<Page<AuditEventRecord>> {
        query.validate()?;
        let token = self.auth_token().await?;
        let result = endpoints::fetch_audit_page(
            &self.http,
            &self.base_url,
            &token,
            query,
            self.display_offset,
            self.metrics.as_ref(),
        )
        .await;

        if let Err(e) = &result {
            self.note_failure(e);
        }
        result
    }

    /// Load the taxonomy and the first page concurrently.
    ///
    /// A taxonomy failure degrades to empty filter options; a page failure is
    /// returned.
    pub async fn open_audit_view(&mut self, query: &AuditQuery) -> Result<AuditView> {
        query.validate()?;
        let token = self.auth_token().await?;
        let metrics = self.metrics.as_ref();

        let (types, page) = tokio::join!(
            endpoints::fetch_event_type_taxonomy(&self.http, &self.base_url, &token, metrics),
            endpoints::fetch_audit_page(
                &self.http,
                &self.base_url,
                &token,
                query,
                self.display_offset,
                metrics,
            ),
        );

        let event_types = match types {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "Audit event types unavailable; filter options disabled");
                self.note_failure(&e);
                Vec::new()
            }
        };

        match page {
            Ok(page) => Ok(AuditView { event_types, page }),
            Err(e) => {
                self.note_failure(&e);
                Err(e)
            }
        }
    }
}
