//! Inputs for creating and updating requests.

use crate::domain::errors::{WorkflowError, WorkflowResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared_types::RequestStatus;

/// Optional fields a volunteer attaches to a new request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDetails {
    pub message: Option<String>,
    pub collection_date: Option<DateTime<Utc>>,
    pub beneficiary_count: Option<i64>,
}

impl RequestDetails {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// A requested status change plus the fields that may ride along with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: RequestStatus,
    pub collection_date: Option<DateTime<Utc>>,
    pub beneficiary_count: Option<i64>,
}

impl StatusChange {
    pub fn to(status: RequestStatus) -> Self {
        Self {
            status,
            collection_date: None,
            beneficiary_count: None,
        }
    }

    pub fn with_beneficiary_count(mut self, count: i64) -> Self {
        self.beneficiary_count = Some(count);
        self
    }

    pub fn with_collection_date(mut self, date: DateTime<Utc>) -> Self {
        self.collection_date = Some(date);
        self
    }
}

/// Beneficiary counts are non-negative and fit the stored width.
pub(crate) fn beneficiary_count(raw: Option<i64>) -> WorkflowResult<Option<u32>> {
    raw.map(|count| {
        u32::try_from(count).map_err(|_| {
            WorkflowError::validation(format!(
                "beneficiaryCount must be between 0 and {}, got {count}",
                u32::MAX
            ))
        })
    })
    .transpose()
}
