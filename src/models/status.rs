use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status reported by the backend for a submitted receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// Extraction is still running
    Processing,
    /// Extraction finished, receipt awaits human review
    Review,
    /// Receipt has been approved into the archive
    Approved,
    /// Extraction failed
    Failed,
    /// Content was recognized as an already archived receipt
    Duplicate,
}

impl ReceiptStatus {
    /// Check if this status stops the polling loop (no further automatic checks)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }

    /// Check if the receipt is ready for review or already approved
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Review | Self::Approved)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Review => write!(f, "review"),
            Self::Approved => write!(f, "approved"),
            Self::Failed => write!(f, "failed"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "review" => Ok(Self::Review),
            "approved" => Ok(Self::Approved),
            "failed" => Ok(Self::Failed),
            "duplicate" => Ok(Self::Duplicate),
            _ => Err(format!("Invalid receipt status: {s}")),
        }
    }
}

/// Client-side phase of the single tracked upload job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// No job in flight
    Idle,
    /// Payload submission is in progress
    Uploading,
    /// Submission accepted, status polling is active
    Polling,
    /// Backend reported the receipt ready for review or approved
    Resolved,
    /// Submission or extraction failed
    Failed,
    /// Polling bound exceeded without a terminal status
    TimedOut,
    /// Backend recognized the content as already archived
    Duplicate,
}

impl JobPhase {
    /// Check if this is a terminal phase (no further automatic polling occurs)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Resolved | Self::Failed | Self::TimedOut | Self::Duplicate
        )
    }

    /// Check if the job is actively being driven (upload or polling in flight)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Uploading | Self::Polling)
    }

    /// Check if a retry is permitted from this phase
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut)
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Uploading => write!(f, "uploading"),
            Self::Polling => write!(f, "polling"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl std::str::FromStr for JobPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "uploading" => Ok(Self::Uploading),
            "polling" => Ok(Self::Polling),
            "resolved" => Ok(Self::Resolved),
            "failed" => Ok(Self::Failed),
            "timed_out" => Ok(Self::TimedOut),
            "duplicate" => Ok(Self::Duplicate),
            _ => Err(format!("Invalid job phase: {s}")),
        }
    }
}

/// Default phase before any submission
impl Default for JobPhase {
    fn default() -> Self {
        Self::Idle
    }
}
