use std::fmt;

use serde::Serialize;

use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A finding produced by a kind's structural or configuration checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A value looks wrong; rendering proceeds with it as given
    Advisory(String),
    /// The element's children do not have the expected shape. A severe
    /// violation skips rendering for the instance.
    Structural { message: String, severe: bool },
}

impl Finding {
    pub fn advisory(message: impl Into<String>) -> Self {
        Finding::Advisory(message.into())
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Finding::Structural {
            message: message.into(),
            severe: false,
        }
    }

    pub fn severe(message: impl Into<String>) -> Self {
        Finding::Structural {
            message: message.into(),
            severe: true,
        }
    }

    pub fn skips_render(&self) -> bool {
        matches!(self, Finding::Structural { severe: true, .. })
    }
}

/// Developer-facing report scoped to one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub element: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    pub message: String,
}

impl Diagnostic {
    pub fn from_finding(
        element: &'static str,
        fingerprint: Option<Fingerprint>,
        finding: Finding,
    ) -> Self {
        let (severity, message) = match finding {
            Finding::Advisory(message) => (Severity::Warning, message),
            Finding::Structural { message, .. } => (Severity::Error, message),
        };
        Self {
            severity,
            element,
            fingerprint,
            message,
        }
    }

    /// Send this diagnostic to the tracing subscriber
    pub fn emit(&self) {
        let fingerprint = self.fingerprint.as_ref().map(Fingerprint::as_str);
        match self.severity {
            Severity::Warning => {
                tracing::warn!(element = self.element, fingerprint, "{}", self.message)
            }
            Severity::Error => {
                tracing::error!(element = self.element, fingerprint, "{}", self.message)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{} <{}>: {}", level, self.element, self.message)
    }
}
