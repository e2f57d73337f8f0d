//! Publish-on-create policy

use std::fmt;
use std::str::FromStr;

/// Whether and how a created submission is announced on the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishMode {
    /// Never publish
    #[default]
    Disabled,
    /// Publish; a failure is logged and the create still succeeds
    BestEffort,
    /// Publish; a failure fails the create request
    Required,
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishMode::Disabled => write!(f, "disabled"),
            PublishMode::BestEffort => write!(f, "best_effort"),
            PublishMode::Required => write!(f, "required"),
        }
    }
}

impl FromStr for PublishMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "disabled" | "off" => Ok(PublishMode::Disabled),
            "best_effort" | "best-effort" => Ok(PublishMode::BestEffort),
            "required" => Ok(PublishMode::Required),
            other => Err(format!(
                "unknown publish mode '{}' (expected disabled, best_effort or required)",
                other
            )),
        }
    }
}
