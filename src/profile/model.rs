//! Profile record and role data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role within the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    EventCompany,
    Caterer,
    Transport,
    Photographer,
    Freelancer,
    #[serde(rename = "jobseeker")]
    JobSeeker,
    Admin,
}

impl UserRole {
    /// The four service-provider roles. Providers get a business profile and
    /// must finish onboarding before reaching their dashboard.
    pub fn is_provider(&self) -> bool {
        matches!(
            self,
            Self::EventCompany | Self::Caterer | Self::Transport | Self::Photographer
        )
    }

    /// Parse a cached hint value.
    ///
    /// Unknown strings yield `None` so a stale or garbled cache entry
    /// degrades to the customer default instead of failing the bootstrap.
    pub fn parse_hint(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "event_company" => Some(Self::EventCompany),
            "caterer" => Some(Self::Caterer),
            "transport" => Some(Self::Transport),
            "photographer" => Some(Self::Photographer),
            "freelancer" => Some(Self::Freelancer),
            "jobseeker" => Some(Self::JobSeeker),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Canonical string form, matching the wire/cache representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::EventCompany => "event_company",
            Self::Caterer => "caterer",
            Self::Transport => "transport",
            Self::Photographer => "photographer",
            Self::Freelancer => "freelancer",
            Self::JobSeeker => "jobseeker",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marketplace profile as returned by the profile service.
///
/// `completed` is a legacy alias of `profile_complete` kept for records
/// written by older backend versions; either flag being true means the
/// profile is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub role: UserRole,
    #[serde(default)]
    pub profile_complete: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Service categories offered (providers only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    /// A bare record for a freshly registered account.
    pub fn new(role: UserRole) -> Self {
        Self {
            role,
            profile_complete: false,
            completed: false,
            company_name: None,
            phone: None,
            location: None,
            services: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether onboarding has been finished for this profile.
    pub fn is_complete(&self) -> bool {
        self.profile_complete || self.completed
    }
}

/// Payload for creating a profile at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Free-form business fields collected by the registration form.
    #[serde(default)]
    pub profile_data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_roles() {
        assert!(UserRole::EventCompany.is_provider());
        assert!(UserRole::Caterer.is_provider());
        assert!(UserRole::Transport.is_provider());
        assert!(UserRole::Photographer.is_provider());

        assert!(!UserRole::Customer.is_provider());
        assert!(!UserRole::Freelancer.is_provider());
        assert!(!UserRole::JobSeeker.is_provider());
        assert!(!UserRole::Admin.is_provider());
    }

    #[test]
    fn parse_hint_is_lenient() {
        assert_eq!(UserRole::parse_hint("caterer"), Some(UserRole::Caterer));
        assert_eq!(UserRole::parse_hint("  Photographer "), Some(UserRole::Photographer));
        assert_eq!(UserRole::parse_hint("jobseeker"), Some(UserRole::JobSeeker));
        assert_eq!(UserRole::parse_hint("dj"), None);
        assert_eq!(UserRole::parse_hint(""), None);
    }

    #[test]
    fn display_matches_serde() {
        let roles = [
            UserRole::Customer,
            UserRole::EventCompany,
            UserRole::Caterer,
            UserRole::Transport,
            UserRole::Photographer,
            UserRole::Freelancer,
            UserRole::JobSeeker,
            UserRole::Admin,
        ];
        for role in roles {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(
                format!("\"{role}\""),
                json,
                "Display and serde should match for {role:?}"
            );
            assert_eq!(UserRole::parse_hint(role.as_str()), Some(role));
        }
    }

    #[test]
    fn completion_honors_either_flag() {
        let mut record = ProfileRecord::new(UserRole::Caterer);
        assert!(!record.is_complete());

        record.profile_complete = true;
        assert!(record.is_complete());

        record.profile_complete = false;
        record.completed = true;
        assert!(record.is_complete(), "legacy flag alone must count");
    }

    #[test]
    fn record_wire_format_is_camel_case() {
        let record = ProfileRecord {
            company_name: Some("Silver Spoon Catering".to_string()),
            profile_complete: true,
            ..ProfileRecord::new(UserRole::Caterer)
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"profileComplete\":true"));
        assert!(json.contains("\"companyName\""));
        assert!(json.contains("\"role\":\"caterer\""));
    }

    #[test]
    fn record_decodes_with_missing_flags() {
        let record: ProfileRecord =
            serde_json::from_str(r#"{"role":"photographer"}"#).unwrap();
        assert_eq!(record.role, UserRole::Photographer);
        assert!(!record.profile_complete);
        assert!(!record.completed);
        assert!(!record.is_complete());
    }

    #[test]
    fn record_decodes_legacy_completed_flag() {
        let record: ProfileRecord =
            serde_json::from_str(r#"{"role":"transport","completed":true}"#).unwrap();
        assert!(record.is_complete());
    }
}
