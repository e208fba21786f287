//! Public models for the practice-settings module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the settings store and its consumers. The JSON shape (camelCase)
//! is also the shape of the durable snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::SettingsError;

// ============================================================================
// Settings aggregate
// ============================================================================

/// The single application configuration aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub general: GeneralSettings,
    pub branding: BrandingSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
    pub integrations: IntegrationSettings,
    pub target_audience: TargetAudience,
    /// Feature flags. An absent key means "use the caller's default".
    pub features: BTreeMap<String, bool>,
}

/// Practice identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub timezone: String,
    pub date_format: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSettings {
    /// Data URI or URL.
    pub logo: Option<String>,
    pub colors: BrandColors,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub sms: bool,
    pub appointments: bool,
    pub marketing: bool,
    /// Hours before an appointment.
    pub reminder_timing: u32,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub two_factor_auth: bool,
    pub enforce_password_policy: bool,
    pub ip_whitelist_enabled: bool,
    pub audit_logging: bool,
    /// Days.
    pub password_expiration: u32,
    pub login_attempts: u32,
    /// Minutes.
    pub session_timeout: u32,
    /// Ordered, duplicates allowed.
    pub ip_whitelist: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSettings {
    pub auto_sync: bool,
    pub error_notifications: bool,
    /// Integration name to enabled flag. Open-ended set.
    pub enabled: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    pub demographics: Demographics,
    pub interests: Vec<String>,
}

/// Six ordered lists describing the target patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age_ranges: Vec<String>,
    pub household_types: Vec<String>,
    pub education_levels: Vec<String>,
    pub occupations: Vec<String>,
    pub income_ranges: Vec<String>,
    pub locations: Vec<String>,
}

impl Settings {
    /// Resolves a feature flag, falling back to `default` when the key is absent.
    #[must_use]
    pub fn feature_enabled(&self, feature_id: &str, default: bool) -> bool {
        self.features.get(feature_id).copied().unwrap_or(default)
    }

    /// Whether an integration is switched on. Unknown integrations are off.
    #[must_use]
    pub fn integration_enabled(&self, name: &str) -> bool {
        self.integrations.enabled.get(name).copied().unwrap_or(false)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                name: "Dental Practice".to_owned(),
                address: String::new(),
                phone: String::new(),
                email: String::new(),
                website: String::new(),
                timezone: "America/New_York".to_owned(),
                date_format: "MM/DD/YYYY".to_owned(),
                currency: "USD".to_owned(),
            },
            branding: BrandingSettings {
                logo: None,
                colors: BrandColors {
                    primary: "#1B2B5B".to_owned(),
                    secondary: "#40E0D0".to_owned(),
                    accent: "#C5A572".to_owned(),
                },
                dark_mode: false,
            },
            notifications: NotificationSettings {
                email: true,
                sms: true,
                appointments: true,
                marketing: false,
                reminder_timing: 24,
            },
            security: SecuritySettings {
                two_factor_auth: false,
                enforce_password_policy: true,
                ip_whitelist_enabled: false,
                audit_logging: true,
                password_expiration: 90,
                login_attempts: 5,
                session_timeout: 30,
                ip_whitelist: Vec::new(),
            },
            integrations: IntegrationSettings {
                auto_sync: true,
                error_notifications: true,
                enabled: BTreeMap::new(),
            },
            target_audience: TargetAudience {
                demographics: Demographics {
                    age_ranges: strings(&["25-34", "35-44", "45-54"]),
                    household_types: strings(&["Families with children", "Young professionals"]),
                    education_levels: strings(&["Bachelor's degree"]),
                    occupations: strings(&["Professionals"]),
                    income_ranges: strings(&["$50k-$100k", "$100k+"]),
                    locations: Vec::new(),
                },
                interests: strings(&["Preventive care", "Cosmetic dentistry"]),
            },
            features: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Deep-partial patches
// ============================================================================
//
// Every field is optional. Scalars and lists replace the current value,
// nested sections merge, maps merge key by key. Unknown keys are rejected so
// that malformed input fails at the boundary instead of inside the store.

/// Partial update of [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub general: Option<GeneralPatch>,
    pub branding: Option<BrandingPatch>,
    pub notifications: Option<NotificationPatch>,
    pub security: Option<SecurityPatch>,
    pub integrations: Option<IntegrationPatch>,
    pub target_audience: Option<TargetAudiencePatch>,
    pub features: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GeneralPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BrandingPatch {
    /// `Some(None)` clears the logo (explicit `null` in JSON).
    #[serde(deserialize_with = "present")]
    pub logo: Option<Option<String>>,
    pub colors: Option<BrandColorsPatch>,
    pub dark_mode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandColorsPatch {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NotificationPatch {
    pub email: Option<bool>,
    pub sms: Option<bool>,
    pub appointments: Option<bool>,
    pub marketing: Option<bool>,
    pub reminder_timing: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SecurityPatch {
    pub two_factor_auth: Option<bool>,
    pub enforce_password_policy: Option<bool>,
    pub ip_whitelist_enabled: Option<bool>,
    pub audit_logging: Option<bool>,
    pub password_expiration: Option<u32>,
    pub login_attempts: Option<u32>,
    pub session_timeout: Option<u32>,
    pub ip_whitelist: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct IntegrationPatch {
    pub auto_sync: Option<bool>,
    pub error_notifications: Option<bool>,
    pub enabled: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TargetAudiencePatch {
    pub demographics: Option<DemographicsPatch>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DemographicsPatch {
    pub age_ranges: Option<Vec<String>>,
    pub household_types: Option<Vec<String>>,
    pub education_levels: Option<Vec<String>>,
    pub occupations: Option<Vec<String>>,
    pub income_ranges: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SettingsPatch {
    /// Patch that flips a single feature flag.
    #[must_use]
    pub fn feature(feature_id: impl Into<String>, enabled: bool) -> Self {
        Self {
            features: Some(BTreeMap::from([(feature_id.into(), enabled)])),
            ..Self::default()
        }
    }

    /// Patch that switches a single integration on or off.
    #[must_use]
    pub fn integration(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            integrations: Some(IntegrationPatch {
                enabled: Some(BTreeMap::from([(name.into(), enabled)])),
                ..IntegrationPatch::default()
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn notifications(patch: NotificationPatch) -> Self {
        Self {
            notifications: Some(patch),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn security(patch: SecurityPatch) -> Self {
        Self {
            security: Some(patch),
            ..Self::default()
        }
    }

    /// True when the patch would not touch anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl SecurityPatch {
    /// Replaces the whole IP whitelist.
    #[must_use]
    pub fn ip_whitelist(entries: Vec<String>) -> Self {
        Self {
            ip_whitelist: Some(entries),
            ..Self::default()
        }
    }
}

// ============================================================================
// Store status
// ============================================================================

/// Lifecycle state of a settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    /// The load attempt has not completed yet.
    Uninitialized,
    Ready,
    /// The last operation failed; the last known settings remain readable.
    Error,
}

/// Snapshot of a store's lifecycle state and its most recent failure.
#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub state: StoreState,
    pub last_error: Option<SettingsError>,
}
