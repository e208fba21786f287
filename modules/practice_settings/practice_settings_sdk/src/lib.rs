//! Practice settings SDK
//!
//! This crate provides the public contract of the practice-settings module:
//! - `PracticeSettingsClientV1` trait for consumers (settings screens, toggles, tools)
//! - Model types (`Settings` and its deep-partial twin `SettingsPatch`)
//! - Error type (`SettingsError`)
//! - Helpers for editing the ordered lists (`lists`)
//!
//! Consumers hold a client and issue narrow patches, one control at a time:
//! ```ignore
//! let client: Arc<dyn PracticeSettingsClientV1> = ...;
//! client.update_settings(SettingsPatch::feature("staff_training", false)).await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod lists;
pub mod models;

pub use api::PracticeSettingsClientV1;
pub use errors::SettingsError;
pub use models::{
    BrandColors, BrandColorsPatch, BrandingPatch, BrandingSettings, Demographics,
    DemographicsPatch, GeneralPatch, GeneralSettings, IntegrationPatch, IntegrationSettings,
    NotificationPatch, NotificationSettings, SecurityPatch, SecuritySettings, Settings,
    SettingsPatch, StoreState, StoreStatus, TargetAudience, TargetAudiencePatch,
};
