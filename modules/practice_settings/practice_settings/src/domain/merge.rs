//! Deep merge of partial settings.
//!
//! Nested sections merge field by field, maps merge key by key, and every
//! other value (scalars, lists) replaces what was there. Nothing a patch
//! does not mention is ever removed. Everything here is pure and synchronous.

use std::collections::BTreeMap;

use practice_settings_sdk::models::{
    BrandColors, BrandColorsPatch, BrandingPatch, BrandingSettings, Demographics,
    DemographicsPatch, GeneralPatch, GeneralSettings, IntegrationPatch, IntegrationSettings,
    NotificationPatch, NotificationSettings, SecurityPatch, SecuritySettings, Settings,
    SettingsPatch, TargetAudience, TargetAudiencePatch,
};
use serde_json::Value;

/// Applies a partial value of type `P` onto `self`.
///
/// Implemented both for settings sections (apply a patch) and for patches
/// themselves (compose two patches, the later one wins on conflicting leaves).
pub trait DeepMerge<P> {
    fn deep_merge(&mut self, patch: P);
}

/// Returns `settings` with `patch` applied.
#[must_use]
pub fn apply_patch(settings: &Settings, patch: SettingsPatch) -> Settings {
    let mut next = settings.clone();
    next.deep_merge(patch);
    next
}

/// Untyped deep merge over JSON values.
///
/// Objects on both sides merge recursively; anything else in `update`
/// (arrays, scalars, null) replaces the target outright.
pub fn merge_json(target: &mut Value, update: Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                match target_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, update) => *target = update,
    }
}

// ----------------------------------------------------------------------------
// Field helpers
// ----------------------------------------------------------------------------

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn merge_map(target: &mut BTreeMap<String, bool>, patch: Option<BTreeMap<String, bool>>) {
    if let Some(patch) = patch {
        target.extend(patch);
    }
}

fn merge_section<S: DeepMerge<P>, P>(target: &mut S, patch: Option<P>) {
    if let Some(patch) = patch {
        target.deep_merge(patch);
    }
}

fn overlay<T>(slot: &mut Option<T>, later: Option<T>) {
    if later.is_some() {
        *slot = later;
    }
}

fn overlay_map(slot: &mut Option<BTreeMap<String, bool>>, later: Option<BTreeMap<String, bool>>) {
    let Some(later) = later else { return };
    match slot {
        Some(current) => current.extend(later),
        None => *slot = Some(later),
    }
}

fn overlay_section<P: DeepMerge<P>>(slot: &mut Option<P>, later: Option<P>) {
    let Some(later) = later else { return };
    match slot {
        Some(current) => current.deep_merge(later),
        None => *slot = Some(later),
    }
}

// ----------------------------------------------------------------------------
// Patch onto settings
// ----------------------------------------------------------------------------

impl DeepMerge<SettingsPatch> for Settings {
    fn deep_merge(&mut self, patch: SettingsPatch) {
        merge_section(&mut self.general, patch.general);
        merge_section(&mut self.branding, patch.branding);
        merge_section(&mut self.notifications, patch.notifications);
        merge_section(&mut self.security, patch.security);
        merge_section(&mut self.integrations, patch.integrations);
        merge_section(&mut self.target_audience, patch.target_audience);
        merge_map(&mut self.features, patch.features);
    }
}

impl DeepMerge<GeneralPatch> for GeneralSettings {
    fn deep_merge(&mut self, patch: GeneralPatch) {
        assign(&mut self.name, patch.name);
        assign(&mut self.address, patch.address);
        assign(&mut self.phone, patch.phone);
        assign(&mut self.email, patch.email);
        assign(&mut self.website, patch.website);
        assign(&mut self.timezone, patch.timezone);
        assign(&mut self.date_format, patch.date_format);
        assign(&mut self.currency, patch.currency);
    }
}

impl DeepMerge<BrandingPatch> for BrandingSettings {
    fn deep_merge(&mut self, patch: BrandingPatch) {
        assign(&mut self.logo, patch.logo);
        merge_section(&mut self.colors, patch.colors);
        assign(&mut self.dark_mode, patch.dark_mode);
    }
}

impl DeepMerge<BrandColorsPatch> for BrandColors {
    fn deep_merge(&mut self, patch: BrandColorsPatch) {
        assign(&mut self.primary, patch.primary);
        assign(&mut self.secondary, patch.secondary);
        assign(&mut self.accent, patch.accent);
    }
}

impl DeepMerge<NotificationPatch> for NotificationSettings {
    fn deep_merge(&mut self, patch: NotificationPatch) {
        assign(&mut self.email, patch.email);
        assign(&mut self.sms, patch.sms);
        assign(&mut self.appointments, patch.appointments);
        assign(&mut self.marketing, patch.marketing);
        assign(&mut self.reminder_timing, patch.reminder_timing);
    }
}

impl DeepMerge<SecurityPatch> for SecuritySettings {
    fn deep_merge(&mut self, patch: SecurityPatch) {
        assign(&mut self.two_factor_auth, patch.two_factor_auth);
        assign(&mut self.enforce_password_policy, patch.enforce_password_policy);
        assign(&mut self.ip_whitelist_enabled, patch.ip_whitelist_enabled);
        assign(&mut self.audit_logging, patch.audit_logging);
        assign(&mut self.password_expiration, patch.password_expiration);
        assign(&mut self.login_attempts, patch.login_attempts);
        assign(&mut self.session_timeout, patch.session_timeout);
        assign(&mut self.ip_whitelist, patch.ip_whitelist);
    }
}

impl DeepMerge<IntegrationPatch> for IntegrationSettings {
    fn deep_merge(&mut self, patch: IntegrationPatch) {
        assign(&mut self.auto_sync, patch.auto_sync);
        assign(&mut self.error_notifications, patch.error_notifications);
        merge_map(&mut self.enabled, patch.enabled);
    }
}

impl DeepMerge<TargetAudiencePatch> for TargetAudience {
    fn deep_merge(&mut self, patch: TargetAudiencePatch) {
        merge_section(&mut self.demographics, patch.demographics);
        assign(&mut self.interests, patch.interests);
    }
}

impl DeepMerge<DemographicsPatch> for Demographics {
    fn deep_merge(&mut self, patch: DemographicsPatch) {
        assign(&mut self.age_ranges, patch.age_ranges);
        assign(&mut self.household_types, patch.household_types);
        assign(&mut self.education_levels, patch.education_levels);
        assign(&mut self.occupations, patch.occupations);
        assign(&mut self.income_ranges, patch.income_ranges);
        assign(&mut self.locations, patch.locations);
    }
}

// ----------------------------------------------------------------------------
// Patch onto patch
// ----------------------------------------------------------------------------

impl DeepMerge<SettingsPatch> for SettingsPatch {
    fn deep_merge(&mut self, later: SettingsPatch) {
        overlay_section(&mut self.general, later.general);
        overlay_section(&mut self.branding, later.branding);
        overlay_section(&mut self.notifications, later.notifications);
        overlay_section(&mut self.security, later.security);
        overlay_section(&mut self.integrations, later.integrations);
        overlay_section(&mut self.target_audience, later.target_audience);
        overlay_map(&mut self.features, later.features);
    }
}

impl DeepMerge<GeneralPatch> for GeneralPatch {
    fn deep_merge(&mut self, later: GeneralPatch) {
        overlay(&mut self.name, later.name);
        overlay(&mut self.address, later.address);
        overlay(&mut self.phone, later.phone);
        overlay(&mut self.email, later.email);
        overlay(&mut self.website, later.website);
        overlay(&mut self.timezone, later.timezone);
        overlay(&mut self.date_format, later.date_format);
        overlay(&mut self.currency, later.currency);
    }
}

impl DeepMerge<BrandingPatch> for BrandingPatch {
    fn deep_merge(&mut self, later: BrandingPatch) {
        overlay(&mut self.logo, later.logo);
        overlay_section(&mut self.colors, later.colors);
        overlay(&mut self.dark_mode, later.dark_mode);
    }
}

impl DeepMerge<BrandColorsPatch> for BrandColorsPatch {
    fn deep_merge(&mut self, later: BrandColorsPatch) {
        overlay(&mut self.primary, later.primary);
        overlay(&mut self.secondary, later.secondary);
        overlay(&mut self.accent, later.accent);
    }
}

impl DeepMerge<NotificationPatch> for NotificationPatch {
    fn deep_merge(&mut self, later: NotificationPatch) {
        overlay(&mut self.email, later.email);
        overlay(&mut self.sms, later.sms);
        overlay(&mut self.appointments, later.appointments);
        overlay(&mut self.marketing, later.marketing);
        overlay(&mut self.reminder_timing, later.reminder_timing);
    }
}

impl DeepMerge<SecurityPatch> for SecurityPatch {
    fn deep_merge(&mut self, later: SecurityPatch) {
        overlay(&mut self.two_factor_auth, later.two_factor_auth);
        overlay(&mut self.enforce_password_policy, later.enforce_password_policy);
        overlay(&mut self.ip_whitelist_enabled, later.ip_whitelist_enabled);
        overlay(&mut self.audit_logging, later.audit_logging);
        overlay(&mut self.password_expiration, later.password_expiration);
        overlay(&mut self.login_attempts, later.login_attempts);
        overlay(&mut self.session_timeout, later.session_timeout);
        overlay(&mut self.ip_whitelist, later.ip_whitelist);
    }
}

impl DeepMerge<IntegrationPatch> for IntegrationPatch {
    fn deep_merge(&mut self, later: IntegrationPatch) {
        overlay(&mut self.auto_sync, later.auto_sync);
        overlay(&mut self.error_notifications, later.error_notifications);
        overlay_map(&mut self.enabled, later.enabled);
    }
}

impl DeepMerge<TargetAudiencePatch> for TargetAudiencePatch {
    fn deep_merge(&mut self, later: TargetAudiencePatch) {
        overlay_section(&mut self.demographics, later.demographics);
        overlay(&mut self.interests, later.interests);
    }
}

impl DeepMerge<DemographicsPatch> for DemographicsPatch {
    fn deep_merge(&mut self, later: DemographicsPatch) {
        overlay(&mut self.age_ranges, later.age_ranges);
        overlay(&mut self.household_types, later.household_types);
        overlay(&mut self.education_levels, later.education_levels);
        overlay(&mut self.occupations, later.occupations);
        overlay(&mut self.income_ranges, later.income_ranges);
        overlay(&mut self.locations, later.locations);
    }
}
