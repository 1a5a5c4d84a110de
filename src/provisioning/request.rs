// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The onboarding request carried by an inbound event

use crate::config::ProvisioningConfig;
use crate::error::{ProvisionerError, Result};
use serde::{Deserialize, Serialize};

/// Maximum length of a DNS-1123 label
const MAX_LABEL_LEN: usize = 63;

/// An "application onboarded" event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingRequest {
    application_name: String,
    environment: String,
}

impl OnboardingRequest {
    pub fn new(application_name: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            environment: environment.into(),
        }
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// `<environment>-<applicationName>`, exactly as given
    pub fn namespace_name(&self) -> String {
        format!("{}-{}", self.environment, self.application_name)
    }

    /// Reject requests that must not reach the cluster
    pub fn validate(&self, config: &ProvisioningConfig) -> Result<()> {
        if self.application_name.trim().is_empty() {
            return Err(ProvisionerError::Validation(
                "applicationName must not be empty".to_string(),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(ProvisionerError::Validation(
                "environment must not be empty".to_string(),
            ));
        }
        if !config.accepts_environment(&self.environment) {
            return Err(ProvisionerError::Validation(format!(
                "unknown environment '{}', expected one of {}",
                self.environment,
                config.environments.join(", ")
            )));
        }
        Ok(())
    }
}

/// Check that `name` can be used as a namespace name (DNS-1123 label)
pub fn check_namespace_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_LABEL_LEN {
        return Err(ProvisionerError::PolicyViolation(format!(
            "namespace name '{}' must be between 1 and {} characters",
            name, MAX_LABEL_LEN
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let alnum_edges = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());

    if !valid_chars || !alnum_edges {
        return Err(ProvisionerError::PolicyViolation(format!(
            "namespace name '{}' must consist of lowercase alphanumerics or '-', \
             and start and end with an alphanumeric",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_name_joins_environment_and_application() {
        let request = OnboardingRequest::new("realme", "pre");
        assert_eq!(request.namespace_name(), "pre-realme");
    }

    #[test]
    fn test_namespace_name_preserves_case() {
        let request = OnboardingRequest::new("invento", "PRO");
        assert_eq!(request.namespace_name(), "PRO-invento");
    }

    #[test]
    fn test_validate_accepts_known_environment() {
        let config = ProvisioningConfig::default();
        assert!(OnboardingRequest::new("realme", "pre").validate(&config).is_ok());
        assert!(OnboardingRequest::new("realme", "FOR").validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_application_name() {
        let config = ProvisioningConfig::default();
        let err = OnboardingRequest::new("", "pre").validate(&config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_blank_environment() {
        let config = ProvisioningConfig::default();
        let err = OnboardingRequest::new("realme", "  ").validate(&config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_unknown_environment() {
        let config = ProvisioningConfig::default();
        let err = OnboardingRequest::new("realme", "PROD").validate(&config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_check_namespace_name() {
        assert!(check_namespace_name("pre-realme").is_ok());
        assert!(check_namespace_name("int-app2").is_ok());
        assert!(check_namespace_name("PRE-realme").is_err());
        assert!(check_namespace_name("pre-real_me").is_err());
        assert!(check_namespace_name("pre-").is_err());
        assert!(check_namespace_name("").is_err());
        assert!(check_namespace_name(&format!("pre-{}", "a".repeat(60))).is_err());
    }

    #[test]
    fn test_policy_violation_kind() {
        let err = check_namespace_name("Pre-Realme").unwrap_err();
        assert!(matches!(err, ProvisionerError::PolicyViolation(_)));
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let request: OnboardingRequest = serde_json::from_str(
            r#"{"applicationName":"realme","environment":"pre","owner":"team-a"}"#,
        )
        .unwrap();
        assert_eq!(request, OnboardingRequest::new("realme", "pre"));
    }

    #[test]
    fn test_deserialize_missing_field_fails_validation() {
        let request: OnboardingRequest =
            serde_json::from_str(r#"{"environment":"pre"}"#).unwrap();
        let err = request.validate(&ProvisioningConfig::default()).unwrap_err();
        assert!(err.is_validation());
    }
}
