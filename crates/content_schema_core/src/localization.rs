//! Per-locale translation inspection.

use std::str::FromStr;

use crate::types::{FieldDefinition, TitleConfig};

/// How a field's value is propagated across sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMethod {
    None,
    Site,
    SiteGroup,
    Language,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTranslationMethod(pub String);

impl FromStr for TranslationMethod {
    type Err = UnknownTranslationMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(Self::None),
            "site" => Ok(Self::Site),
            "siteGroup" | "site_group" => Ok(Self::SiteGroup),
            "language" => Ok(Self::Language),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownTranslationMethod(other.to_string())),
        }
    }
}

impl TranslationMethod {
    pub fn is_localizable(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Whether a custom field holds per-locale content.
///
/// No configuration means shared content. An unreadable configuration is
/// logged and treated the same way; this never fails the request.
pub fn is_localizable(field: &FieldDefinition) -> bool {
    match field.translation_method.as_deref() {
        None => false,
        Some(raw) => match raw.parse::<TranslationMethod>() {
            Ok(method) => method.is_localizable(),
            Err(UnknownTranslationMethod(value)) => {
                tracing::debug!(
                    field = %field.handle,
                    value = %value,
                    "unrecognised translation method, treating field as not localizable"
                );
                false
            }
        },
    }
}

/// Whether a container's native title is per-locale.
/// Titles translate per site unless the container says otherwise.
pub fn title_is_localizable(title: Option<&TitleConfig>) -> bool {
    match title.and_then(|t| t.translation_method.as_deref()) {
        None => true,
        Some(raw) => raw
            .parse::<TranslationMethod>()
            .map(TranslationMethod::is_localizable)
            .unwrap_or(false),
    }
}
