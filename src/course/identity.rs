use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

/// Content locale of a course. `En` is the default and is never spelled out
/// in slugs, hostnames or image names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Locales that may appear as a `-<locale>` course slug suffix.
    pub const SUFFIXED: [Locale; 1] = [Locale::Ru];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    pub fn is_default(self) -> bool {
        self == Locale::En
    }

    fn from_suffix(s: &str) -> Option<Self> {
        Self::SUFFIXED.into_iter().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course slug with the locale suffix split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseData {
    pub slug: String,
    pub locale: Locale,
}

impl CourseData {
    /// `"python-basics-ru"` → `python-basics` / `ru`; anything without a
    /// recognized suffix keeps its slug and gets the default locale.
    pub fn from_slug(slug_with_locale: &str) -> Self {
        let suffix = slug_with_locale.rsplit('-').next().unwrap_or_default();
        if let Some(locale) = Locale::from_suffix(suffix)
            && let Some(slug) = slug_with_locale.strip_suffix(&format!("-{locale}"))
            && !slug.is_empty()
        {
            return Self {
                slug: slug.to_string(),
                locale,
            };
        }
        Self {
            slug: slug_with_locale.to_string(),
            locale: Locale::default(),
        }
    }
}

/// The `<course>-<locale>/<lesson>` coordinates of a submitted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentIdentity {
    pub course_slug_with_locale: String,
    pub lesson_slug: String,
}

impl AssignmentIdentity {
    /// Parse the relative assignment path recorded in the submission marker.
    pub fn parse(relative_path: &str) -> Result<Self> {
        let mut parts = relative_path.trim_matches('/').split('/');
        match (parts.next(), parts.next()) {
            (Some(course), Some(lesson)) if !course.is_empty() && !lesson.is_empty() => Ok(Self {
                course_slug_with_locale: course.to_string(),
                lesson_slug: lesson.to_string(),
            }),
            _ => Err(CheckError::InvalidAssignmentPath {
                path: relative_path.to_string(),
            }),
        }
    }

    pub fn course(&self) -> CourseData {
        CourseData::from_slug(&self.course_slug_with_locale)
    }
}

/// Fully qualified checking image: `<namespace>/<slug>[-<locale>]:<tag>`.
pub fn image_name(namespace: &str, slug: &str, locale: Locale, tag: &str) -> String {
    if locale.is_default() {
        format!("{namespace}/{slug}:{tag}")
    } else {
        format!("{namespace}/{slug}-{locale}:{tag}")
    }
}
