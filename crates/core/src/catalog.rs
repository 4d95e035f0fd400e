//! Catalog vocabulary: departments, project types, project status and the
//! accepted publication-year window.
//!
//! Every enumeration has exactly one canonical spelling, which is what the
//! database stores (enforced there by `CHECK` constraints). Input coming from
//! forms and query strings is matched case-insensitively against the canonical
//! value and a small alias table, so both `"CPE"` and `"Computer Engineering"`
//! resolve to [`Department::Cpe`].

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::CoreError;

/// Earliest publication year accepted for a project.
pub const MIN_PROJECT_YEAR: i32 = 2019;

macro_rules! define_catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canonical:literal $( | $alias:literal )*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Canonical spelling, as stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical ),+
                }
            }

            /// Resolve a canonical value or alias, ignoring case and
            /// surrounding whitespace.
            pub fn parse(input: &str) -> Option<Self> {
                let needle = input.trim();
                $(
                    if needle.eq_ignore_ascii_case($canonical)
                        $( || needle.eq_ignore_ascii_case($alias) )*
                    {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            /// Canonical values joined for error messages.
            fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        s,
                        Self::expected()
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

define_catalog_enum! {
    /// Academic department that owns a project.
    Department, "department" {
        Ie => "IE" | "Industrial Engineering",
        Cpe => "CPE" | "Computer Engineering",
    }
}

define_catalog_enum! {
    /// Kind of academic output.
    ProjectType, "project type" {
        Thesis => "Thesis",
        Capstone => "Capstone" | "Capstone Project",
        Research => "Research" | "Research Paper",
        Mor => "MOR" | "Methods of Research",
        DesignProject => "Design Project",
    }
}

define_catalog_enum! {
    /// Whether the project is finished.
    #[derive(Default)]
    ProjectStatus, "status" {
        #[default]
        Completed => "completed",
        Ongoing => "ongoing",
    }
}

/// Map a list-filter value to its canonical spelling when it is recognised.
///
/// Filtering is advisory: unknown values are returned unchanged (trimmed) so
/// they match nothing instead of failing the request. Blank input yields
/// `None`, meaning "no constraint".
pub fn normalize_filter<T>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> Option<String>
where
    T: fmt::Display,
{
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(parse(raw).map_or_else(|| raw.to_string(), |v| v.to_string()))
}

/// Latest publication year accepted for a project: next calendar year.
pub fn max_project_year() -> i32 {
    chrono::Utc::now().year() + 1
}

/// Validate that `year` falls within `[MIN_PROJECT_YEAR, current_year + 1]`.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    validate_year_against(year, max_project_year())
}

fn validate_year_against(year: i32, max: i32) -> Result<(), CoreError> {
    if (MIN_PROJECT_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Year must be between {MIN_PROJECT_YEAR} and {max}, got {year}"
        )))
    }
}
