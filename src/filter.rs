//! `property=regex` window filters (`--filter` / `-F`).
//!
//! Parsing is strict: a flag without `=`, or with an empty side, is rejected
//! up front.  Evaluation is fail-fast: one filter naming an unknown property
//! poisons the whole set rather than being skipped.

use crate::error::ScratchpadError;
use crate::window::Window;
use log::debug;
use regex::Regex;

/// Properties a filter may look at.
pub const FILTER_PROPERTIES: &[&str] = &[
    "app-name",
    "window-title",
    "app-bundle-id",
    "window-id",
    "workspace",
    "window-layout",
];

/// A single parsed filter.
#[derive(Debug, Clone)]
pub struct Filter {
    pub property: String,
    pub pattern: Regex,
}

/// Extract the value of `property` from `window`, or `None` for an unknown
/// property.
fn property_value(window: &Window, property: &str) -> Option<String> {
    let value = match property {
        "app-name" => window.app_name.clone(),
        "window-title" => window.title.clone(),
        "app-bundle-id" => window.bundle_id.clone(),
        "window-id" => window.id.to_string(),
        "workspace" => window.workspace.clone(),
        "window-layout" => window.layout.to_string(),
        _ => return None,
    };
    Some(value)
}

/// Parse `--filter` flags into [`Filter`]s.
pub fn parse_filters<S: AsRef<str>>(flags: &[S]) -> Result<Vec<Filter>, ScratchpadError> {
    flags
        .iter()
        .map(|flag| {
            let flag = flag.as_ref();
            let (property, pattern) = flag
                .split_once('=')
                .map(|(p, v)| (p.trim(), v.trim()))
                .filter(|(p, v)| !p.is_empty() && !v.is_empty())
                .ok_or_else(|| ScratchpadError::MalformedFilter(flag.to_string()))?;

            let pattern = pattern
                .strip_prefix('/')
                .and_then(|p| p.strip_suffix('/'))
                .filter(|p| !p.is_empty())
                .unwrap_or(pattern);

            let regex = Regex::new(pattern).map_err(|source| ScratchpadError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

            Ok(Filter {
                property: property.to_string(),
                pattern: regex,
            })
        })
        .collect()
}

/// `true` iff `window` satisfies every filter.  An empty set always matches.
///
/// Every property is resolved before any pattern is tried, so an unknown
/// property fails the evaluation no matter where it sits in the set.
pub fn apply_filters(window: &Window, filters: &[Filter]) -> Result<bool, ScratchpadError> {
    let values = filters
        .iter()
        .map(|filter| {
            property_value(window, &filter.property)
                .ok_or_else(|| ScratchpadError::UnknownFilterProperty(filter.property.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (filter, value) in filters.iter().zip(values) {
        if !filter.pattern.is_match(&value) {
            debug!(
                "filter {}={} did not match {:?}",
                filter.property,
                filter.pattern.as_str(),
                value
            );
            return Ok(false);
        }
    }
    Ok(true)
}
