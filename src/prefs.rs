/// User preferences, decoded from the string map kept in extension storage
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SorterError};

pub const KEY_SORT_MODE: &str = "sortMode";
pub const KEY_INCLUDE_QUERY_STRING: &str = "includeQueryString";
pub const KEY_GROUP_BY_CONTAINER: &str = "groupByContainer";
pub const KEY_REMOVE_DUPLICATES: &str = "removeDuplicates";
pub const KEY_REMOVE_BLANK_TABS: &str = "removeBlankTabs";
pub const KEY_SORT_ON_TAB_COMPLETE: &str = "sortOnTabComplete";

/// Which criteria order decides tab placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Leave tab order untouched
    None,
    /// Host, then path with slug/title fallback deep in the path
    Auto,
    #[default]
    HostTitlePath,
    HostPathTitle,
    TitleHostPath,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::None => "none",
            SortMode::Auto => "auto",
            SortMode::HostTitlePath => "host_title_path",
            SortMode::HostPathTitle => "host_path_title",
            SortMode::TitleHostPath => "title_host_path",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = SorterError;

    fn from_str(s: &str) -> Result<SortMode> {
        match s {
            "none" => Ok(SortMode::None),
            "auto" => Ok(SortMode::Auto),
            "host_title_path" => Ok(SortMode::HostTitlePath),
            "host_path_title" => Ok(SortMode::HostPathTitle),
            "title_host_path" => Ok(SortMode::TitleHostPath),
            other => Err(SorterError::InvalidPreference {
                key: KEY_SORT_MODE.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub sort_mode: SortMode,
    pub include_query_string: bool,
    pub group_by_container: bool,
    pub remove_duplicates: bool,
    pub remove_blank_tabs: bool,
    pub sort_on_tab_complete: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            sort_mode: SortMode::default(),
            include_query_string: true,
            group_by_container: true,
            remove_duplicates: true,
            remove_blank_tabs: true,
            sort_on_tab_complete: false,
        }
    }
}

impl Preferences {
    /// Build preferences from stored values, falling back to defaults for
    /// anything missing or malformed
    pub fn from_map(map: &HashMap<String, String>) -> Preferences {
        let mut prefs = Preferences::default();
        prefs.apply_changes(map);
        prefs
    }

    /// Apply a batch of changed values, returning how many were accepted
    ///
    /// Bad entries are logged and skipped; the previous value stays in place.
    pub fn apply_changes<'a, I>(&mut self, changes: I) -> usize
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut applied = 0;
        for (key, value) in changes {
            match self.set(key, value) {
                Ok(()) => applied += 1,
                Err(e) => warn!("Ignoring preference change: {}", e),
            }
        }
        applied
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_SORT_MODE => self.sort_mode = value.parse()?,
            KEY_INCLUDE_QUERY_STRING => self.include_query_string = parse_bool(key, value)?,
            KEY_GROUP_BY_CONTAINER => self.group_by_container = parse_bool(key, value)?,
            KEY_REMOVE_DUPLICATES => self.remove_duplicates = parse_bool(key, value)?,
            KEY_REMOVE_BLANK_TABS => self.remove_blank_tabs = parse_bool(key, value)?,
            KEY_SORT_ON_TAB_COMPLETE => self.sort_on_tab_complete = parse_bool(key, value)?,
            _ => return Err(SorterError::UnknownPreference(key.to_string())),
        }
        Ok(())
    }

    /// Encode back into the stored string form
    pub fn to_map(&self) -> HashMap<String, String> {
        [
            (KEY_SORT_MODE, self.sort_mode.as_str().to_string()),
            (KEY_INCLUDE_QUERY_STRING, self.include_query_string.to_string()),
            (KEY_GROUP_BY_CONTAINER, self.group_by_container.to_string()),
            (KEY_REMOVE_DUPLICATES, self.remove_duplicates.to_string()),
            (KEY_REMOVE_BLANK_TABS, self.remove_blank_tabs.to_string()),
            (KEY_SORT_ON_TAB_COMPLETE, self.sort_on_tab_complete.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SorterError::InvalidPreference {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let prefs = Preferences::from_map(&HashMap::new());

        assert_eq!(prefs.sort_mode, SortMode::HostTitlePath);
        assert!(prefs.include_query_string);
        assert!(prefs.group_by_container);
        assert!(prefs.remove_duplicates);
        assert!(!prefs.sort_on_tab_complete);
    }

    #[test]
    fn test_from_map() {
        let prefs = Preferences::from_map(&map(&[
            ("sortMode", "title_host_path"),
            ("includeQueryString", "false"),
            ("sortOnTabComplete", "true"),
        ]));

        assert_eq!(prefs.sort_mode, SortMode::TitleHostPath);
        assert!(!prefs.include_query_string);
        assert!(prefs.sort_on_tab_complete);
    }

    #[test]
    fn test_bad_values_keep_previous() {
        let mut prefs = Preferences::default();
        let applied = prefs.apply_changes(&map(&[
            ("sortMode", "sideways"),
            ("includeQueryString", "yes"),
            ("colour", "blue"),
            ("removeDuplicates", "false"),
        ]));

        assert_eq!(applied, 1);
        assert_eq!(prefs.sort_mode, SortMode::HostTitlePath);
        assert!(prefs.include_query_string);
        assert!(!prefs.remove_duplicates);
    }

    #[test]
    fn test_set_errors() {
        let mut prefs = Preferences::default();

        assert_eq!(
            prefs.set("colour", "blue"),
            Err(SorterError::UnknownPreference("colour".to_string()))
        );
        assert!(matches!(
            prefs.set("groupByContainer", "TRUE"),
            Err(SorterError::InvalidPreference { .. })
        ));
    }

    #[test]
    fn test_sort_mode_round_trip_names() {
        for mode in [
            SortMode::None,
            SortMode::Auto,
            SortMode::HostTitlePath,
            SortMode::HostPathTitle,
            SortMode::TitleHostPath,
        ] {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_to_map_restores_same_preferences() {
        let prefs = Preferences {
            sort_mode: SortMode::Auto,
            include_query_string: false,
            ..Preferences::default()
        };

        assert_eq!(Preferences::from_map(&prefs.to_map()), prefs);
    }

    #[test]
    fn test_serde_camel_case() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"sortMode": "host_path_title", "removeBlankTabs": false}"#)
                .unwrap();

        assert_eq!(prefs.sort_mode, SortMode::HostPathTitle);
        assert!(!prefs.remove_blank_tabs);
        assert!(prefs.remove_duplicates);
    }
}
