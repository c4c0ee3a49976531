use crate::config::ATTRIBUTE_MARKER;
use crate::error::{DataError, Result};
use geojson::JsonObject;
use tracing::{debug, warn};

/// One year's percentage property on a feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Property key as it appears in the file, e.g. `pct_1990`
    pub key: String,
    pub year: i32,
}

/// Keys containing the attribute marker, in property enumeration order
pub fn extract_attributes(props: &JsonObject) -> Vec<String> {
    props
        .keys()
        .filter(|key| key.contains(ATTRIBUTE_MARKER))
        .cloned()
        .collect()
}

/// Year encoded as the trailing digits of a key (`pct_1990` -> 1990)
pub fn attribute_year(key: &str) -> Option<i32> {
    let prefix_len = key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    key[prefix_len..].parse().ok()
}

fn is_bare_year(key: &str) -> bool {
    key.len() == 4 && key.chars().all(|c| c.is_ascii_digit())
}

/// Ordered year attributes shared by every feature of a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Build the schema from one feature's properties.
    ///
    /// Keys containing `pct` are year attributes. Files that predate the
    /// `pct_` prefix use bare year keys (`"2022"`), which are accepted when no
    /// prefixed key exists.
    pub fn from_properties(props: &JsonObject) -> Result<Self> {
        let mut keys = extract_attributes(props);
        if keys.is_empty() {
            keys = props.keys().filter(|k| is_bare_year(k)).cloned().collect();
        }

        let mut attributes: Vec<Attribute> = keys
            .into_iter()
            .filter_map(|key| match attribute_year(&key) {
                Some(year) => Some(Attribute { key, year }),
                None => {
                    debug!(key = %key, "skipping attribute without a year");
                    None
                }
            })
            .collect();

        if attributes.is_empty() {
            return Err(DataError::NoAttributes);
        }

        if !attributes.windows(2).all(|w| w[0].year < w[1].year) {
            warn!("year attributes are not in ascending order, sorting");
            attributes.sort_by_key(|a| a.year);
            attributes.dedup_by_key(|a| a.year);
        }

        Ok(Self { attributes })
    }

    pub fn from_years(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            attributes: years
                .into_iter()
                .map(|year| Attribute { key: format!("pct_{year}"), year })
                .collect(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.attributes.first().map(|a| a.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.attributes.last().map(|a| a.year)
    }
}
