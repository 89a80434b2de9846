//! Eligibility configuration.
//!
//! The configuration document is a JSON object mapping category names to
//! arrays of role-eligible group names:
//!
//! ```json
//! {
//!   "Original_Role_Groups": ["Administrators", "Users"],
//!   "Exchange_Server_Groups": ["Exchange Admins"]
//! }
//! ```
//!
//! Categories are an *ordered* precedence list: [`LEADER_CATEGORY`] always
//! comes first when present, the remaining categories keep their declared
//! order.  Group-name matching is case-insensitive to tolerate directory
//! casing variance.

use std::collections::HashSet;
use std::path::Path;

use crate::error::PipelineError;

/// Category name treated as the precedence leader.
pub const LEADER_CATEGORY: &str = "Original_Role_Groups";

/// One eligibility category: a name and its case-folded member set.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    members: HashSet<String>,
}

impl Category {
    /// Build a category from a name and its eligible group names.
    pub fn new<M: AsRef<str>>(name: impl Into<String>, members: impl IntoIterator<Item = M>) -> Self {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Category name as declared in the configuration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the group name is eligible under this category.
    #[must_use]
    pub fn contains(&self, group_name: &str) -> bool {
        self.members.contains(&group_name.trim().to_lowercase())
    }
}

/// Ordered eligibility configuration; the leader category first.
#[derive(Debug, Clone, Default)]
pub struct EligibilityConfig {
    categories: Vec<Category>,
}

impl EligibilityConfig {
    /// Load the configuration from a JSON file.
    ///
    /// A missing file or an unparsable/mis-shaped document is fatal.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::MissingConfig(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_json(&json).map_err(|reason| PipelineError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| e.to_string())?;

        let mut categories = Vec::with_capacity(parsed.len());
        for (name, value) in parsed {
            let members: Vec<String> = serde_json::from_value(value)
                .map_err(|_| format!("category '{name}' must be an array of group names"))?;
            categories.push(Category::new(name, members));
        }

        // Precedence: the leader category first, the rest in declared order.
        categories.sort_by_key(|c| usize::from(c.name() != LEADER_CATEGORY));

        Ok(Self { categories })
    }

    /// Categories in precedence order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_category_is_hoisted_to_front() {
        let config = EligibilityConfig::from_json(
            r#"{
                "BuiltIn_AD_Groups": ["Domain Admins"],
                "Original_Role_Groups": ["Administrators", "Users"],
                "Exchange_Server_Groups": ["Exchange Admins"]
            }"#,
        )
        .expect("config should parse");

        let names: Vec<&str> = config.categories().iter().map(Category::name).collect();
        assert_eq!(
            names,
            vec![
                "Original_Role_Groups",
                "BuiltIn_AD_Groups",
                "Exchange_Server_Groups"
            ],
            "leader first, remaining categories in declared order"
        );
    }

    #[test]
    fn group_name_matching_is_case_insensitive() {
        let config = EligibilityConfig::from_json(r#"{"Original_Role_Groups": ["Administrators"]}"#)
            .expect("config should parse");

        let leader = &config.categories()[0];
        assert!(leader.contains("ADMINISTRATORS"));
        assert!(leader.contains("  administrators "));
        assert!(!leader.contains("Operators"));
    }

    #[test]
    fn non_array_category_is_rejected() {
        let err = EligibilityConfig::from_json(r#"{"Original_Role_Groups": "Administrators"}"#)
            .expect_err("scalar category should fail");
        assert!(err.contains("Original_Role_Groups"), "got: {err}");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(EligibilityConfig::from_json("not json").is_err());
    }
}
