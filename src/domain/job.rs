//! Declarative export jobs
//!
//! An [`ExportJob`] names one view by its (project, workbook, view) triple and
//! lists the filter-sets to render it with. Jobs are loaded once from the
//! jobs file and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};

/// A single key/value constraint applied to a view render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Filter {
    pub key: String,
    pub value: String,
}

impl Filter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<(String, String)> for Filter {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}

impl From<Filter> for (String, String) {
    fn from(filter: Filter) -> Self {
        (filter.key, filter.value)
    }
}

/// Filters applied together on one render; an empty set renders unfiltered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<Filter>);

impl FilterSet {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry of a job's `filters` list as written in the jobs file
///
/// `["Region", "East"]` is a single pair; `[["Region", "East"], ["Year", "2024"]]`
/// applies both pairs on the same render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterEntry {
    Pair(Filter),
    Combined(Vec<Filter>),
}

impl FilterEntry {
    fn to_filter_set(&self) -> FilterSet {
        match self {
            FilterEntry::Pair(filter) => FilterSet::new(vec![filter.clone()]),
            FilterEntry::Combined(filters) => FilterSet::new(filters.clone()),
        }
    }

    fn filters(&self) -> Vec<&Filter> {
        match self {
            FilterEntry::Pair(filter) => vec![filter],
            FilterEntry::Combined(filters) => filters.iter().collect(),
        }
    }
}

/// A declared export job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportJob {
    /// Workbook name (`name` in the jobs file)
    #[serde(rename = "name")]
    pub workbook: String,

    /// Project the workbook is published to
    pub project: String,

    /// View to render
    pub view: String,

    /// Filter-sets; absent, `null` or `[]` means one unfiltered render
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filters: Vec<FilterEntry>,
}

impl ExportJob {
    pub fn new(
        workbook: impl Into<String>,
        project: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self {
            workbook: workbook.into(),
            project: project.into(),
            view: view.into(),
            filters: Vec::new(),
        }
    }

    /// Add a single-pair filter-set (builder style)
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(FilterEntry::Pair(Filter::new(key, value)));
        self
    }

    /// Add a filter-set of several pairs applied together (builder style)
    pub fn with_filter_set(mut self, filters: Vec<Filter>) -> Self {
        self.filters.push(FilterEntry::Combined(filters));
        self
    }

    /// The filter-sets this job renders, in declaration order
    ///
    /// Always non-empty: a job without filters yields one empty set.
    pub fn filter_sets(&self) -> Vec<FilterSet> {
        if self.filters.is_empty() {
            return vec![FilterSet::default()];
        }
        self.filters.iter().map(FilterEntry::to_filter_set).collect()
    }

    /// Checks the job for blank names or filter keys
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.workbook),
            ("project", &self.project),
            ("view", &self.view),
        ] {
            if value.trim().is_empty() {
                return Err(format!("'{field}' cannot be empty"));
            }
        }

        if self
            .filters
            .iter()
            .flat_map(FilterEntry::filters)
            .any(|filter| filter.key.trim().is_empty())
        {
            return Err(format!(
                "filter keys cannot be empty (workbook '{}')",
                self.workbook
            ));
        }
        Ok(())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
