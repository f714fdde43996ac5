use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A timestamp as the feeds send it: either text (ISO, RFC 2822, numeric
/// string) or a bare JSON number of epoch seconds or milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseTimestamp {
    Number(f64),
    Text(String),
}

impl From<&str> for LooseTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One job record. Every field tolerates `null` as well as absence, since the
/// backend forwards upstream values without normalising them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListing {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub salary: Option<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub job_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub posted: Option<LooseTimestamp>,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
}

impl JobListing {
    pub fn is_remote(&self) -> bool {
        self.job_type.to_lowercase().contains("remote")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    pub published: Option<LooseTimestamp>,
    pub url: Option<String>,
}

/// Response body of the jobs endpoint. Only `jobs` is required; the
/// aggregates describe the backend's full filtered set, not the current page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsPayload {
    pub jobs: Vec<JobListing>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default = "first_page", deserialize_with = "null_as_first_page")]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_counts: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub onsite_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from_cache: bool,
    #[serde(default)]
    pub fetched_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub news: Vec<NewsItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub fetched_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from_cache: bool,
}

fn first_page() -> u32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_first_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(first_page))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
