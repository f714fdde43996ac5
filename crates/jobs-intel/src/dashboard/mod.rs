//! Client-side core of the jobs intelligence dashboard: hash routing, the
//! jobs/news data client, and the record-to-markup pipeline.

pub mod categorizer;
pub mod charts;
pub mod client;
pub mod domain;
pub mod render;
pub mod route;
pub mod router;
pub mod sanitize;
pub mod time;

pub use categorizer::{categorize_news, Topic};
pub use charts::{ChartHandle, ChartRegistry};
pub use client::{DataClient, DataClientError, JobsQuery};
pub use domain::{JobListing, JobsPayload, LooseTimestamp, NewsItem, NewsPayload};
pub use route::Route;
pub use router::{Activation, InMemoryViews, Location, Router, ViewHost};
