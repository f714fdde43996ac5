//! Markup fragments for job cards, news cards, the headline ticker and
//! loading skeletons. Every record-sourced value is escaped before it is
//! interpolated.

use chrono::{DateTime, Utc};

use super::categorizer::categorize_news;
use super::domain::{JobListing, NewsItem};
use super::sanitize::{clean_text, escape_html, strip_tags};
use super::time::{format_date, relative_time_at};

pub const SNIPPET_CHARS: usize = 180;
pub const MAX_CARD_TAGS: usize = 5;
pub const MAX_TICKER_NEWS: usize = 10;
pub const DEFAULT_SKELETON_CLASS: &str = "skeleton-card";

const PLACEHOLDER_URL: &str = "#";

/// Badge class per exact source name.
pub const SOURCE_BADGES: &[(&str, &str)] = &[
    ("Remotive", "badge-src-remotive"),
    ("RemoteOK", "badge-src-remoteok"),
    ("Arbeitnow", "badge-src-arbeitnow"),
];

pub const DEFAULT_SOURCE_BADGE: &str = "badge-src-remoteok";

/// Headlines that always lead the ticker, ahead of live news titles.
pub const STATIC_HEADLINES: &[&str] = &[
    "AI/ML Hiring +88% YoY",
    "Amazon layoffs: 14,000+ roles eliminated",
    "eBay cuts 800 jobs (9% workforce)",
    "Software Engineers: +10% YoY",
    "Forward Deployed Engineers: 42x demand surge (LinkedIn)",
    "Entry-level tech down -73% (Ravio 2026)",
    "AI skills now in 58% of tech postings",
    "Cybersecurity: 750K unfilled US openings",
];

pub fn source_badge_class(source: &str) -> &'static str {
    SOURCE_BADGES
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, class)| *class)
        .unwrap_or(DEFAULT_SOURCE_BADGE)
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

fn link_target(url: Option<&str>) -> String {
    escape_html(url.filter(|value| !value.is_empty()).unwrap_or(PLACEHOLDER_URL))
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn render_job_card(job: &JobListing, now: DateTime<Utc>) -> String {
    let type_badge = if job.is_remote() {
        r#"<span class="badge badge-remote">Remote</span>"#
    } else {
        r#"<span class="badge badge-ft">Full-time</span>"#
    };

    let tags: String = job
        .tags
        .iter()
        .take(MAX_CARD_TAGS)
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect();

    let salary = job
        .salary
        .as_deref()
        .map(|salary| format!(r#"<span class="job-salary">{}</span>"#, escape_html(salary)))
        .unwrap_or_default();
    let location = job
        .location
        .as_deref()
        .map(|location| {
            format!(
                r#"<span class="job-location">📍 {}</span>"#,
                escape_html(location)
            )
        })
        .unwrap_or_default();
    let snippet = if job.snippet.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="job-snippet">{}…</p>"#,
            escape_html(truncate_chars(&job.snippet, SNIPPET_CHARS))
        )
    };

    let href = link_target(job.url.as_deref());
    let time = relative_time_at(job.posted.as_ref(), now);

    format!(
        concat!(
            r#"<div class="job-card">"#,
            r#"<div class="job-left">"#,
            r#"<a class="job-title" href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>"#,
            r#"<div class="job-meta"><span class="job-company">{company}</span>{location}{salary}</div>"#,
            "{snippet}",
            r#"<div class="tags-row">{type_badge}<span class="badge {source_class}">{source}</span>{tags}</div>"#,
            "</div>",
            r#"<div class="job-right">"#,
            r#"<span class="job-time">{time}</span>"#,
            r#"<a class="apply-btn" href="{href}" target="_blank" rel="noopener noreferrer">Apply →</a>"#,
            "</div>",
            "</div>"
        ),
        href = href,
        title = escape_html(or_default(&job.title, "Untitled Role")),
        company = escape_html(&job.company),
        location = location,
        salary = salary,
        snippet = snippet,
        type_badge = type_badge,
        source_class = source_badge_class(&job.source),
        source = escape_html(&job.source),
        tags = tags,
        time = time,
    )
}

pub fn render_news_card(item: &NewsItem, now: DateTime<Utc>) -> String {
    let topic = categorize_news(item);
    let date = match format_date(item.published.as_ref()) {
        formatted if !formatted.is_empty() => formatted,
        _ => relative_time_at(item.published.as_ref(), now),
    };

    let snippet = if item.snippet.is_empty() {
        String::new()
    } else {
        let stripped = strip_tags(&item.snippet);
        format!(
            r#"<p class="news-snippet">{}</p>"#,
            clean_text(truncate_chars(&stripped, SNIPPET_CHARS))
        )
    };

    let href = link_target(item.url.as_deref());

    format!(
        concat!(
            r#"<div class="news-card topic-{topic}">"#,
            r#"<div class="news-header">"#,
            r#"<span class="news-topic-badge">{label}</span>"#,
            r#"<span class="news-source-badge">{source}</span>"#,
            "</div>",
            r#"<a class="news-title" href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>"#,
            "{snippet}",
            r#"<div class="news-footer"><span>{date}</span>"#,
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">Read →</a></div>"#,
            "</div>"
        ),
        topic = topic.slug(),
        label = topic.label(),
        source = escape_html(&item.source),
        href = href,
        title = clean_text(or_default(&item.title, "Untitled")),
        snippet = snippet,
        date = date,
    )
}

/// Static headlines followed by up to ten non-empty news titles. Unescaped.
pub fn ticker_headlines(news: &[NewsItem]) -> Vec<String> {
    STATIC_HEADLINES
        .iter()
        .map(|headline| headline.to_string())
        .chain(
            news.iter()
                .take(MAX_TICKER_NEWS)
                .map(|item| item.title.clone())
                .filter(|title| !title.is_empty()),
        )
        .collect()
}

/// Escaped ticker entries, the combined headline list repeated twice so the
/// scrolling strip loops without a visible seam.
pub fn ticker_entries(news: &[NewsItem]) -> Vec<String> {
    let headlines = ticker_headlines(news);
    headlines
        .iter()
        .chain(headlines.iter())
        .map(|headline| {
            format!(
                r#"<span class="ticker-item"><span class="ticker-dot"></span>{}</span>"#,
                escape_html(headline)
            )
        })
        .collect()
}

pub fn render_ticker(news: &[NewsItem]) -> String {
    ticker_entries(news).concat()
}

pub fn skeletons(count: usize, class: &str) -> String {
    format!(r#"<div class="skeleton {}"></div>"#, class).repeat(count)
}
