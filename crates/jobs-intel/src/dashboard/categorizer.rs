use serde::Serialize;

use super::domain::NewsItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Layoffs,
    Ai,
    Hiring,
    Tech,
}

impl Topic {
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Layoffs => "layoffs",
            Self::Ai => "ai",
            Self::Hiring => "hiring",
            Self::Tech => "tech",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Layoffs => "Layoffs",
            Self::Ai => "AI",
            Self::Hiring => "Hiring",
            Self::Tech => "Tech",
        }
    }
}

pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

/// Evaluated top to bottom; the first rule with any matching keyword wins.
/// Keywords match as substrings of the lowercased title and snippet.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::Layoffs,
        keywords: &[
            "layoff",
            "laid off",
            "cut",
            "reduction",
            "downsiz",
            "fire",
            "eliminat",
            "job cut",
            "workforce",
        ],
    },
    TopicRule {
        topic: Topic::Ai,
        keywords: &[
            "ai",
            "artificial intelligence",
            "machine learning",
            "gpt",
            "llm",
            "openai",
            "gemini",
            "claude",
            "neural",
            "automation",
        ],
    },
    TopicRule {
        topic: Topic::Hiring,
        keywords: &[
            "hiring",
            "recruit",
            "job opening",
            "new role",
            "talent",
            "workforce",
            "h-1b",
            "salary",
            "remote work",
        ],
    },
];

pub const DEFAULT_TOPIC: Topic = Topic::Tech;

pub fn categorize_news(item: &NewsItem) -> Topic {
    categorize_text(&item.title, &item.snippet)
}

pub fn categorize_text(title: &str, snippet: &str) -> Topic {
    let text = format!("{title} {snippet}").to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|rule| rule.topic)
        .unwrap_or(DEFAULT_TOPIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_apply_in_priority_order() {
        let cases = [
            ("Big Tech layoffs continue", "", Topic::Layoffs),
            ("Startup lays off staff amid AI pivot", "Workforce reduction of 20%", Topic::Layoffs),
            ("OpenAI ships a new model", "", Topic::Ai),
            ("Banks resume Hiring for engineers", "", Topic::Hiring),
            ("Quarterly product update for browsers", "", Topic::Tech),
        ];

        for (title, snippet, expected) in cases {
            assert_eq!(categorize_text(title, snippet), expected, "title: {title}");
        }
    }

    #[test]
    fn layoff_beats_ai_when_both_present() {
        let item = NewsItem {
            title: "Layoff wave hits".to_string(),
            snippet: "Companies pour money into machine learning".to_string(),
            ..NewsItem::default()
        };
        assert_eq!(categorize_news(&item), Topic::Layoffs);
    }

    #[test]
    fn matching_is_substring_and_case_insensitive() {
        assert_eq!(categorize_text("DOWNSIZING at Acme", ""), Topic::Layoffs);
        assert_eq!(categorize_text("", "new LLM benchmarks"), Topic::Ai);
    }

    #[test]
    fn empty_item_is_generic() {
        assert_eq!(categorize_news(&NewsItem::default()), Topic::Tech);
    }
}
