//! Card and grid markup
//!
//! Pure string builders shared by the block and preview paths. Every value
//! taken from an [`Article`] goes through [`crate::sanitize`] before it is
//! concatenated.

use crate::article::{format_published_date, Article};
use crate::config::RenderConfig;
use crate::sanitize::{
    collapse_whitespace, escape_attr, escape_text, safe_url, sanitize_rich_text,
};

/// Message shown whenever there are no articles to display
pub const EMPTY_MESSAGE: &str = "No articles are available right now. Please try again later.";

/// Link target used when an article has no usable URL
pub const PLACEHOLDER_URL: &str = "#";

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Warning => "devcards-notice devcards-notice-warning",
            NoticeKind::Error => "devcards-notice devcards-notice-error",
        }
    }

    fn role(self) -> &'static str {
        match self {
            NoticeKind::Warning => "status",
            NoticeKind::Error => "alert",
        }
    }
}

/// Render a notice block; `message` is escaped
pub fn render_notice(kind: NoticeKind, message: &str) -> String {
    format!(
        "<div class=\"{}\" role=\"{}\">{}</div>",
        kind.class(),
        kind.role(),
        escape_text(message)
    )
}

/// Render a single article card
pub fn render_card(article: &Article, config: &RenderConfig) -> String {
    let title = escape_text(&collapse_whitespace(article.display_title()));
    let title_attr = escape_attr(&collapse_whitespace(article.display_title()));
    let url = safe_url(article.url.as_deref()).unwrap_or_else(|| PLACEHOLDER_URL.to_string());
    let description = article
        .description
        .as_deref()
        .map(sanitize_rich_text)
        .filter(|d| !d.is_empty());
    let published_date = format_published_date(article.published_at.as_deref());
    let cover_image = if config.show_image {
        safe_url(article.cover_image.as_deref())
    } else {
        None
    };

    let mut html = String::from("<article class=\"devcards-card\">");

    if let Some(src) = cover_image {
        html.push_str("<div class=\"devcards-card-image\">");
        html.push_str(&format!(
            "<img src=\"{src}\" alt=\"{title_attr}\" loading=\"lazy\" />"
        ));
        html.push_str("</div>");
    }

    html.push_str("<div class=\"devcards-card-content\">");

    html.push_str("<h3 class=\"devcards-card-title\">");
    html.push_str(&format!(
        "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{title}</a>"
    ));
    html.push_str("</h3>");

    if let Some(description) = description {
        html.push_str(&format!(
            "<p class=\"devcards-card-description\">{description}</p>"
        ));
    }

    html.push_str("<div class=\"devcards-card-meta\">");

    if let Some(author) = article.author_name() {
        html.push_str(&format!(
            "<span class=\"devcards-card-author\">{}</span>",
            escape_text(&collapse_whitespace(author))
        ));
    }

    if let Some(date) = published_date {
        html.push_str(&format!(
            "<span class=\"devcards-card-date\">{}</span>",
            escape_text(&date)
        ));
    }

    if let Some(minutes) = article.reading_time().filter(|_| config.show_reading_time) {
        html.push_str(&format!(
            "<span class=\"devcards-card-reading-time\">{minutes} min read</span>"
        ));
    }

    if let Some(count) = article.reactions().filter(|_| config.show_reactions) {
        let label = if count == 1 { "reaction" } else { "reactions" };
        html.push_str(&format!(
            "<span class=\"devcards-card-reactions\">{count} {label}</span>"
        ));
    }

    html.push_str("</div>");
    html.push_str("</div>");
    html.push_str("</article>");

    html
}

/// Render the card grid, or the standard warning notice when there is
/// nothing to show
pub fn render_grid(articles: &[Article], config: &RenderConfig) -> String {
    if articles.is_empty() {
        return render_notice(NoticeKind::Warning, EMPTY_MESSAGE);
    }

    let columns = config.columns;
    let mut html = format!("<div class=\"devcards-wrapper\" data-columns=\"{columns}\">");
    html.push_str(&format!(
        "<div class=\"devcards-grid devcards-columns-{columns}\">"
    ));

    for article in articles {
        html.push_str(&render_card(article, config));
    }

    html.push_str("</div></div>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleAuthor;
    use crate::config::Columns;

    fn create_test_article(id: u64, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: Some(title.to_string()),
            description: Some("A <em>short</em> summary".to_string()),
            url: Some(format!("https://dev.to/test/{id}")),
            published_at: Some("2024-02-29T12:00:00Z".to_string()),
            cover_image: Some(format!("https://media.dev.to/{id}.png")),
            reading_time_minutes: Some(4),
            reactions_count: Some(12),
            user: Some(ArticleAuthor {
                name: Some("Test Author".to_string()),
                username: Some("tester".to_string()),
            }),
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_render_card_full() {
        let article = create_test_article(1, "Hello World");
        let html = render_card(&article, &RenderConfig::default());

        assert!(html.starts_with("<article class=\"devcards-card\">"));
        assert!(html.ends_with("</article>"));
        assert!(html.contains("<img src=\"https://media.dev.to/1.png\" alt=\"Hello World\""));
        assert!(html.contains("<a href=\"https://dev.to/test/1\" target=\"_blank\""));
        assert!(html.contains(">Hello World</a>"));
        assert!(html.contains("A <em>short</em> summary"));
        assert!(html.contains("<span class=\"devcards-card-date\">February 29, 2024</span>"));
        assert!(html.contains("4 min read"));
        assert!(html.contains("12 reactions"));
        assert!(html.contains("Test Author"));
    }

    #[test]
    fn test_render_card_missing_title() {
        let mut article = create_test_article(1, "");
        article.title = None;

        let html = render_card(&article, &RenderConfig::default());

        assert!(html.contains(">No Title</a>"));
    }

    #[test]
    fn test_render_card_missing_url() {
        let mut article = create_test_article(1, "Untitled link");
        article.url = None;

        let html = render_card(&article, &RenderConfig::default());

        assert!(html.contains("<a href=\"#\""));
    }

    #[test]
    fn test_render_card_unsafe_url() {
        let mut article = create_test_article(1, "Sneaky");
        article.url = Some("javascript:alert(document.cookie)".to_string());
        article.cover_image = Some("javascript:alert(1)".to_string());

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("javascript:"));
        assert!(html.contains("<a href=\"#\""));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_card_escapes_script_title() {
        let article = create_test_article(1, "<script>alert(1)</script>");

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_render_card_escapes_title_in_alt() {
        let article = create_test_article(1, r#"Quote " onload="x"#);

        let html = render_card(&article, &RenderConfig::default());

        assert!(html.contains("alt=\"Quote &quot; onload=&quot;x\""));
    }

    #[test]
    fn test_render_card_hides_image_when_disabled() {
        let article = create_test_article(1, "No picture");
        let config = RenderConfig {
            show_image: false,
            ..RenderConfig::default()
        };

        let html = render_card(&article, &config);

        assert!(!html.contains("<img"));
        assert!(!html.contains("devcards-card-image"));
    }

    #[test]
    fn test_render_card_no_image_without_cover() {
        let mut article = create_test_article(1, "No cover");
        article.cover_image = None;

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_card_reading_time_rules() {
        let mut article = create_test_article(1, "Timing");

        for minutes in [Some(0), Some(-2), None] {
            article.reading_time_minutes = minutes;
            let html = render_card(&article, &RenderConfig::default());
            assert!(!html.contains("min read"), "minutes {minutes:?}");
        }

        article.reading_time_minutes = Some(6);
        let config = RenderConfig {
            show_reading_time: false,
            ..RenderConfig::default()
        };
        assert!(!render_card(&article, &config).contains("min read"));
    }

    #[test]
    fn test_render_card_reactions_rules() {
        let mut article = create_test_article(1, "Reactions");

        article.reactions_count = Some(1);
        assert!(render_card(&article, &RenderConfig::default()).contains("1 reaction<"));

        article.reactions_count = Some(0);
        assert!(!render_card(&article, &RenderConfig::default()).contains("reaction"));

        article.reactions_count = Some(5);
        let config = RenderConfig {
            show_reactions: false,
            ..RenderConfig::default()
        };
        assert!(!render_card(&article, &config).contains("reaction"));
    }

    #[test]
    fn test_render_card_invalid_date_omitted() {
        let mut article = create_test_article(1, "Dateless");
        article.published_at = Some("not a date".to_string());

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("devcards-card-date"));
    }

    #[test]
    fn test_render_card_description_sanitized() {
        let mut article = create_test_article(1, "Desc");
        article.description = Some("Nice<img src=x onerror=alert(1)> read".to_string());

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("onerror"));
        assert!(html.contains("<p class=\"devcards-card-description\">Nice read</p>"));
    }

    #[test]
    fn test_render_card_blank_description_omitted() {
        let mut article = create_test_article(1, "Desc");
        article.description = Some("<script>x()</script>".to_string());

        let html = render_card(&article, &RenderConfig::default());

        assert!(!html.contains("devcards-card-description"));
    }

    #[test]
    fn test_render_grid_empty() {
        let html = render_grid(&[], &RenderConfig::default());

        assert!(html.contains(EMPTY_MESSAGE));
        assert!(html.contains("devcards-notice-warning"));
        assert!(!html.contains("devcards-grid"));
    }

    #[test]
    fn test_render_grid_columns_tag() {
        let articles = vec![create_test_article(1, "One")];
        let config = RenderConfig {
            columns: Columns::TWO,
            ..RenderConfig::default()
        };

        let html = render_grid(&articles, &config);

        assert!(html.starts_with("<div class=\"devcards-wrapper\" data-columns=\"2\">"));
        assert!(html.contains("devcards-columns-2"));
    }

    #[test]
    fn test_render_grid_two_articles_with_out_of_range_columns() {
        let articles = vec![create_test_article(1, "One"), create_test_article(2, "Two")];
        let config = RenderConfig::from_attributes(&serde_json::json!({
            "columns": 5,
            "showImage": true,
            "showReadingTime": true
        }));

        let html = render_grid(&articles, &config);

        assert!(html.contains("data-columns=\"3\""));
        assert_eq!(count(&html, "<article class=\"devcards-card\">"), 2);
        assert_eq!(count(&html, "<img "), 2);
        assert_eq!(count(&html, "min read"), 2);
    }

    #[test]
    fn test_render_notice_escapes_message() {
        let html = render_notice(NoticeKind::Error, "<b>boom</b>");

        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("&lt;b&gt;boom&lt;/b&gt;"));
    }
}
