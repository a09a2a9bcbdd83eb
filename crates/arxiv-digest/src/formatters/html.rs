//! Static HTML page for the latest digest.

use chrono::NaiveDateTime;

/// Shown when no digest exists yet.
pub const EMPTY_DIGEST: &str = "No papers available yet.";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>arXiv Daily Digest</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; }
        h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
        .meta { color: #666; font-size: 0.9em; margin: 5px 0; }
        .content { line-height: 1.6; }
    </style>
</head>
<body>
    <h1>arXiv Daily Digest - {{today}}</h1>
    <div class="meta">Updated: {{update_time}}</div>
    <div class="content">{{content}}</div>
</body>
</html>
"#;

/// Render the page around the digest text.
///
/// The text is HTML-escaped and line breaks become `<br>`.
#[must_use]
pub fn format_page_html(digest: &str, now: NaiveDateTime) -> String {
    let content = escape_html(digest).replace('\n', "<br>");
    TEMPLATE
        .replace("{{today}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{update_time}}", &now.format("%Y-%m-%d %H:%M").to_string())
        .replace("{{content}}", &content)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_page_escapes_and_breaks_lines() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(8, 5, 0).unwrap();
        let html = format_page_html("## A\n<b>x</b> & y", now);
        assert!(html.contains("arXiv Daily Digest - 2024-03-15"));
        assert!(html.contains("Updated: 2024-03-15 08:05"));
        assert!(html.contains("## A<br>&lt;b&gt;x&lt;/b&gt; &amp; y"));
    }
}
