//! Output formatting for the digest document and the static page.

mod html;
mod markdown;

pub use html::{EMPTY_DIGEST, format_page_html};
pub use markdown::{format_digest_markdown, format_paper_markdown, format_topic_markdown};
