use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Characters of the body used for the slug when there is no title.
const BODY_SLUG_CHARS: usize = 30;

/// Width of the `posts.slug` column.
pub const SLUG_MAX_CHARS: usize = 200;

/// Slug used when the source text has nothing URL-safe in it.
const FALLBACK_SLUG: &str = "post";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Canonical detail URL.
    pub fn detail_path(&self) -> String {
        format!("/post/{}/{}/", self.id, self.slug)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
}

/// Owner edits applied by `update_post`.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub slug: String,
    pub body: String,
}

/// Lowercase ASCII alphanumerics, with runs of whitespace, `-` and `_`
/// collapsed to a single `-`. Everything else is dropped.
pub fn slugify(text: &str) -> String {
    let mut out = String::new();
    let mut prev_dash = false;
    for c in text.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_dash = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Slug from the title when it has one, otherwise from the start of the body.
/// Never longer than `SLUG_MAX_CHARS`.
pub fn derive_slug(title: &str, body: &str) -> String {
    let mut slug = if title.trim().is_empty() {
        let head: String = body.chars().take(BODY_SLUG_CHARS).collect();
        slugify(&head)
    } else {
        slugify(title)
    };
    if slug.len() > SLUG_MAX_CHARS {
        // ASCII only, so byte offsets are char boundaries.
        slug.truncate(SLUG_MAX_CHARS);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("First  Post"), "first-post");
        assert_eq!(slugify("  hello__world -- again "), "hello-world-again");
        assert_eq!(slugify("this is first post :)"), "this-is-first-post");
    }

    #[test]
    fn slug_prefers_title() {
        assert_eq!(derive_slug("First post", "something else"), "first-post");
    }

    #[test]
    fn slug_falls_back_to_body_prefix() {
        let body = "this is a rather long body that keeps going past the cut";
        assert_eq!(derive_slug("", body), "this-is-a-rather-long-body-tha");
        assert_eq!(derive_slug("   ", "this is first post"), "this-is-first-post");
    }

    #[test]
    fn slug_fits_column() {
        let title = "word ".repeat(100);
        let slug = derive_slug(&title, "body");
        assert!(slug.len() <= SLUG_MAX_CHARS);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn slug_never_empty() {
        assert_eq!(derive_slug("", "!!! ???"), "post");
    }
}
