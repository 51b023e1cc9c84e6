//! Form input and validation
//!
//! Each HTML form has a request struct (deserialized from the urlencoded body),
//! a static field description for the page documents, and a validator that
//! returns either the cleaned value or the per-field errors.
use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

const REQUIRED: &str = "This field is required.";

/// Column limits of the `users` and `posts` tables, in characters.
pub const USERNAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const TITLE_MAX_CHARS: usize = 200;

/// One input of a form as the page document describes it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub input: &'static str,
    pub required: bool,
}

const fn field(name: &'static str, input: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        input,
        required: true,
    }
}

/// Form description carried by page documents in place of rendered HTML.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub initial: BTreeMap<&'static str, String>,
}

impl FormView {
    fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            fields,
            initial: BTreeMap::new(),
        }
    }

    pub fn with_initial(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.initial.insert(field, value.into());
        self
    }
}

// =====================================================================
// Accounts
// =====================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(
        length(min = 1, message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

pub const REGISTRATION_FIELDS: &[FieldSpec] = &[
    field("username", "text"),
    field("email", "email"),
    field("password1", "password"),
    field("password2", "password"),
];

pub fn registration_form() -> FormView {
    FormView::new("registration", REGISTRATION_FIELDS)
}

/// Cleaned registration input. Uniqueness is checked against storage later.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(form: &RegistrationForm) -> Result<Registration, FieldErrors> {
    let form = RegistrationForm {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        ..form.clone()
    };

    let mut errors = form
        .validate()
        .map(|_| FieldErrors::new())
        .unwrap_or_else(FieldErrors::from);

    // An empty email is already reported as required; drop the format message.
    if form.email.is_empty() {
        errors.replace("email", REQUIRED);
    } else if too_long(&form.email, EMAIL_MAX_CHARS) {
        errors.replace("email", max_chars_message(EMAIL_MAX_CHARS));
    }
    if too_long(&form.username, USERNAME_MAX_CHARS) {
        errors.add("username", max_chars_message(USERNAME_MAX_CHARS));
    }

    if !form.password1.is_empty()
        && !form.password2.is_empty()
        && form.password1 != form.password2
    {
        errors.add("password2", "Passwords must match.");
    }

    errors.into_result(Registration {
        username: form.username,
        email: form.email,
        password: form.password1,
    })
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

pub const LOGIN_FIELDS: &[FieldSpec] = &[field("username", "text"), field("password", "password")];

pub fn login_form() -> FormView {
    FormView::new("login", LOGIN_FIELDS)
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn validate_login(form: &LoginForm) -> Result<Credentials, FieldErrors> {
    form.validate().map_err(FieldErrors::from)?;
    Ok(Credentials {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    })
}

// =====================================================================
// Posts and comments
// =====================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub body: String,
}

pub const POST_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        input: "text",
        required: false,
    },
    field("body", "textarea"),
];

pub fn post_form() -> FormView {
    FormView::new("post", POST_FIELDS)
}

#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub body: String,
}

pub fn validate_post(form: &PostForm) -> Result<PostInput, FieldErrors> {
    let title = form.title.trim().to_string();
    let (body, mut errors) = match required_text("body", &form.body) {
        Ok(body) => (body, FieldErrors::new()),
        Err(errors) => (String::new(), errors),
    };

    if too_long(&title, TITLE_MAX_CHARS) {
        errors.add("title", max_chars_message(TITLE_MAX_CHARS));
    }

    errors.into_result(PostInput { title, body })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub body: String,
}

pub const COMMENT_FIELDS: &[FieldSpec] = &[field("body", "textarea")];

pub fn comment_form() -> FormView {
    FormView::new("comment", COMMENT_FIELDS)
}

pub fn reply_form() -> FormView {
    FormView::new("reply", COMMENT_FIELDS)
}

/// Shared by top-level comments and replies.
pub fn validate_comment(form: &CommentForm) -> Result<String, FieldErrors> {
    required_text("body", &form.body)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search: Option<String>,
}

pub const SEARCH_FIELDS: &[FieldSpec] = &[field("search", "text")];

pub fn search_form() -> FormView {
    FormView::new("search", SEARCH_FIELDS)
}

pub fn validate_search(form: &SearchForm) -> Result<String, FieldErrors> {
    required_text("search", form.search.as_deref().unwrap_or_default())
}

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn max_chars_message(max: usize) -> String {
    format!("Ensure this value has at most {} characters.", max)
}

fn required_text(name: &str, value: &str) -> Result<String, FieldErrors> {
    let trimmed = value.trim();
    let mut errors = FieldErrors::new();
    if trimmed.is_empty() {
        errors.add(name, REQUIRED);
    }
    errors.into_result(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_valid_data() {
        let form = RegistrationForm {
            username: "benyamin".into(),
            email: "beni@gmail.com".into(),
            password1: "1234".into(),
            password2: "1234".into(),
        };
        let cleaned = validate_registration(&form).expect("valid registration");
        assert_eq!(cleaned.username, "benyamin");
        assert_eq!(cleaned.password, "1234");
    }

    #[test]
    fn registration_empty_data_reports_every_field() {
        let errors = validate_registration(&RegistrationForm::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("email"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn registration_password_mismatch() {
        let form = RegistrationForm {
            username: "beni".into(),
            email: "beni@gmail.com".into(),
            password1: "1234".into(),
            password2: "4321".into(),
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("password2"));
    }

    #[test]
    fn registration_invalid_email() {
        let form = RegistrationForm {
            username: "beni".into(),
            email: "not-an-email".into(),
            password1: "1234".into(),
            password2: "1234".into(),
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("email"));
    }

    #[test]
    fn login_valid_data() {
        let form = LoginForm {
            username: "beni".into(),
            password: "1234".into(),
        };
        assert!(validate_login(&form).is_ok());
    }

    #[test]
    fn login_empty_data() {
        let errors = validate_login(&LoginForm::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn search_form_validation() {
        let form = SearchForm {
            search: Some("first post".into()),
        };
        assert_eq!(validate_search(&form).as_deref(), Ok("first post"));
        assert_eq!(validate_search(&SearchForm::default()).unwrap_err().len(), 1);
    }

    #[test]
    fn comment_form_validation() {
        let form = CommentForm {
            body: "this is first comment".into(),
        };
        assert!(validate_comment(&form).is_ok());
        assert_eq!(validate_comment(&CommentForm::default()).unwrap_err().len(), 1);
    }

    #[test]
    fn post_form_validation() {
        let form = PostForm {
            title: String::new(),
            body: "this is first post".into(),
        };
        let input = validate_post(&form).expect("valid post");
        assert_eq!(input.body, "this is first post");

        let errors = validate_post(&PostForm::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("body"));
    }

    #[test]
    fn registration_enforces_column_limits() {
        let form = RegistrationForm {
            username: "u".repeat(USERNAME_MAX_CHARS),
            email: "beni@gmail.com".into(),
            password1: "1234".into(),
            password2: "1234".into(),
        };
        assert!(validate_registration(&form).is_ok());

        let form = RegistrationForm {
            username: "u".repeat(USERNAME_MAX_CHARS + 1),
            email: format!("beni@{}.com", "e".repeat(EMAIL_MAX_CHARS)),
            ..form
        };
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("username"),
            Some(&[max_chars_message(USERNAME_MAX_CHARS)][..])
        );
        assert_eq!(
            errors.get("email"),
            Some(&[max_chars_message(EMAIL_MAX_CHARS)][..])
        );
    }

    #[test]
    fn post_title_is_capped() {
        let form = PostForm {
            title: "t".repeat(TITLE_MAX_CHARS),
            body: "body".into(),
        };
        assert!(validate_post(&form).is_ok());

        let form = PostForm {
            title: "t".repeat(300),
            body: String::new(),
        };
        let errors = validate_post(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("title"));
        assert!(errors.contains("body"));
    }

    #[test]
    fn whitespace_only_body_is_empty() {
        let form = PostForm {
            title: "title".into(),
            body: "   \n ".into(),
        };
        assert!(validate_post(&form).is_err());
    }
}
