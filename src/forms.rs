//! Forms bound from `application/x-www-form-urlencoded` bodies.
//!
//! Missing fields deserialize as empty strings so that they surface as
//! field errors instead of extractor rejections, and unknown fields are
//! ignored. A form is cleaned (whitespace trimmed) before it is validated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::db::Article;

pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

pub trait Clean {
    fn clean(self) -> Self;
}

/// A form as it is handed to the page context: submitted (or initial) data
/// plus per-field error messages.
#[derive(Debug, Serialize)]
pub struct BoundForm<T> {
    pub data: T,
    pub errors: FieldErrors,
}

impl<T> BoundForm<T> {
    pub fn unbound(data: T) -> Self {
        Self {
            data,
            errors: FieldErrors::new(),
        }
    }

    pub fn with_errors(data: T, errors: &ValidationErrors) -> Self {
        Self {
            data,
            errors: field_messages(errors),
        }
    }
}

/// Cleans and validates submitted data, handing the form back with its
/// errors when validation fails.
pub fn bind<T: Clean + Validate>(data: T) -> Result<T, BoundForm<T>> {
    let data = data.clean();
    match data.validate() {
        Ok(()) => Ok(data),
        Err(errors) => Err(BoundForm::with_errors(data, &errors)),
    }
}

pub fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field, messages)
        })
        .collect()
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "comment can't be blank"),
        length(max = 140, message = "comment can't be longer than 140 characters")
    )]
    pub content: String,
}

impl Clean for CommentForm {
    fn clean(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct ArticleForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "title can't be blank"),
        length(max = 255, message = "title can't be longer than 255 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "body can't be blank"))]
    pub body: String,
}

impl Clean for ArticleForm {
    fn clean(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}

impl From<&Article> for ArticleForm {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            body: article.body.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(
        non_control_character(message = "user name can't contain control characters"),
        length(min = 1, message = "user name can't be blank"),
        length(max = 64, message = "too long user name")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "email can't be blank"),
        length(max = 64, message = "too long email address"),
        email(message = "invalid email address")
    )]
    pub email: String,

    #[serde(default, skip_serializing)]
    #[validate(
        non_control_character(message = "password can't contain control characters"),
        length(min = 8, message = "password must be at least 8 characters long"),
        length(max = 64, message = "too long password")
    )]
    pub password: String,
}

impl Clean for SignupForm {
    fn clean(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "user name can't be blank"))]
    pub username: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 1, message = "password can't be blank"))]
    pub password: String,
}

impl Clean for LoginForm {
    fn clean(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comment_is_rejected_after_trimming() {
        let invalid = bind(CommentForm {
            content: "   \n".into(),
        })
        .unwrap_err();

        assert_eq!(invalid.data.content, "");
        assert_eq!(invalid.errors["content"], vec!["comment can't be blank"]);
    }

    #[test]
    fn long_comment_is_rejected() {
        let invalid = bind(CommentForm {
            content: "x".repeat(141),
        })
        .unwrap_err();

        assert_eq!(
            invalid.errors["content"],
            vec!["comment can't be longer than 140 characters"]
        );
    }

    #[test]
    fn valid_article_is_trimmed() {
        let form = bind(ArticleForm {
            title: "  Hello ".into(),
            body: "World\n".into(),
        })
        .unwrap();

        assert_eq!(form.title, "Hello");
        assert_eq!(form.body, "World");
    }

    #[test]
    fn article_form_reports_every_bad_field() {
        let invalid = bind(ArticleForm::default()).unwrap_err();

        assert_eq!(
            invalid.errors.keys().copied().collect::<Vec<_>>(),
            vec!["body", "title"]
        );
    }

    #[test]
    fn signup_never_echoes_password() {
        let invalid = bind(SignupForm {
            username: "reporter".into(),
            email: "not-an-email".into(),
            password: "hunter22hunter22".into(),
        })
        .unwrap_err();

        let rendered = serde_json::to_value(&invalid).unwrap();
        assert!(rendered["data"].get("password").is_none());
        assert_eq!(rendered["errors"]["email"][0], "invalid email address");
    }

    #[test]
    fn missing_and_unknown_fields_are_tolerated() {
        let form: CommentForm = serde_json::from_str(r#"{"article": 9}"#).unwrap();
        assert_eq!(form.content, "");
    }
}
