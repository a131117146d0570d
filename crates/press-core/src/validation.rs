//! Request validation for post operations.
//!
//! Handlers decode whatever body they receive into a [`PostForm`] and hand it to
//! [`validate_store`] or [`validate_update`]. Every failing field is reported,
//! and nothing downstream runs unless the whole form is valid.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{PostChanges, UploadedFile};

/// Maximum length of a post title, in characters.
pub const TITLE_MAX_LENGTH: usize = 255;

/// Every field the post rules read. Anything else in a request is ignored.
pub const POST_FIELDS: [&str; 3] = ["title", "description", "image"];

/// A single submitted form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(UploadedFile),
}

/// Raw, unvalidated request fields keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    fields: HashMap<String, FieldValue>,
}

impl PostForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Text(value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.insert(name, FieldValue::File(file));
        self
    }

    /// Insert a field. A repeated name replaces the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Take a field out of the form, treating blank values as absent.
    fn take(&mut self, name: &str) -> Option<FieldValue> {
        match self.fields.remove(name)? {
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| FieldValue::Text(trimmed.to_string()))
            }
            FieldValue::File(file) if file.is_blank() => None,
            file => Some(file),
        }
    }
}

impl FromIterator<(String, FieldValue)> for PostForm {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Field name -> messages, in the order the rules ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Summary line: the first message, plus a count of the rest.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.first_message() else {
            return write!(f, "The given data was invalid.");
        };
        match self.len() - 1 {
            0 => write!(f, "{first}"),
            1 => write!(f, "{first} (and 1 more error)"),
            n => write!(f, "{first} (and {n} more errors)"),
        }
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPostInput {
    pub title: String,
    pub description: String,
    pub image: Option<UploadedFile>,
}

/// Validated input for updating a post. `None` fields were not submitted.
#[derive(Debug, Clone, Default)]
pub struct PostUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<UploadedFile>,
}

impl PostUpdateInput {
    /// Change set for the repository, with the stored image path substituted.
    pub fn into_changes(self, image_path: Option<String>) -> PostChanges {
        PostChanges {
            title: self.title,
            description: self.description,
            image: image_path,
        }
    }
}

/// Rules for `POST /posts`: title and description required, image optional file.
pub fn validate_store(mut form: PostForm) -> Result<NewPostInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title =
        required(&mut errors, "title", form.take("title")).and_then(|t| title_length(&mut errors, t));
    let description = required(&mut errors, "description", form.take("description"));
    let image = optional_file(&mut errors, "image", form.take("image"));

    match (title, description) {
        (Some(title), Some(description)) if errors.is_empty() => Ok(NewPostInput {
            title,
            description,
            image,
        }),
        _ => Err(errors),
    }
}

/// Rules for `PATCH /posts/{id}`: the store rules, applied only to submitted keys.
pub fn validate_update(mut form: PostForm) -> Result<PostUpdateInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = form
        .contains("title")
        .then(|| required(&mut errors, "title", form.take("title")))
        .flatten()
        .and_then(|t| title_length(&mut errors, t));
    let description = form
        .contains("description")
        .then(|| required(&mut errors, "description", form.take("description")))
        .flatten();
    let image = optional_file(&mut errors, "image", form.take("image"));

    errors.into_result(PostUpdateInput {
        title,
        description,
        image,
    })
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<FieldValue>) -> Option<String> {
    match value {
        None => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(FieldValue::File(_)) => {
            errors.add(field, format!("The {field} field must be a string."));
            None
        }
        Some(FieldValue::Text(text)) => Some(text),
    }
}

fn title_length(errors: &mut ValidationErrors, title: String) -> Option<String> {
    if title.chars().count() > TITLE_MAX_LENGTH {
        errors.add(
            "title",
            format!("The title field must not be greater than {TITLE_MAX_LENGTH} characters."),
        );
        return None;
    }
    Some(title)
}

fn optional_file(errors: &mut ValidationErrors, field: &str, value: Option<FieldValue>) -> Option<UploadedFile> {
    match value {
        None => None,
        Some(FieldValue::File(file)) => Some(file),
        Some(FieldValue::Text(_)) => {
            errors.add(field, format!("The {field} field must be a file."));
            None
        }
    }
}
