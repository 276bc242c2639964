use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of generated annotation ids.
pub const ANNOTATION_ID_PREFIX: &str = "annotation_";

/// A note attached to a feature object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub position: [f64; 3],
    pub contents: Vec<AnnotationContent>,
    /// Name of the object the note is attached to.
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationContent {
    /// Whoever wrote the message: a plain name or a user record such as
    /// `{"username": ..., "display_name": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(rename = "value")]
    pub message: String,
}

impl Annotation {
    pub fn new(parent: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            position,
            contents: Vec::new(),
            parent: parent.into(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>, user: Option<Value>) -> Self {
        self.contents.push(AnnotationContent {
            user,
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_use_user_and_value_keys() {
        let note =
            Annotation::new("Box 1", [0.0; 3]).with_message("check this", Some("ada".into()));
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["contents"][0]["user"], "ada");
        assert_eq!(value["contents"][0]["value"], "check this");
        assert_eq!(value["parent"], "Box 1");
    }

    #[test]
    fn user_records_are_kept_as_written() {
        let encoded = r#"{
            "position": [0, 0, 0],
            "contents": [
                {"user": {"username": "ada", "display_name": "Ada"}, "value": "hi"},
                {"value": "anonymous"}
            ],
            "parent": "Box 1"
        }"#;
        let note: Annotation = serde_json::from_str(encoded).unwrap();
        assert_eq!(note.contents[0].user.as_ref().unwrap()["username"], "ada");
        assert!(note.contents[1].user.is_none());

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["contents"][0]["user"]["display_name"], "Ada");
        assert!(value["contents"][1].get("user").is_none());
    }
}
