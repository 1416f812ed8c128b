//! Slack Block Kit payload types.
//!
//! Only the block kinds the notifier emits are modeled; the serialized
//! form matches what Slack's `postMessage` expects through the gateway.

use serde::Serialize;

/// A single Block Kit block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fields: Option<Vec<TextObject>>,
    },
    Divider,
    Actions {
        elements: Vec<Element>,
    },
}

impl Block {
    /// Plain-text header block.
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: TextObject::plain(text),
        }
    }

    /// Section block with two-column markdown fields.
    pub fn fields(fields: Vec<TextObject>) -> Self {
        Self::Section {
            text: None,
            fields: Some(fields),
        }
    }

    /// Section block with a single markdown body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Section {
            text: Some(TextObject::mrkdwn(text)),
            fields: None,
        }
    }

    pub fn divider() -> Self {
        Self::Divider
    }

    /// Actions block with a single primary link button.
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Actions {
            elements: vec![Element::Button {
                text: TextObject::plain(label),
                url: url.into(),
                style: "primary".to_string(),
            }],
        }
    }
}

/// Block Kit text object, plain or markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Interactive element inside an actions block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        url: String,
        style: String,
    },
}
