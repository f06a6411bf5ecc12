//! Classification policy.
//!
//! Partitions content by presentation type. Within a bucket, response order
//! is kept and the first item wins; later items stay in the data but are not
//! surfaced. Items of an unrecognised type land in no bucket.

use waypoint_core::{ContentItem, PresentationType};

/// Content split into one bucket per presentation type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub popup: Vec<ContentItem>,
    pub button_triggered: Vec<ContentItem>,
    pub inline: Vec<ContentItem>,
}

impl Classified {
    /// All items of one presentation type, in response order.
    pub fn bucket(&self, kind: PresentationType) -> &[ContentItem] {
        match kind {
            PresentationType::Popup => &self.popup,
            PresentationType::ButtonTriggered => &self.button_triggered,
            PresentationType::Inline => &self.inline,
            PresentationType::Unknown => &[],
        }
    }

    /// The item presented for a presentation type.
    pub fn top(&self, kind: PresentationType) -> Option<&ContentItem> {
        self.bucket(kind).first()
    }

    pub fn len(&self) -> usize {
        self.popup.len() + self.button_triggered.len() + self.inline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition items by presentation type.
pub fn classify(items: &[ContentItem]) -> Classified {
    let mut classified = Classified::default();
    for item in items {
        match item.presentation_type {
            PresentationType::Popup => classified.popup.push(item.clone()),
            PresentationType::ButtonTriggered => classified.button_triggered.push(item.clone()),
            PresentationType::Inline => classified.inline.push(item.clone()),
            PresentationType::Unknown => {}
        }
    }
    classified
}
