//! Presentation policy - maps classified content to visible affordances.
//!
//! Channels are independent: the popup overlay, the button-triggered overlay,
//! and the inline embed never affect each other. Each channel shows at most
//! one item.

use waypoint_core::{ButtonConfig, ContentItem, PresentationMode, PresentationType};

use crate::classify::Classified;

/// Title used when a button-triggered item carries no styling.
pub const DEFAULT_BUTTON_TITLE: &str = "Show content";

/// Per-channel visibility. Reset to defaults whenever content is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationState {
    /// Popups show automatically until closed
    pub popup_visible: bool,
    /// The button overlay stays collapsed until activated
    pub button_overlay_open: bool,
    /// Inline embeds show until hidden
    pub inline_visible: bool,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            popup_visible: true,
            button_overlay_open: false,
            inline_visible: true,
        }
    }
}

/// An overlay hosting one item's view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay<'a> {
    pub channel: PresentationType,
    pub item: &'a ContentItem,
}

/// The persistent affordance for button-triggered content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affordance<'a> {
    pub item: &'a ContentItem,
    pub style: Option<&'a ButtonConfig>,
    pub expanded: bool,
}

impl Affordance<'_> {
    pub fn title(&self) -> &str {
        self.style
            .map(|s| s.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BUTTON_TITLE)
    }
}

/// Content embedded directly in the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineEmbed<'a> {
    pub item: &'a ContentItem,
}

/// Everything a surface should currently show.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceView<'a> {
    pub popup_overlay: Option<Overlay<'a>>,
    pub button: Option<Affordance<'a>>,
    pub button_overlay: Option<Overlay<'a>>,
    pub inline: Option<InlineEmbed<'a>>,
}

impl<'a> SurfaceView<'a> {
    /// Render the view for the given mode.
    ///
    /// `items` is the raw response in arrival order; the simple mode embeds
    /// its first item regardless of classification.
    pub fn render(
        mode: PresentationMode,
        items: &'a [ContentItem],
        classified: &'a Classified,
        state: &PresentationState,
    ) -> Self {
        match mode {
            PresentationMode::Simple => Self {
                inline: items
                    .first()
                    .filter(|_| state.inline_visible)
                    .map(|item| InlineEmbed { item }),
                ..Self::default()
            },
            PresentationMode::Classified => {
                let popup = classified.top(PresentationType::Popup);
                let button = classified.top(PresentationType::ButtonTriggered);
                let inline = classified.top(PresentationType::Inline);

                Self {
                    popup_overlay: popup.filter(|_| state.popup_visible).map(|item| Overlay {
                        channel: PresentationType::Popup,
                        item,
                    }),
                    button: button.map(|item| Affordance {
                        item,
                        style: item.button_config.as_ref(),
                        expanded: state.button_overlay_open,
                    }),
                    button_overlay: button.filter(|_| state.button_overlay_open).map(|item| {
                        Overlay {
                            channel: PresentationType::ButtonTriggered,
                            item,
                        }
                    }),
                    inline: inline
                        .filter(|_| state.inline_visible)
                        .map(|item| InlineEmbed { item }),
                }
            }
        }
    }

    /// Nothing is shown at all.
    pub fn is_empty(&self) -> bool {
        self.popup_overlay.is_none()
            && self.button.is_none()
            && self.button_overlay.is_none()
            && self.inline.is_none()
    }
}
