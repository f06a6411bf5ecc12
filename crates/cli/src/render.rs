//! Text rendering of the presentation surface and session events.

use waypoint_core::{ContentItem, SessionEvent};
use waypoint_session::{Session, SurfaceView};

/// Render what the surface shows as indented lines.
pub fn surface(view: &SurfaceView<'_>) -> String {
    if view.is_empty() {
        return "  (nothing shown)".to_string();
    }

    let mut lines = Vec::new();
    if let Some(overlay) = &view.popup_overlay {
        lines.push(format!("  [popup]   {}", overlay.item.view_reference()));
    }
    if let Some(button) = &view.button {
        let state = if button.expanded { "open" } else { "collapsed" };
        let mut line = format!("  [button]  \"{}\" ({state})", button.title());
        if let Some(style) = button.style {
            if !style.text_color.is_empty() {
                line.push_str(&format!(" color={}", style.text_color));
            }
            if !style.background_color.is_empty() {
                line.push_str(&format!(" background={}", style.background_color));
            }
            line.push_str(&format!(" radius={}", style.border_radius));
        }
        lines.push(line);
    }
    if let Some(overlay) = &view.button_overlay {
        lines.push(format!("  [overlay] {}", overlay.item.view_reference()));
    }
    if let Some(inline) = &view.inline {
        lines.push(format!("  [inline]  {}", inline.item.view_reference()));
    }
    lines.join("\n")
}

/// One-line summary of where the session is.
pub fn status_line(session: &Session) -> String {
    let user = session
        .identity()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anonymous".into());
    let trigger_point = session
        .trigger_point()
        .map(|tp| tp.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{user} @ {} (trigger point: {trigger_point}, {})",
        session.view(),
        session.state()
    )
}

/// Describe an event for the interactive log.
pub fn event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::UserChanged { identity, token_fingerprint, .. } => {
            format!("signed in as {identity} (token {token_fingerprint}…)")
        }
        SessionEvent::UserCleared { .. } => "signed out".into(),
        SessionEvent::FetchStarted { trigger_point, generation, .. } => {
            format!("requesting content for {trigger_point} (#{generation})")
        }
        SessionEvent::ContentFreeView { view, .. } => format!("{view} has no content"),
        SessionEvent::ContentApplied { trigger_point, item_count, .. } => {
            format!("{item_count} item(s) for {trigger_point}")
        }
        SessionEvent::FetchFailed { trigger_point, error_message, .. } => {
            format!("content for {trigger_point} unavailable: {error_message}")
        }
        SessionEvent::StaleResponseDiscarded { trigger_point, .. } => {
            format!("ignored late response for {trigger_point}")
        }
        SessionEvent::PresentationChanged { channel, visible, .. } => {
            format!("{channel} {}", if *visible { "shown" } else { "hidden" })
        }
    }
}

/// Plain listing of raw items, in response order.
pub fn items(items: &[ContentItem]) -> String {
    if items.is_empty() {
        return "  (no content)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "  {}. {:<16} {}",
                i + 1,
                item.presentation_type.as_str(),
                item.view_reference()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
