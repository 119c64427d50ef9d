//! Plain-text rendering of the view for the terminal.

use std::fmt::Write;

use vgen_models::timestamp::format_timestamp;
use vgen_models::Video;

use crate::state::ViewState;

const UNTITLED: &str = "Untitled Video";

/// Render the whole page: header, error banner, then loading text, the empty
/// state or one card per video.
pub fn render_view(view: &ViewState) -> String {
    let mut out = String::new();
    out.push_str("Your Videos\n===========\n");

    if let Some(error) = view.error() {
        let _ = writeln!(out, "\n! {error}");
    }

    if view.is_loading() {
        out.push_str("\nLoading videos...\n");
    } else if view.videos().is_empty() {
        out.push_str("\nNo videos yet\nCreate your first AI-powered video to get started!\n");
    } else {
        for video in view.videos() {
            out.push('\n');
            out.push_str(&render_video(video, view.is_pending(&video.id)));
        }
    }

    out
}

/// One video card.
pub fn render_video(video: &Video, polling: bool) -> String {
    let mut out = String::new();
    let title = video.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(UNTITLED);

    let _ = write!(out, "[{}] {}", video.status_label(), title);
    if polling {
        out.push_str(" (updating)");
    }
    out.push('\n');

    let created_secs = video.created_secs();
    let created = created_secs
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    let _ = write!(out, "  Created: {created}");
    if let Some(updated) = video.updated_secs().filter(|u| Some(*u) != created_secs) {
        let _ = write!(out, " | Updated: {}", format_timestamp(updated));
    }
    out.push('\n');

    let _ = writeln!(out, "  ID: {}", video.id);

    if let Some(url) = video.download_url() {
        let _ = writeln!(out, "  Download: {url}");
    }

    out
}
