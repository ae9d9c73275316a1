//! Window geometry helpers: caption height, persisted state and restore placement.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::MONITOR_SAFE_AREA;
use crate::host::{NativeWindow, Rect};

/// Geometry the UI host persists between runs, in whole points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWindowState {
    #[serde(deserialize_with = "whole_points")]
    pub x: i64,
    #[serde(deserialize_with = "whole_points")]
    pub y: i64,
    #[serde(deserialize_with = "whole_points")]
    pub width: i64,
    #[serde(deserialize_with = "whole_points")]
    pub height: i64,
    pub maximized: bool,
}

/// Accepts integral or fractional JSON numbers, rounding to the nearest point.
fn whole_points<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("window geometry must be finite"));
    }
    Ok(value.round() as i64)
}

impl SavedWindowState {
    /// Reply of `getState` when there is no window.
    pub fn unknown() -> Self {
        SavedWindowState {
            x: -1,
            y: -1,
            width: -1,
            height: -1,
            maximized: false,
        }
    }

    /// Snapshot of a live frame, rounded to whole points.
    pub fn from_frame(frame: Rect, maximized: bool) -> Self {
        SavedWindowState {
            x: frame.x.round() as i64,
            y: frame.y.round() as i64,
            width: frame.width.round() as i64,
            height: frame.height.round() as i64,
            maximized,
        }
    }

    pub fn frame(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        )
    }
}

/// Title bar height: full content view minus the layout rect, never negative.
pub fn caption_height(window: &dyn NativeWindow) -> f64 {
    (window.content_view_height() - window.content_layout_height()).max(0.0)
}

/// Frame to restore `saved` into.
///
/// The saved frame is kept if its origin lies inside `work_area` shrunk by the
/// safe margin. Otherwise the saved size is centered in `work_area`. Without a
/// known work area the saved frame is used as-is.
pub fn restore_frame(saved: &SavedWindowState, work_area: Option<Rect>) -> Rect {
    let frame = saved.frame();
    let Some(area) = work_area else {
        return frame;
    };
    if area.inset(MONITOR_SAFE_AREA).contains_point(frame.x, frame.y) {
        frame
    } else {
        Rect::new(
            area.x + (area.width - frame.width) / 2.0,
            area.y + (area.height - frame.height) / 2.0,
            frame.width,
            frame.height,
        )
    }
}
