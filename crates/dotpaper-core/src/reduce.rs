//! Pure state transitions.
//!
//! Each function takes a state by value and returns the next one. Actions
//! built from other actions (translating re-snaps the cursor, continuing a
//! line adds one first) are written as plain calls between these functions,
//! so composition order is visible in the code and never loops.

use crate::camera::Camera;
use crate::clipboard::Clipboard;
use crate::color::SerializableColor;
use crate::line::{Line, LineStyle};
use crate::selection::{Bounds, selected_lines};
use crate::snap::POINT_TOLERANCE;
use crate::state::State;
use crate::symmetry;
use kurbo::{Line as KurboLine, Point, Size, Vec2};

/// Bound corners placed by the tour.
pub const TOUR_BOUNDS: [Point; 2] = [Point::new(20.0, 27.0), Point::new(18.0, 23.0)];

/// Closed diamond drawn by the tour, as a polyline.
pub const TOUR_DIAMOND: [Point; 5] = [
    Point::new(19.0, 27.0),
    Point::new(20.0, 25.0),
    Point::new(19.0, 23.0),
    Point::new(18.0, 25.0),
    Point::new(19.0, 27.0),
];

// Camera and cursor

/// Snap a device position onto the dot lattice and make it the cursor.
pub fn cursor_moved(mut state: State, to: Point) -> State {
    state.cursor = state.camera.snap(to);
    state
}

fn resnap(state: State) -> State {
    let cursor = state.cursor;
    cursor_moved(state, cursor)
}

/// Pan by a render-space delta. Cancels the open stroke.
pub fn translate(mut state: State, delta: Vec2) -> State {
    state.camera.pan(delta);
    state.cur_line = None;
    resnap(state)
}

/// Cell-size change for a scroll of `amt`.
pub fn scroll_zoom(state: &State, amt: f64) -> f64 {
    let delta = -amt * state.scroll_sensitivity;
    if state.inverted_scroll { -delta } else { delta }
}

/// Zoom to `target` (clamped to the viewport) keeping `center` fixed.
/// Cancels the open stroke.
pub fn zoom(mut state: State, target: Vec2, center: Point) -> State {
    let scale = Vec2::new(
        Camera::clamp_scale(target.x, state.viewport),
        Camera::clamp_scale(target.y, state.viewport),
    );
    state.camera.zoom_at(center, scale);
    state.cur_line = None;
    resnap(state)
}

/// Zoom by a cell-size delta about `center`, or the cursor.
pub fn scale(state: State, delta: Vec2, center: Option<Point>) -> State {
    let center = center.unwrap_or(state.cursor);
    let target = state.camera.scale + delta;
    zoom(state, target, center)
}

pub fn increase_scale(state: State) -> State {
    let (target, center) = (state.camera.scale * 2.0, state.cursor);
    zoom(state, target, center)
}

pub fn decrease_scale(state: State) -> State {
    let (target, center) = (state.camera.scale / 2.0, state.cursor);
    zoom(state, target, center)
}

/// Back to the origin at the configured cell size.
pub fn go_home(mut state: State, home: Vec2) -> State {
    state.camera.reset(home);
    resnap(state)
}

pub fn resize(mut state: State, viewport: Size) -> State {
    state.viewport = viewport;
    let scale = state.camera.scale;
    state.camera.scale = Vec2::new(
        Camera::clamp_scale(scale.x, viewport),
        Camera::clamp_scale(scale.y, viewport),
    );
    resnap(state)
}

/// Step the cursor by whole cells.
pub fn move_cursor(mut state: State, cells_x: f64, cells_y: f64) -> State {
    let scale = state.camera.scale;
    state.cursor += Vec2::new(cells_x * scale.x, cells_y * scale.y);
    state
}

// Destruction

pub fn clear(mut state: State) -> State {
    state.lines.clear();
    state.bounds = Bounds::new();
    state
}

pub fn clear_bounds(mut state: State) -> State {
    state.bounds = Bounds::new();
    state
}

/// Keep only the lines outside the selection.
pub fn delete_selected(mut state: State) -> State {
    state.lines = selected_lines(&state.lines, &state.bounds, state.partials, true);
    if state.remove_selection_after_delete {
        state.bounds = Bounds::new();
    }
    state
}

/// Erase at the cursor, first match wins: a bound point, the open stroke,
/// the clipboard, then every line with an endpoint under the cursor.
pub fn erase(mut state: State) -> State {
    let at = state.frame().rel_cursor;
    if state.bounds.point_at(at, POINT_TOLERANCE).is_some() {
        state.bounds = state.bounds.without_point_at(at, POINT_TOLERANCE);
    } else if state.cur_line.is_some() {
        state.cur_line = None;
    } else if state.clipboard.is_some() {
        state.clipboard = None;
    } else {
        state.lines.retain(|line| !line.touches(at, POINT_TOLERANCE));
    }
    state
}

/// Two-step line eraser. The first call marks a point; the second removes
/// the lines joining the mark and the cursor, then clears the mark.
pub fn erase_line(mut state: State) -> State {
    let at = state.frame().rel_cursor;
    if state.bounds.point_at(at, POINT_TOLERANCE).is_some() {
        state.bounds = state.bounds.without_point_at(at, POINT_TOLERANCE);
        return state;
    }
    if state.cur_line.is_some() {
        state.cur_line = None;
        return state;
    }
    match state.eraser.take() {
        Some(mark) => state.lines.retain(|line| {
            !(line.touches(at, POINT_TOLERANCE) && line.touches(mark, POINT_TOLERANCE))
        }),
        None => state.eraser = Some(at),
    }
    state
}

/// Cancel one piece of in-progress UI state: the clipboard, else the open
/// stroke, else the bounds.
pub fn nevermind(mut state: State) -> State {
    if state.clipboard.is_some() {
        state.clipboard = None;
    } else if state.cur_line.is_some() {
        state.cur_line = None;
    } else if !state.bounds.is_empty() {
        state.bounds = Bounds::new();
    }
    state
}

// Creation

/// The open stroke from `anchor` to the cursor plus its symmetry copies,
/// in render space. The preview draws exactly these segments.
pub fn stroke_segments(state: &State, anchor: Point) -> Vec<KurboLine> {
    let base = KurboLine::new(anchor, state.cursor);
    let origin = state.symmetry.origin(state.frame().half, anchor);
    let mut segments = vec![base];
    segments.extend(symmetry::mirror(origin, &state.symmetry, base));
    segments
}

/// Committed lines for a stroke ending at the cursor.
pub fn commit_stroke(state: &State, anchor: Point) -> Vec<Line> {
    let to_model = state.camera.inverse_transform();
    stroke_segments(state, anchor)
        .into_iter()
        .map(|seg| Line::new(to_model * seg.p0, to_model * seg.p1, state.style.clone()))
        .collect()
}

fn pastes_on_click(state: &State) -> bool {
    state.clipboard.is_some() && !state.mobile
}

/// Primary click. Pastes while a clipboard is held (keeping it when
/// `continues`), otherwise opens a stroke or commits the open one.
pub fn add_line(mut state: State, continues: bool) -> State {
    if pastes_on_click(&state) {
        let mut next = paste(state);
        if !continues {
            next.clipboard = None;
        }
        return next;
    }
    match state.cur_line.take() {
        Some(anchor) => {
            let lines = commit_stroke(&state, anchor);
            state.lines.extend(lines);
        }
        None => state.cur_line = Some(state.cursor),
    }
    state
}

/// Commit the open stroke and immediately start the next one at the
/// cursor. While pasting, paste and keep both clipboard and stroke.
pub fn continue_line(state: State) -> State {
    let pasting = pastes_on_click(&state);
    let (anchor, cursor) = (state.cur_line, state.cursor);
    let mut next = add_line(state, true);
    next.cur_line = if pasting { anchor } else { Some(cursor) };
    next
}

/// Toggle a bound point at the cursor.
pub fn add_bound(mut state: State) -> State {
    let at = state.frame().rel_cursor;
    state.bounds = state.bounds.toggled(at, POINT_TOLERANCE);
    state
}

// Clipboard

/// Selected lines buffered around the top-left selection corner.
fn capture_selection(state: &State) -> Option<Clipboard> {
    let rect = state.bounds.rect()?;
    let selected = selected_lines(&state.lines, &state.bounds, state.partials, false);
    if selected.is_empty() {
        return None;
    }
    Some(Clipboard::capture(&selected, rect.origin()))
}

pub fn copy(mut state: State) -> State {
    state.clipboard = capture_selection(&state);
    state.cur_line = None;
    state
}

pub fn cut(state: State) -> State {
    let clipboard = capture_selection(&state);
    let mut next = delete_selected(state);
    next.clipboard = clipboard;
    next.cur_line = None;
    next
}

/// Drop the clipboard at the cursor.
pub fn paste(mut state: State) -> State {
    if let Some(clipboard) = &state.clipboard {
        let pasted = clipboard.paste(state.frame().rel_cursor);
        state.lines.extend(pasted);
    }
    state
}

pub fn increment_clipboard_rotation(mut state: State) -> State {
    if let Some(clipboard) = state.clipboard.as_mut() {
        clipboard.rotation = clipboard.rotation.next();
    }
    state
}

pub fn increment_clipboard_mirror(mut state: State) -> State {
    if let Some(clipboard) = state.clipboard.as_mut() {
        clipboard.mirror = clipboard.mirror.next();
    }
    state
}

// Settings

pub fn toggle_mirroring(mut state: State) -> State {
    state.symmetry.mirroring = !state.symmetry.mirroring;
    state
}

pub fn toggle_mirror_axis(mut state: State) -> State {
    state.symmetry.mirror_axis = state.symmetry.mirror_axis.next();
    state
}

pub fn toggle_mirror_axis2(mut state: State) -> State {
    state.symmetry.mirror_axis2 = state.symmetry.mirror_axis2.next();
    state
}

pub fn toggle_mirror_type(mut state: State) -> State {
    state.symmetry.mirror_type = state.symmetry.mirror_type.next();
    state
}

pub fn toggle_mirror_method(mut state: State) -> State {
    state.symmetry.mirror_method = state.symmetry.mirror_method.next();
    state
}

pub fn toggle_partials(mut state: State) -> State {
    state.partials = !state.partials;
    state
}

pub fn set_stroke(mut state: State, color: SerializableColor) -> State {
    state.style.stroke = color;
    state
}

/// Negative widths clamp to zero; non-finite ones are ignored.
pub fn set_stroke_width(mut state: State, width: f64) -> State {
    if width.is_finite() {
        state.style.stroke_width = width.max(0.0);
    }
    state
}

pub fn set_dash(mut state: State, dash: f64) -> State {
    if dash.is_finite() {
        state.style.dash = dash.max(0.0);
    }
    state
}

// Tour

/// The canonical demo drawing shown during the tour.
pub fn start_tour(state: State, home: Vec2) -> State {
    let mut state = go_home(state, home);
    state.symmetry.mirroring = true;
    state.bounds = Bounds::from_pair(TOUR_BOUNDS[0], TOUR_BOUNDS[1]);
    state.cur_line = None;
    state.mobile = true;
    let style = LineStyle::default();
    state.lines = TOUR_DIAMOND
        .windows(2)
        .map(|pair| Line::new(pair[0], pair[1], style.clone()))
        .collect();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipRotation;
    use crate::symmetry::{MirrorAxis, MirrorMethod};

    const EPS: f64 = 1e-9;

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < EPS && (actual.y - y).abs() < EPS,
            "expected ({x}, {y}), got {actual:?}"
        );
    }

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(Point::new(x1, y1), Point::new(x2, y2), LineStyle::default())
    }

    /// Default state with the cursor on the grid point `(gx, gy)`.
    fn at(state: State, gx: f64, gy: f64) -> State {
        let screen = state.camera.model_to_screen(Point::new(gx, gy));
        cursor_moved(state, screen)
    }

    #[test]
    fn test_cursor_snaps() {
        let state = cursor_moved(State::default(), Point::new(29.0, 51.0));
        assert_eq!(state.cursor, Point::new(20.0, 60.0));
    }

    #[test]
    fn test_translate_resnaps_and_cancels_stroke() {
        let mut state = at(State::default(), 2.0, 2.0);
        state.cur_line = Some(state.cursor);
        let state = translate(state, Vec2::new(7.0, 0.0));
        assert!(state.cur_line.is_none());
        // The lattice moved by 7 pixels; the cursor lands on it.
        assert!((state.cursor.x - 47.0).abs() < EPS);
        assert!((state.cursor.y - 40.0).abs() < EPS);
    }

    #[test]
    fn test_scale_is_clamped() {
        let state = scale(State::default(), Vec2::new(-100.0, 1000.0), None);
        assert!((state.camera.scale.x - crate::camera::MIN_SCALE).abs() < EPS);
        assert!((state.camera.scale.y - 150.0).abs() < EPS);
    }

    #[test]
    fn test_scroll_zoom_direction() {
        let mut state = State::default();
        state.scroll_sensitivity = 0.5;
        assert!((scroll_zoom(&state, 10.0) + 5.0).abs() < EPS);
        state.inverted_scroll = true;
        assert!((scroll_zoom(&state, 10.0) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_keeps_center() {
        let state = at(State::default(), 5.0, 5.0);
        let before = state.frame().rel_cursor;
        let state = increase_scale(state);
        assert!((state.camera.scale.x - 40.0).abs() < EPS);
        let after = state.frame().rel_cursor;
        assert_point(after, before.x, before.y);
    }

    #[test]
    fn test_move_cursor_by_cells() {
        let state = at(State::default(), 3.0, 3.0);
        let state = move_cursor(state, -1.0, 2.0);
        assert_point(state.frame().rel_cursor, 2.0, 5.0);
    }

    #[test]
    fn test_add_line_opens_then_commits() {
        let state = at(State::default(), 1.0, 1.0);
        let state = add_line(state, false);
        assert_eq!(state.cur_line, Some(Point::new(20.0, 20.0)));
        assert!(state.lines.is_empty());

        let state = add_line(at(state, 4.0, 1.0), false);
        assert!(state.cur_line.is_none());
        assert_eq!(state.lines.len(), 1);
        assert_point(state.lines[0].start, 1.0, 1.0);
        assert_point(state.lines[0].end, 4.0, 1.0);
    }

    #[test]
    fn test_stroke_with_page_mirror() {
        let mut state = State::default();
        state.viewport = Size::new(200.0, 200.0);
        state.symmetry.mirroring = true;
        state.symmetry.mirror_axis = MirrorAxis::Vert90;
        state.symmetry.mirror_method = MirrorMethod::Flip;

        let state = add_line(at(state, 1.0, 1.0), false);
        let state = add_line(at(state, 2.0, 3.0), false);
        assert_eq!(state.lines.len(), 2);
        // Page centre is x = 100px = 5 cells.
        assert_point(state.lines[1].start, 9.0, 1.0);
        assert_point(state.lines[1].end, 8.0, 3.0);
    }

    #[test]
    fn test_preview_matches_commit() {
        let mut state = State::default();
        state.symmetry.mirroring = true;
        state.symmetry.mirror_axis = MirrorAxis::Both360;
        state.symmetry.mirror_method = MirrorMethod::Both;
        state.symmetry.mirror_axis2 = MirrorAxis::Both360;

        let state = add_line(at(state, 3.0, 4.0), false);
        let state = at(state, 7.0, 2.0);
        let anchor = state.cur_line.unwrap();
        let preview = stroke_segments(&state, anchor);
        let committed = add_line(state.clone(), false).lines;

        assert_eq!(preview.len(), committed.len());
        for (seg, line) in preview.iter().zip(&committed) {
            let p0 = state.camera.model_to_screen(line.start);
            let p1 = state.camera.model_to_screen(line.end);
            assert_point(p0, seg.p0.x, seg.p0.y);
            assert_point(p1, seg.p1.x, seg.p1.y);
        }
    }

    #[test]
    fn test_continue_line_chains() {
        let state = add_line(at(State::default(), 0.0, 0.0), false);
        let state = continue_line(at(state, 2.0, 0.0));
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.cur_line, Some(state.cursor));
        let state = continue_line(at(state, 2.0, 2.0));
        assert_eq!(state.lines.len(), 2);
        assert_point(state.lines[1].start, 2.0, 0.0);
    }

    #[test]
    fn test_erase_priority() {
        let mut state = at(State::default(), 5.0, 5.0);
        state.lines.push(line(5.0, 5.0, 6.0, 6.0));
        state.bounds = Bounds::from_pair(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        state.cur_line = Some(Point::ZERO);

        let state = erase(state);
        assert_eq!(state.bounds.len(), 1);
        assert!(state.cur_line.is_some());
        assert_eq!(state.lines.len(), 1);

        let state = erase(erase(state));
        assert!(state.bounds.is_empty());
        assert!(state.cur_line.is_none());
        assert_eq!(state.lines.len(), 1);

        let state = erase(state);
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_erase_clears_clipboard_before_lines() {
        let mut state = at(State::default(), 1.0, 1.0);
        state.lines.push(line(1.0, 1.0, 2.0, 2.0));
        state.clipboard = Some(Clipboard::capture(&state.lines, Point::ZERO));
        let state = erase(state);
        assert!(state.clipboard.is_none());
        assert_eq!(state.lines.len(), 1);
    }

    #[test]
    fn test_erase_line_two_steps() {
        let mut state = at(State::default(), 0.0, 0.0);
        state.lines = vec![line(0.0, 0.0, 3.0, 0.0), line(0.0, 0.0, 0.0, 3.0)];

        let state = erase_line(state);
        assert_eq!(state.eraser, Some(Point::ZERO));
        assert_eq!(state.lines.len(), 2);

        let state = erase_line(at(state, 3.0, 0.0));
        assert!(state.eraser.is_none());
        assert_eq!(state.lines.len(), 1);
        assert_point(state.lines[0].end, 0.0, 3.0);
    }

    #[test]
    fn test_nevermind_order() {
        let mut state = State::default();
        state.bounds = Bounds::from_pair(Point::ZERO, Point::new(1.0, 1.0));
        state.cur_line = Some(Point::ZERO);
        state.clipboard = Some(Clipboard::default());

        let state = nevermind(state);
        assert!(state.clipboard.is_none() && state.cur_line.is_some());
        let state = nevermind(state);
        assert!(state.cur_line.is_none() && state.bounds.is_complete());
        let state = nevermind(state);
        assert!(state.bounds.is_empty());
        assert_eq!(nevermind(state.clone()), state);
    }

    #[test]
    fn test_add_bound_toggles() {
        let state = add_bound(at(State::default(), 2.0, 2.0));
        assert_eq!(state.bounds.points(), &[Point::new(2.0, 2.0)]);
        let state = add_bound(state);
        assert!(state.bounds.is_empty());
    }

    #[test]
    fn test_copy_and_paste_with_rotation() {
        let mut state = State::default();
        state.lines.push(line(2.0, 2.0, 3.0, 2.0));
        state.bounds = Bounds::from_pair(Point::new(2.0, 2.0), Point::new(4.0, 4.0));

        let state = copy(state);
        let mut state = at(state, 10.0, 10.0);
        state.clipboard.as_mut().unwrap().rotation = ClipRotation::Deg90;

        let state = add_line(state, false);
        assert!(state.clipboard.is_none());
        assert_eq!(state.lines.len(), 2);
        assert_point(state.lines[1].start, 10.0, 10.0);
        assert_point(state.lines[1].end, 10.0, 11.0);
    }

    #[test]
    fn test_continue_keeps_clipboard() {
        let mut state = State::default();
        state.lines.push(line(0.0, 0.0, 1.0, 0.0));
        state.bounds = Bounds::from_pair(Point::ZERO, Point::new(1.0, 1.0));
        let state = at(copy(state), 5.0, 5.0);

        let state = continue_line(state);
        assert!(state.clipboard.is_some());
        assert!(state.cur_line.is_none());
        assert_eq!(state.lines.len(), 2);
    }

    #[test]
    fn test_mobile_continue_draws_with_clipboard_held() {
        let mut state = State::default();
        state.mobile = true;
        state.lines.push(line(0.0, 0.0, 1.0, 0.0));
        state.bounds = Bounds::from_pair(Point::ZERO, Point::new(1.0, 1.0));
        let state = add_line(at(copy(state), 3.0, 3.0), false);
        assert!(state.cur_line.is_some());

        let state = continue_line(at(state, 5.0, 3.0));
        assert!(state.clipboard.is_some());
        assert_eq!(state.lines.len(), 2);
        assert_point(state.lines[1].start, 3.0, 3.0);
        assert_point(state.lines[1].end, 5.0, 3.0);
        assert_eq!(state.cur_line, Some(state.cursor));
    }

    #[test]
    fn test_empty_copy_leaves_no_clipboard() {
        let mut state = State::default();
        state.bounds = Bounds::from_pair(Point::ZERO, Point::new(1.0, 1.0));
        assert!(copy(state).clipboard.is_none());
    }

    #[test]
    fn test_cut_moves_selection() {
        let mut state = State::default();
        state.lines = vec![line(0.0, 0.0, 1.0, 1.0), line(8.0, 8.0, 9.0, 9.0)];
        state.bounds = Bounds::from_pair(Point::ZERO, Point::new(2.0, 2.0));

        let state = cut(state);
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.clipboard.as_ref().unwrap().lines.len(), 1);
        assert!(state.bounds.is_empty());
    }

    #[test]
    fn test_mobile_click_draws_despite_clipboard() {
        let mut state = at(State::default(), 1.0, 1.0);
        state.mobile = true;
        state.clipboard = Some(Clipboard::capture(&[line(0.0, 0.0, 1.0, 0.0)], Point::ZERO));
        let state = add_line(state, false);
        assert!(state.cur_line.is_some());
        assert!(state.clipboard.is_some());
    }

    #[test]
    fn test_clipboard_increments_need_a_clipboard() {
        let state = increment_clipboard_rotation(State::default());
        assert!(state.clipboard.is_none());

        let mut state = State::default();
        state.clipboard = Some(Clipboard::default());
        let state = increment_clipboard_mirror(increment_clipboard_rotation(state));
        let clipboard = state.clipboard.unwrap();
        assert_eq!(clipboard.rotation, ClipRotation::Deg90);
        assert_eq!(clipboard.mirror, crate::clipboard::ClipMirror::Vertical);
    }

    #[test]
    fn test_stroke_settings() {
        let state = set_stroke_width(State::default(), -2.0);
        assert_eq!(state.style.stroke_width, 0.0);
        let state = set_stroke_width(state, f64::NAN);
        assert_eq!(state.style.stroke_width, 0.0);
        let state = set_dash(state, 0.25);
        assert!((state.style.dash - 0.25).abs() < EPS);
    }

    #[test]
    fn test_tour_state() {
        let mut state = State::default();
        state.camera.translation = Vec2::new(33.0, 12.0);
        let state = start_tour(state, Vec2::new(20.0, 20.0));
        assert_eq!(state.camera.translation, Vec2::ZERO);
        assert!(state.symmetry.mirroring && state.mobile);
        assert_eq!(state.lines.len(), 4);
        assert_eq!(state.lines[3].end, state.lines[0].start);
        assert_eq!(state.bounds.points(), &TOUR_BOUNDS);
    }
}
