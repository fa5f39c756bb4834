//! What a renderer needs to draw a frame. Nothing here draws.

use crate::line::{Line, LineId};
use crate::options::Options;
use crate::reduce::stroke_segments;
use crate::selection::selected_lines;
use crate::state::State;
use crate::symmetry::MirrorType;
use kurbo::{Affine, Line as KurboLine, Point, Rect, Size, Vec2};
use peniko::Color;

/// Overlay colors, resolved from options.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub dot: Color,
    pub dot_radius: f64,
    pub mirror: Color,
    pub cursor: Color,
    pub selection: Color,
    pub selection_border: Color,
    pub bound: Color,
}

impl Palette {
    pub fn from_options(options: &Options) -> Self {
        Self {
            dot: options.dot_color.into(),
            dot_radius: options.dot_radius,
            mirror: options.mirror_color.into(),
            cursor: options.cursor_color.into(),
            selection: options.selection_color.into(),
            selection_border: options.selection_border_color.into(),
            bound: options.bound_color.into(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

/// Snapshot of everything visible for one frame.
///
/// Committed lines, bounds, the selection and the clipboard are in grid
/// coordinates (draw them through `transform`); the preview, guides and
/// cursor are already in render space.
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub viewport: Size,
    /// Grid to render transform.
    pub transform: Affine,
    /// Dot lattice spacing and offset, in render pixels.
    pub cell: Vec2,
    pub grid_offset: Vec2,
    pub lines: &'a [Line],
    /// Lines the current selection would copy.
    pub selected: Vec<LineId>,
    /// Open stroke and its symmetry copies, base segment first.
    pub preview: Vec<KurboLine>,
    pub bound_points: &'a [Point],
    /// Selection rectangle, following the cursor while only one corner
    /// is placed.
    pub selection: Option<Rect>,
    /// Clipboard contents as they would land at the cursor.
    pub clipboard: Vec<Line>,
    pub cursor: Point,
    pub eraser: Option<Point>,
    /// Mirror lines through the page centre.
    pub guides: Vec<KurboLine>,
}

impl<'a> RenderView<'a> {
    pub fn build(state: &'a State) -> Self {
        let frame = state.frame();
        let preview = state
            .cur_line
            .map(|anchor| stroke_segments(state, anchor))
            .unwrap_or_default();
        let selected = selected_lines(&state.lines, &state.bounds, state.partials, false)
            .iter()
            .map(Line::id)
            .collect();
        let clipboard = state
            .clipboard
            .as_ref()
            .map(|c| c.paste(frame.rel_cursor))
            .unwrap_or_default();

        Self {
            viewport: state.viewport,
            transform: state.camera.transform(),
            cell: state.camera.scale,
            grid_offset: frame.offset,
            lines: &state.lines,
            selected,
            preview,
            bound_points: state.bounds.points(),
            selection: frame.live_bound_rect(state),
            clipboard,
            cursor: state.cursor,
            eraser: state.eraser,
            guides: guides(state, frame.half),
        }
    }

    /// Dot positions covering the viewport.
    pub fn dots(&self) -> impl Iterator<Item = Point> + '_ {
        let cols = (self.viewport.width / self.cell.x).ceil() as i64;
        let rows = (self.viewport.height / self.cell.y).ceil() as i64;
        (0..=rows).flat_map(move |row| {
            (0..=cols).map(move |col| {
                Point::new(
                    self.grid_offset.x + col as f64 * self.cell.x,
                    self.grid_offset.y + row as f64 * self.cell.y,
                )
            })
        })
    }
}

fn guides(state: &State, half: Point) -> Vec<KurboLine> {
    let symmetry = &state.symmetry;
    if !symmetry.mirroring || symmetry.mirror_type != MirrorType::Page {
        return Vec::new();
    }
    let size = state.viewport;
    let mut guides = Vec::new();
    if symmetry.mirror_axis.has_vertical() {
        guides.push(KurboLine::new((half.x, 0.0), (half.x, size.height)));
    }
    if symmetry.mirror_axis.has_horizontal() {
        guides.push(KurboLine::new((0.0, half.y), (size.width, half.y)));
    }
    guides
}
