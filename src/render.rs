//! Display contract between a quadrille and a rendering collaborator.
//!
//! The renderer implements [`CellRenderer`]: one hook per cell-value kind
//! plus a tile pass. [`draw_quadrille`] walks the grid, hands every visited
//! cell a [`CellView`] and dispatches on the value's tag; it records the
//! grid's drawn position (feeding offset inference in the merge engine) but
//! never mutates cell content. Pixel work happens entirely on the renderer's
//! side of the trait.

use num_traits::ToPrimitive;
use quadrille_grid::{
    Anchor, BigInt, Cell, CellValue, CellVisit, Defaults, DisplayCell, DrawArgs, Filter,
    ObjectCell, PixelSource, Quadrille, Rgba, Sym,
};
use std::any::Any;
use std::sync::Arc;

/// Everything a renderer needs to draw one cell.
pub struct CellView<'a> {
    /// The cell's value; `None` for empty cells during the tile pass.
    pub value: Option<&'a CellValue>,
    pub row: i64,
    pub col: i64,
    /// Grid dimensions.
    pub width: usize,
    pub height: usize,
    pub cell_length: f64,
    pub outline: Rgba,
    pub outline_weight: f64,
    pub text_color: Rgba,
    pub text_zoom: f64,
    pub origin: Anchor,
}

/// Per-kind draw hooks. Renderers must draw colors, text and images; the
/// remaining hooks default to the reference chains (number renders as a gray
/// color, bigint as a number, boolean as a check-mark string, objects with a
/// display closure through the function hook) or to skipping the cell.
///
/// Implementations must not mutate the grid being drawn.
pub trait CellRenderer {
    /// Opaque drawing surface handed to display-function cells.
    fn surface(&mut self) -> &mut dyn Any;

    fn color(&mut self, view: &CellView<'_>, color: Rgba);

    fn text(&mut self, view: &CellView<'_>, text: &str);

    fn image(&mut self, view: &CellView<'_>, image: &Arc<dyn PixelSource>);

    fn number(&mut self, view: &CellView<'_>, value: f64) {
        let level = value.round().clamp(0.0, 255.0) as u8;
        self.color(view, Rgba::rgb(level, level, level));
    }

    fn bigint(&mut self, view: &CellView<'_>, value: &BigInt) {
        self.number(view, value.to_f64().unwrap_or(f64::MAX));
    }

    fn boolean(&mut self, view: &CellView<'_>, value: bool) {
        self.text(view, if value { "✅" } else { "❎" });
    }

    fn symbol(&mut self, _view: &CellView<'_>, _value: &Sym) {}

    fn array(&mut self, _view: &CellView<'_>, _items: &[Cell]) {}

    fn function(&mut self, view: &CellView<'_>, cell: &DisplayCell) {
        let mut args = DrawArgs {
            surface: self.surface(),
            row: view.row,
            col: view.col,
            cell_length: view.cell_length,
            origin: view.origin,
        };
        cell.draw(&mut args);
    }

    fn object(&mut self, view: &CellView<'_>, object: &ObjectCell) {
        if let Some(draw) = object.display() {
            let mut args = DrawArgs {
                surface: self.surface(),
                row: view.row,
                col: view.col,
                cell_length: view.cell_length,
                origin: view.origin,
            };
            draw(&mut args);
        }
    }

    /// Outline pass, invoked for every visited cell after its value hook.
    fn tile(&mut self, _view: &CellView<'_>) {}
}

/// Placement and style overrides for one draw call; unset fields fall back
/// to `defaults`.
pub struct DrawParams<'a> {
    pub defaults: &'a Defaults,
    /// Absolute pixel position.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Position in cell coordinates; used when `x`/`y` are unset.
    pub row: Option<i64>,
    pub col: Option<i64>,
    pub cell_length: Option<f64>,
    pub outline: Option<Rgba>,
    pub outline_weight: Option<f64>,
    pub text_color: Option<Rgba>,
    pub text_zoom: Option<f64>,
    pub origin: Option<Anchor>,
    pub filter: Option<&'a Filter<'a>>,
}

impl<'a> DrawParams<'a> {
    pub fn new(defaults: &'a Defaults) -> DrawParams<'a> {
        DrawParams {
            defaults,
            x: None,
            y: None,
            row: None,
            col: None,
            cell_length: None,
            outline: None,
            outline_weight: None,
            text_color: None,
            text_zoom: None,
            origin: None,
            filter: None,
        }
    }
}

/// Draws every visited cell through the renderer's hooks and records the
/// grid's drawn position metadata.
pub fn draw_quadrille<R: CellRenderer>(
    quadrille: &mut Quadrille,
    renderer: &mut R,
    params: &DrawParams<'_>,
) {
    let defaults = params.defaults;
    let cell_length = params.cell_length.unwrap_or(defaults.cell_length);
    let x = params
        .x
        .unwrap_or_else(|| params.col.map(|c| c as f64 * cell_length).unwrap_or(0.0));
    let y = params
        .y
        .unwrap_or_else(|| params.row.map(|r| r as f64 * cell_length).unwrap_or(0.0));
    let origin = params.origin.unwrap_or_default();

    quadrille
        .set_cell_length(cell_length)
        .set_position(x, y)
        .set_origin(origin)
        .set_drawn_at(
            params.row.or_else(|| integral(y / cell_length)),
            params.col.or_else(|| integral(x / cell_length)),
        );

    let outline = params.outline.unwrap_or(defaults.outline);
    let outline_weight = params.outline_weight.unwrap_or(defaults.outline_weight);
    let text_color = params.text_color.unwrap_or(defaults.text_color);
    let text_zoom = params.text_zoom.unwrap_or(defaults.text_zoom);
    let (width, height) = (quadrille.width(), quadrille.height());

    let draw_cell = |renderer: &mut R, cell: CellVisit<'_>| {
        let view = CellView {
            value: cell.value.as_ref(),
            row: cell.row,
            col: cell.col,
            width,
            height,
            cell_length,
            outline,
            outline_weight,
            text_color,
            text_zoom,
            origin,
        };
        match cell.value {
            Some(CellValue::Display(display)) => renderer.function(&view, display.as_ref()),
            Some(CellValue::Image(image)) => renderer.image(&view, image),
            Some(CellValue::Color(color)) => renderer.color(&view, *color),
            Some(CellValue::Number(n)) => renderer.number(&view, *n),
            Some(CellValue::BigInt(n)) => renderer.bigint(&view, n),
            Some(CellValue::Text(s)) => renderer.text(&view, s),
            Some(CellValue::Boolean(b)) => renderer.boolean(&view, *b),
            Some(CellValue::Symbol(s)) => renderer.symbol(&view, s),
            Some(CellValue::Array(items)) => renderer.array(&view, items.as_slice()),
            Some(CellValue::Object(object)) => renderer.object(&view, object.as_ref()),
            // Factories are write-time values; there is nothing to draw.
            Some(CellValue::Factory(_)) | None => {}
        }
        renderer.tile(&view);
    };

    match params.filter {
        Some(filter) => quadrille.visit(filter, |cell| draw_cell(renderer, cell)),
        None => quadrille.visit(&Filter::All, |cell| draw_cell(renderer, cell)),
    }
}

/// Read-only traversal with the same filter semantics as the iteration
/// engine, for collaborators that do not draw.
pub fn visit_quadrille(
    quadrille: &Quadrille,
    filter: &Filter<'_>,
    callback: impl FnMut(CellVisit<'_>),
) {
    quadrille.visit(filter, callback);
}

fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.is_finite()).then_some(value as i64)
}
