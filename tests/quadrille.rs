//! Integration tests exercising the public facade end to end.

use quadrille::render::{draw_quadrille, CellRenderer, CellView, DrawParams};
use quadrille::{
    BigInt, Cell, CellAttachment, CellPos, CellValue, Defaults, DisplayCell, Endian, Filter,
    Quadrille, Rasterize, Rgba, SortCells, SortOptions,
};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn marker_grid(rows: &[&[u8]]) -> Quadrille {
    Quadrille::from_cells(
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|n| (*n != 0).then(|| CellValue::Number(*n as f64)))
                    .collect()
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_rotate_yields_antidiagonal() {
    let mut g = marker_grid(&[&[1, 0], &[0, 1]]);
    g.rotate();
    assert_eq!(g, marker_grid(&[&[0, 1], &[1, 0]]));
}

#[test]
fn test_bitboard_of_two_fills_is_nine() {
    let mut g = Quadrille::new(2, 2).unwrap();
    g.fill_cell(0, 0, CellValue::text("X"))
        .fill_cell(1, 1, CellValue::text("Y"));
    assert_eq!(g.to_bitboard(Endian::Big), BigInt::from(9u32));
}

#[test]
fn test_crop_matches_row_major_reads() {
    let g = marker_grid(&[
        &[1, 2, 3, 4],
        &[5, 6, 7, 8],
        &[9, 10, 11, 12],
        &[13, 14, 15, 16],
    ]);
    let crop = g.crop(1, 1, 2, 2, false).unwrap();
    let expected: Vec<Cell> = [(1, 1), (1, 2), (2, 1), (2, 2)]
        .into_iter()
        .map(|(r, c)| g.value_at(r, c).cloned())
        .collect();
    assert_eq!(crop.to_flat(), expected);
}

#[test]
fn test_search_locates_pattern_copy() {
    let needle = marker_grid(&[&[1, 1], &[1, 0]]);
    let mut haystack = Quadrille::new(8, 8).unwrap();
    haystack
        .fill_cell(2, 3, CellValue::Number(1.0))
        .fill_cell(2, 4, CellValue::Number(1.0))
        .fill_cell(3, 3, CellValue::Number(1.0));
    let hits = haystack.search(&needle, false);
    assert!(hits.contains(&CellPos { row: 2, col: 3 }));
}

#[test]
fn test_flood_clear_touches_only_the_connected_region() {
    // A plus of 'a' cells with diagonally adjacent 'a' cells that are not
    // 4-connected to it.
    let a = || Some(CellValue::text("a"));
    let mut g = Quadrille::from_cells(vec![
        vec![a(), a(), None, a()],
        vec![a(), a(), None, None],
        vec![None, None, a(), None],
    ])
    .unwrap();
    g.flood_clear(0, 0, 4, false);
    assert!(g.is_empty_at(0, 0));
    assert!(g.is_empty_at(1, 1));
    assert!(g.is_filled_at(0, 3));
    assert!(g.is_filled_at(2, 2));
}

#[test]
fn test_bitboard_round_trip_preserves_pattern() {
    for endian in [Endian::Big, Endian::Little] {
        let mut g = Quadrille::new(6, 4).unwrap();
        let marker = CellValue::Boolean(true);
        g.fill_cell(0, 5, marker.clone())
            .fill_cell(3, 0, marker.clone())
            .fill_cell(2, 2, marker.clone());
        let bits = g.to_bitboard(endian);
        let back = Quadrille::from_bitboard_sized(6, 4, &bits, marker.clone(), endian).unwrap();
        assert_eq!(back, g);
    }
}

#[test]
fn test_fen_round_trip_preserves_board() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R";
    let board = Quadrille::from_fen(fen).unwrap();
    assert_eq!(board.to_fen().as_deref(), Some(fen));
}

#[test]
fn test_algebra_laws_hold() {
    let g = marker_grid(&[&[1, 0, 2], &[0, 3, 0]]);
    let empty = Quadrille::new(3, 2).unwrap();

    assert_eq!(&g | &empty, g);
    assert_eq!(&g & &g, g);
    assert_eq!((&g ^ &g).order(), 0);

    let filled_positions = |q: &Quadrille| {
        let mut out = Vec::new();
        q.visit(&Filter::Filled, |cell| out.push((cell.row, cell.col)));
        out
    };
    let double_not = Quadrille::not(
        &Quadrille::not(&g, CellValue::text("x")),
        CellValue::text("y"),
    );
    assert_eq!(filled_positions(&double_not), filled_positions(&g));
}

#[test]
fn test_merge_bounding_box_arithmetic() {
    let a = Quadrille::new(3, 2).unwrap();
    let b = Quadrille::new(4, 5).unwrap();
    let out = Quadrille::merged_at(&a, &b, |x, y| x.or(y).cloned(), 1, 2);
    assert_eq!(out.width(), a.width().max(b.width() + 2));
    assert_eq!(out.height(), a.height().max(b.height() + 1));
}

#[test]
fn test_chained_fill_shift_and_sort() {
    let mut g = Quadrille::new(4, 1).unwrap();
    g.fill_cell(0, 0, CellValue::Color(Rgba::WHITE))
        .fill_cell(0, 1, CellValue::Color(Rgba::BLACK))
        .shift(0, 1, true)
        .sort_cells(&SortOptions::default());
    // After the wrap-shift both colors survive; sorting puts black first.
    assert_eq!(g.value_at(0, 0), Some(&CellValue::Color(Rgba::BLACK)));
    assert_eq!(g.order(), 2);
}

#[test]
fn test_rasterize_covers_grid_corners() {
    let mut g = Quadrille::new(5, 5).unwrap();
    g.colorize(
        Rgba::rgb(255, 0, 0),
        Rgba::rgb(0, 255, 0),
        Rgba::rgb(0, 0, 255),
        Rgba::rgb(255, 255, 0),
    );
    assert_eq!(g.order(), 25);
    assert_eq!(g.value_at(0, 0), Some(&CellValue::Color(Rgba::rgb(255, 0, 0))));
    assert_eq!(g.value_at(4, 4), Some(&CellValue::Color(Rgba::rgb(255, 255, 0))));
}

// Display-contract coverage: a renderer that records which hooks fire.

#[derive(Default)]
struct RecordingRenderer {
    surface: Vec<String>,
    colors: usize,
    texts: usize,
    functions: usize,
    tiles: usize,
}

impl CellRenderer for RecordingRenderer {
    fn surface(&mut self) -> &mut dyn Any {
        &mut self.surface
    }

    fn color(&mut self, _view: &CellView<'_>, _color: Rgba) {
        self.colors += 1;
    }

    fn text(&mut self, _view: &CellView<'_>, text: &str) {
        self.texts += 1;
        self.surface.push(text.to_string());
    }

    fn image(&mut self, _view: &CellView<'_>, _image: &Arc<dyn quadrille::PixelSource>) {}

    fn function(&mut self, view: &CellView<'_>, cell: &DisplayCell) {
        self.functions += 1;
        let mut args = quadrille::DrawArgs {
            surface: self.surface(),
            row: view.row,
            col: view.col,
            cell_length: view.cell_length,
            origin: view.origin,
        };
        cell.draw(&mut args);
    }

    fn tile(&mut self, _view: &CellView<'_>) {
        self.tiles += 1;
    }
}

#[test]
fn test_draw_dispatches_by_kind_and_tiles_every_cell() {
    let mut g = Quadrille::new(3, 2).unwrap();
    g.fill_cell(0, 0, CellValue::Color(Rgba::WHITE))
        .fill_cell(0, 1, CellValue::text("t"))
        .fill_cell(0, 2, CellValue::Number(4.0))
        .fill_cell(1, 0, CellValue::Boolean(true))
        .fill_cell(
            1,
            1,
            CellValue::display(|args| {
                if let Some(lines) = args.surface.downcast_mut::<Vec<String>>() {
                    lines.push(format!("fn@{},{}", args.row, args.col));
                }
            }),
        );

    let defaults = Defaults::default();
    let mut renderer = RecordingRenderer::default();
    draw_quadrille(&mut g, &mut renderer, &DrawParams::new(&defaults));

    // number defaults to the color hook, boolean to the text hook.
    assert_eq!(renderer.colors, 2);
    assert_eq!(renderer.texts, 2);
    assert_eq!(renderer.functions, 1);
    assert_eq!(renderer.tiles, 6);
    assert!(renderer.surface.contains(&"fn@1,1".to_string()));
}

#[test]
fn test_draw_records_position_for_offset_inference() {
    let mut a = Quadrille::new(1, 1).unwrap();
    a.fill_cell(0, 0, CellValue::Number(1.0));
    let mut b = Quadrille::new(1, 1).unwrap();
    b.fill_cell(0, 0, CellValue::Number(2.0));

    let defaults = Defaults::default();
    let mut renderer = RecordingRenderer::default();
    let mut params = DrawParams::new(&defaults);
    params.row = Some(0);
    params.col = Some(0);
    draw_quadrille(&mut a, &mut renderer, &params);
    params.row = Some(0);
    params.col = Some(1);
    draw_quadrille(&mut b, &mut renderer, &params);

    // Both grids were last drawn at known coordinates one column apart, so
    // the merge offset is inferred.
    let merged = &a | &b;
    assert_eq!((merged.width(), merged.height()), (2, 1));
    assert_eq!(merged.value_at(0, 1), Some(&CellValue::Number(2.0)));
}

struct Released(Arc<AtomicBool>);

impl CellAttachment for Released {
    fn release(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_overwriting_a_display_cell_releases_its_attachment() {
    let released = Arc::new(AtomicBool::new(false));
    let display = Arc::new(DisplayCell::new(|_| {}));
    display.attach(Box::new(Released(released.clone())));

    let mut g = Quadrille::new(1, 1).unwrap();
    g.fill_cell(0, 0, CellValue::Display(display));
    assert!(!released.load(Ordering::SeqCst));

    g.fill_cell(0, 0, CellValue::Number(0.0));
    assert!(released.load(Ordering::SeqCst));
}

#[test]
fn test_factory_fill_constructs_per_cell_values() {
    let mut g = Quadrille::new(3, 3).unwrap();
    g.fill_empty(CellValue::factory(|row, col| {
        (row == col).then(|| CellValue::Number((row * 3 + col) as f64))
    }));
    assert_eq!(g.order(), 3);
    assert_eq!(g.value_at(2, 2), Some(&CellValue::Number(8.0)));
    assert!(g.is_empty_at(0, 1));
}
