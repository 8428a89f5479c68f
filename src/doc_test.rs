#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{AS_INFO_HEIGHT, SIZE_GUIDE_HEIGHT};
use crate::geometry::Point;
use crate::grid::GridCell;

fn image(w: f64, h: f64) -> ImageRef {
    ImageRef { id: uuid::Uuid::new_v4(), src: "blob:test".to_owned(), natural_w: w, natural_h: h }
}

// =============================================================
// Sections and ordering
// =============================================================

#[test]
fn sections_stack_in_insertion_order() {
    let mut doc = DocStore::new(800.0);
    let hero = doc.add_section(SectionKind::Hero);
    let guide = doc.add_section(SectionKind::SizeGuide);
    assert_eq!(doc.order(), &[hero, guide]);
    assert_eq!(doc.len(), 2);
}

#[test]
fn grid_sections_get_a_default_layout() {
    let mut doc = DocStore::new(800.0);
    let grid = doc.add_section(SectionKind::Grid);
    let layout = doc.grid(&grid).unwrap();
    assert_eq!(layout.cols, 2);
    assert_eq!(layout.rows, 2);
    // Non-grid kinds carry no layout.
    let hero = doc.add_section(SectionKind::Hero);
    assert!(doc.grid(&hero).is_none());
}

#[test]
fn set_order_accepts_only_permutations() {
    let mut doc = DocStore::new(800.0);
    let a = doc.add_section(SectionKind::Hero);
    let b = doc.add_section(SectionKind::Image);
    assert!(doc.set_order(vec![b, a]));
    assert_eq!(doc.order(), &[b, a]);
    assert!(!doc.set_order(vec![a]));
    assert!(!doc.set_order(vec![a, SectionId::new_v4()]));
    assert_eq!(doc.order(), &[b, a]);
}

#[test]
fn remove_section_cascades_everything_keyed_by_it() {
    let mut doc = DocStore::new(800.0);
    let victim = doc.add_section(SectionKind::Image);
    let survivor = doc.add_section(SectionKind::Image);
    doc.set_transform(victim, Transform { scale: 2.0, x: 1.0, y: 1.0 });
    doc.set_height(victim, 300.0);
    let dead_line = doc.add_line(LineAnnotation::new(victim, Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
    let live_line = doc.add_line(LineAnnotation::new(survivor, Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
    let dead_text = doc.add_text(TextElement::new(victim, 5.0, 5.0, "gone"));

    assert!(doc.remove_section(&victim).is_some());
    assert!(doc.section(&victim).is_none());
    assert_eq!(doc.transform(&victim), Transform::identity());
    assert_eq!(doc.explicit_height(&victim), None);
    assert!(doc.line(&dead_line).is_none());
    assert!(doc.text(&dead_text).is_none());
    assert!(doc.line(&live_line).is_some());
}

#[test]
fn remove_unknown_section_is_a_noop() {
    let mut doc = DocStore::new(800.0);
    doc.add_section(SectionKind::Hero);
    assert!(doc.remove_section(&SectionId::new_v4()).is_none());
    assert_eq!(doc.len(), 1);
}

// =============================================================
// Transforms
// =============================================================

#[test]
fn untouched_section_has_identity_transform() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    assert_eq!(doc.transform(&id), Transform::identity());
}

#[test]
fn reset_transform_restores_identity() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    doc.set_transform(id, Transform { scale: 3.0, x: 10.0, y: -4.0 });
    doc.reset_transform(&id);
    assert_eq!(doc.transform(&id), Transform::identity());
}

// =============================================================
// Heights
// =============================================================

#[test]
fn set_height_floors_at_minimum() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    doc.set_height(id, 10.0);
    assert_eq!(doc.explicit_height(&id), Some(MIN_SECTION_HEIGHT));
}

#[test]
fn effective_height_prefers_explicit_then_grid_then_kind() {
    let mut doc = DocStore::new(800.0);
    let guide = doc.add_section(SectionKind::SizeGuide);
    assert_eq!(doc.effective_height(&guide), SIZE_GUIDE_HEIGHT);

    let grid = doc.add_section(SectionKind::Grid);
    assert_eq!(doc.effective_height(&grid), PLACEHOLDER_HEIGHT);
    doc.grid_mut(&grid).unwrap().height = 520.0;
    assert_eq!(doc.effective_height(&grid), 520.0);

    doc.set_height(grid, 275.0);
    assert_eq!(doc.effective_height(&grid), 275.0);
}

#[test]
fn as_info_uses_its_kind_default() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::AsInfo);
    assert_eq!(doc.effective_height(&id), AS_INFO_HEIGHT);
}

// =============================================================
// Image lifecycle
// =============================================================

#[test]
fn decoded_image_derives_height_from_aspect_ratio() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    assert!(doc.apply_decoded_image(&id, image(400.0, 300.0)));
    // 800 * 300 / 400
    assert_eq!(doc.effective_height(&id), 600.0);
    assert_eq!(doc.section(&id).unwrap().status, SectionStatus::Populated);
}

#[test]
fn explicit_height_wins_over_derivation() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    doc.set_height(id, 250.0);
    doc.apply_decoded_image(&id, image(400.0, 300.0));
    assert_eq!(doc.effective_height(&id), 250.0);
}

#[test]
fn zero_dimension_image_skips_height_derivation() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    doc.apply_decoded_image(&id, image(0.0, 300.0));
    assert_eq!(doc.explicit_height(&id), None);
    assert!(doc.section(&id).unwrap().image.is_some());
}

#[test]
fn derived_height_is_floored_at_minimum() {
    let mut doc = DocStore::new(800.0);
    let id = doc.add_section(SectionKind::Hero);
    // Extremely wide strip: 800 * 10 / 4000 = 2 px, below the floor.
    doc.apply_decoded_image(&id, image(4000.0, 10.0));
    assert_eq!(doc.explicit_height(&id), Some(MIN_SECTION_HEIGHT));
}

// =============================================================
// Annotations
// =============================================================

#[test]
fn lines_for_section_filters_and_sorts() {
    let mut doc = DocStore::new(800.0);
    let a = doc.add_section(SectionKind::Hero);
    let b = doc.add_section(SectionKind::Image);
    doc.add_line(LineAnnotation::new(a, Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
    doc.add_line(LineAnnotation::new(a, Point::new(2.0, 2.0), Point::new(3.0, 3.0)));
    doc.add_line(LineAnnotation::new(b, Point::new(4.0, 4.0), Point::new(5.0, 5.0)));

    let lines = doc.lines_for_section(&a);
    assert_eq!(lines.len(), 2);
    assert!(lines.windows(2).all(|w| w[0].id <= w[1].id));
    assert!(lines.iter().all(|l| l.section_id == a));
}

#[test]
fn texts_for_section_filters_by_owner() {
    let mut doc = DocStore::new(800.0);
    let a = doc.add_section(SectionKind::Hero);
    let b = doc.add_section(SectionKind::Image);
    doc.add_text(TextElement::new(a, 1.0, 1.0, "one"));
    doc.add_text(TextElement::new(b, 2.0, 2.0, "two"));
    assert_eq!(doc.texts_for_section(&a).len(), 1);
    assert_eq!(doc.texts_for_section(&b).len(), 1);
}

// =============================================================
// Layout walk
// =============================================================

#[test]
fn section_rects_stack_vertically() {
    let mut doc = DocStore::new(800.0);
    let a = doc.add_section(SectionKind::Hero);
    let b = doc.add_section(SectionKind::Image);
    doc.set_height(a, 300.0);
    doc.set_height(b, 200.0);
    assert_eq!(doc.section_rect(&a), Some(Rect::new(0.0, 0.0, 800.0, 300.0)));
    assert_eq!(doc.section_rect(&b), Some(Rect::new(0.0, 300.0, 800.0, 200.0)));
    assert_eq!(doc.total_height(), 500.0);
}

#[test]
fn section_at_point_uses_half_open_vertical_intervals() {
    let mut doc = DocStore::new(800.0);
    let a = doc.add_section(SectionKind::Hero);
    let b = doc.add_section(SectionKind::Image);
    doc.set_height(a, 300.0);
    doc.set_height(b, 200.0);
    assert_eq!(doc.section_at_point(Point::new(10.0, 299.9)), Some(a));
    assert_eq!(doc.section_at_point(Point::new(10.0, 300.0)), Some(b));
    assert_eq!(doc.section_at_point(Point::new(10.0, 600.0)), None);
    assert_eq!(doc.section_at_point(Point::new(-1.0, 100.0)), None);
    assert_eq!(doc.section_at_point(Point::new(900.0, 100.0)), None);
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn snapshot_round_trips_through_json() {
    let mut doc = DocStore::new(800.0);
    let hero = doc.add_section(SectionKind::Hero);
    let grid = doc.add_section(SectionKind::Grid);
    doc.set_transform(hero, Transform { scale: 1.5, x: 12.0, y: -8.0 });
    doc.set_height(hero, 420.0);
    doc.apply_decoded_image(&hero, image(400.0, 300.0));
    doc.grid_mut(&grid).unwrap().set_cell_image(1, image(200.0, 200.0));
    doc.add_line(LineAnnotation::new(hero, Point::new(1.0, 2.0), Point::new(3.0, 4.0)));
    doc.add_text(TextElement::new(hero, 10.0, 20.0, "care label"));

    let json = doc.snapshot().to_json().unwrap();
    let mut restored = DocStore::default();
    restored.load_snapshot(Snapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.document_width(), 800.0);
    assert_eq!(restored.order(), doc.order());
    assert_eq!(restored.transform(&hero), doc.transform(&hero));
    assert_eq!(restored.explicit_height(&hero), Some(420.0));
    assert_eq!(restored.grid(&grid), doc.grid(&grid));
    assert_eq!(restored.lines_for_section(&hero).len(), 1);
    assert_eq!(restored.texts_for_section(&hero).len(), 1);
}

#[test]
fn load_rejects_order_naming_unknown_section() {
    let mut doc = DocStore::new(800.0);
    doc.add_section(SectionKind::Hero);
    let mut snap = doc.snapshot();
    snap.order.push(SectionId::new_v4());
    let mut target = DocStore::new(500.0);
    let before = target.document_width();
    assert!(matches!(target.load_snapshot(snap), Err(SnapshotError::UnknownSection(_))));
    assert_eq!(target.document_width(), before);
}

#[test]
fn load_rejects_dangling_line() {
    let mut doc = DocStore::new(800.0);
    doc.add_section(SectionKind::Hero);
    let mut snap = doc.snapshot();
    snap.lines.push(LineAnnotation::new(SectionId::new_v4(), Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
    let mut target = DocStore::new(500.0);
    assert!(matches!(
        target.load_snapshot(snap),
        Err(SnapshotError::DanglingAnnotation { kind: "line", .. })
    ));
}

#[test]
fn load_rejects_dangling_text() {
    let mut doc = DocStore::new(800.0);
    doc.add_section(SectionKind::Hero);
    let mut snap = doc.snapshot();
    snap.texts.push(TextElement::new(SectionId::new_v4(), 0.0, 0.0, "orphan"));
    assert!(matches!(
        DocStore::default().load_snapshot(snap),
        Err(SnapshotError::DanglingAnnotation { kind: "text", .. })
    ));
}

#[test]
fn load_rejects_grid_with_mismatched_column_widths() {
    let mut doc = DocStore::new(800.0);
    let grid = doc.add_section(SectionKind::Grid);
    let mut snap = doc.snapshot();
    let layout = snap.grids.get_mut(&grid).unwrap();
    layout.cols = 3;
    layout.column_widths = vec![1.0];
    layout.cells = vec![GridCell::default(); 3 * layout.rows];
    let mut target = DocStore::new(500.0);
    assert!(matches!(target.load_snapshot(snap), Err(SnapshotError::MalformedGrid { .. })));
    assert!(target.is_empty());
}

#[test]
fn load_rejects_grid_with_wrong_cell_count() {
    let mut doc = DocStore::new(800.0);
    let grid = doc.add_section(SectionKind::Grid);
    let mut snap = doc.snapshot();
    snap.grids.get_mut(&grid).unwrap().cells.pop();
    assert!(matches!(
        DocStore::default().load_snapshot(snap),
        Err(SnapshotError::MalformedGrid { .. })
    ));
}

#[test]
fn loaded_grid_layout_stays_walkable() {
    // A snapshot that passes validation must never trip the layout walk.
    let mut doc = DocStore::new(800.0);
    let grid = doc.add_section(SectionKind::Grid);
    let mut restored = DocStore::default();
    restored.load_snapshot(doc.snapshot()).unwrap();
    let rect = restored.section_rect(&grid).unwrap();
    assert_eq!(restored.grid(&grid).unwrap().cell_rects(rect).len(), 4);
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(Snapshot::from_json("{not json"), Err(SnapshotError::Parse(_))));
}
