//! Rendering: draws the composed document to a 2D canvas context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives read-only engine state
//! and produces pixels — it does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the
//! result.

use std::collections::HashMap;
use std::f64::consts::PI;

use uuid::Uuid;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::annotation::{LineAnnotation, LineCap, LineEnd, LineType, TextAlign, TextElement};
use crate::consts::{HANDLE_RADIUS_PX, RESIZE_HANDLE_BAND_PX};
use crate::engine::EngineCore;
use crate::geometry::{Point, Rect};
use crate::grid::GridLayout;
use crate::region::resolve_zones;
use crate::section::{Section, SectionKind, SectionStatus};

/// Arrowhead length in pixels.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Dash segment length for placeholder and region outlines.
const DASH_PX: f64 = 4.0;

/// Width of the resize grip bar.
const GRIP_WIDTH_PX: f64 = 48.0;

/// Draw the full scene: sections in order with their transforms, grids,
/// annotation layers, veils, and region overlays.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    images: &HashMap<Uuid, HtmlImageElement>,
) -> Result<(), JsValue> {
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(0.0, -core.scroll_y)?;

    let view_top = core.scroll_y;
    let view_bottom = core.scroll_y + core.viewport_height;

    for id in core.doc.order() {
        let Some(section) = core.doc.section(id) else {
            continue;
        };
        let Some(rect) = core.doc.section_rect(id) else {
            continue;
        };
        // Cull sections fully outside the viewport.
        if rect.y > view_bottom || rect.y + rect.height < view_top {
            continue;
        }
        draw_section(ctx, core, images, section, rect)?;
    }

    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    Ok(())
}

// =============================================================
// Section dispatch
// =============================================================

fn draw_section(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    images: &HashMap<Uuid, HtmlImageElement>,
    section: &Section,
    rect: Rect,
) -> Result<(), JsValue> {
    match section.kind {
        SectionKind::Hero | SectionKind::Image => draw_image_section(ctx, core, images, section, rect)?,
        SectionKind::Grid => {
            if let Some(grid) = core.doc.grid(&section.id) {
                draw_grid_section(ctx, images, grid, rect)?;
            }
        }
        SectionKind::SizeGuide => draw_fixed_block(ctx, rect, "Size guide")?,
        SectionKind::AsInfo => draw_fixed_block(ctx, rect, "After-sales info")?,
        SectionKind::Precautions => draw_fixed_block(ctx, rect, "Precautions")?,
    }

    for line in core.doc.lines_for_section(&section.id) {
        draw_line(ctx, line, rect, core.selected_line == Some(line.id))?;
    }
    for text in core.doc.texts_for_section(&section.id) {
        draw_text_element(ctx, text, rect)?;
    }

    if section.status == SectionStatus::Processing {
        draw_processing_veil(ctx, rect)?;
    }
    if section.held {
        draw_held_overlay(ctx, core, section, rect)?;
    } else if section.is_editable(core.edit_mode) && section.status != SectionStatus::Processing {
        draw_selection_chrome(ctx, rect);
    }
    Ok(())
}

// =============================================================
// Section bodies
// =============================================================

fn draw_image_section(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    images: &HashMap<Uuid, HtmlImageElement>,
    section: &Section,
    rect: Rect,
) -> Result<(), JsValue> {
    let element = section.image.as_ref().and_then(|image| images.get(&image.id));
    let (Some(image), Some(element)) = (section.image.as_ref(), element) else {
        return draw_placeholder(ctx, rect, "Drop image or click to upload");
    };

    ctx.save();
    ctx.begin_path();
    ctx.rect(rect.x, rect.y, rect.width, rect.height);
    ctx.clip();

    if let Some(filter) = section.filter.css() {
        ctx.set_filter(filter);
    }

    let transform = core.doc.transform(&section.id);
    let center = rect.center();
    ctx.translate(center.x + transform.x, center.y + transform.y)?;
    if section.flipped {
        ctx.scale(-1.0, 1.0)?;
    }
    ctx.scale(transform.scale, transform.scale)?;

    // Fit the natural aspect ratio into the document width.
    let draw_w = rect.width;
    let draw_h = if image.natural_w > 0.0 { rect.width * image.natural_h / image.natural_w } else { rect.height };
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        element,
        -draw_w / 2.0,
        -draw_h / 2.0,
        draw_w,
        draw_h,
    )?;

    ctx.restore();
    Ok(())
}

fn draw_grid_section(
    ctx: &CanvasRenderingContext2d,
    images: &HashMap<Uuid, HtmlImageElement>,
    grid: &GridLayout,
    rect: Rect,
) -> Result<(), JsValue> {
    for (index, cell_rect) in grid.cell_rects(rect).into_iter().enumerate() {
        let Some(cell) = grid.cell(index) else {
            continue;
        };
        match cell.image.as_ref().and_then(|image| images.get(&image.id).map(|el| (image, el))) {
            Some((image, element)) => {
                ctx.save();
                ctx.begin_path();
                ctx.rect(cell_rect.x, cell_rect.y, cell_rect.width, cell_rect.height);
                ctx.clip();
                let center = cell_rect.center();
                ctx.translate(center.x + cell.transform.x, center.y + cell.transform.y)?;
                ctx.scale(cell.transform.scale, cell.transform.scale)?;
                let draw_w = cell_rect.width;
                let draw_h = if image.natural_w > 0.0 {
                    cell_rect.width * image.natural_h / image.natural_w
                } else {
                    cell_rect.height
                };
                ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    element,
                    -draw_w / 2.0,
                    -draw_h / 2.0,
                    draw_w,
                    draw_h,
                )?;
                ctx.restore();
            }
            None => draw_placeholder(ctx, cell_rect, "+")?,
        }
        ctx.set_stroke_style_str("#D8D2CB");
        ctx.set_line_width(1.0);
        ctx.stroke_rect(cell_rect.x, cell_rect.y, cell_rect.width, cell_rect.height);
    }
    Ok(())
}

fn draw_fixed_block(ctx: &CanvasRenderingContext2d, rect: Rect, title: &str) -> Result<(), JsValue> {
    ctx.set_fill_style_str("#F6F3EF");
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_stroke_style_str("#D8D2CB");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);

    ctx.set_fill_style_str("#1F1A17");
    ctx.set_font("600 20px sans-serif");
    ctx.set_text_align("center");
    let center = rect.center();
    ctx.fill_text(title, center.x, rect.y + 36.0)?;
    ctx.set_text_align("left");
    Ok(())
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, rect: Rect, label: &str) -> Result<(), JsValue> {
    ctx.set_fill_style_str("#FAF8F5");
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    set_dash(ctx, DASH_PX)?;
    ctx.set_stroke_style_str("#B9B1A7");
    ctx.set_line_width(1.5);
    ctx.stroke_rect(rect.x + 4.0, rect.y + 4.0, rect.width - 8.0, rect.height - 8.0);
    clear_dash(ctx)?;

    ctx.set_fill_style_str("#8A8178");
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("center");
    let center = rect.center();
    ctx.fill_text(label, center.x, center.y)?;
    ctx.set_text_align("left");
    Ok(())
}

// =============================================================
// Annotation layers
// =============================================================

fn draw_line(
    ctx: &CanvasRenderingContext2d,
    line: &LineAnnotation,
    rect: Rect,
    selected: bool,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(rect.x, rect.y)?;

    ctx.set_stroke_style_str(&line.stroke_color);
    ctx.set_line_width(line.stroke_width);
    ctx.set_line_cap(match line.line_cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    });

    ctx.begin_path();
    ctx.move_to(line.x1, line.y1);
    let end_direction = match line.line_type {
        LineType::Straight => {
            ctx.line_to(line.x2, line.y2);
            (line.x2 - line.x1, line.y2 - line.y1)
        }
        LineType::Curved => {
            let control = line.control_point();
            ctx.quadratic_curve_to(control.x, control.y, line.x2, line.y2);
            (line.x2 - control.x, line.y2 - control.y)
        }
        LineType::Angled => {
            let pts = line.elbow_waypoints();
            for pt in &pts[1..] {
                ctx.line_to(pt.x, pt.y);
            }
            (pts[3].x - pts[2].x, pts[3].y - pts[2].y)
        }
    };
    ctx.stroke();

    if line.line_end == LineEnd::Arrow {
        draw_arrowhead(ctx, line.end(), end_direction);
    }

    if selected {
        draw_endpoint_handle(ctx, line.start())?;
        draw_endpoint_handle(ctx, line.end())?;
    }

    ctx.restore();
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Point, direction: (f64, f64)) {
    let angle = direction.1.atan2(direction.0);
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos(), tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin());
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos(), tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin());
    ctx.stroke();
}

fn draw_endpoint_handle(ctx: &CanvasRenderingContext2d, at: Point) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(at.x, at.y, HANDLE_RADIUS_PX / 2.0, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill();
    ctx.set_stroke_style_str("#2D6CDF");
    ctx.set_line_width(1.5);
    ctx.stroke();
    Ok(())
}

fn draw_text_element(ctx: &CanvasRenderingContext2d, text: &TextElement, rect: Rect) -> Result<(), JsValue> {
    ctx.set_fill_style_str(&text.color);
    ctx.set_font(&format!("{} {}px {}", text.font_weight, text.font_size, text.font_family));
    ctx.set_text_align(match text.text_align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    });
    ctx.fill_text(&text.content, rect.x + text.left, rect.y + text.top + text.font_size)?;
    ctx.set_text_align("left");
    Ok(())
}

// =============================================================
// Chrome and overlays
// =============================================================

fn draw_selection_chrome(ctx: &CanvasRenderingContext2d, rect: Rect) {
    ctx.set_stroke_style_str("#2D6CDF");
    ctx.set_line_width(1.5);
    ctx.stroke_rect(rect.x + 0.75, rect.y + 0.75, rect.width - 1.5, rect.height - 1.5);

    // Resize grip bar centered in the bottom band.
    let center = rect.center();
    ctx.set_fill_style_str("#2D6CDF");
    ctx.fill_rect(
        center.x - GRIP_WIDTH_PX / 2.0,
        rect.y + rect.height - RESIZE_HANDLE_BAND_PX / 2.0 - 2.0,
        GRIP_WIDTH_PX,
        4.0,
    );
}

fn draw_processing_veil(ctx: &CanvasRenderingContext2d, rect: Rect) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(0.55);
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.restore();

    ctx.set_fill_style_str("#5A544E");
    ctx.set_font("600 15px sans-serif");
    ctx.set_text_align("center");
    let center = rect.center();
    ctx.fill_text("Processing\u{2026}", center.x, center.y)?;
    ctx.set_text_align("left");
    Ok(())
}

fn draw_held_overlay(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    section: &Section,
    rect: Rect,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(0.12);
    ctx.set_fill_style_str("#1F1A17");
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.restore();

    ctx.set_stroke_style_str("#D97A2B");
    ctx.set_line_width(2.0);
    ctx.stroke_rect(rect.x + 1.0, rect.y + 1.0, rect.width - 2.0, rect.height - 2.0);

    let Some(cached) = core.regions_for(&section.id) else {
        return Ok(());
    };
    for zone in resolve_zones(cached, rect) {
        let hovered = core.hovered_region == Some((section.id, zone.index));
        if hovered {
            ctx.save();
            ctx.set_global_alpha(0.25);
            ctx.set_fill_style_str("#D97A2B");
            ctx.fill_rect(zone.rect.x, zone.rect.y, zone.rect.width, zone.rect.height);
            ctx.restore();
        }
        set_dash(ctx, DASH_PX)?;
        ctx.set_stroke_style_str("#D97A2B");
        ctx.set_line_width(1.5);
        ctx.stroke_rect(zone.rect.x, zone.rect.y, zone.rect.width, zone.rect.height);
        clear_dash(ctx)?;

        if hovered {
            ctx.set_fill_style_str("#D97A2B");
            ctx.set_font("600 13px sans-serif");
            ctx.fill_text(&cached[zone.index].label, zone.rect.x + 4.0, zone.rect.y - 6.0)?;
        }
    }
    Ok(())
}

// =============================================================
// Canvas helpers
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let segments = js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(dash));
    ctx.set_line_dash(&segments)
}

fn clear_dash(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_line_dash(&js_sys::Array::new())
}
