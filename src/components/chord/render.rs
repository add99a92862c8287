use std::f64::consts::FRAC_PI_2;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use super::layout::Chord;
use super::scene::{ArcNode, LABEL_OFFSET, Paint, Scene, inner_radius, outer_radius};
use super::tooltip::{ApproxMeasure, BOX_HEIGHT, BOX_TOP, Font, TextMeasure, surface_size};

const LABEL_FONT: &str = "13px sans-serif";
const CAPTION_FILL: &str = "#444";
const SUBCAPTION_FILL: &str = "#777";

/// Measures text with the canvas' own font metrics.
pub struct CanvasMeasure<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasMeasure<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl TextMeasure for CanvasMeasure<'_> {
	fn text_width(&self, text: &str, font: Font) -> f64 {
		self.ctx.set_font(&font.css());
		self.ctx
			.measure_text(text)
			.map(|m| m.width())
			.unwrap_or_else(|_| ApproxMeasure.text_width(text, font))
	}
}

/// Ribbon outline: source arc, curve through the centre to the target arc,
/// and back.
pub fn ribbon_path(chord: &Chord, radius: f64) -> Result<Path2d, JsValue> {
	let (sa0, sa1) = (
		chord.source.start_angle - FRAC_PI_2,
		chord.source.end_angle - FRAC_PI_2,
	);
	let (ta0, ta1) = (
		chord.target.start_angle - FRAC_PI_2,
		chord.target.end_angle - FRAC_PI_2,
	);
	let path = Path2d::new()?;
	path.move_to(radius * sa0.cos(), radius * sa0.sin());
	path.arc(0.0, 0.0, radius, sa0, sa1)?;
	if sa0 != ta0 || sa1 != ta1 {
		path.quadratic_curve_to(0.0, 0.0, radius * ta0.cos(), radius * ta0.sin());
		path.arc(0.0, 0.0, radius, ta0, ta1)?;
	}
	path.quadratic_curve_to(0.0, 0.0, radius * sa0.cos(), radius * sa0.sin());
	path.close_path();
	Ok(path)
}

/// Topmost interactive ribbon under a canvas-space point.
pub fn ribbon_at(scene: &Scene, ctx: &CanvasRenderingContext2d, x: f64, y: f64, now: f64) -> Option<usize> {
	let (w, h) = surface_size();
	ctx.save();
	let _ = ctx.translate(w / 2.0, h / 2.0);
	let hit = scene
		.ribbons
		.iter()
		.enumerate()
		.rev()
		.filter(|(_, r)| r.interactive && r.opacity.value_at(now) > 0.0)
		.find(|(_, r)| {
			ribbon_path(&r.chord, inner_radius())
				.map(|path| ctx.is_point_in_path_with_path_2d_and_f64(&path, x, y))
				.unwrap_or(false)
		})
		.map(|(i, _)| i);
	ctx.restore();
	hit
}

pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d, now: f64) {
	let (w, h) = surface_size();
	ctx.clear_rect(0.0, 0.0, w, h);
	ctx.save();
	let _ = ctx.translate(w / 2.0, h / 2.0);
	draw_caption(scene, ctx, now);
	draw_arcs(scene, ctx, now);
	draw_ribbons(scene, ctx, now);
	draw_tooltips(scene, ctx);
	ctx.restore();
	ctx.set_global_alpha(1.0);
}

fn draw_caption(scene: &Scene, ctx: &CanvasRenderingContext2d, now: f64) {
	let caption = &scene.caption;
	let alpha = caption.opacity.value_at(now);
	if !caption.displayed || alpha <= 0.0 {
		return;
	}
	ctx.set_global_alpha(alpha);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("600 22px sans-serif");
	ctx.set_fill_style_str(CAPTION_FILL);
	let _ = ctx.fill_text(caption.title, 0.0, -10.0);
	ctx.set_font("14px sans-serif");
	ctx.set_fill_style_str(SUBCAPTION_FILL);
	let _ = ctx.fill_text(caption.subtitle, 0.0, 25.0);
}

fn draw_arcs(scene: &Scene, ctx: &CanvasRenderingContext2d, now: f64) {
	let (inner, outer) = (inner_radius(), outer_radius());
	for arc in &scene.arcs {
		let (a0, a1) = (arc.start_angle - FRAC_PI_2, arc.end_angle - FRAC_PI_2);
		ctx.set_global_alpha(arc.opacity.value_at(now));
		ctx.begin_path();
		let _ = ctx.arc(0.0, 0.0, outer, a0, a1);
		let _ = ctx.arc_with_anticlockwise(0.0, 0.0, inner, a1, a0, true);
		ctx.close_path();
		ctx.set_fill_style_str(&arc.fill);
		ctx.fill();

		ctx.set_global_alpha(1.0);
		draw_label(arc, ctx, outer);
	}
}

fn draw_label(arc: &ArcNode, ctx: &CanvasRenderingContext2d, outer: f64) {
	ctx.save();
	let _ = ctx.rotate(arc.mid_angle() - FRAC_PI_2);
	let _ = ctx.translate(outer + LABEL_OFFSET, 0.0);
	let flipped = arc.label_flipped();
	if flipped {
		let _ = ctx.rotate(std::f64::consts::PI);
	}
	ctx.set_font(LABEL_FONT);
	ctx.set_text_baseline("middle");
	ctx.set_text_align(if flipped { "end" } else { "start" });
	ctx.set_fill_style_str(&arc.label_fill);
	let _ = ctx.fill_text(&arc.label, 0.0, 0.0);
	ctx.restore();
}

fn draw_ribbons(scene: &Scene, ctx: &CanvasRenderingContext2d, now: f64) {
	let radius = inner_radius();
	for ribbon in &scene.ribbons {
		let alpha = ribbon.opacity.value_at(now);
		if alpha <= 0.0 {
			continue;
		}
		let Ok(path) = ribbon_path(&ribbon.chord, radius) else {
			continue;
		};
		ctx.set_global_alpha(alpha);
		match &ribbon.fill {
			Paint::Color(color) => ctx.set_fill_style_str(color),
			Paint::Gradient(id) => match scene.gradient(id) {
				Some(g) => {
					let gradient = ctx.create_linear_gradient(g.x1, g.y1, g.x2, g.y2);
					let _ = gradient.add_color_stop(0.0, &g.from);
					let _ = gradient.add_color_stop(1.0, &g.to);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
				}
				None => ctx.set_fill_style_str("#ccc"),
			},
		}
		ctx.fill_with_path_2d(&path);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_tooltips(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	if !scene.tooltips.visible {
		return;
	}
	for callout in &scene.tooltips.callouts {
		let c = &callout.connector;
		ctx.set_global_alpha(0.85);
		ctx.begin_path();
		ctx.move_to(c.start.0, c.start.1);
		ctx.quadratic_curve_to(c.control.0, c.control.1, c.end.0, c.end.1);
		ctx.set_stroke_style_str(&callout.color);
		ctx.set_line_width(1.4);
		ctx.stroke();

		ctx.save();
		let _ = ctx.translate(callout.point.x, callout.point.y);
		ctx.set_global_alpha(0.97);
		ctx.begin_path();
		rounded_rect(ctx, 0.0, BOX_TOP, callout.box_width, BOX_HEIGHT, 4.0);
		ctx.set_fill_style_str("white");
		ctx.fill();
		ctx.set_line_width(1.0);
		ctx.stroke();

		ctx.set_global_alpha(1.0);
		ctx.set_text_align("start");
		ctx.set_text_baseline("alphabetic");
		ctx.set_fill_style_str("#222");
		for line in &callout.lines {
			ctx.set_font(&line.font.css());
			let _ = ctx.fill_text(&line.text, line.x, line.y);
		}
		ctx.restore();
	}
	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
