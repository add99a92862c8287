use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render::{self, CanvasMeasure};
use super::state::ChordState;
use super::step::Step;
use super::tooltip::surface_size;
use crate::data::ChordData;

fn now_ms() -> f64 {
	js_sys::Date::now()
}

/// Canvas-space pointer position, corrected for CSS scaling.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	let (w, h) = surface_size();
	let (sx, sy) = (
		if rect.width() > 0.0 { w / rect.width() } else { 1.0 },
		if rect.height() > 0.0 { h / rect.height() } else { 1.0 },
	);
	(
		(ev.client_x() as f64 - rect.left()) * sx,
		(ev.client_y() as f64 - rect.top()) * sy,
	)
}

/// Chord diagram bound to one canvas. The host drives `step`; every change
/// animates the existing scene toward the new step.
#[component]
pub fn ChordDiagram(data: ChordData, #[prop(into)] step: Signal<Step>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(ChordState::new()));
	let ctx_cell: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, ctx_init, animate_init) = (state.clone(), ctx_cell.clone(), animate);
	let context = data.context();

	Effect::new(move |_| {
		let step = step.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if ctx_init.borrow().is_none() {
			let (w, h) = surface_size();
			canvas.set_width(w.ceil() as u32);
			canvas.set_height(h.ceil() as u32);
			let ctx: CanvasRenderingContext2d = canvas
				.get_context("2d")
				.unwrap()
				.unwrap()
				.dyn_into()
				.unwrap();
			*ctx_init.borrow_mut() = Some(ctx.clone());

			let (state_anim, animate_inner, canvas_anim) =
				(state_init.clone(), animate_init.clone(), canvas.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				// Stop the frame loop once the canvas leaves the document.
				if !canvas_anim.is_connected() {
					state_anim.borrow_mut().clear();
					return;
				}
				let now = now_ms();
				{
					let mut s = state_anim.borrow_mut();
					s.tick(now, &CanvasMeasure::new(&ctx));
					if let Some(scene) = s.scene() {
						render::render(scene, &ctx, now);
					}
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					let _ = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}

		state_init
			.borrow_mut()
			.update_chord(&data.labels, &data.matrix, step, &context, now_ms());
	});

	let (state_mm, ctx_mm) = (state.clone(), ctx_cell.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		let (w, h) = surface_size();

		let mut s = state_mm.borrow_mut();
		let arc = s
			.scene()
			.and_then(|scene| scene.arc_at(x - w / 2.0, y - h / 2.0));
		s.hover_arc(arc);

		// Arcs sit above ribbons for hit purposes; only bare ribbons show a title.
		let title = match (arc, s.scene(), ctx_mm.borrow().as_ref()) {
			(None, Some(scene), Some(ctx)) => render::ribbon_at(scene, ctx, x, y, now_ms())
				.and_then(|i| scene.ribbon_title(i))
				.unwrap_or_default()
				.to_string(),
			_ => String::new(),
		};
		canvas.set_title(&title);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().hover_arc(None);
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas.set_title("");
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="chord-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; max-width: 100%;"
		/>
	}
}
