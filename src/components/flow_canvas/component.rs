//! Leptos component wrapping the scenario canvas.
//!
//! The component creates an HTML canvas element and translates pointer, wheel
//! and drag-and-drop events into [`EditorSession`] calls: palette drops place
//! nodes, clicks select, dragging moves nodes or pans, shift-dragging from one
//! node to another connects them, and the corner button deletes. Overlay
//! buttons zoom and fit the view. An animation loop runs via
//! `requestAnimationFrame` and redraws from the session each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CanvasState, Hit};
use super::theme::{GridVariant, Theme};
use crate::editor::{
	CanvasProjection, Connection, DRAG_PAYLOAD_TYPE, DropEvent, EditorSession, NodeChange, Position,
};

/// Bundles pointer/view state with visual configuration.
struct CanvasContext {
	state: CanvasState,
	theme: Theme,
}

/// Container-relative pointer position, refreshing the viewport origin on the way.
fn pointer(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	state: &mut CanvasState,
	ev: &MouseEvent,
) -> Option<Position> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(state.locate(
		ev.client_x() as f64,
		ev.client_y() as f64,
		rect.left(),
		rect.top(),
	))
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

/// Renders the session's graph on a canvas element and edits it.
///
/// The canvas sizes itself to its parent container, follows window resizes
/// and frames the session's nodes once on mount.
#[component]
pub fn FlowCanvas(
	session: RwSignal<EditorSession>,
	/// Background grid style.
	#[prop(optional)]
	grid: GridVariant,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<CanvasContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::warn!("scenario canvas: 2d context unavailable");
			return;
		};

		let mut state = CanvasState::new(w, h);
		session.with_untracked(|s| state.fit_view(s.graph()));
		*context_init.borrow_mut() = Some(CanvasContext {
			state,
			theme: Theme::default().with_grid(grid),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref c) = *context_anim.borrow() {
				session.with_untracked(|s| {
					render::render(
						&c.state,
						s.graph(),
						s.selection().selected_node_id(),
						&ctx,
						&c.theme,
					)
				});
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let Some(p) = pointer(canvas_ref, &mut c.state, &ev) else {
				return;
			};
			match session.with_untracked(|s| c.state.hit_test(s.graph(), p)) {
				Some(Hit::DeleteButton(id)) => {
					session.update(|s| {
						s.delete_node(&id);
					});
					c.state.hovered = None;
				}
				Some(Hit::Node(id)) if ev.shift_key() => c.state.begin_connect(id, p),
				Some(Hit::Node(id)) => {
					if let Some(node) = session.with_untracked(|s| s.graph().node(&id).cloned()) {
						c.state.begin_drag(&node, p);
					}
				}
				None => c.state.begin_pan(p),
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let Some(p) = pointer(canvas_ref, &mut c.state, &ev) else {
				return;
			};

			// Update hover state when not dragging
			if c.state.drag.node_id.is_none() {
				c.state.hovered = match session.with_untracked(|s| c.state.hit_test(s.graph(), p)) {
					Some(Hit::Node(id) | Hit::DeleteButton(id)) => Some(id),
					None => None,
				};
			}

			if c.state.connect.source.is_some() {
				c.state.connect.cursor = c.state.viewport.project(p);
			} else if let Some((id, position)) = c.state.drag_to(p) {
				session.update(|s| s.apply_node_changes([NodeChange::Position { id, position }]));
			} else {
				c.state.pan_to(p);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let p = pointer(canvas_ref, &mut c.state, &ev);
			let (drag, connect) = c.state.release();

			if let (Some(source), Some(p)) = (connect.source, p) {
				let hit = session.with_untracked(|s| c.state.hit_test(s.graph(), p));
				if let Some(Hit::Node(target) | Hit::DeleteButton(target)) = hit {
					session.update(|s| {
						if let Err(e) = s.connect(Connection::new(source, target)) {
							debug!("connection rejected: {e}");
						}
					});
				}
			} else if !drag.moved {
				if let Some(id) = drag.node_id {
					session.update(|s| {
						s.click_node(&id);
					});
				}
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.release();
			c.state.hovered = None;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let Some(p) = pointer(canvas_ref, &mut c.state, &ev) else {
				return;
			};
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.viewport.zoom_at(p, factor);
		}
	};

	let on_dragover = move |ev: DragEvent| {
		ev.prevent_default();
		if let Some(dt) = ev.data_transfer() {
			dt.set_drop_effect("move");
		}
	};

	let context_dp = context.clone();
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let payload = ev
			.data_transfer()
			.and_then(|dt| dt.get_data(DRAG_PAYLOAD_TYPE).ok());
		if let Some(ref mut c) = *context_dp.borrow_mut() {
			if pointer(canvas_ref, &mut c.state, &ev).is_none() {
				return;
			}
			let event = DropEvent {
				pointer: Position::new(ev.client_x() as f64, ev.client_y() as f64),
				payload,
			};
			let viewport = c.state.viewport;
			session.update(|s| {
				s.drop_item(&event, &viewport);
			});
		}
	};

	let context_zi = context.clone();
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.state.zoom_centered(1.2);
		}
	};

	let context_zo = context.clone();
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.state.zoom_centered(1.0 / 1.2);
		}
	};

	let context_fit = context.clone();
	let on_fit = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			session.with_untracked(|s| c.state.fit_view(s.graph()));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dragover=on_dragover
			on:drop=on_drop
			style="display: block; cursor: default;"
		/>
		<div class="flow-controls">
			<button title="zoom in" on:click=on_zoom_in>"+"</button>
			<button title="zoom out" on:click=on_zoom_out>"−"</button>
			<button title="fit view" on:click=on_fit>"⤢"</button>
		</div>
	}
}
