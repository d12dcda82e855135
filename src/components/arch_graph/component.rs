//! Leptos component wrapping the architecture diagram canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! event handlers for node dragging, panning, and zooming. An animation loop
//! runs via `requestAnimationFrame`, ticking the layout simulation and
//! redrawing each frame. Handlers only translate events into state calls;
//! every layout mutation goes through the simulation's intent queue.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::GraphState;
use super::theme::Theme;
use super::types::{ArchData, ArchNode};

/// Bundles the layout state with the visual configuration and the
/// pre-parsed icon paths.
struct GraphContext {
	state: GraphState,
	theme: Theme,
	icons: Vec<Option<web_sys::Path2d>>,
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	// The view layer's `ElementExt` puts a one-argument `style` in scope,
	// so the `HtmlElement` getter has to be named explicitly.
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}

/// Renders an interactive architecture diagram on a canvas element.
///
/// Pass the dataset via the reactive `data` signal; a change rebuilds the
/// layout from scratch. `selected` highlights the node with that id, and
/// `on_node_click` fires when a press and release stay within the click
/// slop. The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize automatically with
/// the window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ArchitectureGraph(
	/// Diagram dataset; a change rebuilds the layout from scratch.
	#[prop(into)]
	data: Signal<ArchData>,
	/// Id of the node to highlight, if any.
	#[prop(into)]
	selected: Signal<Option<String>>,
	/// Invoked with the clicked node when a gesture stays within the
	/// click slop.
	#[prop(into)]
	on_node_click: Callback<ArchNode>,
	/// Fill the viewport and follow window resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Explicit canvas width, overriding parent-based sizing.
	#[prop(default = None)]
	width: Option<f64>,
	/// Explicit canvas height, overriding parent-based sizing.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (context_init, animate_init, resize_cb_init, raf_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_handle.clone(),
	);

	Effect::new(move |_| {
		// Reactive read: any dataset change rebuilds the whole layout.
		let dataset = data.get();

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*context_init.borrow_mut() = Some(GraphContext {
			state: GraphState::new(&dataset, w, h),
			theme: Theme::default(),
			icons: render::build_icon_paths(),
		});

		// Everything below is mount-once wiring; re-runs only swap the
		// context the running loop reads.
		if animate_init.borrow().is_some() {
			return;
		}

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, raf_anim) =
			(context_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let sel = selected.get_untracked();
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick();
				render::render(&c.state, &ctx, &c.theme, &c.icons, sel.as_deref());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				raf_anim.set(
					web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok(),
				);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			raf_init.set(
				window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
			);
		}
	});

	// The JS closures are not Send, so the cleanup hook reaches them through
	// a local stored value instead of capturing the cells directly.
	let cleanup_handles = StoredValue::new_local((
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_handle.clone(),
	));
	on_cleanup(move || {
		let _ = cleanup_handles.try_with_value(|(context, animate, resize_cb, raf_handle)| {
			if let (Some(win), Some(handle)) = (web_sys::window(), raf_handle.get()) {
				let _ = win.cancel_animation_frame(handle);
			}
			if let Some(win) = web_sys::window() {
				if let Some(ref cb) = *resize_cb.borrow() {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
			*animate.borrow_mut() = None;
			*resize_cb.borrow_mut() = None;
			*context.borrow_mut() = None;
		});
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
			set_cursor(&canvas, c.state.cursor(x, y));
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(x, y);
			set_cursor(&canvas, c.state.cursor(x, y));
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		// Resolve the click before running the callback, so the borrow is
		// released when downstream signal updates re-render.
		let clicked = {
			let mut borrow = context_mu.borrow_mut();
			let Some(ref mut c) = *borrow else {
				return;
			};
			let clicked = c
				.state
				.pointer_up(x, y)
				.and_then(|idx| c.state.nodes().get(idx).cloned());
			set_cursor(&canvas, c.state.cursor(x, y));
			clicked
		};
		if let Some(node) = clicked {
			on_node_click.run(node);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.release_pointer();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.apply_zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="arch-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
