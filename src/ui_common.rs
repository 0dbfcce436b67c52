// src/ui_common.rs

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{closure::Closure, Clamped, JsCast};
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, Event, HtmlAnchorElement,
    HtmlCanvasElement, ImageData, MouseEvent, TouchEvent, Window
};

use crate::{
    error::SigError,
    export::SaveTarget,
    input::{PadEvent, PointerInput, SurfaceOrigin},
    signature_core::SignaturePad,
    surface::{png_data_url, Raster}
};

type Listener<E> = Closure<dyn FnMut(E)>;

fn document() -> Result<Document, SigError> {
    let window: Window = web_sys::window().ok_or(SigError::DomUnavailable)?;
    window.document().ok_or(SigError::DomUnavailable)
}

fn origin_of(canvas: &HtmlCanvasElement) -> SurfaceOrigin {
    let rect = canvas.get_bounding_client_rect();
    SurfaceOrigin::new(rect.left(), rect.top())
}

fn touch_input(e: &TouchEvent) -> PointerInput {
    let list = e.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| (t.client_x() as f64, t.client_y() as f64))
        .collect();
    PointerInput::Touch { touches }
}

/// RAII guard that suppresses scroll/pan gestures on a canvas. Listeners are
/// registered non-passive so `preventDefault` is honoured, and removed on drop.
pub struct TouchScrollGuard {
    canvas: HtmlCanvasElement,
    cb:     Option<Listener<Event>>
}

impl TouchScrollGuard {
    const EVENTS: [&'static str; 2] = ["touchstart", "touchmove"];

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SigError> {
        let cb: Listener<Event> = Closure::wrap(Box::new(|e: Event| {
            e.prevent_default();
        }) as Box<dyn FnMut(_)>);

        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        for ty in Self::EVENTS {
            canvas
                .add_event_listener_with_callback_and_add_event_listener_options(
                    ty,
                    cb.as_ref().unchecked_ref(),
                    &opts
                )
                .map_err(|_| SigError::OpFailed(format!("addEventListener({ty})")))?;
        }

        Ok(Self {
            canvas,
            cb: Some(cb)
        })
    }
}

impl Drop for TouchScrollGuard {
    fn drop(&mut self) {
        if let Some(cb) = self.cb.take() {
            for ty in Self::EVENTS {
                let _ = self
                    .canvas
                    .remove_event_listener_with_callback(ty, cb.as_ref().unchecked_ref());
            }
        }
    }
}

/// RAII handle that wires mouse and touch listeners on a canvas to a shared
/// `SignaturePad` and keeps the canvas pixels in sync with the pad's surface.
/// On drop, listeners are removed.
pub struct SignatureHandle {
    canvas: HtmlCanvasElement,
    pad:    Rc<RefCell<SignaturePad>>,
    mouse:  Vec<(&'static str, Listener<MouseEvent>)>,
    touch:  Vec<(&'static str, Listener<TouchEvent>)>,
    // dropped after the drawing listeners
    _guard: TouchScrollGuard
}

impl SignatureHandle {
    /// Attach to `canvas`. `on_change` runs after every event the pad handled,
    /// e.g. to refresh a preview.
    pub fn new(
        canvas: HtmlCanvasElement,
        pad: Rc<RefCell<SignaturePad>>,
        on_change: Rc<dyn Fn()>
    ) -> Result<Self, SigError> {
        let guard = TouchScrollGuard::new(canvas.clone())?;

        let dispatch = {
            let canvas = canvas.clone();
            let pad = Rc::clone(&pad);
            Rc::new(move |event: PadEvent| {
                let origin = origin_of(&canvas);
                pad.borrow_mut().handle(event, origin);
                if let Err(e) = DomBindings::paint_raster(&canvas, pad.borrow().surface()) {
                    log::warn!("failed to repaint signature canvas: {e}");
                }
                on_change();
            })
        };

        let mut mouse = Vec::new();
        let mouse_events: [(&'static str, fn(&MouseEvent) -> PadEvent); 3] = [
            ("mousedown", |e| {
                PadEvent::Down(PointerInput::mouse(e.client_x() as f64, e.client_y() as f64))
            }),
            ("mousemove", |e| {
                PadEvent::Move(PointerInput::mouse(e.client_x() as f64, e.client_y() as f64))
            }),
            ("mouseup", |_| PadEvent::Up)
        ];
        for (ty, to_event) in mouse_events {
            let dispatch = Rc::clone(&dispatch);
            let cb: Listener<MouseEvent> = Closure::wrap(Box::new(move |e: MouseEvent| {
                dispatch(to_event(&e));
            }) as Box<dyn FnMut(_)>);
            canvas
                .add_event_listener_with_callback(ty, cb.as_ref().unchecked_ref())
                .map_err(|_| SigError::OpFailed(format!("addEventListener({ty})")))?;
            mouse.push((ty, cb));
        }

        let mut touch = Vec::new();
        let touch_events: [(&'static str, fn(&TouchEvent) -> PadEvent); 3] = [
            ("touchstart", |e| PadEvent::Down(touch_input(e))),
            ("touchmove", |e| PadEvent::Move(touch_input(e))),
            ("touchend", |_| PadEvent::Up)
        ];
        for (ty, to_event) in touch_events {
            let dispatch = Rc::clone(&dispatch);
            let cb: Listener<TouchEvent> = Closure::wrap(Box::new(move |e: TouchEvent| {
                dispatch(to_event(&e));
            }) as Box<dyn FnMut(_)>);
            canvas
                .add_event_listener_with_callback(ty, cb.as_ref().unchecked_ref())
                .map_err(|_| SigError::OpFailed(format!("addEventListener({ty})")))?;
            touch.push((ty, cb));
        }

        canvas.set_width(pad.borrow().config().width);
        canvas.set_height(pad.borrow().config().height);
        DomBindings::paint_raster(&canvas, pad.borrow().surface())?;

        Ok(Self {
            canvas,
            pad,
            mouse,
            touch,
            _guard: guard
        })
    }

    pub fn pad(&self) -> &Rc<RefCell<SignaturePad>> {
        &self.pad
    }

    /// Clear the pad and the canvas.
    pub fn clear(&self) {
        self.pad.borrow_mut().clear();
        if let Err(e) = DomBindings::paint_raster(&self.canvas, self.pad.borrow().surface()) {
            log::warn!("failed to repaint signature canvas: {e}");
        }
    }
}

impl Drop for SignatureHandle {
    fn drop(&mut self) {
        for (ty, cb) in self.mouse.drain(..) {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(ty, cb.as_ref().unchecked_ref());
        }
        for (ty, cb) in self.touch.drain(..) {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(ty, cb.as_ref().unchecked_ref());
        }
    }
}

/// Saves by clicking a temporary `<a download>` link.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDownload;

impl SaveTarget for BrowserDownload {
    fn save(&mut self, file_name: &str, png: &[u8]) -> Result<(), SigError> {
        let document = document()?;
        let body = document.body().ok_or(SigError::DomUnavailable)?;
        let link: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| SigError::OpFailed("createElement(a)".into()))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| SigError::OpFailed("created element is not <a>".into()))?;
        link.set_href(&png_data_url(png));
        link.set_download(file_name);

        body.append_child(&link)
            .map_err(|_| SigError::OpFailed("appendChild(a)".into()))?;
        link.click();
        body.remove_child(&link)
            .map_err(|_| SigError::OpFailed("removeChild(a)".into()))?;
        Ok(())
    }
}

/// DOM helpers. Stateless. All state lives in `SignatureHandle`.
pub struct DomBindings;

impl DomBindings {
    /// Look up a `<canvas>` by id.
    pub fn canvas_by_id(canvas_id: &str) -> Result<HtmlCanvasElement, SigError> {
        document()?
            .get_element_by_id(canvas_id)
            .ok_or_else(|| SigError::ElementNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SigError::ElementNotFound(canvas_id.to_string()))
    }

    /// Create a pad sized by its config and attach it to the canvas with `canvas_id`.
    pub fn init_by_canvas_id(
        canvas_id: &str,
        pad: Rc<RefCell<SignaturePad>>,
        on_change: Rc<dyn Fn()>
    ) -> Result<SignatureHandle, SigError> {
        SignatureHandle::new(Self::canvas_by_id(canvas_id)?, pad, on_change)
    }

    /// Copy `raster` into the canvas, replacing its content.
    pub fn paint_raster(canvas: &HtmlCanvasElement, raster: &Raster) -> Result<(), SigError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SigError::NoContext2d)?
            .ok_or(SigError::NoContext2d)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SigError::NoContext2d)?;
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(raster.as_rgba()),
            raster.width(),
            raster.height()
        )
        .map_err(|_| SigError::OpFailed("new ImageData".into()))?;
        ctx.put_image_data(&data, 0.0, 0.0)
            .map_err(|_| SigError::OpFailed("putImageData".into()))
    }
}
