// src/yew.rs
// feature = "yew"

use std::rc::Rc;

use web_sys::HtmlCanvasElement;
use yew::{
    function_component, html, use_effect_with, use_mut_ref, use_node_ref, use_state_eq, Callback,
    Html, Properties
};

use crate::{
    signature_core::{CapturedImage, PadConfig, SignaturePad},
    style::{PenSize, StrokeColor},
    ui_common::{BrowserDownload, DomBindings, SignatureHandle}
};

/// Visual customization for the signature canvases.
#[derive(Clone, PartialEq)]
pub struct SignatureStyle {
    /// Canvas border CSS, e.g. "1px solid black"
    pub border:     String,
    /// Canvas background CSS color, e.g. "#fff"
    pub background: String,
    /// Drawing surface size in canvas pixels; the preview uses the same size
    pub width:      u32,
    pub height:     u32
}

impl Default for SignatureStyle {
    fn default() -> Self {
        Self {
            border:     "1px solid black".into(),
            background: "transparent".into(),
            width:      400,
            height:     200
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct SignatureProps {
    /// Visual style of the canvases.
    #[prop_or_default]
    pub style: Option<SignatureStyle>,

    /// Called with the PNG data URL each time a new signature is captured.
    #[prop_or_default]
    pub on_captured: Option<Callback<String>>
}

/// Signature capture widget: drawing canvas, palette, pen sizes, clear /
/// download buttons and a preview of the last captured signature.
#[function_component(SignatureCaptureYew)]
pub fn signature_capture_yew(props: &SignatureProps) -> Html {
    let style = props.style.clone().unwrap_or_default();

    let pad = use_mut_ref({
        let (width, height) = (style.width, style.height);
        move || {
            SignaturePad::new(PadConfig {
                width,
                height,
                preview_width: width,
                preview_height: height,
                ..PadConfig::default()
            })
        }
    });
    let handle = use_mut_ref(|| None::<SignatureHandle>);
    let last_seen = use_mut_ref(|| None::<CapturedImage>);
    // Mirrors the pad's captured image; drives the preview section.
    let signature = use_state_eq(|| None::<String>);

    let canvas_ref = use_node_ref();
    let preview_ref = use_node_ref();

    // Attach listeners on mount, release them (and the touch guard) on unmount.
    {
        let canvas_ref = canvas_ref.clone();
        let pad = pad.clone();
        let handle = handle.clone();
        let last_seen = last_seen.clone();
        let signature = signature.clone();
        let on_captured = props.on_captured.clone();

        use_effect_with((), move |_| {
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let on_change: Rc<dyn Fn()> = {
                    let pad = pad.clone();
                    Rc::new(move || {
                        let current = pad.borrow().captured_image().cloned();
                        if *last_seen.borrow() == current {
                            return;
                        }
                        let url = current.as_ref().map(CapturedImage::to_string);
                        if let (Some(cb), Some(url)) = (&on_captured, &url) {
                            cb.emit(url.clone());
                        }
                        *last_seen.borrow_mut() = current;
                        signature.set(url);
                    })
                };
                match SignatureHandle::new(canvas, pad, on_change) {
                    Ok(h) => *handle.borrow_mut() = Some(h),
                    Err(e) => log::error!("signature canvas unavailable: {e}")
                }
            }
            move || {
                handle.borrow_mut().take();
            }
        });
    }

    // Re-render the preview whenever the captured image changes.
    {
        let preview_ref = preview_ref.clone();
        let pad = pad.clone();
        use_effect_with((*signature).clone(), move |captured| {
            if captured.is_some() {
                if let Some(canvas) = preview_ref.cast::<HtmlCanvasElement>() {
                    if let Some(preview) = pad.borrow().preview() {
                        canvas.set_width(preview.width());
                        canvas.set_height(preview.height());
                        if let Err(e) = DomBindings::paint_raster(&canvas, preview) {
                            log::warn!("failed to paint signature preview: {e}");
                        }
                    }
                }
            }
            || ()
        });
    }

    let on_clear = {
        let handle = handle.clone();
        let pad = pad.clone();
        let last_seen = last_seen.clone();
        let signature = signature.clone();
        Callback::from(move |_e: web_sys::MouseEvent| {
            match handle.borrow().as_ref() {
                Some(h) => h.clear(),
                None => pad.borrow_mut().clear()
            }
            *last_seen.borrow_mut() = None;
            signature.set(None);
        })
    };

    let on_download = {
        let pad = pad.clone();
        Callback::from(move |_e: web_sys::MouseEvent| {
            pad.borrow().download(&mut BrowserDownload);
        })
    };

    let canvas_css = format!(
        "border:{};background:{};touch-action:none;",
        style.border, style.background
    );

    let color_buttons = StrokeColor::ALL.iter().map(|&color| {
        let pad = pad.clone();
        let onclick = Callback::from(move |_e: web_sys::MouseEvent| {
            pad.borrow_mut().set_color(color);
        });
        html! {
            <button class="color-button"
                    title={color.hex()}
                    style={format!(
                        "background-color:{};width:30px;height:30px;margin:5px;border:none;",
                        color.hex()
                    )}
                    {onclick} />
        }
    });

    let size_buttons = PenSize::ALL.iter().map(|&size| {
        let pad = pad.clone();
        let onclick = Callback::from(move |_e: web_sys::MouseEvent| {
            pad.borrow_mut().set_pen_size(size);
        });
        html! {
            <button class="color-button"
                    style="width:40px;height:40px;margin:5px;border:none;"
                    {onclick}>
              { size.px().to_string() }
            </button>
        }
    });

    html! {
        <div class="signature-capture">
          <h1>{"Signature Capture"}</h1>
          <canvas id="signature-canvas"
                  ref={canvas_ref}
                  width={style.width.to_string()}
                  height={style.height.to_string()}
                  style={canvas_css.clone()} />
          <br />
          <div style="margin-top:10px;display:flex;justify-content:center;">
            { for color_buttons }
          </div>
          <br />
          <div style="display:flex;justify-content:center;">
            { for size_buttons }
          </div>
          <br />
          <button class="button" onclick={on_clear}>{"Clear Signature"}</button>
          <button class="button" onclick={on_download}>{"Download Signature"}</button>
          {
            if signature.is_some() {
              html! {
                <div>
                  <h2>{"Signature Preview:"}</h2>
                  <canvas id="signature-preview"
                          ref={preview_ref}
                          width={style.width.to_string()}
                          height={style.height.to_string()}
                          style={canvas_css} />
                </div>
              }
            } else {
              Html::default()
            }
          }
        </div>
    }
}
