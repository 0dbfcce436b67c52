mod error;
mod export;
mod input;
mod signature_core;
mod style;
mod surface;
mod ui_common;

#[cfg(feature = "yew")]
mod yew;

pub use error::SigError;
pub use export::{FileSaver, SaveTarget, SIGNATURE_FILE_NAME};
pub use input::{PadEvent, PointerInput, SurfaceOrigin};
pub use signature_core::{CapturedImage, DrawState, PadConfig, SignaturePad};
pub use style::{PenSize, StrokeColor, StrokeStyle};
pub use surface::{png_bytes_from_data_url, png_data_url, Point, Raster};
pub use ui_common::{BrowserDownload, DomBindings, SignatureHandle, TouchScrollGuard};

#[cfg(feature = "yew")]
pub use crate::yew::{SignatureCaptureYew, SignatureProps, SignatureStyle};

/// Route `log` output to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    // a logger may already be installed by the host app
    let _ = console_log::init_with_level(log::Level::Info);
}
