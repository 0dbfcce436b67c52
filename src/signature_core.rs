use std::{fmt, rc::Rc};

use crate::{
    error::SigError,
    export::{SaveTarget, SIGNATURE_FILE_NAME},
    input::{PadEvent, SurfaceOrigin},
    style::{PenSize, StrokeColor, StrokeStyle},
    surface::{Point, Raster}
};

/// Surface sizes and export name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PadConfig {
    pub width:          u32,
    pub height:         u32,
    pub preview_width:  u32,
    pub preview_height: u32,
    pub file_name:      String
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width:          400,
            height:         200,
            preview_width:  400,
            preview_height: 200,
            file_name:      SIGNATURE_FILE_NAME.into()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    /// A stroke is in progress. `style` is frozen at stroke start.
    Drawing { style: StrokeStyle, last: Point }
}

/// PNG data URL snapshot of the drawing surface. Cheap to clone, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage(Rc<str>);

impl CapturedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encapsulates drawing logic, preview and export of a signature.
pub struct SignaturePad {
    config:   PadConfig,
    surface:  Raster,
    style:    StrokeStyle,
    state:    DrawState,
    captured: Option<CapturedImage>,
    preview:  Option<Raster>
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(PadConfig::default())
    }
}

impl SignaturePad {
    pub fn new(config: PadConfig) -> Self {
        Self {
            surface: Raster::new(config.width, config.height),
            config,
            style: StrokeStyle::default(),
            state: DrawState::Idle,
            captured: None,
            preview: None
        }
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Live drawing surface, including any in-progress stroke.
    pub fn surface(&self) -> &Raster {
        &self.surface
    }

    /// Snapshot taken at the last completed stroke, `None` after a clear.
    pub fn captured_image(&self) -> Option<&CapturedImage> {
        self.captured.as_ref()
    }

    /// Preview rendered from the captured image, `None` while nothing is
    /// captured.
    pub fn preview(&self) -> Option<&Raster> {
        self.preview.as_ref()
    }

    /// Takes effect on the next stroke.
    pub fn set_color(&mut self, color: StrokeColor) {
        self.style.color = color;
    }

    /// Takes effect on the next stroke.
    pub fn set_pen_size(&mut self, size: PenSize) {
        self.style.width = size;
    }

    /// Pointer down: start a stroke at `point` with the current style.
    pub fn begin_stroke(&mut self, point: Point) {
        self.state = DrawState::Drawing {
            style: self.style,
            last:  point
        };
    }

    /// Pointer move: paint from the last point to `point` if a stroke is active.
    pub fn extend_stroke(&mut self, point: Point) {
        let DrawState::Drawing { style, last } = self.state else {
            return;
        };
        self.surface
            .stroke_segment(last, point, style.color.rgba(), style.width.px());
        self.state = DrawState::Drawing { style, last: point };
    }

    /// Pointer up: finish the stroke and snapshot the surface.
    pub fn end_stroke(&mut self) {
        if !self.is_drawing() {
            return;
        }
        self.state = DrawState::Idle;
        match self.capture() {
            Ok((captured, preview)) => {
                self.captured = Some(captured);
                self.preview = Some(preview);
            }
            Err(e) => log::error!("failed to capture signature: {e}")
        }
    }

    /// Erase the surface and drop the captured image and its preview.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.state = DrawState::Idle;
        self.captured = None;
        self.preview = None;
    }

    /// Export the preview as PNG through `target`. Returns whether a file was
    /// handed over; failures are logged.
    pub fn download(&self, target: &mut dyn SaveTarget) -> bool {
        let result = self
            .preview
            .as_ref()
            .ok_or(SigError::PreviewUnavailable)
            .and_then(Raster::to_png)
            .and_then(|png| target.save(&self.config.file_name, &png));
        match result {
            Ok(()) => true,
            Err(SigError::PreviewUnavailable) => {
                log::error!("signature preview is not available, nothing to download");
                false
            }
            Err(e) => {
                log::error!("signature download failed: {e}");
                false
            }
        }
    }

    /// Dispatch a front-end event. Positions are mapped through `origin`;
    /// events without a position are ignored.
    pub fn handle(&mut self, event: PadEvent, origin: SurfaceOrigin) {
        match event {
            PadEvent::Down(input) => {
                if let Some(p) = input.locate(origin) {
                    self.begin_stroke(p);
                }
            }
            PadEvent::Move(input) => {
                if let Some(p) = input.locate(origin) {
                    self.extend_stroke(p);
                }
            }
            PadEvent::Up => self.end_stroke()
        }
    }

    fn capture(&self) -> Result<(CapturedImage, Raster), SigError> {
        let url = self.surface.to_data_url()?;
        let decoded = Raster::from_data_url(&url)?;
        let mut preview = Raster::new(self.config.preview_width, self.config.preview_height);
        preview.draw_scaled(&decoded)?;
        Ok((CapturedImage(url.into()), preview))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerInput;

    #[derive(Default)]
    struct Recorder {
        saved: Vec<(String, Vec<u8>)>
    }

    impl SaveTarget for Recorder {
        fn save(&mut self, file_name: &str, png: &[u8]) -> Result<(), SigError> {
            self.saved.push((file_name.to_string(), png.to_vec()));
            Ok(())
        }
    }

    struct Failing;

    impl SaveTarget for Failing {
        fn save(&mut self, _: &str, _: &[u8]) -> Result<(), SigError> {
            Err(SigError::OpFailed("disk full".into()))
        }
    }

    fn stroke(pad: &mut SignaturePad, from: (f64, f64), to: (f64, f64)) {
        pad.begin_stroke(Point::new(from.0, from.1));
        pad.extend_stroke(Point::new(to.0, to.1));
        pad.end_stroke();
    }

    #[test]
    fn stroke_cycles_idle_drawing_idle() {
        let mut pad = SignaturePad::default();
        assert_eq!(pad.state(), DrawState::Idle);

        pad.begin_stroke(Point::new(10.0, 10.0));
        assert!(pad.is_drawing());
        pad.extend_stroke(Point::new(100.0, 50.0));
        assert!(pad.is_drawing());
        pad.end_stroke();

        assert_eq!(pad.state(), DrawState::Idle);
        let captured = pad.captured_image().unwrap();
        assert!(captured.as_str().starts_with("data:image/png;base64,"));
        assert!(!pad.surface().is_blank());
    }

    #[test]
    fn move_while_idle_paints_nothing() {
        let mut pad = SignaturePad::default();
        pad.extend_stroke(Point::new(10.0, 10.0));
        pad.extend_stroke(Point::new(50.0, 50.0));
        assert!(pad.surface().is_blank());
        assert_eq!(pad.state(), DrawState::Idle);
    }

    #[test]
    fn end_while_idle_captures_nothing() {
        let mut pad = SignaturePad::default();
        pad.end_stroke();
        assert!(pad.captured_image().is_none());
        assert!(pad.preview().is_none());
    }

    #[test]
    fn clear_resets_after_many_strokes() {
        let mut pad = SignaturePad::default();
        for i in 0..5 {
            let y = 20.0 + i as f64 * 30.0;
            stroke(&mut pad, (10.0, y), (300.0, y));
        }
        assert!(pad.captured_image().is_some());

        pad.clear();
        assert!(pad.surface().is_blank());
        assert!(pad.captured_image().is_none());
        assert!(pad.preview().is_none());
    }

    #[test]
    fn clear_mid_stroke_abandons_it() {
        let mut pad = SignaturePad::default();
        pad.begin_stroke(Point::new(10.0, 10.0));
        pad.extend_stroke(Point::new(60.0, 10.0));
        pad.clear();
        assert_eq!(pad.state(), DrawState::Idle);

        pad.extend_stroke(Point::new(90.0, 90.0));
        pad.end_stroke();
        assert!(pad.surface().is_blank());
        assert!(pad.captured_image().is_none());
    }

    #[test]
    fn style_is_read_at_stroke_start() {
        let mut pad = SignaturePad::default();
        pad.set_color(StrokeColor::Red);
        pad.set_pen_size(PenSize::Eight);

        pad.begin_stroke(Point::new(20.0, 100.0));
        pad.set_color(StrokeColor::Blue);
        pad.set_pen_size(PenSize::Two);
        pad.extend_stroke(Point::new(200.0, 100.0));
        pad.end_stroke();

        let red = StrokeColor::Red.rgba();
        assert_eq!(pad.surface().pixel(100, 100), Some(red));
        // 8px pen reaches three rows above the line
        assert_eq!(pad.surface().pixel(100, 97), Some(red));

        stroke(&mut pad, (20.0, 150.0), (200.0, 150.0));
        let blue = StrokeColor::Blue.rgba();
        assert_eq!(pad.surface().pixel(100, 150), Some(blue));
        assert_eq!(pad.surface().pixel(100, 147), Some([0, 0, 0, 0]));
        assert_eq!(pad.style().color, StrokeColor::Blue);
    }

    #[test]
    fn surface_accumulates_and_capture_tracks_last_end() {
        let mut pad = SignaturePad::default();
        stroke(&mut pad, (10.0, 20.0), (100.0, 20.0));
        let first = pad.captured_image().cloned().unwrap();

        stroke(&mut pad, (10.0, 80.0), (100.0, 80.0));
        let second = pad.captured_image().cloned().unwrap();
        assert_ne!(first, second);

        let black = StrokeColor::Black.rgba();
        assert_eq!(pad.surface().pixel(50, 20), Some(black));
        assert_eq!(pad.surface().pixel(50, 80), Some(black));

        // in-progress stroke shows on the surface but not in the capture
        pad.begin_stroke(Point::new(10.0, 150.0));
        pad.extend_stroke(Point::new(100.0, 150.0));
        assert_eq!(pad.surface().pixel(50, 150), Some(black));
        assert_eq!(pad.captured_image(), Some(&second));

        let preview = pad.preview().unwrap();
        assert_eq!(preview.pixel(50, 80), Some(black));
        assert_eq!(preview.pixel(50, 150), Some([0, 0, 0, 0]));
    }

    #[test]
    fn preview_is_scaled_to_its_own_size() {
        let mut pad = SignaturePad::new(PadConfig {
            preview_width: 200,
            preview_height: 100,
            ..PadConfig::default()
        });
        stroke(&mut pad, (0.0, 100.0), (400.0, 100.0));
        let preview = pad.preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (200, 100));
        assert!(!preview.is_blank());
    }

    #[test]
    fn download_without_capture_saves_nothing() {
        let pad = SignaturePad::default();
        let mut rec = Recorder::default();
        assert!(!pad.download(&mut rec));
        assert!(rec.saved.is_empty());
    }

    #[test]
    fn download_exports_preview_png() {
        let mut pad = SignaturePad::default();
        stroke(&mut pad, (10.0, 10.0), (200.0, 150.0));

        let mut rec = Recorder::default();
        assert!(pad.download(&mut rec));
        let (name, png) = &rec.saved[0];
        assert_eq!(name, "signature.png");
        assert_eq!(&Raster::from_png(png).unwrap(), pad.preview().unwrap());
    }

    #[test]
    fn download_after_clear_saves_nothing() {
        let mut pad = SignaturePad::default();
        stroke(&mut pad, (10.0, 10.0), (200.0, 150.0));
        pad.clear();

        let mut rec = Recorder::default();
        assert!(!pad.download(&mut rec));
        assert!(rec.saved.is_empty());
    }

    #[test]
    fn failed_save_is_swallowed() {
        let mut pad = SignaturePad::default();
        stroke(&mut pad, (10.0, 10.0), (200.0, 150.0));
        assert!(!pad.download(&mut Failing));
    }

    #[test]
    fn mouse_and_touch_strokes_match() {
        let origin = SurfaceOrigin::new(40.0, 120.0);
        let path = [(60.0, 140.0), (120.0, 180.0), (200.0, 150.0), (310.0, 260.0)];

        let mut by_mouse = SignaturePad::default();
        let mut by_touch = SignaturePad::default();
        for (i, &(x, y)) in path.iter().enumerate() {
            let (m, t) = (PointerInput::mouse(x, y), PointerInput::touch(x, y));
            if i == 0 {
                by_mouse.handle(PadEvent::Down(m), origin);
                by_touch.handle(PadEvent::Down(t), origin);
            } else {
                by_mouse.handle(PadEvent::Move(m), origin);
                by_touch.handle(PadEvent::Move(t), origin);
            }
        }
        by_mouse.handle(PadEvent::Up, origin);
        by_touch.handle(PadEvent::Up, origin);

        assert!(!by_mouse.surface().is_blank());
        assert_eq!(by_mouse.surface(), by_touch.surface());
        assert_eq!(by_mouse.captured_image(), by_touch.captured_image());
    }

    #[test]
    fn touch_without_points_is_ignored() {
        let mut pad = SignaturePad::default();
        pad.handle(
            PadEvent::Down(PointerInput::Touch { touches: vec![] }),
            SurfaceOrigin::default()
        );
        assert_eq!(pad.state(), DrawState::Idle);
    }
}
