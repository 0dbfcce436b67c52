// Desktop signature pad.
// Left mouse draws on the top half; the bottom half shows the preview.
// 1-7 pick a color, F1-F4 pick pen size 2/4/6/8, C clears, S saves
// signature.png into the working directory, ESC quits.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use signature_capture::{
    FileSaver, PadConfig, PadEvent, PenSize, PointerInput, Raster, SigError, SignaturePad,
    StrokeColor, SurfaceOrigin
};

const SURFACE_BG: u32 = 0x00_FF_FF_FF;
const PREVIEW_BG: u32 = 0x00_EE_EE_EE;
const DIVIDER: u32 = 0x00_00_00_00;

const COLOR_KEYS: [Key; 7] = [
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7
];
const SIZE_KEYS: [Key; 4] = [Key::F1, Key::F2, Key::F3, Key::F4];

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Window with the drawing surface stacked over the preview.
struct Drawer {
    window: Window,
    width:  usize,
    height: usize,
    screen: Vec<u32>
}

impl Drawer {
    fn new(config: &PadConfig) -> Result<Self, SigError> {
        let width = config.width.max(config.preview_width) as usize;
        let height = (config.height + 1 + config.preview_height) as usize;
        let mut window = Window::new("Signature Capture", width, height, WindowOptions::default())
            .map_err(|e| SigError::OpFailed(format!("window init: {e}")))?;
        window.set_target_fps(60);
        Ok(Self {
            window,
            width,
            height,
            screen: vec![0; width * height]
        })
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    fn mouse(&self) -> Option<(f64, f64)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x as f64, y as f64))
    }

    fn left_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    fn present(&mut self, pad: &SignaturePad) -> Result<(), SigError> {
        self.screen.fill(PREVIEW_BG);
        let surface = pad.surface();
        blit_over(&mut self.screen, self.width, surface, 0, SURFACE_BG);

        let divider = surface.height() as usize;
        self.screen[divider * self.width..(divider + 1) * self.width].fill(DIVIDER);

        if let Some(preview) = pad.preview() {
            blit_over(&mut self.screen, self.width, preview, divider + 1, PREVIEW_BG);
        }

        let style = pad.style();
        self.window.set_title(&format!(
            "Signature Capture | {} | {}px",
            style.color.hex(),
            style.width.px()
        ));
        self.window
            .update_with_buffer(&self.screen, self.width, self.height)
            .map_err(|e| SigError::OpFailed(format!("window update: {e}")))
    }
}

/// Alpha-composite `raster` over `bg` into the 0RGB screen at row `top`.
fn blit_over(screen: &mut [u32], stride: usize, raster: &Raster, top: usize, bg: u32) {
    let bg_rgb = [(bg >> 16) & 0xFF, (bg >> 8) & 0xFF, bg & 0xFF];
    for (y, row) in raster
        .as_rgba()
        .chunks(raster.width() as usize * 4)
        .enumerate()
    {
        let line = &mut screen[(top + y) * stride..];
        for (x, px) in row.chunks(4).enumerate() {
            let a = px[3] as u32;
            let mix = |i: usize| (px[i] as u32 * a + bg_rgb[i] * (255 - a)) / 255;
            line[x] = (mix(0) << 16) | (mix(1) << 8) | mix(2);
        }
    }
}

fn main() -> Result<(), SigError> {
    log::set_logger(&LOGGER).map_err(|e| SigError::OpFailed(e.to_string()))?;
    log::set_max_level(log::LevelFilter::Info);

    let config = PadConfig::default();
    let mut drawer = Drawer::new(&config)?;
    let mut pad = SignaturePad::new(config);
    let mut saver = FileSaver::new(".");
    let origin = SurfaceOrigin::default();
    let mut was_down = false;

    while drawer.is_open() {
        for (key, color) in COLOR_KEYS.iter().zip(StrokeColor::ALL) {
            if drawer.pressed(*key) {
                pad.set_color(color);
            }
        }
        for (key, size) in SIZE_KEYS.iter().zip(PenSize::ALL) {
            if drawer.pressed(*key) {
                pad.set_pen_size(size);
            }
        }
        if drawer.pressed(Key::C) {
            pad.clear();
        }
        if drawer.pressed(Key::S) && pad.download(&mut saver) {
            log::info!("saved {}", pad.config().file_name);
        }

        let down = drawer.left_down();
        match (was_down, down, drawer.mouse()) {
            (false, true, Some((x, y))) if y < pad.config().height as f64 => {
                pad.handle(PadEvent::Down(PointerInput::mouse(x, y)), origin);
            }
            (true, true, Some((x, y))) => {
                pad.handle(PadEvent::Move(PointerInput::mouse(x, y)), origin);
            }
            (true, false, _) => pad.handle(PadEvent::Up, origin),
            _ => {}
        }
        was_down = down;

        drawer.present(&pad)?;
    }

    Ok(())
}
