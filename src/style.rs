/// One of the fixed palette colors offered next to the pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokeColor {
    #[default]
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan
}

impl StrokeColor {
    /// Palette order as shown in the UI.
    pub const ALL: [StrokeColor; 7] = [
        StrokeColor::Black,
        StrokeColor::Red,
        StrokeColor::Green,
        StrokeColor::Blue,
        StrokeColor::Yellow,
        StrokeColor::Magenta,
        StrokeColor::Cyan
    ];

    /// CSS hex form, e.g. `#FF00FF`.
    pub fn hex(self) -> &'static str {
        match self {
            StrokeColor::Black => "#000000",
            StrokeColor::Red => "#FF0000",
            StrokeColor::Green => "#00FF00",
            StrokeColor::Blue => "#0000FF",
            StrokeColor::Yellow => "#FFFF00",
            StrokeColor::Magenta => "#FF00FF",
            StrokeColor::Cyan => "#00FFFF"
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            StrokeColor::Black => [0x00, 0x00, 0x00],
            StrokeColor::Red => [0xFF, 0x00, 0x00],
            StrokeColor::Green => [0x00, 0xFF, 0x00],
            StrokeColor::Blue => [0x00, 0x00, 0xFF],
            StrokeColor::Yellow => [0xFF, 0xFF, 0x00],
            StrokeColor::Magenta => [0xFF, 0x00, 0xFF],
            StrokeColor::Cyan => [0x00, 0xFF, 0xFF]
        }
    }

    /// Opaque RGBA pixel for this color.
    pub fn rgba(self) -> [u8; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, 0xFF]
    }

    /// Look up a palette entry by its hex form. Case-insensitive, `#` required.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(hex.trim()))
    }
}

/// Pen width in surface units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PenSize {
    #[default]
    Two,
    Four,
    Six,
    Eight
}

impl PenSize {
    pub const ALL: [PenSize; 4] = [PenSize::Two, PenSize::Four, PenSize::Six, PenSize::Eight];

    pub fn px(self) -> u32 {
        match self {
            PenSize::Two => 2,
            PenSize::Four => 4,
            PenSize::Six => 6,
            PenSize::Eight => 8
        }
    }

    pub fn from_px(px: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.px() == px)
    }
}

/// Color and width applied to a stroke. Copied into the stroke when it starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: StrokeColor,
    pub width: PenSize
}
