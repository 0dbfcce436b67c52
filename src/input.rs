use crate::surface::Point;

/// Top-left corner of the drawing surface in viewport coordinates,
/// i.e. `getBoundingClientRect().left/top`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceOrigin {
    pub left: f64,
    pub top:  f64
}

impl SurfaceOrigin {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn to_local(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// Position payload of a raw input event, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    Mouse { client_x: f64, client_y: f64 },
    /// Active touch points, in the order the host reports them.
    Touch { touches: Vec<(f64, f64)> }
}

impl PointerInput {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self::Mouse { client_x, client_y }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        Self::Touch {
            touches: vec![(client_x, client_y)]
        }
    }

    /// Surface-local position. Touches use the primary point only; an empty
    /// touch list has no position.
    pub fn locate(&self, origin: SurfaceOrigin) -> Option<Point> {
        match self {
            PointerInput::Mouse { client_x, client_y } => {
                Some(origin.to_local(*client_x, *client_y))
            }
            PointerInput::Touch { touches } => touches
                .first()
                .map(|&(x, y)| origin.to_local(x, y))
        }
    }
}

/// Input delivered to the pad by a front end.
#[derive(Clone, Debug, PartialEq)]
pub enum PadEvent {
    /// mousedown / touchstart
    Down(PointerInput),
    /// mousemove / touchmove
    Move(PointerInput),
    /// mouseup / touchend
    Up
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_position_is_relative_to_origin() {
        let origin = SurfaceOrigin::new(100.0, 50.0);
        let p = PointerInput::mouse(130.0, 75.5).locate(origin);
        assert_eq!(p, Some(Point::new(30.0, 25.5)));
    }

    #[test]
    fn touch_uses_first_point() {
        let origin = SurfaceOrigin::new(10.0, 10.0);
        let input = PointerInput::Touch {
            touches: vec![(20.0, 30.0), (300.0, 300.0)]
        };
        assert_eq!(input.locate(origin), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn empty_touch_list_has_no_position() {
        let input = PointerInput::Touch { touches: vec![] };
        assert_eq!(input.locate(SurfaceOrigin::default()), None);
    }

    #[test]
    fn mouse_and_touch_agree() {
        let origin = SurfaceOrigin::new(8.0, 16.0);
        assert_eq!(
            PointerInput::mouse(42.0, 64.0).locate(origin),
            PointerInput::touch(42.0, 64.0).locate(origin)
        );
    }
}
