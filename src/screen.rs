use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Color {
    White,
    LightGray,
    Black,
    Red,
    Green,
    Blue,
}

/// A rectangle in screen pixels. May extend past any edge of the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl PixelRect {
    pub(crate) fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The window the game is played in: immediate mode drawing plus input that
/// is sampled once per frame.
///
/// A frame is `begin_frame`, any number of draw calls, then `end_frame`. The
/// input queries describe what happened between the previous frame and this
/// one.
pub(crate) trait Screen {
    /// Waits for the next frame and samples input.
    fn begin_frame(&mut self) -> Result<(), Error>;

    fn end_frame(&mut self) -> Result<(), Error>;

    fn clear(&mut self, color: Color);

    fn draw_filled_rect(&mut self, rect: PixelRect, color: Color);

    fn draw_rect_outline(&mut self, rect: PixelRect, color: Color);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u16, color: Color);

    fn primary_clicked(&self) -> bool;

    fn secondary_clicked(&self) -> bool;

    fn cursor_position(&self) -> (i32, i32);

    /// Seconds since the screen was opened.
    fn elapsed_time(&self) -> f64;

    fn should_close(&self) -> bool;

    fn confirm_released(&self) -> bool;
}
