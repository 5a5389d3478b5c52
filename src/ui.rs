use crate::{
    config::Config,
    error::Error,
    events::{self, Event, Events},
    screen::{Color, PixelRect, Screen},
};
use ratatui::{
    backend::TermionBackend,
    buffer::Buffer,
    layout::Rect,
    style::{self, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
    Terminal,
};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use termion::{
    event::{Event as TermEvent, Key, MouseButton, MouseEvent},
    input::MouseTerminal,
    raw::{IntoRawMode, RawTerminal},
    screen::{AlternateScreen, IntoAlternateScreen},
};

type TermBackend = TermionBackend<MouseTerminal<AlternateScreen<RawTerminal<io::Stdout>>>>;

/// Text at or above this size is drawn bold; a terminal has no other way to
/// make it bigger.
const BOLD_TEXT_SIZE: u16 = 30;

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Fill(PixelRect, Color),
    Outline(PixelRect, Color),
    Text {
        text: String,
        x: i32,
        y: i32,
        size: u16,
        color: Color,
    },
}

/// Input gathered between two frames. Clicks and confirm last one frame;
/// the cursor and a close request carry over.
#[derive(Debug, Clone, Copy)]
struct InputState {
    keys: events::Config,
    cursor: (i32, i32),
    primary: bool,
    secondary: bool,
    confirm: bool,
    close: bool,
}

impl InputState {
    fn new(keys: events::Config) -> Self {
        Self {
            keys,
            cursor: (-1, -1),
            primary: false,
            secondary: false,
            confirm: false,
            close: false,
        }
    }

    fn next_frame(&mut self) {
        self.primary = false;
        self.secondary = false;
        self.confirm = false;
    }

    fn record(&mut self, event: TermEvent) {
        match event {
            TermEvent::Mouse(mouse) => {
                let (x, y) = match mouse {
                    MouseEvent::Press(button, x, y) => {
                        match button {
                            MouseButton::Left => self.primary = true,
                            MouseButton::Right => self.secondary = true,
                            _ => {}
                        }
                        (x, y)
                    }
                    MouseEvent::Release(x, y) | MouseEvent::Hold(x, y) => (x, y),
                };
                // termion reports 1-based positions
                self.cursor = (i32::from(x) - 1, i32::from(y) - 1);
            }
            TermEvent::Key(key) if key == self.keys.confirm_key => self.confirm = true,
            TermEvent::Key(key)
                if key == self.keys.exit_key || key == Key::Esc || key == Key::Ctrl('c') =>
            {
                self.close = true
            }
            _ => {}
        }
    }
}

/// The game's window: a raw-mode alternate screen with mouse reporting,
/// drawn through ratatui. Draw calls are queued during a frame and painted
/// into ratatui's buffer in `end_frame`.
pub(crate) struct TerminalScreen {
    terminal: Terminal<TermBackend>,
    events: Events,
    running: Arc<AtomicBool>,
    started: Instant,
    input: InputState,
    shapes: Vec<Shape>,
}

impl TerminalScreen {
    pub(crate) fn new(config: &Config) -> Result<Self, Error> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);
        })
        .map_err(Error::SetHandler)?;

        let stdout = io::stdout()
            .into_raw_mode()
            .map_err(Error::GetStdoutInRawMode)?
            .into_alternate_screen()
            .map_err(Error::GetAlternateScreenForMouseTerminal)?;
        let mouse_terminal = MouseTerminal::from(stdout);
        let backend = TermionBackend::new(mouse_terminal);
        let terminal = Terminal::new(backend).map_err(Error::CreateTerminal)?;

        let keys = events::Config {
            tick_rate: config.frame_interval(),
            ..Default::default()
        };

        Ok(Self {
            terminal,
            events: Events::with_config(keys),
            running,
            started: Instant::now(),
            input: InputState::new(keys),
            shapes: Vec::new(),
        })
    }
}

impl Screen for TerminalScreen {
    fn begin_frame(&mut self) -> Result<(), Error> {
        self.input.next_frame();
        loop {
            match self.events.next().map_err(Error::GetEvent)? {
                Event::Input(event) => self.input.record(event),
                Event::Tick => break,
            }
        }
        // a slow frame leaves ticks queued; take the input behind them now
        // instead of rendering once per stale tick
        while let Some(event) = self.events.try_next() {
            if let Event::Input(event) = event {
                self.input.record(event);
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Error> {
        let shapes = std::mem::take(&mut self.shapes);
        self.terminal
            .draw(|frame| {
                let area = frame.size();
                let buf = frame.buffer_mut();
                for shape in &shapes {
                    paint(shape, area, buf);
                }
            })
            .map_err(Error::DrawToTerminal)?;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.shapes.clear();
        self.shapes
            .push(Shape::Fill(PixelRect::new(0, 0, i32::MAX, i32::MAX), color));
    }

    fn draw_filled_rect(&mut self, rect: PixelRect, color: Color) {
        self.shapes.push(Shape::Fill(rect, color));
    }

    fn draw_rect_outline(&mut self, rect: PixelRect, color: Color) {
        self.shapes.push(Shape::Outline(rect, color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u16, color: Color) {
        self.shapes.push(Shape::Text {
            text: text.to_owned(),
            x,
            y,
            size,
            color,
        });
    }

    fn primary_clicked(&self) -> bool {
        self.input.primary
    }

    fn secondary_clicked(&self) -> bool {
        self.input.secondary
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.input.cursor
    }

    fn elapsed_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn should_close(&self) -> bool {
        self.input.close || !self.running.load(Ordering::SeqCst)
    }

    // termion only reports key presses, so a press stands in for the release
    fn confirm_released(&self) -> bool {
        self.input.confirm
    }
}

fn to_terminal_color(color: Color) -> style::Color {
    match color {
        Color::White => style::Color::White,
        Color::LightGray => style::Color::Gray,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::Red,
        Color::Green => style::Color::Green,
        Color::Blue => style::Color::Blue,
    }
}

/// The part of `rect` that lies inside `bounds`, if any.
fn clip(rect: PixelRect, bounds: Rect) -> Option<Rect> {
    let left = rect.x.max(i32::from(bounds.left()));
    let top = rect.y.max(i32::from(bounds.top()));
    let right = rect
        .x
        .saturating_add(rect.width)
        .min(i32::from(bounds.right()));
    let bottom = rect
        .y
        .saturating_add(rect.height)
        .min(i32::from(bounds.bottom()));

    if left >= right || top >= bottom {
        return None;
    }

    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

fn paint(shape: &Shape, bounds: Rect, buf: &mut Buffer) {
    match shape {
        Shape::Fill(rect, color) => {
            let Some(area) = clip(*rect, bounds) else {
                return;
            };
            let color = to_terminal_color(*color);
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    buf.get_mut(x, y).set_symbol(" ").set_bg(color);
                }
            }
        }
        Shape::Outline(rect, color) => {
            let Some(area) = clip(*rect, bounds) else {
                return;
            };
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(to_terminal_color(*color)))
                .render(area, buf);
        }
        Shape::Text {
            text,
            x,
            y,
            size,
            color,
        } => {
            let width = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
            let Some(area) = clip(PixelRect::new(*x, *y, width, 1), bounds) else {
                return;
            };
            let skipped = usize::try_from(i32::from(area.x) - x).unwrap_or(0);
            let visible = text.chars().skip(skipped).collect::<String>();
            let style = Style::default()
                .fg(to_terminal_color(*color))
                .add_modifier(if *size >= BOLD_TEXT_SIZE {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            buf.set_stringn(area.x, area.y, visible, usize::from(area.width), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputState {
        InputState::new(events::Config::default())
    }

    #[test]
    fn left_press_clicks_and_moves_cursor_to_zero_based_position() {
        let mut input = input();
        input.record(TermEvent::Mouse(MouseEvent::Press(MouseButton::Left, 1, 1)));
        assert_eq!(input.cursor, (0, 0));
        assert!(input.primary);
        assert!(!input.secondary);
    }

    #[test]
    fn right_press_flags() {
        let mut input = input();
        input.record(TermEvent::Mouse(MouseEvent::Press(MouseButton::Right, 7, 5)));
        assert_eq!(input.cursor, (6, 4));
        assert!(input.secondary);
        assert!(!input.primary);
    }

    #[test]
    fn hold_and_release_only_move_the_cursor() {
        let mut input = input();
        input.record(TermEvent::Mouse(MouseEvent::Hold(3, 4)));
        assert_eq!(input.cursor, (2, 3));
        input.record(TermEvent::Mouse(MouseEvent::Release(10, 2)));
        assert_eq!(input.cursor, (9, 1));
        assert!(!input.primary && !input.secondary);
    }

    #[test]
    fn press_lands_on_the_cell_under_the_pointer() {
        let config = Config::default();
        let mut input = input();
        // top-left character of the grid, 1-based
        input.record(TermEvent::Mouse(MouseEvent::Press(
            MouseButton::Left,
            1,
            u16::try_from(config.grid_top + 1).unwrap(),
        )));
        assert_eq!(config.grid_coordinate(input.cursor), (0, 0));
    }

    #[test]
    fn enter_confirms() {
        let mut input = input();
        input.record(TermEvent::Key(Key::Char('\n')));
        assert!(input.confirm);
        assert!(!input.close);
    }

    #[test]
    fn quit_keys_close() {
        for key in [Key::Char('q'), Key::Esc, Key::Ctrl('c')] {
            let mut input = input();
            input.record(TermEvent::Key(key));
            assert!(input.close, "{key:?}");
            assert!(!input.confirm);
        }
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut input = input();
        input.record(TermEvent::Key(Key::Char('x')));
        input.record(TermEvent::Mouse(MouseEvent::Press(MouseButton::Middle, 2, 2)));
        assert!(!input.primary && !input.secondary && !input.confirm && !input.close);
    }

    #[test]
    fn next_frame_clears_clicks_but_keeps_cursor_and_close() {
        let mut input = input();
        input.record(TermEvent::Mouse(MouseEvent::Press(MouseButton::Left, 4, 4)));
        input.record(TermEvent::Key(Key::Char('\n')));
        input.record(TermEvent::Key(Key::Esc));
        input.next_frame();
        assert!(!input.primary && !input.confirm);
        assert!(input.close);
        assert_eq!(input.cursor, (3, 3));
    }

    fn buffer() -> Buffer {
        Buffer::empty(Rect::new(0, 0, 10, 4))
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.get(x, y).symbol().to_owned())
            .collect()
    }

    #[test]
    fn clip_keeps_rects_inside_bounds() {
        let bounds = Rect::new(0, 0, 10, 4);
        assert_eq!(
            clip(PixelRect::new(2, 1, 3, 2), bounds),
            Some(Rect::new(2, 1, 3, 2))
        );
    }

    #[test]
    fn clip_trims_rects_hanging_off_an_edge() {
        let bounds = Rect::new(0, 0, 10, 4);
        assert_eq!(
            clip(PixelRect::new(-2, -1, 5, 3), bounds),
            Some(Rect::new(0, 0, 3, 2))
        );
        assert_eq!(
            clip(PixelRect::new(8, 3, 5, 5), bounds),
            Some(Rect::new(8, 3, 2, 1))
        );
        assert_eq!(
            clip(PixelRect::new(0, 0, i32::MAX, i32::MAX), bounds),
            Some(bounds)
        );
    }

    #[test]
    fn clip_drops_rects_outside_bounds() {
        let bounds = Rect::new(0, 0, 10, 4);
        assert_eq!(clip(PixelRect::new(10, 0, 2, 2), bounds), None);
        assert_eq!(clip(PixelRect::new(0, -3, 2, 3), bounds), None);
        assert_eq!(clip(PixelRect::new(1, 1, 0, 2), bounds), None);
    }

    #[test]
    fn fill_sets_background_only_inside_rect() {
        let mut buf = buffer();
        paint(
            &Shape::Fill(PixelRect::new(1, 1, 2, 2), Color::LightGray),
            buf.area,
            &mut buf,
        );
        assert_eq!(buf.get(1, 1).bg, style::Color::Gray);
        assert_eq!(buf.get(2, 2).bg, style::Color::Gray);
        assert_eq!(buf.get(0, 0).bg, style::Color::Reset);
        assert_eq!(buf.get(3, 1).bg, style::Color::Reset);
    }

    #[test]
    fn outline_keeps_the_fill_underneath() {
        let mut buf = buffer();
        let rect = PixelRect::new(0, 0, 5, 3);
        paint(&Shape::Fill(rect, Color::LightGray), buf.area, &mut buf);
        paint(&Shape::Outline(rect, Color::Black), buf.area, &mut buf);
        assert_eq!(buf.get(0, 0).symbol(), "╭");
        assert_eq!(buf.get(4, 2).symbol(), "╯");
        assert_eq!(buf.get(0, 0).fg, style::Color::Black);
        assert_eq!(buf.get(0, 0).bg, style::Color::Gray);
        assert_eq!(buf.get(2, 1).symbol(), " ");
    }

    #[test]
    fn text_is_clipped_on_both_sides() {
        let mut buf = buffer();
        paint(
            &Shape::Text {
                text: "hello".to_owned(),
                x: -2,
                y: 0,
                size: 20,
                color: Color::Blue,
            },
            buf.area,
            &mut buf,
        );
        paint(
            &Shape::Text {
                text: "world".to_owned(),
                x: 7,
                y: 1,
                size: BOLD_TEXT_SIZE,
                color: Color::Red,
            },
            buf.area,
            &mut buf,
        );
        assert_eq!(row(&buf, 0), "llo       ");
        assert_eq!(row(&buf, 1), "       wor");
        assert_eq!(buf.get(0, 0).fg, style::Color::Blue);
        assert!(buf.get(7, 1).modifier.contains(Modifier::BOLD));
        assert!(!buf.get(0, 0).modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn text_below_the_screen_is_dropped() {
        let mut buf = buffer();
        paint(
            &Shape::Text {
                text: "X".to_owned(),
                x: 0,
                y: 4,
                size: 20,
                color: Color::Red,
            },
            buf.area,
            &mut buf,
        );
        assert_eq!(buf, buffer());
    }
}
