// Window + HUD drawing.
// Visual effects provided here:
// 1) A window that shows the stylized frame, refreshed at the target fps.
// 2) A tiny 5x7 bitmap font that prints the knob values on top.

use std::path::PathBuf;

use bayer_cam::controls::{Action, Control};
use bayer_cam::error::{Error, Result};
use bayer_cam::types::Frame;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

/// Packed 0x00RRGGBB pixels, the layout minifb wants.
struct Screen {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    screen: Screen, // reused every frame
}

impl Drawer {
    /// Create a window of the display size. `fps` paces `present()`.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self {
            window,
            screen: Screen {
                width,
                height,
                pixels: Vec::with_capacity(width * height),
            },
        })
    }

    /// Push the frame (plus HUD text) to the screen. Blocks until the next frame slot.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, frame: &Frame, hud: &str) -> Result<()> {
        frame.pack_0rgb(&mut self.screen.pixels);
        self.screen.width = frame.width;
        self.screen.height = frame.height;
        draw_text_5x7(&mut self.screen, 8, 8, hud, 0x00_FF_FF_FF);
        self.window
            .update_with_buffer(&self.screen.pixels, self.screen.width, self.screen.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Keys pressed since the last refresh, translated to panel actions.
    /// Nudge keys auto-repeat while held; the rest fire once per press.
    pub fn actions(&self) -> Vec<Action> {
        const SELECT: [(Key, Control); 5] = [
            (Key::Key1, Control::Resolution),
            (Key::Key2, Control::Saturation),
            (Key::Key3, Control::Contrast),
            (Key::Key4, Control::Brightness),
            (Key::Key5, Control::Hue),
        ];
        let mut out = Vec::new();
        for (key, control) in SELECT {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                out.push(Action::Select(control));
            }
        }
        for key in [Key::Up, Key::Equal, Key::NumPadPlus] {
            if self.window.is_key_pressed(key, KeyRepeat::Yes) {
                out.push(Action::Nudge(1));
            }
        }
        for key in [Key::Down, Key::Minus, Key::NumPadMinus] {
            if self.window.is_key_pressed(key, KeyRepeat::Yes) {
                out.push(Action::Nudge(-1));
            }
        }
        let once = [
            (Key::Tab, Action::ToggleSource),
            (Key::L, Action::ReloadImage),
            (Key::M, Action::CycleMatrix),
            (Key::R, Action::Reset),
        ];
        for (key, action) in once {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                out.push(action);
            }
        }
        if self.window.is_key_pressed(Key::O, KeyRepeat::No) {
            if let Some(path) = pick_image_file() {
                out.push(Action::OpenImage(path));
            }
        }
        out
    }
}

/// Native "open file" dialog. Blocks until the user picks a file or cancels.
fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open image")
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"])
        .pick_file()
}

/* ---------- Software drawing: pixels + tiny bitmap font ---------- */

/// Put a pixel on the screen if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut Screen, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Return a 5x7 glyph bitmap for the characters the HUD uses.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase letters for knob labels and status messages
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), with a 1-pixel black shadow.
/// Visual: readable over both the black and white dither dots.
fn draw_char_5x7(fb: &mut Screen, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (offset, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (5 px wide + 1 px spacing).
fn draw_text_5x7(fb: &mut Screen, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(w: usize, h: usize) -> Screen {
        Screen { width: w, height: h, pixels: vec![0x00_12_34_56; w * h] }
    }

    #[test]
    fn test_hud_charset_has_glyphs() {
        for ch in "0123456789 ABCEFGHIMNOPRSTUX|.->".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
        assert!(glyph5x7('?').is_none());
    }

    #[test]
    fn test_text_draws_inside_bounds_only() {
        let mut fb = screen(8, 8);
        // most of this string falls off the right edge; must not panic
        draw_text_5x7(&mut fb, 4, 4, "HUE 360", 0x00_FF_FF_FF);
        assert!(fb.pixels.iter().any(|&p| p == 0x00_FF_FF_FF));
    }

    #[test]
    fn test_char_has_shadow() {
        let mut fb = screen(10, 10);
        draw_char_5x7(&mut fb, 0, 0, '-', 0x00_FF_FF_FF);
        // '-' is row 3: foreground at y=3, shadow one pixel down-right
        assert_eq!(fb.pixels[3 * 10], 0x00_FF_FF_FF);
        assert_eq!(fb.pixels[4 * 10 + 5], 0);
    }
}
