//! Software-rendered preview using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┬─────────────┐
//! │                        *                             │  GALLERY    │
//! │                       ***        .                   │             │
//! │              .       *****                           │  [#10001]   │
//! │                     *******            .             │  [#10002]   │
//! │                    *********                         │  [#10003]   │
//! │                                                      │             │
//! │  status bar: mode, gesture, photo count, focus id    │             │
//! └──────────────────────────────────────────────────────┴─────────────┘
//! ```
//!
//! Objects are projected through a fixed pinhole camera and painted back to
//! front.  Keyboard and mouse double as a stand-in hand tracker: the keys pick
//! a hand shape and the mouse moves the palm.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use glam::{Quat, Vec2, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use pose_catalog::{ChoreographedObject, Finish, ObjectId, Shape};

use crate::error::SceneError;
use crate::gallery::Gallery;
use crate::gesture::HandShape;
use crate::ingest::{TextureHandle, Thumbnail};
use crate::render::{Frame, Hud, Renderer, UiCommand};
use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 1000;
pub const WIN_H:     usize = 640;
const GALLERY_W:     usize = 150;
const SCENE_W:       usize = WIN_W - GALLERY_W;
const STATUS_Y:      usize = WIN_H - 36;
const ENTRY_H:       usize = 56;
const ENTRY_THUMB:   usize = 48;
const BG_COLOR:      u32   = 0xFF05080F;
const GALLERY_BG:    u32   = 0xFF101826;
const TEXT_BG:       u32   = 0xFF0B1A2E;
const GOLD:          u32   = 0xFFFFD700;
const SNOW_COLOR:    u32   = 0xFFE8F0FF;

const CAMERA:        Vec3  = Vec3::new(0.0, 5.0, 90.0);
const FOV_Y:         f32   = std::f32::consts::FRAC_PI_4;
const NEAR:          f32   = 1.0;
/// Depth at which far objects are faded most of the way into the background.
const FOG_DEPTH:     f32   = 200.0;
/// World-space half-size of a unit-scale ornament.
const ORNAMENT_HALF: f32   = 0.5;
const STAR_RADIUS:   f32   = 1.2;
/// Photo frame border as a fraction of the frame's shorter side.
const FRAME_INSET:   f32   = 0.08;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    /// Present only when the keyboard drives the hand.
    sim_tx:     Option<Sender<SimInput>>,
    last_palm:  Vec2,
    /// Render-side state per photo id; decorations need none.
    textures:   HashMap<ObjectId, Thumbnail>,
}

impl Visualizer {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self, SceneError> {
        let mut window = Window::new(
            "Gesture Tree",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| SceneError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(),
            sim_tx,
            last_palm: Vec2::splat(0.5),
            textures: HashMap::new(),
        })
    }

    fn send_sim(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }
}

impl Renderer for Visualizer {
    fn spawn(&mut self, obj: &ChoreographedObject, texture: Option<&TextureHandle>) {
        if obj.is_photo() {
            let thumb = texture.map(|t| t.thumbnail.clone()).unwrap_or_else(Thumbnail::blank);
            self.textures.insert(obj.id, thumb);
        }
    }

    fn dispose(&mut self, id: ObjectId) {
        self.textures.remove(&id);
    }

    fn is_open(&self) -> bool { self.window.is_open() }

    /// Keyboard and mouse since the last frame.
    fn poll_commands(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        if !self.window.is_open() { return commands; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) { commands.push(UiCommand::Quit); }
        if one_shot(Key::Tab)                        { commands.push(UiCommand::SelectNextPhoto); }
        if one_shot(Key::Delete) || one_shot(Key::Backspace) {
            commands.push(UiCommand::DeleteSelectedPhoto);
        }
        if one_shot(Key::H)                          { commands.push(UiCommand::ToggleUi); }

        // ── simulated hand ────────────────────────────────────────────────
        let shapes = [
            (Key::F, Some(HandShape::Fist)),
            (Key::O, Some(HandShape::Open)),
            (Key::P, Some(HandShape::Pinch)),
            (Key::V, Some(HandShape::Victory)),
            (Key::M, Some(HandShape::Relaxed)),
            (Key::N, None),
        ];
        let pressed: Vec<Option<HandShape>> = shapes
            .iter()
            .filter(|(k, _)| one_shot(*k))
            .map(|&(_, s)| s)
            .collect();
        for shape in pressed {
            self.send_sim(SimInput::Shape(shape));
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
            let palm = Vec2::new(
                (mx / SCENE_W as f32).clamp(0.0, 1.0),
                (my / WIN_H as f32).clamp(0.0, 1.0),
            );
            if palm.distance(self.last_palm) > 1e-3 {
                self.last_palm = palm;
                self.send_sim(SimInput::Palm(palm));
            }
        }

        commands
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError> {
        let Visualizer { window, canvas, textures, .. } = self;

        canvas.buf.fill(BG_COLOR);

        // ── snow (behind everything, own rotation) ────────────────────────
        let snow_turn = Quat::from_rotation_y(frame.snow.rotation_y());
        for flake in frame.snow.flakes() {
            if let Some(p) = project(snow_turn * flake.position) {
                canvas.set_pixel_i(p.x as isize, p.y as isize, fade(SNOW_COLOR, p.depth));
            }
        }

        // ── scene objects, painter's order ────────────────────────────────
        let mut items: Vec<Item<'_>> = Vec::new();
        for obj in frame.decorations.iter().chain(frame.photos.iter()) {
            let world = frame.scene_rotation * obj.pose.position;
            let Some(p) = project(world) else { continue };
            let sprite = match obj.shape {
                Shape::Frame { width, height } => Sprite::Photo {
                    half:  Vec2::new(width * obj.pose.scale.x, height * obj.pose.scale.y) * 0.5,
                    thumb: textures.get(&obj.id),
                },
                shape => Sprite::Ornament {
                    shape,
                    finish: obj.finish,
                    half:   ORNAMENT_HALF * obj.pose.scale.x,
                },
            };
            items.push(Item { at: p, sprite });
        }
        let star = frame.star;
        if let Some(p) = project(frame.scene_rotation * star.position) {
            // Spinning about y shows as a pulse; the sway as a slight lean.
            let pulse = 0.75 + 0.25 * star.rotation.y.cos().abs();
            items.push(Item { at: p, sprite: Sprite::Star { radius: STAR_RADIUS * pulse } });
        }
        items.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));
        for item in &items {
            canvas.draw_item(item);
        }

        // ── overlay ───────────────────────────────────────────────────────
        if frame.hud.show_ui {
            canvas.draw_gallery(frame.gallery);
            canvas.draw_status(&frame.hud);
        }

        window
            .update_with_buffer(&canvas.buf, WIN_W, WIN_H)
            .map_err(|e| SceneError::Window(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
struct Projected {
    x:     f32,
    y:     f32,
    depth: f32,
    /// Pixels per world unit at this depth.
    scale: f32,
}

fn project(world: Vec3) -> Option<Projected> {
    let v = world - CAMERA;
    let depth = -v.z;
    if depth < NEAR {
        return None;
    }
    let focal = (WIN_H as f32 / 2.0) / (FOV_Y / 2.0).tan();
    let scale = focal / depth;
    Some(Projected {
        x: SCENE_W as f32 / 2.0 + v.x * scale,
        y: WIN_H as f32 / 2.0 - v.y * scale,
        depth,
        scale,
    })
}

enum Sprite<'a> {
    Ornament { shape: Shape, finish: Finish, half: f32 },
    Photo    { half: Vec2, thumb: Option<&'a Thumbnail> },
    Star     { radius: f32 },
}

struct Item<'a> {
    at:     Projected,
    sprite: Sprite<'a>,
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

struct Canvas {
    buf: Vec<u32>,
}

impl Canvas {
    fn new() -> Self {
        Canvas { buf: vec![BG_COLOR; WIN_W * WIN_H] }
    }

    fn draw_item(&mut self, item: &Item<'_>) {
        let p = item.at;
        let (cx, cy) = (p.x as isize, p.y as isize);
        match item.sprite {
            Sprite::Ornament { shape, finish, half } => {
                let r = ((half * p.scale) as isize).max(1);
                let color = fade(finish.argb(), p.depth);
                match shape {
                    Shape::Bauble => self.fill_disc(cx, cy, r, color),
                    Shape::CandyCane => {
                        let w = (r / 2).max(1);
                        for y in (cy - r)..(cy + r) {
                            let stripe = ((y - cy + r) / w.max(2)) % 2 == 0;
                            let c = if stripe { color } else { fade(Finish::Red.argb(), p.depth) };
                            self.fill_rect_i(cx - w / 2, y, w, 1, c);
                        }
                        self.fill_rect_i(cx - w / 2, cy - r, r, w, color);
                    }
                    _ => self.fill_rect_i(cx - r, cy - r, 2 * r, 2 * r, color),
                }
            }
            Sprite::Photo { half, thumb } => {
                let hw = ((half.x * p.scale) as isize).max(1);
                let hh = ((half.y * p.scale) as isize).max(1);
                self.fill_rect_i(cx - hw, cy - hh, 2 * hw, 2 * hh, fade(Finish::Paper.argb(), p.depth));
                let inset = ((hw.min(hh) as f32 * 2.0 * FRAME_INSET) as isize).max(1);
                let (iw, ih) = (2 * (hw - inset), 2 * (hh - inset));
                if iw > 0 && ih > 0 {
                    if let Some(t) = thumb {
                        self.blit_scaled(t, cx - hw + inset, cy - hh + inset, iw, ih);
                    }
                }
            }
            Sprite::Star { radius } => {
                let r = ((radius * p.scale) as usize).max(2);
                if cx >= 0 && cy >= 0 {
                    for k in 0..r {
                        self.draw_diamond(cx as usize, cy as usize, r - k, GOLD);
                    }
                }
            }
        }
    }

    // ── Gallery sidebar ───────────────────────────────────────────────────

    fn draw_gallery(&mut self, gallery: &Gallery) {
        self.fill_rect(SCENE_W, 0, GALLERY_W, WIN_H, GALLERY_BG);
        self.draw_label("GALLERY", SCENE_W + 10, 10, GOLD);

        let selected = gallery.selected();
        let mut ey = 30usize;
        for entry in gallery.entries() {
            if ey + ENTRY_H > WIN_H { break; }
            let x = SCENE_W + 10;
            self.blit_scaled(&entry.thumbnail, x as isize, ey as isize, ENTRY_THUMB as isize, ENTRY_THUMB as isize);
            if selected == Some(entry.id) {
                self.draw_border(x - 2, ey - 2, ENTRY_THUMB + 4, ENTRY_THUMB + 4, GOLD);
            }
            self.draw_label(&entry.id.to_string(), x + ENTRY_THUMB + 8, ey + 10, 0xFFEEEEEE);
            self.draw_label(&format!("{}K", entry.byte_len / 1024), x + ENTRY_THUMB + 8, ey + 20, 0xFF888888);
            ey += ENTRY_H;
        }
    }

    // ── Status bar ────────────────────────────────────────────────────────

    fn draw_status(&mut self, hud: &Hud) {
        self.fill_rect(0, STATUS_Y, SCENE_W, WIN_H - STATUS_Y, TEXT_BG);
        let focus = hud.focus.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
        let status = format!(
            "MODE: {}   GESTURE: {}   PHOTOS: {}   FOCUS: {}",
            hud.mode.name(), hud.label, hud.photos, focus,
        );
        self.draw_label(&status, 10, STATUS_Y + 10, 0xFFEEEEEE);
        self.draw_label(
            "F=fist  O=open  P=pinch  V=victory  M=mid  N=no hand  Tab=next  Del=delete  H=ui  Q=quit",
            10, WIN_H - 12, 0xFF888888,
        );
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// `fill_rect` for rectangles that may hang off any edge of the scene area.
    fn fill_rect_i(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(SCENE_W as isize);
        let y1 = (y + h).min(WIN_H as isize);
        if x1 <= x0 || y1 <= y0 { return; }
        self.fill_rect(x0 as usize, y0 as usize, (x1 - x0) as usize, (y1 - y0) as usize, color);
    }

    fn fill_disc(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            let dx = ((r * r - dy * dy) as f32).sqrt() as isize;
            self.fill_rect_i(cx - dx, cy + dy, 2 * dx + 1, 1, color);
        }
    }

    /// Nearest-neighbour blit of a thumbnail into a `w`×`h` box.
    fn blit_scaled(&mut self, thumb: &Thumbnail, x: isize, y: isize, w: isize, h: isize) {
        let side = thumb.side as isize;
        if side == 0 || thumb.pixels.len() < (side * side) as usize { return; }
        for dy in 0..h {
            let py = y + dy;
            if py < 0 || py >= WIN_H as isize { continue; }
            let sy = dy * side / h;
            for dx in 0..w {
                let px = x + dx;
                if px < 0 || px >= WIN_W as isize { continue; }
                let sx = dx * side / w;
                self.buf[py as usize * WIN_W + px as usize] = thumb.pixels[(sy * side + sx) as usize];
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_i(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < SCENE_W {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                self.set_pixel_i(sx, sy, color);
            }
        }
    }

    /// Minimal bitmap font, 3×5 per character.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Fade toward the background with depth.
fn fade(color: u32, depth: f32) -> u32 {
    blend(color, BG_COLOR, (depth / FOG_DEPTH).clamp(0.0, 0.7))
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_point_projects_to_centre() {
        let p = project(crate::stage::FOCUS_POINT).unwrap();
        assert!((p.x - SCENE_W as f32 / 2.0).abs() < 1e-3);
        assert!((p.y - WIN_H as f32 / 2.0).abs() < 1e-3);
        assert!((p.depth - 25.0).abs() < 1e-4);
    }

    #[test]
    fn behind_camera_is_culled() {
        assert!(project(Vec3::new(0.0, 0.0, 95.0)).is_none());
    }

    #[test]
    fn nearer_is_bigger() {
        let near = project(Vec3::new(0.0, 0.0, 50.0)).unwrap();
        let far = project(Vec3::new(0.0, 0.0, -50.0)).unwrap();
        assert!(near.scale > far.scale);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn status_characters_have_glyphs() {
        let fallback = char_glyph('~');
        for c in "#()QFOCUS".chars() {
            assert_ne!(char_glyph(c), fallback, "{}", c);
        }
    }

    #[test]
    fn canvas_clips_offscreen_shapes() {
        let mut c = Canvas::new();
        c.fill_rect_i(-50, -50, 20, 20, GOLD);
        c.fill_disc(-100, 10_000, 30, GOLD);
        c.blit_scaled(&Thumbnail::blank(), WIN_W as isize - 4, WIN_H as isize - 4, 48, 48);
        assert!(c.buf.iter().filter(|&&p| p == GOLD).count() == 0);
    }
}
