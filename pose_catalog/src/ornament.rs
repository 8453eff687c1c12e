//! Ornament shapes, finishes and photo frame sizing.
//!
//! These carry no behaviour of their own; the renderer reads them to decide
//! what to draw for an id, and the stage reads the base scale.

use rand::Rng;

/// Longest side of a picture inside its frame.
const PICTURE_MAX_SIDE: f32 = 2.5;
/// Picture side used when the texture size is unknown (placeholder).
const PICTURE_DEFAULT_SIDE: f32 = 2.6;
/// Frame border added to both picture dimensions.
const FRAME_MARGIN: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cube,
    Bauble,
    CandyCane,
    /// Photo frame; dimensions are the outer frame size in world units.
    Frame { width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finish {
    Gold,
    Green,
    Red,
    /// Red-and-white striped.
    Cane,
    /// Matte frame around a picture.
    Paper,
}

impl Finish {
    /// Packed ARGB used by software previews.
    pub fn argb(self) -> u32 {
        match self {
            Finish::Gold  => 0xFFD4AF37,
            Finish::Green => 0xFF0F4214,
            Finish::Red   => 0xFF8A0303,
            Finish::Cane  => 0xFFF2F2F2,
            Finish::Paper => 0xFFCCCCCC,
        }
    }
}

/// Pick a decoration: half cubes, 40 % baubles, the rest candy canes.
///
/// Returns the shape, its finish and a uniform scale factor.
pub fn random_ornament<R: Rng + ?Sized>(rng: &mut R) -> (Shape, Finish, f32) {
    let roll: f32 = rng.gen();
    if roll < 0.5 {
        let finish = if rng.gen::<f32>() > 0.6 {
            Finish::Gold
        } else if rng.gen::<f32>() > 0.5 {
            Finish::Green
        } else {
            Finish::Red
        };
        (Shape::Cube, finish, 0.5 + rng.gen::<f32>() * 1.5)
    } else if roll < 0.9 {
        let finish = if rng.gen::<f32>() > 0.5 { Finish::Red } else { Finish::Gold };
        (Shape::Bauble, finish, 0.3 + rng.gen::<f32>() * 0.7)
    } else {
        (Shape::CandyCane, Finish::Cane, 1.5)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PhotoFrame
// ════════════════════════════════════════════════════════════════════════════

/// Picture and frame dimensions derived from the texture's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoFrame {
    pub picture_width:  f32,
    pub picture_height: f32,
}

impl PhotoFrame {
    /// Frame for a texture of `size` pixels; `None` gives the square
    /// placeholder frame.
    pub fn for_texture(size: Option<(u32, u32)>) -> Self {
        match size {
            Some((w, h)) if w > 0 && h > 0 => {
                let aspect = w as f32 / h as f32;
                if aspect > 1.0 {
                    PhotoFrame {
                        picture_width:  PICTURE_MAX_SIDE,
                        picture_height: PICTURE_MAX_SIDE / aspect,
                    }
                } else {
                    PhotoFrame {
                        picture_width:  PICTURE_MAX_SIDE * aspect,
                        picture_height: PICTURE_MAX_SIDE,
                    }
                }
            }
            _ => PhotoFrame {
                picture_width:  PICTURE_DEFAULT_SIDE,
                picture_height: PICTURE_DEFAULT_SIDE,
            },
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::Frame {
            width:  self.picture_width + FRAME_MARGIN,
            height: self.picture_height + FRAME_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn landscape_frame_is_wide() {
        let f = PhotoFrame::for_texture(Some((1600, 800)));
        assert_eq!(f.picture_width, 2.5);
        assert!((f.picture_height - 1.25).abs() < 1e-6);
        match f.shape() {
            Shape::Frame { width, height } => {
                assert!((width - 2.9).abs() < 1e-5);
                assert!((height - 1.65).abs() < 1e-5);
            }
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[test]
    fn portrait_frame_is_tall() {
        let f = PhotoFrame::for_texture(Some((500, 1000)));
        assert!((f.picture_width - 1.25).abs() < 1e-6);
        assert_eq!(f.picture_height, 2.5);
    }

    #[test]
    fn unknown_size_gives_placeholder() {
        assert_eq!(PhotoFrame::for_texture(None), PhotoFrame::for_texture(Some((0, 10))));
        assert_eq!(PhotoFrame::for_texture(None).picture_width, 2.6);
    }

    #[test]
    fn ornament_mix_roughly_matches_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 10_000;
        let mut cubes = 0;
        let mut canes = 0;
        for _ in 0..n {
            match random_ornament(&mut rng).0 {
                Shape::Cube      => cubes += 1,
                Shape::CandyCane => canes += 1,
                _ => {}
            }
        }
        assert!((cubes as f32 / n as f32 - 0.5).abs() < 0.03);
        assert!((canes as f32 / n as f32 - 0.1).abs() < 0.02);
    }
}
