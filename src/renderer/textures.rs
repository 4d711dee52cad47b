//! Procedural pixel-art textures
//!
//! Each sprite texture is drawn as ASCII art: `#` is the primary color, `o` a
//! secondary color and anything else is transparent. The game-over banner is
//! rendered from a tiny 3x5 bitmap font.

use super::vertex::colors;
use crate::sim::TextureId;

/// Decoded RGBA8 image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

const SHIP: &[&str] = &[
    "....##....",
    "....##....",
    "...####...",
    "...####...",
    ".########.",
    "##########",
    "##########",
    "##.####.##",
];

const INVADER: &[&str] = &[
    "..#.....#..",
    "...#...#...",
    "..#######..",
    ".##.###.##.",
    "###########",
    "#.#######.#",
    "#.#.....#.#",
    "...##.##...",
];

const MISSILE: &[&str] = &["#", "#", "#", "#"];

const POWER_MISSILE_1: &[&str] = &[".#.", "###", "###", ".#.", ".#.", ".#."];

const POWER_MISSILE_2: &[&str] = &[".#.", "#o#", "#o#", "#o#", ".#.", "#.#"];

const BOMB: &[&str] = &[".#.", "#..", ".#.", "..#", ".#.", "#..", ".#.", "..#"];

const EXPLOSION: &[&str] = &[
    "#...#...#",
    ".#..#..#.",
    "..#ooo#..",
    "..ooooo..",
    "##ooooo##",
    "..ooooo..",
    "..#ooo#..",
    ".#..#..#.",
    "#...#...#",
];

const SOLID: &[&str] = &["#"];

const GAME_OVER_TEXT: &str = "GAME OVER";

/// 3x5 glyphs for the banner text
fn glyph(c: char) -> [&'static str; 5] {
    match c {
        'G' => ["###", "#..", "#.#", "#.#", "###"],
        'A' => [".#.", "#.#", "###", "#.#", "#.#"],
        'M' => ["#.#", "###", "###", "#.#", "#.#"],
        'E' => ["###", "#..", "##.", "#..", "###"],
        'O' => ["###", "#.#", "#.#", "#.#", "###"],
        'V' => ["#.#", "#.#", "#.#", "#.#", ".#."],
        'R' => ["##.", "#.#", "##.", "#.#", "#.#"],
        _ => ["...", "...", "...", "...", "..."],
    }
}

/// Lay out text as ASCII art with a one-pixel gap between glyphs and a border
fn banner_rows(text: &str) -> Vec<String> {
    let mut rows = vec![String::from("."); 5];
    for c in text.chars() {
        let g = glyph(c);
        for (row, line) in rows.iter_mut().zip(g.iter()) {
            row.push_str(line);
            row.push('.');
        }
    }
    let width = rows[0].len();
    let blank = ".".repeat(width);
    let mut framed = vec![blank.clone()];
    framed.extend(rows);
    framed.push(blank);
    framed
}

fn rasterize<S: AsRef<str>>(rows: &[S], primary: [u8; 4], secondary: [u8; 4]) -> TextureImage {
    let height = rows.len() as u32;
    let width = rows
        .iter()
        .map(|r| r.as_ref().chars().count())
        .max()
        .unwrap_or(0) as u32;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for row in rows {
        let mut chars = row.as_ref().chars();
        for _ in 0..width {
            let color = match chars.next() {
                Some('#') => primary,
                Some('o') => secondary,
                _ => colors::TRANSPARENT,
            };
            rgba.extend_from_slice(&color);
        }
    }
    TextureImage {
        width,
        height,
        rgba,
    }
}

/// Build the image for a texture id
pub fn texture_image(id: TextureId) -> TextureImage {
    match id {
        TextureId::Ship => rasterize(SHIP, colors::SHIP, colors::SHIP),
        TextureId::Invader => rasterize(INVADER, colors::INVADER, colors::INVADER),
        TextureId::Missile => rasterize(MISSILE, colors::MISSILE, colors::MISSILE),
        TextureId::PowerMissile1 => rasterize(
            POWER_MISSILE_1,
            colors::POWER_MISSILE_1,
            colors::POWER_MISSILE_1,
        ),
        TextureId::PowerMissile2 => {
            rasterize(POWER_MISSILE_2, colors::POWER_MISSILE_2, colors::MISSILE)
        }
        TextureId::Bomb => rasterize(BOMB, colors::BOMB, colors::BOMB),
        TextureId::Explosion => rasterize(EXPLOSION, colors::EXPLOSION, colors::EXPLOSION_CORE),
        TextureId::GameOver => rasterize(
            &banner_rows(GAME_OVER_TEXT),
            colors::GAME_OVER,
            colors::GAME_OVER,
        ),
        TextureId::Border => rasterize(SOLID, colors::BORDER, colors::BORDER),
        // Drawn by the flat shader; the texture only fills the bind group
        TextureId::Background => rasterize(SOLID, colors::MISSILE, colors::MISSILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_texture_has_consistent_size() {
        for id in TextureId::ALL {
            let image = texture_image(id);
            assert!(image.width > 0 && image.height > 0, "{:?}", id);
            assert_eq!(
                image.rgba.len(),
                (image.width * image.height * 4) as usize,
                "{:?}",
                id
            );
        }
    }

    #[test]
    fn test_art_rows_have_equal_width() {
        for art in [SHIP, INVADER, MISSILE, POWER_MISSILE_1, POWER_MISSILE_2, BOMB, EXPLOSION] {
            let width = art[0].len();
            assert!(art.iter().all(|row| row.len() == width));
        }
    }

    #[test]
    fn test_banner_dimensions() {
        let rows = banner_rows(GAME_OVER_TEXT);
        assert_eq!(rows.len(), 7);
        // Leading column plus 4 columns per glyph
        assert_eq!(rows[0].len(), 1 + 4 * GAME_OVER_TEXT.len());
        assert!(rows.iter().all(|r| r.len() == rows[0].len()));
    }

    #[test]
    fn test_transparent_pixels() {
        let image = rasterize(&[".#"], [1, 2, 3, 4], [0; 4]);
        assert_eq!(image.rgba, vec![0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
