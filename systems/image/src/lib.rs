#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Solid-colour RGB snapshots of the game state for visualisation.
//!
//! Every cell becomes a [`SPRITE_WIDTH`] × [`SPRITE_HEIGHT`] block coloured by
//! its [`Element`]. The buffer is row-major with interleaved channels and
//! should be viewed as [`image_shape`] (height, width, channels).

use tsp_grid_core::Element;
use tsp_grid_world::{query, GameState};

/// Width of a single cell block in pixels.
pub const SPRITE_WIDTH: usize = 32;
/// Height of a single cell block in pixels.
pub const SPRITE_HEIGHT: usize = 32;
/// Colour channels per pixel.
pub const SPRITE_CHANNELS: usize = 3;

const SPRITE_ROW_LEN: usize = SPRITE_WIDTH * SPRITE_CHANNELS;

/// Opaque 8-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    const fn channels(self) -> [u8; SPRITE_CHANNELS] {
        [self.red, self.green, self.blue]
    }
}

/// Fixed colour assignment for every element kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Palette;

impl Palette {
    /// Colour painted for the provided element.
    #[must_use]
    pub const fn color(element: Element) -> Rgb {
        match element {
            Element::Empty => Rgb::from_rgb(0xff, 0xff, 0xff),
            Element::Agent => Rgb::from_rgb(0x00, 0x00, 0x00),
            Element::Wall => Rgb::from_rgb(0xa9, 0xa9, 0xa9),
            Element::CityUnvisited => Rgb::from_rgb(0xff, 0x00, 0x00),
            Element::CityVisited => Rgb::from_rgb(0x00, 0xff, 0x00),
            Element::StartCity => Rgb::from_rgb(0x00, 0xff, 0xff),
            Element::AgentAtCity => Rgb::from_rgb(0xff, 0xff, 0x00),
            Element::AgentAtStartCity => Rgb::from_rgb(0xff, 0x00, 0xff),
        }
    }
}

/// Shape the flat image should be viewed as: `[height, width, channels]`.
#[must_use]
pub fn image_shape(state: &GameState) -> [usize; 3] {
    [
        state.rows() * SPRITE_HEIGHT,
        state.columns() * SPRITE_WIDTH,
        SPRITE_CHANNELS,
    ]
}

/// Paints the state into a freshly allocated RGB buffer.
#[must_use]
pub fn render(state: &GameState) -> Vec<u8> {
    let [height, width, channels] = image_shape(state);
    let mut image = vec![0; height * width * channels];
    let columns = state.columns();
    for (cell, element) in query::elements(state).enumerate() {
        fill_sprite(
            &mut image,
            cell / columns,
            cell % columns,
            columns,
            Palette::color(element),
        );
    }
    image
}

fn fill_sprite(image: &mut [u8], row: usize, column: usize, columns: usize, color: Rgb) {
    let image_row_len = SPRITE_ROW_LEN * columns;
    let top_left = row * SPRITE_HEIGHT * image_row_len + column * SPRITE_ROW_LEN;
    let pixel = color.channels();
    for sprite_row in 0..SPRITE_HEIGHT {
        let start = top_left + sprite_row * image_row_len;
        for chunk in image[start..start + SPRITE_ROW_LEN].chunks_exact_mut(SPRITE_CHANNELS) {
            chunk.copy_from_slice(&pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tsp_grid_core::Action;

    fn state(descriptor: &str) -> GameState {
        GameState::from_descriptor(descriptor).expect("descriptor parses")
    }

    fn pixel(image: &[u8], shape: [usize; 3], y: usize, x: usize) -> Rgb {
        let index = (y * shape[1] + x) * shape[2];
        Rgb::from_rgb(image[index], image[index + 1], image[index + 2])
    }

    #[test]
    fn shape_scales_cells_to_sprites() {
        let state = state("2|3|1|0|0|0|2|3");
        assert_eq!(image_shape(&state), [64, 96, 3]);
        assert_eq!(render(&state).len(), 64 * 96 * 3);
    }

    #[test]
    fn every_pixel_of_a_block_matches_its_cell() {
        let state = state("2|3|1|0|0|0|2|3");
        let shape = image_shape(&state);
        let image = render(&state);
        let elements: Vec<_> = query::elements(&state).collect();
        for y in 0..shape[0] {
            for x in 0..shape[1] {
                let cell = (y / SPRITE_HEIGHT) * state.columns() + x / SPRITE_WIDTH;
                assert_eq!(
                    pixel(&image, shape, y, x),
                    Palette::color(elements[cell]),
                    "pixel ({y}, {x})"
                );
            }
        }
    }

    #[test]
    fn composite_agent_colours_follow_tour() {
        let mut state = state("1|3|3|1|3");
        let shape = image_shape(&state);

        state.apply_action(Action::Left);
        let image = render(&state);
        assert_eq!(
            pixel(&image, shape, 5, 5),
            Palette::color(Element::AgentAtStartCity)
        );

        state.apply_action(Action::Right);
        state.apply_action(Action::Right);
        let image = render(&state);
        assert_eq!(pixel(&image, shape, 5, 5), Rgb::from_rgb(0x00, 0xff, 0xff));
        assert_eq!(pixel(&image, shape, 31, 40), Rgb::from_rgb(0xff, 0xff, 0xff));
        assert_eq!(pixel(&image, shape, 0, 95), Rgb::from_rgb(0xff, 0xff, 0x00));
    }

    #[test]
    fn palette_colours_are_distinct() {
        let colors: HashSet<_> = Element::ALL.into_iter().map(Palette::color).collect();
        assert_eq!(colors.len(), Element::ALL.len());
    }
}
