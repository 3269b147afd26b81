/// Texture registry
///
/// All images are loaded up front, before the scene starts running; the rest
/// of the game can then assume every lookup succeeds. A missing file is a
/// startup precondition failure and every missing path is reported together in
/// one error instead of dying on the first.
use sdl2::image::LoadTexture;
use sdl2::render::{Texture, TextureCreator};
use sdl2::video::WindowContext;
use std::collections::HashMap;

/// Logical image name to file path, mirroring the sprite-sheet set the game
/// draws from.
pub const MANIFEST: &[(&str, &str)] = &[
    ("game_bg", "assets/sprites/game_bg.png"),
    ("bottom", "assets/sprites/bottom.png"),
    ("cannon1", "assets/sprites/cannon1.png"),
    ("cannon2", "assets/sprites/cannon2.png"),
    ("cannon3", "assets/sprites/cannon3.png"),
    ("cannon4", "assets/sprites/cannon4.png"),
    ("cannon5", "assets/sprites/cannon5.png"),
    ("cannon6", "assets/sprites/cannon6.png"),
    ("cannon7", "assets/sprites/cannon7.png"),
    ("bullet", "assets/sprites/bullet.png"),
    ("web", "assets/sprites/web.png"),
    ("fish1", "assets/sprites/fish1.png"),
    ("fish2", "assets/sprites/fish2.png"),
    ("fish3", "assets/sprites/fish3.png"),
    ("fish4", "assets/sprites/fish4.png"),
    ("fish5", "assets/sprites/fish5.png"),
    ("coinAni1", "assets/sprites/coin_ani1.png"),
    ("coinText", "assets/sprites/coin_text.png"),
    ("number_black", "assets/sprites/number_black.png"),
];

pub struct Assets<'a> {
    images: HashMap<String, Texture<'a>>,
}

impl<'a> Assets<'a> {
    /// Loads every manifest entry. Returns one combined error naming all the
    /// files that failed, so a broken install is diagnosed in a single run.
    pub fn load(
        texture_creator: &'a TextureCreator<WindowContext>,
        manifest: &[(&str, &str)],
    ) -> Result<Self, String> {
        let mut images = HashMap::new();
        let mut missing = Vec::new();
        for (name, path) in manifest {
            match texture_creator.load_texture(path) {
                Ok(texture) => {
                    images.insert((*name).to_string(), texture);
                }
                Err(e) => missing.push(format!("{path}: {e}")),
            }
        }
        if !missing.is_empty() {
            return Err(format!("failed to load assets:\n  {}", missing.join("\n  ")));
        }
        log::info!("loaded {} images", images.len());
        Ok(Assets { images })
    }

    pub fn image(&self, name: &str) -> Result<&Texture<'a>, String> {
        self.images
            .get(name)
            .ok_or_else(|| format!("no image named '{name}'"))
    }

    /// Pixel size of a loaded image.
    pub fn size(&self, name: &str) -> Result<(u32, u32), String> {
        let query = self.image(name)?.query();
        Ok((query.width, query.height))
    }
}
