/// Per-level entity configuration tables
///
/// Bullet, fish and net appearance/collision data lives in
/// `assets/config/entity_tables.json` rather than in code, in the same
/// configuration-driven style as the animation sheets: a `SpriteCut` names a
/// rectangle in a sprite sheet, and the cut doubles as the collision size for
/// bullets and fish.
///
/// A level with no table entry is a programming error, not a runtime
/// condition: the accessors panic instead of limping along with a default,
/// since a silently wrong size would corrupt collision results.
use serde::Deserialize;

/// A rectangle within a sprite sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteCut {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Bullet appearance and collision size for one cannon level.
#[derive(Debug, Clone, Deserialize)]
pub struct BulletSpec {
    pub cut: SpriteCut,
}

/// Fish appearance, collision size and score value for one fish level.
#[derive(Debug, Clone, Deserialize)]
pub struct FishSpec {
    pub cut: SpriteCut,
    pub price: u32,
}

/// Capture-net cut for one bullet level.
#[derive(Debug, Clone, Deserialize)]
pub struct NetSpec {
    pub cut: SpriteCut,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityTables {
    pub bullets: Vec<BulletSpec>,
    pub fish: Vec<FishSpec>,
    pub nets: Vec<NetSpec>,
}

impl EntityTables {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_json(&content)?;
        Ok(tables)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Levels are 1-based; the table entry for bullet `level`.
    pub fn bullet(&self, level: u8) -> &BulletSpec {
        assert!(level >= 1, "bullet level {level} out of range");
        self.bullets
            .get(level as usize - 1)
            .unwrap_or_else(|| panic!("no bullet entry for level {level}"))
    }

    pub fn fish(&self, level: u8) -> &FishSpec {
        assert!(level >= 1, "fish level {level} out of range");
        self.fish
            .get(level as usize - 1)
            .unwrap_or_else(|| panic!("no fish entry for level {level}"))
    }

    pub fn net(&self, level: u8) -> &NetSpec {
        assert!(level >= 1, "net level {level} out of range");
        self.nets
            .get(level as usize - 1)
            .unwrap_or_else(|| panic!("no net entry for level {level}"))
    }

    /// Highest fish level the tables know about.
    pub fn fish_levels(&self) -> u8 {
        self.fish.len() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_tables_parse() {
        let tables =
            EntityTables::from_json(include_str!("../assets/config/entity_tables.json"))
                .expect("shipped entity tables must parse");
        assert_eq!(tables.bullets.len(), 7);
        assert_eq!(tables.fish.len(), 5);
        assert_eq!(tables.nets.len(), 7);
        assert_eq!(tables.fish_levels(), 5);
        // Spot-check a couple of values against the sheet layout
        assert_eq!(tables.bullet(1).cut.w, 25);
        assert_eq!(tables.fish(5).price, 20);
        assert_eq!(tables.net(7).cut.w, 200);
    }

    #[test]
    fn test_from_json_minimal() {
        let json = r#"{
            "bullets": [{"cut": {"x": 0, "y": 0, "w": 10, "h": 12}}],
            "fish": [{"cut": {"x": 0, "y": 0, "w": 55, "h": 37}, "price": 1}],
            "nets": [{"cut": {"x": 0, "y": 0, "w": 88, "h": 88}}]
        }"#;
        let tables = EntityTables::from_json(json).unwrap();
        assert_eq!(tables.bullet(1).cut.h, 12);
        assert_eq!(tables.fish(1).price, 1);
    }

    #[test]
    #[should_panic(expected = "no fish entry")]
    fn test_missing_level_fails_fast() {
        let json = r#"{
            "bullets": [{"cut": {"x": 0, "y": 0, "w": 10, "h": 12}}],
            "fish": [{"cut": {"x": 0, "y": 0, "w": 55, "h": 37}, "price": 1}],
            "nets": [{"cut": {"x": 0, "y": 0, "w": 88, "h": 88}}]
        }"#;
        let tables = EntityTables::from_json(json).unwrap();
        let _ = tables.fish(3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_level_zero_fails_fast() {
        let json = r#"{
            "bullets": [{"cut": {"x": 0, "y": 0, "w": 10, "h": 12}}],
            "fish": [{"cut": {"x": 0, "y": 0, "w": 55, "h": 37}, "price": 1}],
            "nets": [{"cut": {"x": 0, "y": 0, "w": 88, "h": 88}}]
        }"#;
        let tables = EntityTables::from_json(json).unwrap();
        let _ = tables.bullet(0);
    }
}
