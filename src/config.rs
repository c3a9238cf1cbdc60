use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use log::warn;
use roxmltree::Document;

/// World-space base offsets for the scene's named instances.
///
/// Loaded from an attribute-value file of the form
/// `<values><object position="car_x" value="1.5"/></values>`. Entries that
/// are absent keep the zero default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneLayout {
    pub car: Vec3,
    pub sun: Vec3,
    pub planet1: Vec3,
    pub planet2: Vec3,
    pub moon1: Vec3,
    pub moon2: Vec3,
    pub floor: Vec3,
    pub sphere: Vec3,
}

impl SceneLayout {
    /// Parses the layout from the configuration XML text.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid configuration XML")?;
        let root = document
            .descendants()
            .find(|node| node.has_tag_name("values"))
            .ok_or_else(|| anyhow!("<values> root is missing"))?;

        let mut layout = Self::default();
        for node in root.children().filter(|n| n.has_tag_name("object")) {
            let key = node
                .attribute("position")
                .ok_or_else(|| anyhow!("object entry is missing the position attribute"))?;
            let value = node
                .attribute("value")
                .ok_or_else(|| anyhow!("entry {key} is missing the value attribute"))?;
            let value = value
                .parse::<f32>()
                .with_context(|| format!("entry {key} has a non-numeric value {value:?}"))?;
            match layout.slot(key) {
                Some(slot) => *slot = value,
                None => warn!("ignoring unknown configuration entry {key}"),
            }
        }
        Ok(layout)
    }

    /// Reads the layout from disk; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_xml(&text)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "configuration file {} not found; using default offsets",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut f32> {
        let (name, axis) = key.rsplit_once('_')?;
        let target = match name {
            "car" => &mut self.car,
            "sun" => &mut self.sun,
            "planet1" => &mut self.planet1,
            "planet2" => &mut self.planet2,
            "moon1" => &mut self.moon1,
            "moon2" => &mut self.moon2,
            "floor" => &mut self.floor,
            "sphere" => &mut self.sphere,
            _ => return None,
        };
        match axis {
            "x" => Some(&mut target.x),
            "y" => Some(&mut target.y),
            "z" => Some(&mut target.z),
            _ => None,
        }
    }
}
