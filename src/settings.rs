use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::fractal::{Emission, MAX_DEPTH};

/// Drawing configuration shared by the native and browser front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    #[serde(default)]
    pub depth: u32,
    /// Upper bound of the depth control.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub emission: Emission,
    #[serde(default)]
    pub fill: Rgba,
    #[serde(default = "default_background")]
    pub background: Rgba,
    #[serde(default = "default_extent")]
    pub width: u32,
    #[serde(default = "default_extent")]
    pub height: u32,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            depth: 0,
            max_depth: default_max_depth(),
            emission: Emission::default(),
            fill: Rgba::default(),
            background: default_background(),
            width: default_extent(),
            height: default_extent(),
        }
    }
}

fn default_max_depth() -> u32 {
    8
}

fn default_background() -> Rgba {
    Rgba::WHITE
}

fn default_extent() -> u32 {
    600
}

impl DrawSettings {
    /// Reads a settings document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .with_context(|| format!("unable to read settings {}", path.display()))?;
        Self::from_xml(&xml).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Parses a `<sierpinski>` settings document. Missing elements keep
    /// their defaults.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid settings XML")?;
        let root = document.root_element();
        if !root.has_tag_name("sierpinski") {
            return Err(anyhow!(
                "expected <sierpinski> root element, found <{}>",
                root.tag_name().name()
            ));
        }

        let defaults = Self::default();
        let settings = Self {
            depth: parse_u32(optional_text(&root, "depth"), defaults.depth)?,
            max_depth: parse_u32(optional_text(&root, "max-depth"), defaults.max_depth)?,
            emission: match optional_text(&root, "emission") {
                Some(value) => value.parse()?,
                None => defaults.emission,
            },
            fill: parse_color(optional_text(&root, "fill"), defaults.fill)?,
            background: parse_color(optional_text(&root, "background"), defaults.background)?,
            width: parse_u32(optional_text(&root, "width"), defaults.width)?,
            height: parse_u32(optional_text(&root, "height"), defaults.height)?,
        };
        settings.validate()
    }

    /// Checks the ranges and clamps the initial depth into the control's
    /// range.
    pub fn validate(mut self) -> Result<Self> {
        if self.max_depth > MAX_DEPTH {
            return Err(anyhow!(
                "max depth {} exceeds the supported maximum of {MAX_DEPTH}",
                self.max_depth
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "canvas size {}x{} has zero area",
                self.width,
                self.height
            ));
        }
        self.depth = self.depth.min(self.max_depth);
        Ok(self)
    }
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_u32(value: Option<String>, default: u32) -> Result<u32> {
    match value {
        Some(value) => value
            .parse::<u32>()
            .map_err(|err| anyhow!("failed to parse {value:?} as a non-negative integer: {err}")),
        None => Ok(default),
    }
}

fn parse_color(value: Option<String>, default: Rgba) -> Result<Rgba> {
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
    <sierpinski>
        <depth>5</depth>
        <max-depth>10</max-depth>
        <emission>replayed</emission>
        <fill>255 0 0</fill>
        <width>800</width>
    </sierpinski>
    "#;

    #[test]
    fn parse_settings_overrides_defaults() {
        let settings = DrawSettings::from_xml(SAMPLE).unwrap();
        assert_eq!(settings.depth, 5);
        assert_eq!(settings.max_depth, 10);
        assert_eq!(settings.emission, Emission::Replayed);
        assert_eq!(settings.fill, Rgba::from_rgb8(255, 0, 0));
        assert_eq!(settings.background, Rgba::WHITE);
        assert_eq!((settings.width, settings.height), (800, 600));
    }

    #[test]
    fn depth_is_clamped_to_control_range() {
        let xml = "<sierpinski><depth>9</depth><max-depth>4</max-depth></sierpinski>";
        assert_eq!(DrawSettings::from_xml(xml).unwrap().depth, 4);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(DrawSettings::from_xml("<scene/>").is_err());
        assert!(DrawSettings::from_xml("<sierpinski><depth>-1</depth></sierpinski>").is_err());
        assert!(DrawSettings::from_xml("<sierpinski><max-depth>40</max-depth></sierpinski>").is_err());
        assert!(DrawSettings::from_xml("<sierpinski><height>0</height></sierpinski>").is_err());
        assert!(DrawSettings::from_xml("<sierpinski><fill>teal</fill></sierpinski>").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = NamedTempFile::new().expect("temp settings");
        file.write_all(SAMPLE.as_bytes()).expect("write settings");
        let settings = DrawSettings::load(file.path()).unwrap();
        assert_eq!(settings.depth, 5);
        assert!(DrawSettings::load(file.path().with_extension("missing")).is_err());
    }
}
