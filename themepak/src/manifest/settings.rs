//! Typed accent-color and LED settings blocks, and their device file codecs.
//!
//! # File Formats
//!
//! The accent settings live in a shared `key=value` text file alongside
//! unrelated launcher settings; only the six `colorN` keys are owned here
//! and every other line is preserved on write.
//!
//! The LED settings file is INI-shaped with one section per zone:
//!
//! ```text
//! [F1 key]
//! effect=1
//! color1=0xFFFFFF
//! color2=0x000000
//! speed=1000
//! brightness=100
//! trigger=1
//! inbrightness=100
//! ```

use std::fmt;
use std::str::FromStr;

use ini::Ini;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 24-bit RGB color written as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(pub u32);

impl HexColor {
    /// Red, green and blue channels.
    pub fn rgb(&self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0 & 0xFF_FFFF)
    }
}

impl FromStr for HexColor {
    type Err = String;

    /// Accepts `0xRRGGBB`, `#RRGGBB` and bare `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 6 {
            return Err(format!("invalid color: {}", s));
        }
        u32::from_str_radix(digits, 16)
            .map(HexColor)
            .map_err(|_| format!("invalid color: {}", s))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The six named accent color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccentColors {
    /// Main text and highlight color.
    pub color1: HexColor,
    /// Primary accent.
    pub color2: HexColor,
    /// Secondary accent.
    pub color3: HexColor,
    /// Hint and button label color.
    pub color4: HexColor,
    /// List text.
    pub color5: HexColor,
    /// Selected list text.
    pub color6: HexColor,
}

impl Default for AccentColors {
    fn default() -> Self {
        Self {
            color1: HexColor(0xFFFFFF),
            color2: HexColor(0x9B2257),
            color3: HexColor(0x1E2329),
            color4: HexColor(0xFFFFFF),
            color5: HexColor(0x000000),
            color6: HexColor(0xFFFFFF),
        }
    }
}

impl AccentColors {
    /// Settings-file keys in slot order.
    pub const KEYS: [&'static str; 6] =
        ["color1", "color2", "color3", "color4", "color5", "color6"];

    /// Slots in order.
    pub fn slots(&self) -> [HexColor; 6] {
        [
            self.color1,
            self.color2,
            self.color3,
            self.color4,
            self.color5,
            self.color6,
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut HexColor> {
        match key {
            "color1" => Some(&mut self.color1),
            "color2" => Some(&mut self.color2),
            "color3" => Some(&mut self.color3),
            "color4" => Some(&mut self.color4),
            "color5" => Some(&mut self.color5),
            "color6" => Some(&mut self.color6),
            _ => None,
        }
    }

    /// Parse the accent slots out of a shared settings file.
    ///
    /// Returns `None` when the text carries none of the color keys. Slots
    /// that are absent or unparsable keep their defaults.
    pub fn from_settings_text(text: &str) -> Option<Self> {
        let mut colors = Self::default();
        let mut found = false;
        for (key, value) in key_value_lines(text) {
            if let Some(slot) = colors.slot_mut(key) {
                if let Ok(color) = value.parse() {
                    *slot = color;
                    found = true;
                }
            }
        }
        found.then_some(colors)
    }

    /// Merge the accent slots into existing settings text.
    ///
    /// Existing `colorN` lines are rewritten in place, missing ones are
    /// appended, every other line is kept verbatim.
    pub fn merge_into_settings_text(&self, existing: &str) -> String {
        let slots = self.slots();
        let mut written = [false; 6];
        let mut lines: Vec<String> = existing
            .lines()
            .map(|line| {
                let key = line.split_once('=').map(|(k, _)| k.trim());
                match key.and_then(|k| Self::KEYS.iter().position(|slot| *slot == k)) {
                    Some(index) => {
                        written[index] = true;
                        format!("{}={}", Self::KEYS[index], slots[index])
                    }
                    None => line.to_string(),
                }
            })
            .collect();

        for (index, done) in written.iter().enumerate() {
            if !done {
                lines.push(format!("{}={}", Self::KEYS[index], slots[index]));
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// One programmable LED zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedZone {
    /// Effect id.
    pub effect: u32,
    /// Primary color.
    pub color1: HexColor,
    /// Secondary color.
    pub color2: HexColor,
    /// Effect speed in milliseconds.
    pub speed: u32,
    /// Brightness percentage.
    pub brightness: u32,
    /// Trigger id.
    pub trigger: u32,
    /// Secondary (in-game) brightness percentage.
    pub in_brightness: u32,
}

impl Default for LedZone {
    fn default() -> Self {
        Self {
            effect: 1,
            color1: HexColor(0xFFFFFF),
            color2: HexColor(0x000000),
            speed: 1000,
            brightness: 100,
            trigger: 1,
            in_brightness: 100,
        }
    }
}

/// LED profile for the four zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedSettings {
    /// First programmable key.
    pub f1: LedZone,
    /// Second programmable key.
    pub f2: LedZone,
    /// Status bar strip.
    pub top_bar: LedZone,
    /// Shoulder triggers.
    pub lr_triggers: LedZone,
}

/// Zone section names in the LED settings file, in file order.
pub const LED_SECTIONS: [&str; 4] = ["F1 key", "F2 key", "Top bar", "L&R triggers"];

impl LedSettings {
    /// Zones paired with their section names.
    pub fn zones(&self) -> [(&'static str, &LedZone); 4] {
        [
            (LED_SECTIONS[0], &self.f1),
            (LED_SECTIONS[1], &self.f2),
            (LED_SECTIONS[2], &self.top_bar),
            (LED_SECTIONS[3], &self.lr_triggers),
        ]
    }

    fn zone_mut(&mut self, section: &str) -> Option<&mut LedZone> {
        match section {
            "F1 key" => Some(&mut self.f1),
            "F2 key" => Some(&mut self.f2),
            "Top bar" => Some(&mut self.top_bar),
            "L&R triggers" => Some(&mut self.lr_triggers),
            _ => None,
        }
    }

    /// Parse the LED settings file.
    ///
    /// Returns `None` when no zone section is present. Missing keys keep
    /// their defaults.
    pub fn from_settings_text(text: &str) -> Result<Option<Self>, String> {
        let ini = Ini::load_from_str(text).map_err(|e| e.to_string())?;
        let mut settings = Self::default();
        let mut found = false;

        for section in LED_SECTIONS {
            let Some(props) = ini.section(Some(section)) else {
                continue;
            };
            found = true;
            let Some(zone) = settings.zone_mut(section) else {
                continue;
            };
            let number = |key: &str, fallback: u32| {
                props
                    .get(key)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(fallback)
            };
            let color = |key: &str, fallback: HexColor| {
                props
                    .get(key)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(fallback)
            };
            *zone = LedZone {
                effect: number("effect", zone.effect),
                color1: color("color1", zone.color1),
                color2: color("color2", zone.color2),
                speed: number("speed", zone.speed),
                brightness: number("brightness", zone.brightness),
                trigger: number("trigger", zone.trigger),
                in_brightness: number("inbrightness", zone.in_brightness),
            };
        }

        Ok(found.then_some(settings))
    }

    /// Merge the four zones into existing settings text.
    ///
    /// Unknown sections and keys already in the file are kept.
    pub fn merge_into_settings_text(&self, existing: &str) -> Result<String, String> {
        let mut ini = if existing.trim().is_empty() {
            Ini::new()
        } else {
            Ini::load_from_str(existing).map_err(|e| e.to_string())?
        };

        for (section, zone) in self.zones() {
            ini.with_section(Some(section))
                .set("effect", zone.effect.to_string())
                .set("color1", zone.color1.to_string())
                .set("color2", zone.color2.to_string())
                .set("speed", zone.speed.to_string())
                .set("brightness", zone.brightness.to_string())
                .set("trigger", zone.trigger.to_string())
                .set("inbrightness", zone.in_brightness.to_string());
        }

        let mut buffer = Vec::new();
        ini.write_to(&mut buffer).map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }
}

/// `key=value` pairs of a settings file, skipping blanks and comments.
fn key_value_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return None;
        }
        line.split_once('=').map(|(k, v)| (k.trim(), v.trim()))
    })
}
