use serde::{Deserialize, Serialize};

use crate::foundation::error::{CanopyError, CanopyResult};

/// Canonical straight-alpha color with normalized `0..=1` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Build from normalized channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a normalized alpha.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            a,
        )
    }

    /// Parse a CSS-like color string: `#rgb`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb()`, `rgba()`, `hsl()`, `hsla()` or a basic named color.
    pub fn parse(s: &str) -> CanopyResult<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with('#') {
            return parse_hex(&lower).map_err(CanopyError::validation);
        }
        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
            return parse_rgb_args(args).map_err(CanopyError::validation);
        }
        if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
            return parse_hsl_args(args).map_err(CanopyError::validation);
        }
        named(&lower).ok_or_else(|| CanopyError::validation(format!("unknown color \"{s}\"")))
    }

    /// 8-bit straight-alpha channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// `rgba(r, g, b, a)` string with 8-bit color channels.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Css(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '/'])
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect()
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("invalid number \"{s}\""))
}

/// `0..=255` channel or percentage, normalized.
fn parse_channel(s: &str) -> Result<f64, String> {
    match s.strip_suffix('%') {
        Some(p) => Ok(parse_number(p)? / 100.0),
        None => Ok(parse_number(s)? / 255.0),
    }
}

/// `0..=1` alpha or percentage.
fn parse_alpha(s: &str) -> Result<f64, String> {
    match s.strip_suffix('%') {
        Some(p) => Ok(parse_number(p)? / 100.0),
        None => parse_number(s),
    }
}

fn parse_percent(s: &str) -> Result<f64, String> {
    let s = s.strip_suffix('%').unwrap_or(s);
    Ok(parse_number(s)? / 100.0)
}

fn parse_rgb_args(args: &str) -> Result<Color, String> {
    match split_args(args).as_slice() {
        [r, g, b] => Ok(Color::rgba(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
            1.0,
        )),
        [r, g, b, a] => Ok(Color::rgba(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
            parse_alpha(a)?,
        )),
        _ => Err(format!("rgb() takes 3 or 4 arguments, got \"{args}\"")),
    }
}

fn parse_hsl_args(args: &str) -> Result<Color, String> {
    let parts = split_args(args);
    let (h, s, l, a) = match parts.as_slice() {
        [h, s, l] => (h, s, l, None),
        [h, s, l, a] => (h, s, l, Some(a)),
        _ => return Err(format!("hsl() takes 3 or 4 arguments, got \"{args}\"")),
    };
    let h = parse_number(h.strip_suffix("deg").unwrap_or(h))?;
    let a = match a {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Ok(hsla_to_rgba(h, parse_percent(s)?, parse_percent(l)?, a))
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(format!("invalid hex color \"#{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        3 => {
            let expand = |i: usize| hex_byte(&s[i..=i].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?, 255)
        }
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned());
        }
    };

    Ok(Color::from_rgb8(r, g, b, f64::from(a) / 255.0))
}

fn named(s: &str) -> Option<Color> {
    let (r, g, b) = match s {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        _ => return None,
    };
    Some(Color::from_rgb8(r, g, b, 1.0))
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l, l, l, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Color::rgba(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
        a,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/color.rs"]
mod tests;
