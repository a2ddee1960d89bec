//! Clean-up and restyling of KanjiVG stroke-order diagrams for embedding.

use regex::{Captures, Regex};

const RESPONSIVE_STYLE: &str = "max-width:420px;width:100%;height:auto;";

/// Colours and sizes applied on top of a KanjiVG diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeStyle {
    pub stroke_color: String,
    pub number_color: String,
    pub stroke_width: u32,
    pub show_numbers: bool,
}

impl StrokeStyle {
    /// Bright strokes for dark backgrounds.
    pub fn high_contrast() -> Self {
        Self {
            stroke_color: "#ffffff".to_string(),
            number_color: "#ffffff".to_string(),
            stroke_width: 4,
            show_numbers: true,
        }
    }

    pub fn standard() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            number_color: "#808080".to_string(),
            stroke_width: 4,
            show_numbers: true,
        }
    }

    pub fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_numbers(mut self, show: bool) -> Self {
        self.show_numbers = show;
        self
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::high_contrast()
    }
}

/// Keep only the `<svg>…</svg>` fragment, drop comments, XML declarations and
/// DOCTYPE, and make the root element responsive.
pub fn sanitize_svg(svg: &str) -> String {
    if svg.is_empty() {
        return String::new();
    }

    let fragment = match (svg.find("<svg"), svg.rfind("</svg>")) {
        (Some(start), Some(end)) if end >= start => &svg[start..end + "</svg>".len()],
        _ => svg,
    };

    let fragment = replace_all(r"(?s)<!--.*?-->", fragment, "");
    let fragment = replace_all(r"(?i)<\?xml[^>]*?>", &fragment, "");
    let fragment = replace_all(r"(?i)<!DOCTYPE[^>]*>(?:\[[\s\S]*?\])?", &fragment, "");

    let Ok(open_tag) = Regex::new(r"(?is)<svg[^>]*>") else {
        return fragment;
    };
    open_tag
        .replacen(&fragment, 1, |caps: &Captures| responsive_open_tag(&caps[0]))
        .into_owned()
}

fn responsive_open_tag(tag: &str) -> String {
    let tag = replace_all(r#"\swidth="[^"]*""#, tag, "");
    let tag = replace_all(r#"\sheight="[^"]*""#, &tag, "");

    if tag.contains("style=") {
        match Regex::new(r#"style="([^"]*)""#) {
            Ok(re) => re
                .replacen(&tag, 1, |caps: &Captures| {
                    format!("style=\"{};{}\"", &caps[1], RESPONSIVE_STYLE)
                })
                .into_owned(),
            Err(_) => tag,
        }
    } else {
        tag.replacen("<svg", &format!("<svg style=\"{}\"", RESPONSIVE_STYLE), 1)
    }
}

/// Insert a `<style>` element overriding stroke and number rendering.
pub fn inject_stroke_style(svg: &str, style: &StrokeStyle) -> String {
    let strokes = format!(
        "g[id^='kvg:StrokePaths_']{{stroke:{} !important;stroke-width:{}px !important;}}",
        style.stroke_color, style.stroke_width
    );
    let numbers = if style.show_numbers {
        format!(
            "g[id^='kvg:StrokeNumbers_']{{fill:{} !important;font-size:12px !important;}}",
            style.number_color
        )
    } else {
        "g[id^='kvg:StrokeNumbers_']{display:none !important;}".to_string()
    };
    let style_tag = format!("<style>{} {}</style>", strokes, numbers);

    match svg.rfind("</svg>") {
        Some(end) => format!("{}{}{}", &svg[..end], style_tag, &svg[end..]),
        None => format!("{}{}", style_tag, svg),
    }
}

fn replace_all(pattern: &str, text: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(text, replacement).into_owned(),
        Err(_) => text.to_string(),
    }
}
