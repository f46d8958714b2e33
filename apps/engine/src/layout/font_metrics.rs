//! Static font-metric tables for the seven supported résumé fonts.
//!
//! Character widths are in em units (relative to font size). Static tables
//! are an intentional approximation of real glyph metrics: they catch the
//! line breaks that matter for block heights while tolerating ±1–2% error
//! per line, which the blocks' own bottom margins absorb.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Non-ASCII falls back to an average width.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font ids
// ────────────────────────────────────────────────────────────────────────────

/// The supported font families, matching the editor's font picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontId {
    /// Default humanist sans-serif.
    Inter,
    Roboto,
    OpenSans,
    Lato,
    /// Serif set.
    Merriweather,
    Playfair,
    Lora,
}

impl FontId {
    /// Parses a wire id ("open-sans", "lora", ...), falling back to Inter.
    pub fn parse_or_default(id: &str) -> Self {
        match id {
            "roboto" => FontId::Roboto,
            "open-sans" | "opensans" => FontId::OpenSans,
            "lato" => FontId::Lato,
            "merriweather" => FontId::Merriweather,
            "playfair" => FontId::Playfair,
            "lora" => FontId::Lora,
            _ => FontId::Inter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontId::Inter => "inter",
            FontId::Roboto => "roboto",
            FontId::OpenSans => "open-sans",
            FontId::Lato => "lato",
            FontId::Merriweather => "merriweather",
            FontId::Playfair => "playfair",
            FontId::Lora => "lora",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em units, covering
/// 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    pub font: FontId,
    widths: [f32; 95],
    /// Fallback width for codepoints outside the printable ASCII range.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Measures the rendered width of a string in px at `font_size_px`.
    pub fn measure_str_px(&self, s: &str, font_size_px: f32) -> f32 {
        self.measure_str(s) * font_size_px
    }

    /// Number of printed lines this text occupies when greedily word-wrapped
    /// into a column `max_width_px` wide at `font_size_px`. Empty text is 0.
    pub fn wrapped_line_count(&self, s: &str, max_width_px: f32, font_size_px: f32) -> usize {
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.is_empty() {
            return 0;
        }
        let max_width_em = max_width_px / font_size_px;

        let mut line_count = 1usize;
        let mut current_width = 0.0_f32;
        let mut first = true;

        for word in &words {
            let word_w = self.measure_str(word);
            let space_w = if first { 0.0 } else { self.space_width };

            if !first && current_width + space_w + word_w > max_width_em {
                line_count += 1;
                current_width = word_w;
            } else {
                current_width += space_w + word_w;
                first = false;
            }
        }
        line_count
    }
}

/// Returns the static metric table for a font.
pub fn get_metrics(font: FontId) -> &'static FontMetricTable {
    match font {
        FontId::Inter => &INTER_TABLE,
        FontId::Roboto => &ROBOTO_TABLE,
        FontId::OpenSans => &OPEN_SANS_TABLE,
        FontId::Lato => &LATO_TABLE,
        FontId::Merriweather => &MERRIWEATHER_TABLE,
        FontId::Playfair => &PLAYFAIR_TABLE,
        FontId::Lora => &LORA_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Inter — the default sans-serif.
static INTER_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Inter,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Roboto — grotesque sans-serif, a touch narrower than Inter.
static ROBOTO_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Roboto,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.29, 0.37, 0.55, 0.55, 0.87, 0.66, 0.22, 0.32, 0.32, 0.38, 0.58, 0.27, 0.32, 0.27, 0.30,
        // 0     1     2     3     4     5     6     7     8     9
        0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.55,
        // :     ;     <     =     >     ?     @
        0.27, 0.27, 0.58, 0.58, 0.58, 0.49, 1.00,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.66, 0.60, 0.60, 0.66, 0.55, 0.49, 0.66, 0.66, 0.25, 0.38, 0.60, 0.52, 0.76,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.66, 0.71, 0.55, 0.71, 0.60, 0.49, 0.55, 0.66, 0.66, 0.87, 0.60, 0.60, 0.55,
        // [     \     ]     ^     _     `
        0.27, 0.30, 0.27, 0.46, 0.55, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.55, 0.55, 0.49, 0.55, 0.55, 0.30, 0.55, 0.55, 0.22, 0.22, 0.52, 0.22, 0.81,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.55, 0.55, 0.55, 0.55, 0.32, 0.43, 0.38, 0.55, 0.49, 0.71, 0.49, 0.49, 0.43,
        // {     |     }     ~
        0.32, 0.25, 0.32, 0.58,
    ],
    average_char_width: 0.51,
    space_width: 0.25,
};

/// Open Sans — humanist sans-serif, slightly wide.
static OPEN_SANS_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::OpenSans,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.26, 0.31, 0.39, 0.58, 0.58, 0.92, 0.69, 0.23, 0.34, 0.34, 0.40, 0.61, 0.29, 0.34, 0.29, 0.32,
        // 0     1     2     3     4     5     6     7     8     9
        0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58,
        // :     ;     <     =     >     ?     @
        0.29, 0.29, 0.61, 0.61, 0.61, 0.52, 1.05,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.69, 0.63, 0.63, 0.69, 0.58, 0.52, 0.69, 0.69, 0.26, 0.40, 0.63, 0.55, 0.80,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.69, 0.74, 0.58, 0.74, 0.63, 0.52, 0.58, 0.69, 0.69, 0.92, 0.63, 0.63, 0.58,
        // [     \     ]     ^     _     `
        0.29, 0.32, 0.29, 0.48, 0.58, 0.35,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.58, 0.58, 0.52, 0.58, 0.58, 0.32, 0.58, 0.58, 0.23, 0.23, 0.55, 0.23, 0.85,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.58, 0.58, 0.58, 0.58, 0.34, 0.45, 0.40, 0.58, 0.52, 0.74, 0.52, 0.52, 0.45,
        // {     |     }     ~
        0.34, 0.27, 0.34, 0.61,
    ],
    average_char_width: 0.54,
    space_width: 0.26,
};

/// Lato — geometric humanist sans-serif, the widest of the sans set.
static LATO_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Lato,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.26, 0.32, 0.40, 0.59, 0.59, 0.94, 0.70, 0.23, 0.35, 0.35, 0.41, 0.62, 0.29, 0.35, 0.29, 0.33,
        // 0     1     2     3     4     5     6     7     8     9
        0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59,
        // :     ;     <     =     >     ?     @
        0.29, 0.29, 0.62, 0.62, 0.62, 0.53, 1.07,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.70, 0.64, 0.64, 0.70, 0.59, 0.53, 0.70, 0.70, 0.26, 0.41, 0.64, 0.56, 0.82,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.70, 0.76, 0.59, 0.76, 0.64, 0.53, 0.59, 0.70, 0.70, 0.94, 0.64, 0.64, 0.59,
        // [     \     ]     ^     _     `
        0.29, 0.33, 0.29, 0.49, 0.59, 0.36,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.59, 0.59, 0.53, 0.59, 0.59, 0.33, 0.59, 0.59, 0.23, 0.23, 0.56, 0.23, 0.87,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.59, 0.59, 0.59, 0.59, 0.35, 0.46, 0.41, 0.59, 0.53, 0.76, 0.53, 0.53, 0.46,
        // {     |     }     ~
        0.35, 0.27, 0.35, 0.62,
    ],
    average_char_width: 0.55,
    space_width: 0.26,
};

/// Merriweather — sturdy text serif, the widest family overall.
static MERRIWEATHER_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Merriweather,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.27, 0.32, 0.41, 0.60, 0.60, 0.96, 0.72, 0.24, 0.36, 0.36, 0.42, 0.64, 0.30, 0.36, 0.30, 0.33,
        // 0     1     2     3     4     5     6     7     8     9
        0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60,
        // :     ;     <     =     >     ?     @
        0.30, 0.30, 0.64, 0.64, 0.64, 0.54, 1.10,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.72, 0.66, 0.66, 0.72, 0.60, 0.54, 0.72, 0.72, 0.27, 0.42, 0.66, 0.57, 0.84,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.78, 0.60, 0.78, 0.66, 0.54, 0.60, 0.72, 0.72, 0.96, 0.66, 0.66, 0.60,
        // [     \     ]     ^     _     `
        0.30, 0.33, 0.30, 0.51, 0.60, 0.37,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.60, 0.60, 0.54, 0.60, 0.60, 0.33, 0.60, 0.60, 0.24, 0.24, 0.57, 0.24, 0.90,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.60, 0.60, 0.60, 0.60, 0.36, 0.48, 0.42, 0.60, 0.54, 0.78, 0.54, 0.54, 0.48,
        // {     |     }     ~
        0.36, 0.28, 0.36, 0.64,
    ],
    average_char_width: 0.56,
    space_width: 0.27,
};

/// Playfair Display — high-contrast display serif.
static PLAYFAIR_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Playfair,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.24, 0.29, 0.36, 0.54, 0.54, 0.85, 0.64, 0.21, 0.32, 0.32, 0.37, 0.57, 0.27, 0.32, 0.27, 0.30,
        // 0     1     2     3     4     5     6     7     8     9
        0.54, 0.54, 0.54, 0.54, 0.54, 0.54, 0.54, 0.54, 0.54, 0.54,
        // :     ;     <     =     >     ?     @
        0.27, 0.27, 0.57, 0.57, 0.57, 0.48, 0.98,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.64, 0.59, 0.59, 0.64, 0.54, 0.48, 0.64, 0.64, 0.24, 0.37, 0.59, 0.51, 0.75,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.64, 0.69, 0.54, 0.69, 0.59, 0.48, 0.54, 0.64, 0.64, 0.85, 0.59, 0.59, 0.54,
        // [     \     ]     ^     _     `
        0.27, 0.30, 0.27, 0.45, 0.54, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.54, 0.54, 0.48, 0.54, 0.54, 0.30, 0.54, 0.54, 0.21, 0.21, 0.51, 0.21, 0.80,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.54, 0.54, 0.54, 0.54, 0.32, 0.42, 0.37, 0.54, 0.48, 0.69, 0.48, 0.48, 0.42,
        // {     |     }     ~
        0.32, 0.25, 0.32, 0.57,
    ],
    average_char_width: 0.50,
    space_width: 0.24,
};

/// Lora — contemporary text serif, close to Inter in set width.
static LORA_TABLE: FontMetricTable = FontMetricTable {
    font: FontId::Lora,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.57, 0.57, 0.90, 0.68, 0.22, 0.33, 0.33, 0.39, 0.60, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.57, 0.57, 0.57, 0.57, 0.57, 0.57, 0.57, 0.57, 0.57, 0.57,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.60, 0.60, 0.60, 0.51, 1.03,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.68, 0.62, 0.62, 0.68, 0.57, 0.51, 0.68, 0.68, 0.25, 0.39, 0.62, 0.54, 0.79,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.68, 0.73, 0.57, 0.73, 0.62, 0.51, 0.57, 0.68, 0.68, 0.90, 0.62, 0.62, 0.57,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.57, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.57, 0.57, 0.51, 0.57, 0.57, 0.31, 0.57, 0.57, 0.22, 0.22, 0.54, 0.22, 0.84,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.57, 0.57, 0.57, 0.57, 0.33, 0.44, 0.39, 0.57, 0.51, 0.73, 0.51, 0.51, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.60,
    ],
    average_char_width: 0.53,
    space_width: 0.25,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontId::Inter);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontId::Inter);
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = metrics.measure_str("Rust");
        assert!(
            (width - 2.00).abs() < 1e-3,
            "Rust width should be ~2.00, got {width}"
        );
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(FontId::Inter);
        let width = metrics.measure_str("é");
        assert!(
            (width - metrics.average_char_width).abs() < 1e-4,
            "non-ASCII should use average_char_width"
        );
    }

    #[test]
    fn test_measure_str_px_scales_with_font_size() {
        let metrics = get_metrics(FontId::Inter);
        let at_14 = metrics.measure_str_px("Engineer", 14.0);
        let at_28 = metrics.measure_str_px("Engineer", 28.0);
        assert!((at_28 - 2.0 * at_14).abs() < 1e-3);
    }

    #[test]
    fn test_wrapped_line_count_empty_is_zero() {
        let metrics = get_metrics(FontId::Inter);
        assert_eq!(metrics.wrapped_line_count("", 400.0, 14.0), 0);
    }

    #[test]
    fn test_wrapped_line_count_single_word_is_one() {
        let metrics = get_metrics(FontId::Inter);
        assert_eq!(metrics.wrapped_line_count("Rust", 400.0, 14.0), 1);
    }

    #[test]
    fn test_wrapped_line_count_grows_when_column_shrinks() {
        let metrics = get_metrics(FontId::Inter);
        let text = "Coordinated migration of a monolith into twelve services \
                    while keeping release cadence weekly and error budgets intact";
        let wide = metrics.wrapped_line_count(text, 500.0, 14.0);
        let narrow = metrics.wrapped_line_count(text, 250.0, 14.0);
        assert!(
            narrow > wide,
            "narrower column should wrap to more lines ({narrow} vs {wide})"
        );
    }

    #[test]
    fn test_all_seven_fonts_accessible() {
        for font in [
            FontId::Inter,
            FontId::Roboto,
            FontId::OpenSans,
            FontId::Lato,
            FontId::Merriweather,
            FontId::Playfair,
            FontId::Lora,
        ] {
            assert_eq!(get_metrics(font).font, font);
        }
    }

    #[test]
    fn test_serif_wider_than_default_sans() {
        let text = "Implemented distributed caching layer";
        let inter = get_metrics(FontId::Inter).measure_str(text);
        let merriweather = get_metrics(FontId::Merriweather).measure_str(text);
        assert!(
            merriweather > inter,
            "Merriweather should set wider than Inter"
        );
    }

    #[test]
    fn test_parse_or_default_unknown_is_inter() {
        assert_eq!(FontId::parse_or_default("comic-sans"), FontId::Inter);
        assert_eq!(FontId::parse_or_default("open-sans"), FontId::OpenSans);
    }
}
