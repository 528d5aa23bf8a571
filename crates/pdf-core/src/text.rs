//! Text rendering utilities

use crate::document::Color;

/// Standard 14 fonts used for burned-in text
///
/// These are referenced by name only; every conforming viewer provides them,
/// so nothing is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written to the font dictionary's BaseFont
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used in page content streams
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "FbHelv",
            StandardFont::HelveticaBold => "FbHelvB",
        }
    }
}

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "FbHelv")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
}

/// Encode text as WinAnsiEncoding bytes
///
/// Characters without a WinAnsi code point become `?`; tabs become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Generate PDF operators for one line of text
///
/// Creates the text operators (BT, rg, Tf, Td, Tj, ET) that draw `encoded`
/// with its baseline starting at `(x, y)`.
///
/// # Arguments
/// * `encoded` - WinAnsi-encoded text bytes
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Baseline Y coordinate in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
pub fn generate_text_operators(encoded: &[u8], x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("BT\n");

    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));

    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));

    ops.push_str(&format!("{x} {y} Td\n"));

    // Hex strings need no escaping of parentheses or backslashes
    ops.push('<');
    for byte in encoded {
        ops.push_str(&format!("{byte:02X}"));
    }
    ops.push_str("> Tj\n");

    ops.push_str("ET\n");

    ops.into_bytes()
}
