//! Font faces and text measurement for the report renderer.
//!
//! The renderer only uses the PDF standard Helvetica family, so no font files
//! have to be shipped or located at runtime. Layout still needs to know how
//! wide a string is, which is what the advance-width tables in [`widths`] are
//! for.

mod widths;

/// Font faces available to the layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
}

impl FontFace {
    /// Returns the matching PDF standard font.
    pub fn builtin(self) -> printpdf::BuiltinFont {
        match self {
            FontFace::Regular => printpdf::BuiltinFont::Helvetica,
            FontFace::Bold => printpdf::BuiltinFont::HelveticaBold,
            FontFace::Italic => printpdf::BuiltinFont::HelveticaOblique,
        }
    }

    fn advance(self, ch: char) -> u16 {
        match self {
            // Oblique shares the upright advance widths.
            FontFace::Regular | FontFace::Italic => widths::helvetica(ch),
            FontFace::Bold => widths::helvetica_bold(ch),
        }
    }
}

const ELLIPSIS: &str = "...";

/// Width of `text` in points when set in `face` at `size` points.
pub fn text_width(text: &str, face: FontFace, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(face.advance(ch))).sum();
    f64::from(units) * size / 1000.0
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Words are packed greedily, explicit newlines always start a new line and a
/// single word wider than the line is split between characters. Empty input
/// yields one empty line so callers always have something to place.
pub fn wrap_text(text: &str, face: FontFace, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };

            if text_width(&candidate, face, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, face, size) <= max_width {
                current = word.to_owned();
            } else {
                let mut pieces = split_word(word, face, size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

fn split_word(word: &str, face: FontFace, size: f64, max_width: f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        current.push(ch);
        if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Shortens `text` with a trailing ellipsis until it fits into `max_width`.
pub fn truncate_to_width(text: &str, face: FontFace, size: f64, max_width: f64) -> String {
    let single_line = text.replace('\n', " ");
    if text_width(&single_line, face, size) <= max_width {
        return single_line;
    }

    let budget = max_width - text_width(ELLIPSIS, face, size);
    let mut kept = String::new();
    let mut width = 0.0;
    for ch in single_line.chars() {
        let advance = text_width(ch.encode_utf8(&mut [0; 4]), face, size);
        if width + advance > budget {
            break;
        }
        width += advance;
        kept.push(ch);
    }

    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_helvetica_widths() {
        // "Hi" = 722 + 222 units.
        let width = text_width("Hi", FontFace::Regular, 10.0);
        assert!((width - 9.44).abs() < 1e-9);
        assert!(text_width("Hi", FontFace::Bold, 10.0) > width);
        assert_eq!(text_width("", FontFace::Regular, 10.0), 0.0);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text(
            "concrete slab poured on level two",
            FontFace::Regular,
            10.0,
            80.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, FontFace::Regular, 10.0) <= 80.0);
        }
        assert_eq!(lines.join(" "), "concrete slab poured on level two");
    }

    #[test]
    fn wraps_explicit_newlines_and_long_words() {
        let lines = wrap_text("a\nb", FontFace::Regular, 10.0, 200.0);
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);

        let long = "x".repeat(60);
        let lines = wrap_text(&long, FontFace::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
    }

    #[test]
    fn empty_text_yields_single_line() {
        assert_eq!(
            wrap_text("", FontFace::Regular, 8.0, 100.0),
            vec![String::new()]
        );
    }

    #[test]
    fn truncates_with_ellipsis() {
        let text = "Excavator with hydraulic hammer attachment";
        let truncated = truncate_to_width(text, FontFace::Regular, 8.0, 60.0);
        assert!(truncated.ends_with("..."));
        assert!(text_width(&truncated, FontFace::Regular, 8.0) <= 60.0);
        assert_eq!(truncate_to_width("Crane", FontFace::Regular, 8.0, 60.0), "Crane");
    }
}
