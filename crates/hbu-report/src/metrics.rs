//! Helvetica glyph metrics and line wrapping.
//!
//! Widths are the standard AFM advance widths (1/1000 em) of the base-14
//! Helvetica face, which Helvetica-Oblique shares. Characters outside
//! printable ASCII are measured with the width of a digit.

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

const DEFAULT_WIDTH: u16 = 556;

/// Advance widths for `' '..='~'`.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Rendered width of `text` in millimetres at `size_pt`.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    units as f32 / 1000.0 * size_pt / PT_PER_MM
}

/// Break `text` into lines no wider than `max_width` millimetres.
///
/// Hard line breaks are kept. Words are packed greedily; a single word wider
/// than the line is broken between characters. Always returns at least one
/// line, which may be empty.
pub fn split_text_to_size(text: &str, max_width: f32, size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            if text_width(word, size_pt) > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                for c in word.chars() {
                    let mut candidate = current.clone();
                    candidate.push(c);
                    if !current.is_empty() && text_width(&candidate, size_pt) > max_width {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = candidate;
                    }
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if text_width(&candidate, size_pt) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_widths() {
        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278 units
        let w = text_width("Hello", 10.0);
        assert!((w - 2.278 * 10.0 / PT_PER_MM).abs() < 1e-4);
        assert_eq!(text_width("", 12.0), 0.0);
        assert_eq!(glyph_width('W'), 944);
        assert_eq!(glyph_width('~'), 584);
        assert_eq!(glyph_width('é'), DEFAULT_WIDTH);
    }

    #[test]
    fn test_split_keeps_hard_breaks() {
        let lines = split_text_to_size("first\nsecond\n\nfourth", 170.0, 9.0);
        assert_eq!(lines, vec!["first", "second", "", "fourth"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(split_text_to_size("", 170.0, 9.0), vec![String::new()]);
    }

    #[test]
    fn test_long_word_breaks_between_characters() {
        let word = "x".repeat(200);
        let lines = split_text_to_size(&word, 20.0, 9.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert!(lines.iter().all(|l| text_width(l, 9.0) <= 20.0));
    }

    #[test]
    fn test_greedy_packing() {
        let text = "alpha beta gamma delta epsilon";
        let width = text_width("alpha beta gamma", 9.0) + 0.01;
        let lines = split_text_to_size(text, width, 9.0);
        assert_eq!(lines, vec!["alpha beta gamma", "delta epsilon"]);
    }

    proptest! {
        #[test]
        fn prop_lines_fit_and_keep_words(
            words in proptest::collection::vec("[a-zA-Z0-9,.%]{1,14}", 0..60),
            width in 45.0f32..170.0,
        ) {
            let text = words.join(" ");
            let lines = split_text_to_size(&text, width, 9.0);
            prop_assert!(!lines.is_empty());
            for line in &lines {
                prop_assert!(text_width(line, 9.0) <= width + 1e-3);
            }
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).filter(|w| !w.is_empty()).collect();
            prop_assert_eq!(rejoined.join(" "), text);
        }
    }
}
