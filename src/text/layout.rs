use std::borrow::Cow;

use crate::foundation::error::{RetouchError, RetouchResult};
use crate::text::measure::TextMeasure;

/// Separates paragraphs in layout input.
pub const PARAGRAPH_SEPARATOR: char = '\n';
/// Separates words within a paragraph.
pub const WORD_SEPARATOR: char = ' ';

/// Result of splitting an over-wide word at character boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordSplit {
    /// Chunks that are complete lines, in order.
    pub chunks: Vec<String>,
    /// Trailing characters that may still share a line with the next word.
    pub remainder: Option<String>,
}

/// Checked access to a [`TextMeasure`] against a fixed width.
struct Fitter<'m, M: ?Sized> {
    measure: &'m mut M,
    max_width: f64,
}

impl<M: TextMeasure + ?Sized> Fitter<'_, M> {
    fn width(&mut self, text: &str) -> RetouchResult<f64> {
        let w = self.measure.measure(text);
        if !w.is_finite() || w < 0.0 {
            return Err(RetouchError::invalid_measurement(text, w));
        }
        Ok(w)
    }

    fn fits(&mut self, text: &str) -> RetouchResult<bool> {
        Ok(self.width(text)? <= self.max_width)
    }

    fn split_word(&mut self, word: &str) -> RetouchResult<WordSplit> {
        let mut chunks = Vec::new();
        let mut buf = String::new();
        for ch in word.chars() {
            buf.push(ch);
            if !self.fits(&buf)? && buf.chars().nth(1).is_some() {
                buf.pop();
                chunks.push(std::mem::take(&mut buf));
                buf.push(ch);
            }
        }
        Ok(WordSplit {
            chunks,
            remainder: (!buf.is_empty()).then_some(buf),
        })
    }

    fn paragraph(&mut self, paragraph: &str, lines: &mut Vec<String>) -> RetouchResult<()> {
        let mut current: Vec<Cow<'_, str>> = Vec::new();

        for word in paragraph.split(WORD_SEPARATOR) {
            if self.fits(&join_line(&current, Some(word)))? {
                current.push(Cow::Borrowed(word));
                continue;
            }

            match current.len() {
                0 => {}
                1 => lines.push(join_line(&std::mem::take(&mut current), None)),
                _ => {
                    lines.push(join_line(&std::mem::take(&mut current), None));
                    if self.fits(word)? {
                        current.push(Cow::Borrowed(word));
                        continue;
                    }
                }
            }

            let split = self.split_word(word)?;
            lines.extend(split.chunks);
            // An empty word still stands for a separator and must stay on the line.
            current.push(split.remainder.map_or(Cow::Borrowed(word), Cow::Owned));
        }

        lines.push(join_line(&current, None));
        Ok(())
    }
}

/// Split `word` into chunks no wider than `max_width`.
///
/// Characters accumulate greedily; when the next one would overflow, the buffer so far becomes
/// a chunk and the character starts a new buffer. The final buffer is returned as the
/// remainder. No chunk is ever empty: a character that alone overflows is kept as a
/// one-character chunk.
pub fn split_word(
    word: &str,
    max_width: f64,
    measure: &mut (impl TextMeasure + ?Sized),
) -> RetouchResult<WordSplit> {
    check_max_width(max_width)?;
    Fitter { measure, max_width }.split_word(word)
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Paragraphs (split on `'\n'`) always start a new line. Within a paragraph, words (split on
/// `' '`) are packed greedily; a word too wide for any line is split at character boundaries.
/// The only line allowed to exceed `max_width` is a single character that is wider on its own.
#[tracing::instrument(skip(text, measure), fields(text_len = text.len()))]
pub fn layout(
    text: &str,
    max_width: f64,
    measure: &mut (impl TextMeasure + ?Sized),
) -> RetouchResult<Vec<String>> {
    check_max_width(max_width)?;
    let mut fitter = Fitter { measure, max_width };
    let mut lines = Vec::new();
    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        fitter.paragraph(paragraph, &mut lines)?;
    }
    tracing::debug!(lines = lines.len(), "text laid out");
    Ok(lines)
}

fn check_max_width(max_width: f64) -> RetouchResult<()> {
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(RetouchError::validation(format!(
            "max_width must be finite and > 0, got {max_width}"
        )));
    }
    Ok(())
}

fn join_line(words: &[Cow<'_, str>], next: Option<&str>) -> String {
    let mut out = String::new();
    for (i, w) in words.iter().map(|w| &**w).chain(next).enumerate() {
        if i > 0 {
            out.push(WORD_SEPARATOR);
        }
        out.push_str(w);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
