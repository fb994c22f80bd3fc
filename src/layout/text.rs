use crate::rect::Rect;
use crate::units::Pt;

/// Anything that can report the rendered width of a run of text at a given
/// size. [`Font`](crate::Font) implements this with its glyph advance widths;
/// layouts only ever measure through this trait so the metrics backend can be
/// swapped out.
pub trait TextMeasure {
    fn measure(&self, text: &str, size: Pt) -> Pt;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        (**self).measure(text, size)
    }
}

/// Horizontal alignment of a line within a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Break `text` into lines no wider than `max_width` using greedy word wrap.
///
/// Words are split on any whitespace. Each word is appended to the current
/// line unless the candidate `current + " " + word` measures wider than
/// `max_width`, in which case the current line is flushed and the word starts
/// a new one. A single word wider than `max_width` is placed alone on its own
/// line and is never split, so such a line may overflow.
///
/// Empty or whitespace-only input yields no lines.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    size: Pt,
    max_width: Pt,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// The x coordinate at which a line of `line_width` starts so that it is
/// aligned within `bounds`
pub fn align_x(line_width: Pt, bounds: &Rect, align: Align) -> Pt {
    match align {
        Align::Left => bounds.x1,
        Align::Center => bounds.x1 + (bounds.width() - line_width) / 2.0,
        Align::Right => bounds.x2 - line_width,
    }
}

/// Find the largest size, stepping down from `size` by `step`, at which `text`
/// fits on one line of `max_width`, without going below `min_size`.
///
/// This is meant for single-line headings such as a name. Body text is laid
/// out at a fixed size and is never shrunk.
pub fn shrink_to_fit<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    size: Pt,
    min_size: Pt,
    step: Pt,
    max_width: Pt,
) -> Pt {
    let mut size = size;
    while size > min_size && measure.measure(text, size) > max_width {
        size = (size - step).max(min_size);
    }
    size
}
