//! Quantized progress bar shared by status replies and reminders.

/// Number of glyph slots in a rendered bar.
pub const BAR_SLOTS: i64 = 10;

const FILLED: &str = "█";
const EMPTY: &str = "░";

/// Render a fixed-width bar: `floor(completed / total * 10)` filled glyphs
/// followed by empty ones. A zero total renders an empty bar. Monotonic in
/// `completed`.
pub fn progress_bar(completed: i64, total: i64) -> String {
    let filled = if total > 0 {
        (completed * BAR_SLOTS / total).clamp(0, BAR_SLOTS)
    } else {
        0
    };
    let mut bar = String::with_capacity(BAR_SLOTS as usize * FILLED.len());
    for _ in 0..filled {
        bar.push_str(FILLED);
    }
    for _ in filled..BAR_SLOTS {
        bar.push_str(EMPTY);
    }
    bar
}
