//! Closing recommendations.

use super::BlockWriter;

pub fn write(w: &mut BlockWriter<'_>, conclusion: &str) {
    w.paragraph(conclusion);
}

pub fn text(conclusion: &str) -> String {
    format!("{}\n", conclusion)
}
