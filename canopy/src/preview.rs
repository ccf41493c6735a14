//! Truncated previews of long row lists, for renderers that would rather show "first N and
//! M more" than every row. The graph itself always carries every row; this is purely a display
//! helper and there is no default cap.

#[derive(Debug, PartialEq)]
pub struct Preview<'a, T> {
    pub shown: &'a [T],
    pub hidden: usize,
}

impl<T> Preview<'_, T> {
    /// `"3 more items"` when anything was cut off.
    pub fn more_label(&self) -> Option<String> {
        match self.hidden {
            0 => None,
            1 => Some("1 more item".to_string()),
            n => Some(format!("{n} more items")),
        }
    }
}

/// Show at most `limit` rows; `None` shows everything.
pub fn preview_items<T>(items: &[T], limit: Option<usize>) -> Preview<'_, T> {
    let shown = limit.map_or(items.len(), |limit| limit.min(items.len()));
    Preview {
        shown: &items[..shown],
        hidden: items.len() - shown,
    }
}
