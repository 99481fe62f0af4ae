//! Stateless pagination over the active generation.
//!
//! A [`PageView`] is fully determined by the token list, the offset, the
//! show-all mode and the two settings; nothing is cached between renders.

use crate::error::{NumsiftError, Result};
use crate::session::SessionSettings;

/// Above this many tokens the "show all" affordance is offered even when the
/// owner has not enabled it.
pub const AUTO_SHOW_ALL_THRESHOLD: usize = 49;

/// One rendered page of the active list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Visible slice, in list order
    pub items: Vec<String>,
    /// 0-indexed offset this view was computed for (after clamping)
    pub offset: usize,
    /// Whether the view ignores `per_page` for its length
    pub show_all: bool,
    /// 1-indexed inclusive display bounds
    pub start: usize,
    pub end: usize,
    pub total: usize,
    /// 1-indexed page number and page count, measured in `per_page` steps
    pub page: usize,
    pub pages: usize,
    /// Offset targets for the navigation buttons
    pub prev_offset: Option<usize>,
    pub next_offset: Option<usize>,
    /// Whether to offer switching into show-all mode
    pub offer_show_all: bool,
}

/// Computes the page of `tokens` starting at `offset`.
///
/// Offsets at or past the end are clamped to the start of the last page.
///
/// # Errors
///
/// Returns [`NumsiftError::NoData`] when `tokens` is empty.
pub fn render_page(
    tokens: &[String],
    offset: usize,
    show_all: bool,
    settings: &SessionSettings,
) -> Result<PageView> {
    let total = tokens.len();
    if total == 0 {
        return Err(NumsiftError::no_data());
    }
    let per_page = settings.per_page.max(1);
    let pages = (total - 1) / per_page + 1;
    let offset = offset.min((pages - 1) * per_page);

    let limit = if show_all { total } else { per_page };
    let end = (offset + limit).min(total);
    let page = offset / per_page + 1;

    let prev_offset = (offset > 0).then(|| offset.saturating_sub(per_page));
    let next_offset = (offset + limit < total).then_some(offset + per_page);
    let offer_show_all =
        !show_all && (settings.show_all_enabled || total > AUTO_SHOW_ALL_THRESHOLD);

    Ok(PageView {
        items: tokens[offset..end].to_vec(),
        offset,
        show_all,
        start: offset + 1,
        end,
        total,
        page,
        pages,
        prev_offset,
        next_offset,
        offer_show_all,
    })
}

/// Counts shown in the main menu header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub total: usize,
    pub with_plus: usize,
    pub without_plus: usize,
}

impl ListSummary {
    pub fn of(tokens: &[String]) -> Self {
        let with_plus = tokens.iter().filter(|t| t.starts_with('+')).count();
        Self {
            total: tokens.len(),
            with_plus,
            without_plus: tokens.len() - with_plus,
        }
    }
}
