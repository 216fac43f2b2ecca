//! Block layout for paginated documents.
//!
//! A report is described as an ordered list of [`Block`]s. Laying it out is a
//! fold: each block consumes a [`LayoutState`] and yields the next one. Before
//! a block that reserves `h` millimetres is placed, the page-break check runs:
//! if the cursor lies below `bottom - h`, a new page is opened and the cursor
//! returns to the top margin. Block contents are never split across pages;
//! wrapped paragraphs are emitted one block per line.

use crate::config::PageGeometry;
use crate::format::Rgb;
use tracing::trace;

pub const BLACK: Rgb = (0, 0, 0);

/// Font face of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

/// One drawing instruction. `y` is relative to the block's top while the
/// block is being built, and absolute (from the page top) once placed.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`.
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontStyle,
        size: f32,
        color: Rgb,
    },
    /// Filled rectangle with its top-left corner at `(x, y)`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Rgb,
    },
}

impl DrawOp {
    pub fn text(x: f32, y: f32, text: impl Into<String>, font: FontStyle, size: f32) -> Self {
        DrawOp::Text {
            x,
            y,
            text: text.into(),
            font,
            size,
            color: BLACK,
        }
    }

    pub fn colored(mut self, rgb: Rgb) -> Self {
        if let DrawOp::Text { color, .. } = &mut self {
            *color = rgb;
        }
        self
    }

    fn shifted(&self, dy: f32) -> Self {
        match self {
            DrawOp::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => DrawOp::Text {
                x: *x,
                y: y + dy,
                text: text.clone(),
                font: *font,
                size: *size,
                color: *color,
            },
            DrawOp::Rect { x, y, w, h, fill } => DrawOp::Rect {
                x: *x,
                y: y + dy,
                w: *w,
                h: *h,
                fill: *fill,
            },
        }
    }
}

/// What a block represents, for inspection and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    PropertyLine,
    SectionHeader,
    SubHeader,
    TextLine,
    Callout,
    ScenarioCard,
    MetricRow,
    TableHeader,
    TableRow,
    RiskItem,
    Spacer,
}

/// A unit of layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Height that must fit below the cursor; `None` skips the page-break
    /// check.
    pub reserve: Option<f32>,
    /// Cursor advance after the block.
    pub advance: f32,
    pub ops: Vec<DrawOp>,
}

impl Block {
    pub fn new(kind: BlockKind, reserve: f32, advance: f32, ops: Vec<DrawOp>) -> Self {
        Self {
            kind,
            reserve: Some(reserve),
            advance,
            ops,
        }
    }

    /// Vertical gap with no break check.
    pub fn spacer(advance: f32) -> Self {
        Self {
            kind: BlockKind::Spacer,
            reserve: None,
            advance,
            ops: Vec::new(),
        }
    }
}

/// Position of the layout cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// Zero-based page index.
    pub page: usize,
    /// Distance from the page top in millimetres.
    pub cursor: f32,
}

impl LayoutState {
    pub fn start(geometry: &PageGeometry) -> Self {
        Self {
            page: 0,
            cursor: geometry.margin,
        }
    }

    /// Run the page-break check for a block needing `needed` millimetres.
    pub fn ensure(self, needed: f32, geometry: &PageGeometry) -> Self {
        if self.cursor > geometry.bottom - needed {
            Self {
                page: self.page + 1,
                cursor: geometry.margin,
            }
        } else {
            self
        }
    }

    pub fn advance(self, by: f32) -> Self {
        Self {
            page: self.page,
            cursor: self.cursor + by,
        }
    }
}

/// Where a checked block ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlock {
    pub page: usize,
    pub top: f32,
    pub height: f32,
    pub kind: BlockKind,
}

/// Absolute drawing instructions of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Result of laying out a block list.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub placed: Vec<PlacedBlock>,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out `blocks` top to bottom over as many pages as needed.
pub fn layout(blocks: &[Block], geometry: &PageGeometry) -> Layout {
    let mut pages = vec![Page::default()];
    let mut placed = Vec::new();

    let end = blocks
        .iter()
        .fold(LayoutState::start(geometry), |state, block| {
            let state = match block.reserve {
                Some(needed) => {
                    let next = state.ensure(needed, geometry);
                    placed.push(PlacedBlock {
                        page: next.page,
                        top: next.cursor,
                        height: needed,
                        kind: block.kind,
                    });
                    next
                }
                None => state,
            };

            while pages.len() <= state.page {
                pages.push(Page::default());
            }
            pages[state.page]
                .ops
                .extend(block.ops.iter().map(|op| op.shifted(state.cursor)));

            state.advance(block.advance)
        });

    trace!(
        pages = pages.len(),
        blocks = blocks.len(),
        final_cursor = end.cursor,
        "layout complete"
    );

    Layout { pages, placed }
}
