//! Laying document content out onto fixed-size canvases.

use crate::cancel::CancellationToken;
use crate::canvas::{blank_page, TextPainter};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::orientation::Orientation;
use image::RgbImage;
use tracing::debug;

/// A cell's text at its drawing position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Everything drawn on one canvas.
pub type PagePlan = Vec<PlacedText>;

/// Lay a grid out row by row onto pages `page_height` pixels tall.
///
/// Cells go at a fixed column pitch and rows at a fixed row pitch. A page is
/// closed once the row cursor reaches `page_height - bottom_margin`. Long text
/// simply runs over its neighbours. A trailing page with nothing on it is not
/// emitted.
pub fn layout_grid(grid: &Grid, layout: &LayoutConfig, page_height: u32) -> Vec<PagePlan> {
    let limit = page_height.saturating_sub(layout.bottom_margin);
    let mut pages = Vec::new();
    let mut current: PagePlan = Vec::new();
    let mut rows_on_page = 0usize;
    let mut y = layout.origin_y;

    for row in grid.rows() {
        let mut x = layout.origin_x;
        for cell in row {
            if !cell.is_empty() {
                current.push(PlacedText {
                    x,
                    y,
                    text: cell.to_string(),
                });
            }
            x += layout.column_pitch;
        }
        rows_on_page += 1;
        y += layout.row_pitch;

        if y >= limit {
            pages.push(std::mem::take(&mut current));
            rows_on_page = 0;
            y = layout.origin_y;
        }
    }

    if rows_on_page > 0 {
        pages.push(current);
    }
    pages
}

/// Turns grids, paragraphs and free text into page images.
pub struct Paginator {
    layout: LayoutConfig,
    painter: TextPainter,
}

impl Paginator {
    pub fn new(layout: LayoutConfig) -> Self {
        let painter = TextPainter::new(layout.font_path.as_deref(), layout.font_size);
        Self { layout, painter }
    }

    fn page_size(&self, orientation: Orientation) -> (u32, u32) {
        orientation.canvas_size(self.layout.canvas_width, self.layout.canvas_height)
    }

    /// Render a grid onto as many canvases as it needs.
    pub fn grid_pages(&mut self, grid: &Grid, orientation: Orientation) -> Vec<RgbImage> {
        let (width, height) = self.page_size(orientation);
        let plans = layout_grid(grid, &self.layout, height);
        debug!(
            "Grid of {} rows laid out on {} {:?} page(s)",
            grid.row_count(),
            plans.len(),
            orientation
        );

        plans
            .iter()
            .map(|plan| {
                let mut page = blank_page(width, height);
                for placed in plan {
                    self.painter
                        .draw(&mut page, placed.x as i32, placed.y as i32, &placed.text);
                }
                page
            })
            .collect()
    }

    /// One portrait canvas per paragraph; paragraphs are never split or merged.
    ///
    /// The token is checked before each paragraph.
    pub fn paragraph_pages(
        &mut self,
        paragraphs: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<RgbImage>> {
        let mut pages = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            token.check()?;
            pages.push(self.text_page(paragraph));
        }
        Ok(pages)
    }

    /// A single portrait canvas with `text` drawn at the origin.
    pub fn text_page(&mut self, text: &str) -> RgbImage {
        let (width, height) = self.page_size(Orientation::Portrait);
        let mut page = blank_page(width, height);
        self.painter.draw(
            &mut page,
            self.layout.origin_x as i32,
            self.layout.origin_y as i32,
            text,
        );
        page
    }
}
