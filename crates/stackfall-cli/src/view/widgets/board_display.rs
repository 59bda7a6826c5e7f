use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use stackfall_engine::Board;

use super::BlockDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_size(self.board.cols(), BlockDisplay::WIDTH)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        grid_size(self.board.rows(), BlockDisplay::HEIGHT)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

/// Terminal cells spanned by `n` blocks of `unit` cells, saturating at `u16::MAX`.
fn grid_size(n: usize, unit: u16) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX).saturating_mul(unit)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (row, cells) in (0_u16..).zip(self.board.row_cells()) {
            for (col, cell) in (0_u16..).zip(cells) {
                let cell_area = Rect::new(
                    area.x.saturating_add(col.saturating_mul(BlockDisplay::WIDTH)),
                    area.y.saturating_add(row.saturating_mul(BlockDisplay::HEIGHT)),
                    BlockDisplay::WIDTH,
                    BlockDisplay::HEIGHT,
                )
                .intersection(area);
                if cell_area.is_empty() {
                    continue;
                }
                BlockDisplay::from_cell(*cell).render(cell_area, buf);
            }
        }
    }
}
