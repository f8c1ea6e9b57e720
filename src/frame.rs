// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; width as usize * height as usize],
            blank,
        }
    }

    pub fn clear_with_bg(&mut self, bg: Option<Color>) {
        self.blank = Cell::blank_with_bg(bg);
        self.cells.fill(self.blank);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn index_f(&self, col: f32, row: f32) -> Option<(u16, u16)> {
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (x, y) = (col as u32, row as u32);
        if x >= self.width as u32 || y >= self.height as u32 {
            return None;
        }
        Some((x as u16, y as u16))
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(self.blank)
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn put(&mut self, x: u16, y: u16, ch: char, fg: Option<Color>, bold: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = self.cells[i].overlay(ch, fg, bold);
        }
    }

    pub fn fill_rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, cell: Cell) {
        let x1 = x1.min(self.width.saturating_sub(1));
        let y1 = y1.min(self.height.saturating_sub(1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, cell);
            }
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Option<Color>, bg: Option<Color>) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = x.checked_add(i as u16) else {
                break;
            };
            if cx >= self.width {
                break;
            }
            self.set(
                cx,
                y,
                Cell {
                    ch,
                    fg,
                    bg,
                    bold: true,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_with_bg_makes_cells_blank() {
        let mut f = Frame::new(2, 2, None);
        f.put(0, 0, 'x', None, false);
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear_with_bg(Some(Color::Blue));
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
        assert_eq!(f.get(0, 0).unwrap().bg, Some(Color::Blue));
    }

    #[test]
    fn put_keeps_background() {
        let mut f = Frame::new(3, 1, Some(Color::Green));
        f.put(1, 0, '|', Some(Color::White), false);
        let c = f.get(1, 0).unwrap();
        assert_eq!((c.ch, c.fg, c.bg), ('|', Some(Color::White), Some(Color::Green)));
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut f = Frame::new(4, 1, None);
        f.put_str(2, 0, "rain", None, None);
        assert_eq!(f.get(2, 0).unwrap().ch, 'r');
        assert_eq!(f.get(3, 0).unwrap().ch, 'a');
        assert!(f.get(4, 0).is_none());
    }

    #[test]
    fn index_f_rejects_off_grid_and_nan() {
        let f = Frame::new(10, 5, None);
        assert_eq!(f.index_f(3.7, 4.2), Some((3, 4)));
        assert_eq!(f.index_f(-0.1, 1.0), None);
        assert_eq!(f.index_f(10.0, 1.0), None);
        assert_eq!(f.index_f(f32::NAN, 1.0), None);
    }
}
