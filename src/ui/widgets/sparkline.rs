//! Temperature sparkline widget for the hourly window

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing temperatures over the hourly window
///
/// Values are scaled between the lowest and highest temperature shown, so a
/// flat day renders as a flat line. Each value can be stretched over several
/// cells and separated by blank cells to line up with the hourly columns.
pub struct TemperatureSparkline<'a> {
    temperatures: &'a [f64],
    min: f64,
    max: f64,
    /// Cells per value
    cell_width: u16,
    /// Blank cells between values
    spacing: u16,
    /// Highlighted index (the current hour)
    marker: Option<usize>,
    style: Style,
    marker_style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(temperatures: &'a [f64]) -> Self {
        let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            temperatures,
            min,
            max,
            cell_width: 1,
            spacing: 0,
            marker: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn cell_width(mut self, width: u16) -> Self {
        self.cell_width = width.max(1);
        self
    }

    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn marker(mut self, index: usize) -> Self {
        self.marker = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn temperature_to_block(&self, temperature: f64) -> char {
        let range = self.max - self.min;
        if !range.is_finite() || range <= f64::EPSILON {
            return BLOCKS[3];
        }
        let normalized = ((temperature - self.min) / range).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let stride = self.cell_width + self.spacing;
        let columns = ((area.width + self.spacing) / stride) as usize;

        for (i, temperature) in self.temperatures.iter().take(columns).enumerate() {
            let block = self.temperature_to_block(*temperature);
            let style = if self.marker == Some(i) {
                self.marker_style
            } else {
                self.style
            };

            let start = area.x + i as u16 * stride;
            for x in start..start + self.cell_width {
                if let Some(cell) = buf.cell_mut((x, area.y)) {
                    cell.set_char(block).set_style(style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_map_to_lowest_and_highest_block() {
        let temps = [4.0, 12.0, 20.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(4.0), '▁');
        assert_eq!(sparkline.temperature_to_block(20.0), '█');
    }

    #[test]
    fn test_flat_series_is_mid_height() {
        let temps = [15.0, 15.0, 15.0];
        let sparkline = TemperatureSparkline::new(&temps);
        assert_eq!(sparkline.temperature_to_block(15.0), '▄');
    }

    #[test]
    fn test_empty_series_does_not_panic() {
        let sparkline = TemperatureSparkline::new(&[]);
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        sparkline.render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some(" "));
    }

    #[test]
    fn test_render_stretches_cells() {
        let temps = [0.0, 10.0];
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        TemperatureSparkline::new(&temps)
            .cell_width(2)
            .marker(1)
            .render(area, &mut buf);

        let symbols: String = (0..4)
            .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert_eq!(symbols, "▁▁██");
        assert_eq!(buf.cell((3, 0)).map(|c| c.fg), Some(Color::Yellow));
    }

    #[test]
    fn test_render_leaves_spacing_blank() {
        let temps = [0.0, 10.0];
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        TemperatureSparkline::new(&temps)
            .cell_width(2)
            .spacing(1)
            .render(area, &mut buf);

        let symbols: String = (0..5)
            .filter_map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert_eq!(symbols, "▁▁ ██");
    }

    #[test]
    fn test_render_truncates_to_width() {
        let temps = [1.0, 2.0, 3.0, 4.0, 5.0];
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        TemperatureSparkline::new(&temps).render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() != " "));
    }
}
