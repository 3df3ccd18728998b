// File: src/services/plotting/charts.rs
use crate::error::{AppError, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1200, 600);
const PANEL_SIZE: (u32, u32) = (1200, 800);

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Именованная линия графика
pub struct Line<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
    pub color: RGBColor,
}

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Plot(e.to_string())
}

/// Разбивает ряд на непрерывные участки без NaN; x это номер строки
fn segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        if value.is_finite() {
            current.push((i as f64, *value));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Диапазон оси Y по конечным значениям всех линий с небольшим запасом
fn value_range(lines: &[Line<'_>]) -> Range<f64> {
    let (min, max) = lines
        .iter()
        .flat_map(|line| line.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

fn x_range(rows: usize) -> Range<f64> {
    0.0..(rows.saturating_sub(1).max(1) as f64)
}

/// Рисует линию по участкам; false, если в ряду нет ни одного значения
fn draw_line<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, line: &Line<'_>) -> Result<bool> {
    let color = line.color;
    let parts = segments(line.values);
    let drawn = !parts.is_empty();
    for (index, segment) in parts.into_iter().enumerate() {
        let series = chart
            .draw_series(LineSeries::new(segment, color.stroke_width(2)))
            .map_err(plot_err)?;
        if index == 0 {
            series.label(line.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
    }
    Ok(drawn)
}

fn draw_guide<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    rows: usize,
    level: f64,
    color: RGBColor,
) -> Result<()> {
    let x = x_range(rows);
    chart
        .draw_series(LineSeries::new(
            vec![(x.start, level), (x.end, level)],
            color.stroke_width(1),
        ))
        .map_err(plot_err)?;
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, any_drawn: bool) -> Result<()> {
    if !any_drawn {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()
        .map_err(plot_err)
}

fn build_chart<'a, DB: DrawingBackend + 'a>(
    area: &'a DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    rows: usize,
    y: Range<f64>,
) -> Result<Chart<'a, DB>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range(rows), y)
        .map_err(plot_err)?;
    chart.configure_mesh().draw().map_err(plot_err)?;
    Ok(chart)
}

/// Цена закрытия и скользящие средние на одном графике
pub fn draw_price_chart(path: &Path, title: &str, rows: usize, lines: &[Line<'_>]) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = build_chart(&root, title, rows, value_range(lines))?;
    let mut any_drawn = false;
    for line in lines {
        any_drawn |= draw_line(&mut chart, line)?;
    }
    draw_legend(&mut chart, any_drawn)?;

    root.present().map_err(plot_err)
}

/// Две панели: RSI с уровнями 30/70 сверху, MACD с сигнальной линией снизу
pub fn draw_momentum_chart(
    path: &Path,
    title: &str,
    rows: usize,
    rsi: &Line<'_>,
    macd: &[Line<'_>],
) -> Result<()> {
    let root = BitMapBackend::new(path, PANEL_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let panels = root.split_evenly((2, 1));
    let (upper, lower) = (&panels[0], &panels[1]);

    let mut rsi_chart = build_chart(upper, &format!("{} RSI", title), rows, 0.0..100.0)?;
    let rsi_drawn = draw_line(&mut rsi_chart, rsi)?;
    draw_guide(&mut rsi_chart, rows, RSI_OVERBOUGHT, RED)?;
    draw_guide(&mut rsi_chart, rows, RSI_OVERSOLD, GREEN)?;
    draw_legend(&mut rsi_chart, rsi_drawn)?;

    let mut macd_chart = build_chart(lower, &format!("{} MACD", title), rows, value_range(macd))?;
    let mut macd_drawn = false;
    for line in macd {
        macd_drawn |= draw_line(&mut macd_chart, line)?;
    }
    draw_legend(&mut macd_chart, macd_drawn)?;

    root.present().map_err(plot_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_segments_split_on_nan() {
        let parts = segments(&[f64::NAN, 1.0, 2.0, f64::NAN, f64::NAN, 3.0]);
        assert_eq!(parts, vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(5.0, 3.0)]]);
        assert!(segments(&[f64::NAN; 3]).is_empty());
    }

    #[test]
    fn test_value_range_pads_and_handles_gaps() {
        let values = [10.0, f64::NAN, 20.0];
        let range = value_range(&[Line { label: "x", values: &values, color: BLACK }]);
        assert!((range.start - 9.5).abs() < 1e-12);
        assert!((range.end - 20.5).abs() < 1e-12);

        let flat = [5.0, 5.0];
        let range = value_range(&[Line { label: "x", values: &flat, color: BLACK }]);
        assert_eq!(range, 4.0..6.0);

        let empty = [f64::NAN];
        assert_eq!(value_range(&[Line { label: "x", values: &empty, color: BLACK }]), 0.0..1.0);
    }

    #[test]
    fn test_draw_price_chart_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("close.png");
        let close: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let sma: Vec<f64> = (0..30)
            .map(|i| if i < 5 { f64::NAN } else { 99.0 + i as f64 })
            .collect();

        draw_price_chart(
            &path,
            "TEST",
            close.len(),
            &[
                Line { label: "Close", values: &close, color: BLACK },
                Line { label: "sma_21", values: &sma, color: BLUE },
            ],
        )
        .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
