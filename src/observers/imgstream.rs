use plotters::prelude::*;
use std::{error::Error, fs, path::Path, sync::mpsc};
use tracing::debug;

use crate::sim::state::SimulationState;

/// Pixels per cell side
const CELL_PX: u32 = 64;

/// Arrow length in cells for a unit velocity
const ARROW_SCALE: f32 = 0.4;

#[derive(Clone)]
pub struct DisplayPacket {
    pub state: SimulationState,
    pub i: usize,
}

/// Shade for a pressure value normalized to `[-1, 1]`: blue below zero,
/// red above, white at zero.
fn pressure_color(normalized: f32) -> RGBColor {
    let fade = 255 - (255.0 * normalized.abs().min(1.)).floor() as u8;
    if normalized < 0. {
        RGBColor(fade, fade, 255)
    } else {
        RGBColor(255, fade, fade)
    }
}

/// Arrow shaft and head segments from `from` along `(dx, dy)` pixels
fn arrow_segments(from: (i32, i32), dx: f32, dy: f32) -> Vec<[(i32, i32); 2]> {
    let tip = (from.0 + dx.round() as i32, from.1 + dy.round() as i32);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1. {
        return vec![];
    }

    let (ux, uy) = (dx / len, dy / len);
    let head = (len * 0.3).min(8.);
    let wing = |sign: f32| {
        (
            tip.0 - (head * (ux + sign * 0.5 * uy)).round() as i32,
            tip.1 - (head * (uy - sign * 0.5 * ux)).round() as i32,
        )
    };

    vec![[from, tip], [tip, wing(1.)], [tip, wing(-1.)]]
}

/// Render a grid to a PNG: cells shaded by pressure, one arrow per interior
/// face scaled by its velocity.
pub fn image_save(
    state: &SimulationState,
    filename: &str,
    frames_dir: &Path,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let n = state.size();
    let side = n as u32 * CELL_PX;
    let cell = CELL_PX as f32;

    let filename = frames_dir.join(filename);

    let root = BitMapBackend::new(&filename, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_p = state.pressure.amax();
    let scale = if max_p > 0. { 1. / max_p } else { 0. };

    for row in 0..n {
        for col in 0..n {
            let x0 = (col as u32 * CELL_PX) as i32;
            let y0 = (row as u32 * CELL_PX) as i32;
            let color = pressure_color(state.pressure[(row, col)] * scale);

            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL_PX as i32, y0 + CELL_PX as i32)],
                color.filled(),
            ))?;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL_PX as i32, y0 + CELL_PX as i32)],
                RGBColor(200, 200, 200),
            ))?;
        }
    }

    let mut segments = Vec::new();
    for row in 0..n {
        for col in 1..n {
            let from = ((col as f32 * cell) as i32, ((row as f32 + 0.5) * cell) as i32);
            let u = state.horizontal[(row, col)];
            segments.extend(arrow_segments(from, u * ARROW_SCALE * cell, 0.));
        }
    }
    for row in 1..n {
        for col in 0..n {
            let from = (((col as f32 + 0.5) * cell) as i32, (row as f32 * cell) as i32);
            let v = state.vertical[(row, col)];
            segments.extend(arrow_segments(from, 0., v * ARROW_SCALE * cell));
        }
    }

    for [a, b] in segments {
        root.draw(&PathElement::new(vec![a, b], BLACK.stroke_width(2)))?;
    }

    root.present()?;

    Ok(())
}

/// Write every inbound snapshot as `<i>.png` until the sender hangs up.
pub fn image_io_loop(
    inbound: mpsc::Receiver<DisplayPacket>,
    frames_dir: &Path,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if frames_dir.exists() {
        fs::remove_dir_all(frames_dir)?;
    }
    fs::create_dir_all(frames_dir)?;

    // recv fails only once the solver has dropped its sender
    while let Ok(packet) = inbound.recv() {
        image_save(&packet.state, format!("{}.png", packet.i).as_str(), frames_dir)?;
    }

    debug!("Image writer finished");

    Ok(())
}
