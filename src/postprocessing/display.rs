/// Handles frame playback post-solve

use std::{
    error::Error,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use minifb::{Key, Window, WindowOptions};
use screen_size::get_primary_screen_size as get_screen_size;

/// Pick the frame to show at each video frame so playback runs at
/// simulated speed.
///
/// Parameters
/// - `temporal_map` - Simulated time of each saved frame, ascending
/// - `fps` - The desired *video* frames per second
///
/// Returns
/// - Frame indices, one per video frame
pub fn select_frames(temporal_map: &[f32], fps: usize) -> Vec<usize> {
    let Some(&elapsed_time) = temporal_map.last() else {
        return vec![];
    };

    let total_frames = ((elapsed_time * fps as f32).floor() as usize).max(1);

    (0..total_frames)
        .map(|k| {
            let t = k as f32 / fps as f32;
            temporal_map
                .iter()
                .position(|&f| f >= t)
                .unwrap_or(temporal_map.len() - 1)
        })
        .collect()
}

/// Open a window and loop the rendered frames until it is closed or
/// Escape is pressed.
///
/// Parameters
/// - `fps` - The desired *video* frames per second
/// - `temporal_map` - A vector with indices pointing to the time-value in that tick
/// - `frames_dir` - The directory that contains the frames (png images) to animate.
pub fn play_video(fps: usize, temporal_map: &[f32], frames_dir: &Path) -> Result<(), Box<dyn Error>> {
    let paths: Vec<PathBuf> = select_frames(temporal_map, fps)
        .into_iter()
        .map(|i| frames_dir.join(format!("{i}.png")))
        .filter(|p| p.exists())
        .collect();

    if paths.is_empty() {
        return Err("no PNG frames found".into());
    }

    let originals: Vec<DynamicImage> = paths.iter().map(image::open).collect::<Result<_, _>>()?;

    // start at half the screen width, keeping the frame aspect ratio
    let (w, h) = originals[0].dimensions();
    let (screen_w, _) =
        get_screen_size().map_err(|err| format!("Failed to get screen size: {err:?}"))?;
    let init_w = (screen_w as u64 / 2).max(w as u64);
    let init_h = (init_w as f32 * (h as f32 / w as f32)) as u64;

    let mut window = Window::new(
        "flowgrid",
        init_w as usize,
        init_h as usize,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;

    let frame_time = Duration::from_secs_f64(1.0 / fps as f64);
    let start = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let (win_w, win_h) = window.get_size();
        let elapsed = Instant::now().duration_since(start);
        let idx = ((elapsed.as_secs_f64() * fps as f64) as usize) % originals.len();

        let img = originals[idx]
            .resize_exact(win_w as u32, win_h as u32, FilterType::Nearest)
            .to_rgba8();

        let buffer: Vec<u32> = img
            .pixels()
            .map(|px| {
                ((px[3] as u32) << 24)
                    | ((px[0] as u32) << 16)
                    | ((px[1] as u32) << 8)
                    | (px[2] as u32)
            })
            .collect();

        window.update_with_buffer(&buffer, win_w, win_h)?;

        let next = start + frame_time * (idx + 1) as u32;
        if let Some(d) = next.checked_duration_since(Instant::now()) {
            std::thread::sleep(d);
        }
    }

    Ok(())
}
