//! macroquad window loops for the interactive tools
//!
//! The loops only poll input, drive the session state and blit the finished
//! buffer. All drawing happens in the software pipeline before the blit.

use macroquad::prelude::{
    clear_background, draw_texture, is_key_pressed, is_mouse_button_pressed, mouse_position,
    next_frame, Conf, FilterMode, KeyCode, MouseButton, Texture2D, BLACK, WHITE,
};

use crate::app::{BezierSession, TriangleViewer, ROTATE_STEP};
use crate::output::to_rgba8;
use crate::rasterizer::Vec2;
use crate::VERSION;

pub fn window_conf(title: &str, width: usize, height: usize) -> Conf {
    Conf {
        window_title: format!("{} - tinyraster v{}", title, VERSION),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: false,
        // Mouse coordinates must match canvas pixels 1:1
        high_dpi: false,
        ..Default::default()
    }
}

fn blit(width: usize, height: usize, rgba: &[u8]) {
    let texture = Texture2D::from_rgba8(width as u16, height as u16, rgba);
    texture.set_filter(FilterMode::Nearest);
    clear_background(BLACK);
    draw_texture(&texture, 0.0, 0.0, WHITE);
}

/// A/D rotate the model, Escape quits
pub async fn run_viewer(mut viewer: TriangleViewer) {
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::A) {
            viewer.rotate(ROTATE_STEP);
        } else if is_key_pressed(KeyCode::D) {
            viewer.rotate(-ROTATE_STEP);
        }

        if let Err(e) = viewer.render() {
            log::error!("draw failed: {}", e);
            break;
        }

        let r = viewer.rasterizer();
        blit(r.width(), r.height(), &to_rgba8(r.frame_buffer()));
        log::debug!("frame count: {} (angle {:.0})", viewer.frame_count(), viewer.angle());

        next_frame().await;
    }
}

/// Left click appends a control point, Escape quits
pub async fn run_bezier(mut session: BezierSession) {
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            session.add_point(Vec2::new(x, y));
        }

        if let Err(e) = session.redraw() {
            log::error!("curve failed: {}", e);
            break;
        }
        if let Err(e) = session.save_if_changed() {
            log::warn!("could not save curve: {}", e);
        }

        let canvas = session.canvas();
        blit(canvas.width, canvas.height, &canvas.pixels);

        next_frame().await;
    }
}
