//! Rasterizes the menu panels onto the shared CPU surface.
//!
//! Geometry is a fixed layout centered on the surface; the functional
//! contract is that the selection arrow sits on the selected row and the
//! panel is only drawn while the app is paused (the caller gates that).

use crate::controller::menu::{Menu, MenuMode};
use crate::view::raster::Surface;

/// Per-frame clear color. The red channel matches the legacy fill; alpha 0
/// lets the scene shader show through everywhere the menu did not paint.
pub const CLEAR_COLOR: [u8; 4] = [255, 0, 0, 0];

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const TEXT_SCALE: u32 = 4;

// Row baselines relative to the panel top. The tall panels share the first
// four; the debug panel uses the short triple.
const ROWS_TALL: [i32; 4] = [150, 200, 285, 335];
const ROWS_SHORT: [i32; 3] = [150, 200, 250];
const TITLE_ROW: i32 = 75;

// Settings columns relative to the panel text origin.
const VALUE_COLUMN: i32 = 475;
const ARROW_LEFT_COLUMN: i32 = 400;
const ARROW_RIGHT_COLUMN: i32 = 540;

pub fn draw_menu(surface: &mut Surface, menu: &Menu) {
    match menu.mode {
        MenuMode::Pause => draw_pause(surface, menu),
        MenuMode::Settings => draw_settings(surface, menu),
        MenuMode::Debug => draw_debug(surface, menu),
    }
}

/// Top-left corner of the panel text origin and the panel box.
fn panel_base(surface: &Surface, panel_h: i32) -> (i32, i32) {
    let base_x = surface.width() as i32 / 2 - 400 + 75;
    let base_y = surface.height() as i32 / 2 - panel_h / 2;
    (base_x, base_y)
}

fn draw_panel(surface: &mut Surface, panel_h: i32) {
    let (base_x, base_y) = panel_base(surface, panel_h);
    surface.fill_rect(base_x - 75, base_y, 800, panel_h as u32, BLACK);
    surface.stroke_rect(
        surface.width() as i32 / 2 - 396,
        surface.height() as i32 / 2 - (panel_h / 2 - 4),
        792,
        panel_h as u32 - 8,
        2,
        WHITE,
    );
}

/// Small triangular indicator centered on (cx, cy), pointing right or left.
fn draw_arrow(surface: &mut Surface, cx: i32, cy: i32, right: bool) {
    let tip = if right { cx + 6 } else { cx - 6 };
    surface.fill_triangle([[cx, cy + 5], [cx, cy - 5], [tip, cy]], WHITE);
}

fn draw_title(surface: &mut Surface, base_y: i32, title: &str) {
    let x = surface.width() as i32 / 2 - Surface::text_width(title, TEXT_SCALE) as i32 / 2;
    let y = base_y + TITLE_ROW - Surface::text_height(TEXT_SCALE) as i32 / 2;
    surface.draw_text(title, x, y, TEXT_SCALE, WHITE);
}

fn draw_row(surface: &mut Surface, base_x: i32, base_y: i32, row: i32, label: &str) {
    let y = base_y + row - Surface::text_height(TEXT_SCALE) as i32 / 2;
    surface.draw_text(label, base_x, y, TEXT_SCALE, WHITE);
}

/// Value text centered on the settings value column.
fn draw_value(surface: &mut Surface, base_x: i32, base_y: i32, row: i32, value: &str) {
    let x = base_x + VALUE_COLUMN - Surface::text_width(value, TEXT_SCALE) as i32 / 2;
    let y = base_y + row - Surface::text_height(TEXT_SCALE) as i32 / 2;
    surface.draw_text(value, x, y, TEXT_SCALE, WHITE);
}

fn draw_selection_arrow(surface: &mut Surface, base_x: i32, base_y: i32, rows: &[i32], sel: usize) {
    draw_arrow(surface, base_x - 24, base_y + rows[sel], true);
}

fn draw_pause(surface: &mut Surface, menu: &Menu) {
    let panel_h = 450;
    let (base_x, base_y) = panel_base(surface, panel_h);
    draw_panel(surface, panel_h);
    draw_selection_arrow(surface, base_x, base_y, &ROWS_TALL, menu.selection);
    draw_title(surface, base_y, "- PAUSED -");

    for (row, label) in ROWS_TALL.iter().zip(["Resume", "Settings", "Debug", "Exit"]) {
        draw_row(surface, base_x, base_y, *row, label);
    }
}

fn draw_settings(surface: &mut Surface, menu: &Menu) {
    let panel_h = 450;
    let (base_x, base_y) = panel_base(surface, panel_h);
    draw_panel(surface, panel_h);
    draw_selection_arrow(surface, base_x, base_y, &ROWS_TALL, menu.selection);
    draw_title(surface, base_y, "- SETTINGS -");

    let values = [
        menu.store.quality.label().to_string(),
        format!("{:.1}", menu.store.fps_cap),
        format!("{:.1}", menu.store.sensitivity as f32 / 10.0),
        format!("{:.1}", menu.store.fov as f32 / 10.0),
    ];
    let labels = ["Quality", "FPS Max", "Sensitivity", "FOV"];

    for ((row, label), value) in ROWS_TALL.iter().zip(labels).zip(&values) {
        draw_row(surface, base_x, base_y, *row, label);
        draw_value(surface, base_x, base_y, *row, value);
        draw_arrow(surface, base_x + ARROW_RIGHT_COLUMN, base_y + *row, true);
        draw_arrow(surface, base_x + ARROW_LEFT_COLUMN, base_y + *row, false);
    }
}

fn draw_debug(surface: &mut Surface, menu: &Menu) {
    let panel_h = 350;
    let (base_x, base_y) = panel_base(surface, panel_h);
    draw_panel(surface, panel_h);
    draw_selection_arrow(surface, base_x, base_y, &ROWS_SHORT, menu.selection);
    draw_title(surface, base_y, "- DEBUG -");

    for (row, label) in ROWS_SHORT.iter().zip(["Reset Player", "Spawn Enemy", "Kill All"]) {
        draw_row(surface, base_x, base_y, *row, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::menu::Menu;

    fn pixel(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * surface.width() + x) * 4) as usize;
        let p = &surface.pixels()[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }

    #[test]
    fn every_mode_draws_a_bordered_panel() {
        for mode in [MenuMode::Pause, MenuMode::Settings, MenuMode::Debug] {
            let mut surface = Surface::new(1600, 900);
            surface.fill(CLEAR_COLOR);
            let mut menu = Menu::new();
            menu.mode = mode;
            draw_menu(&mut surface, &menu);
            // Top edge of the white border for a 450-tall panel sits at
            // y = 450 - 221 = 229; the debug panel's at y = 450 - 171 = 279.
            let y = if mode == MenuMode::Debug { 279 } else { 229 };
            assert_eq!(pixel(&surface, 800, y), WHITE, "border missing for {mode:?}");
        }
    }

    #[test]
    fn selection_arrow_tracks_the_selected_row() {
        // base_x = 475, base_y = 225 on a 1600x900 surface; the arrow body
        // sits just right of its center column at x = 451.
        let mut menu = Menu::new();

        let mut first = Surface::new(1600, 900);
        first.fill(CLEAR_COLOR);
        draw_menu(&mut first, &menu);
        assert_eq!(pixel(&first, 452, 375), WHITE);

        menu.selection = 1;
        let mut second = Surface::new(1600, 900);
        second.fill(CLEAR_COLOR);
        draw_menu(&mut second, &menu);
        assert_eq!(pixel(&second, 452, 425), WHITE);
        assert_ne!(pixel(&second, 452, 375), WHITE, "old row keeps no arrow");
    }

    #[test]
    fn settings_rows_carry_left_and_right_arrows() {
        let mut surface = Surface::new(1600, 900);
        surface.fill(CLEAR_COLOR);
        let mut menu = Menu::new();
        menu.mode = MenuMode::Settings;
        draw_menu(&mut surface, &menu);
        // Right arrow center for the first row: (475 + 540, 225 + 150).
        assert_eq!(pixel(&surface, 1016, 375), WHITE);
        // Left arrow points away from the value column.
        assert_eq!(pixel(&surface, 874, 375), WHITE);
    }
}
