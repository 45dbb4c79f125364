use std::path::Path;

use bsp2d::{BspError, Heuristic};
use bsp2d_viz::{
    Scene, SceneConfig, TreeNavigator, WorldView, draw_debug_segments, draw_shape,
    draw_shape_outline, draw_sight,
};
use log::{error, info, warn};
use macroquad::prelude::*;
use nalgebra::Point2;

fn load_config() -> SceneConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SceneConfig::default();
    };
    match SceneConfig::load(Path::new(&path)) {
        Ok(config) => {
            info!("Loaded scene config from {path}");
            config
        }
        Err(err) => {
            warn!("{err}; using default scene config");
            SceneConfig::default()
        }
    }
}

fn report(action: &str, result: Result<(), BspError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("{action} failed, keeping the previous tree: {err}");
            false
        }
    }
}

#[macroquad::main("BSP Visibility")]
async fn main() {
    env_logger::init();

    let config = load_config();
    let mut scene = match Scene::generate(config.clone()) {
        Ok(scene) => scene,
        Err(err) => {
            warn!("Initial build failed: {err}; starting from an empty scene");
            let empty = SceneConfig {
                shape_count: 0,
                ..config
            };
            match Scene::generate(empty) {
                Ok(scene) => scene,
                Err(err) => {
                    error!("Cannot build even an empty scene: {err}");
                    return;
                }
            }
        }
    };

    let mut navigator = TreeNavigator::new();
    let half_length = config.build.debug_half_length;
    let mut segments = scene.tree().debug_segments_with_half_length(half_length);
    let mut show_debug = true;
    let mut ray_start = Point2::new(10.0, 10.0);
    let mut ray_end = Point2::new(config.world_width - 10.0, config.world_height - 10.0);

    loop {
        let view = WorldView::fit(
            config.world_width,
            config.world_height,
            vec2(screen_width(), screen_height()),
            20.0,
        );

        let rebuilt = if is_key_pressed(KeyCode::R) {
            report("Random rebuild", scene.rebuild(Heuristic::Random))
        } else if is_key_pressed(KeyCode::S) {
            report("Score rebuild", scene.rebuild(Heuristic::Score))
        } else if is_key_pressed(KeyCode::N) {
            report("New scene", scene.regenerate())
        } else {
            false
        };
        if rebuilt {
            navigator.reset();
            segments = scene.tree().debug_segments_with_half_length(half_length);
        }
        if is_key_pressed(KeyCode::D) {
            show_debug = !show_debug;
        }
        navigator.update(scene.tree());

        let (mx, my) = mouse_position();
        let mouse = view.to_world(vec2(mx, my));
        if is_mouse_button_down(MouseButton::Left) {
            ray_start = mouse;
        }
        if is_mouse_button_down(MouseButton::Right) {
            ray_end = mouse;
        }
        let hovered = scene.shape_at(mouse);
        let sight = scene.tree().can_see(ray_start, ray_end);

        clear_background(Color::from_rgba(20, 20, 28, 255));

        let origin = view.to_screen(Point2::new(0.0, 0.0));
        let world_max = Point2::new(config.world_width, config.world_height);
        let corner = view.to_screen(world_max);
        draw_rectangle_lines(
            origin.x,
            corner.y,
            corner.x - origin.x,
            origin.y - corner.y,
            1.0,
            DARKGRAY,
        );

        for shape in scene.shapes() {
            draw_shape(shape, &view);
        }
        if let Some(index) = hovered {
            draw_shape_outline(&scene.shapes()[index], &view, WHITE);
        }
        if show_debug {
            draw_debug_segments(&segments, &view);
            navigator.draw_selection(&segments, &view);
        }
        draw_sight(ray_start, ray_end, &sight, &view);

        draw_text(
            &format!(
                "{:?} heuristic | visible: {} | [R]andom [S]core [N]ew [D]ebug",
                scene.heuristic(),
                sight.visible
            ),
            10.0,
            24.0,
            20.0,
            WHITE,
        );
        navigator.draw_ui(scene.tree(), 50.0);

        next_frame().await
    }
}
