use hexweave::prelude::*;

fn two_colors() -> Vec<Rgba> {
    vec![Rgba::opaque(200.0, 30.0, 30.0), Rgba::opaque(30.0, 30.0, 200.0)]
}

fn all_grids() -> [GridType; 3] {
    [GridType::Hexagons, GridType::Triangles, GridType::Voronoi]
}

fn scene_for(grid: GridType) -> Scene {
    Scene::new()
        .with_canvas_size(240, 160)
        .with_grid(grid)
        .with_cell_size(4.0)
        .with_variance(40.0)
        .with_seed("integration")
        .with_jitter(20.0, 10.0, 10.0)
        .with_noise2_strength(0.3)
}

#[test]
fn test_generation_is_deterministic() {
    for grid in all_grids() {
        let scene = scene_for(grid);
        let first = generate(&scene, None);
        let second = generate(&scene, None);
        assert!(!first.is_empty(), "{grid:?} produced nothing");
        assert_eq!(first, second);
    }
}

#[test]
fn test_different_seeds_change_the_result() {
    let a = generate(&scene_for(GridType::Voronoi), None);
    let b = generate(&scene_for(GridType::Voronoi).with_seed(7u64), None);
    assert_ne!(a, b);
}

#[test]
fn test_buffer_lengths_match_layout() {
    for grid in all_grids() {
        let buffer = generate(&scene_for(grid), None);
        let count = buffer.polygon_count();
        assert_eq!(buffer.fill_colors().len(), 4 * count);

        match buffer.layout() {
            VertexLayout::FixedStride { stride } => {
                assert_eq!(buffer.vertices().len(), count * stride);
            }
            VertexLayout::LengthPrefixed => assert_eq!(grid, GridType::Voronoi),
        }
        assert!(buffer.check_layout().is_ok());
    }
}

#[test]
fn test_voronoi_walk_consumes_whole_buffer() {
    let buffer = generate(&scene_for(GridType::Voronoi), None);
    assert_eq!(buffer.layout(), VertexLayout::LengthPrefixed);

    let mut walk = buffer.polygons();
    let mut walked = 0;
    for polygon in walk.by_ref() {
        assert!(polygon.vertex_count() >= 3);
        walked += 1;
    }
    assert_eq!(walk.vertices_consumed(), buffer.vertices().len());
    assert_eq!(walked, buffer.fill_colors().len() / 4);
}

#[test]
fn test_concrete_triangle_scenario() {
    let palette = two_colors();
    let scene = Scene::new()
        .with_canvas_size(200, 200)
        .with_grid(GridType::Triangles)
        .with_cell_size(10.0)
        .with_variance(0.0)
        .with_palette(palette.clone())
        .with_gradient(false)
        .with_noise("diagonal")
        .with_zoom(10.0)
        .with_seed("test")
        .with_noise2_strength(0.0)
        .with_jitter(0.0, 0.0, 0.0);
    assert_eq!(scene.cell_counts(), (4, 4));

    let buffer = generate(&scene, None);
    // 5x5 Gitterpunkte ohne Eckpunkte, zwei Dreiecke pro Quadrat
    assert_eq!(buffer.polygon_count(), 2 * 4 * 4);

    let expected: Vec<[f32; 3]> = palette
        .iter()
        .map(|c| {
            let hsl = c.to_hsla();
            [hsl.h as f32, hsl.s as f32, hsl.l as f32]
        })
        .collect();

    for polygon in buffer.polygons() {
        assert_eq!(polygon.color.a, 1.0);
        let hsl = [
            polygon.color.h as f32,
            polygon.color.s as f32,
            polygon.color.l as f32,
        ];
        assert!(expected.contains(&hsl), "unexpected color {hsl:?}");
        for p in polygon.points() {
            assert!((0.0..=200.0).contains(&p.x) && (0.0..=200.0).contains(&p.y));
        }
    }
}

#[test]
fn test_empty_palette_gives_empty_buffer() {
    for grid in all_grids() {
        let scene = scene_for(grid).with_palette(Vec::new());
        let buffer = generate(&scene, None);
        assert!(buffer.is_empty());
        assert!(buffer.vertices().is_empty());
        assert!(buffer.fill_colors().is_empty());
        assert_eq!(buffer.grid_type(), grid);
        assert_eq!(buffer.canvas_size(), CanvasSize::new(240, 160));
    }
}

#[test]
fn test_invalid_expression_gives_empty_buffer() {
    let scene = scene_for(GridType::Hexagons)
        .with_noise("custom")
        .with_custom_fn("sin(x +");
    assert!(generate(&scene, None).is_empty());

    let scene = scene_for(GridType::Hexagons)
        .with_noise("custom")
        .with_custom_fn("undefined_fn(x)");
    assert!(generate(&scene, None).is_empty());
}

#[test]
fn test_custom_expression_renders() {
    let scene = scene_for(GridType::Triangles)
        .with_noise("custom")
        .with_custom_fn("sin(x * 3) * cos(y * 3)");
    let buffer = generate(&scene, None);
    assert!(!buffer.is_empty());
}

#[test]
fn test_sparse_hex_grid_uses_multiples() {
    let sparse = 3;
    let scene = scene_for(GridType::Hexagons).with_sparse(sparse);
    let grid = scene.hex_grid();
    let cells = grid.cells();
    assert!(!cells.is_empty());
    for cell in &cells {
        assert_eq!(cell.axial.q % sparse as i32, 0);
        assert_eq!(cell.axial.r % sparse as i32, 0);
    }

    let dense = generate(&scene_for(GridType::Hexagons), None);
    let thinned = generate(&scene, None);
    assert_eq!(thinned.polygon_count(), cells.len());
    assert!(thinned.polygon_count() < dense.polygon_count());
}

#[test]
fn test_scene_json_drives_generation() {
    let json = r##"{
        "canvasSize": { "width": 120, "height": 90 },
        "grid": { "type": "voronoi" },
        "noise": { "seed": "json", "baseNoise": { "id": "circle" } },
        "colors": { "palette": ["#ff0000", "#00ff00", "#0000ff"], "isGradient": true }
    }"##;
    let scene: Scene = serde_json::from_str(json).unwrap();
    let buffer = generate(&scene, None);
    assert_eq!(buffer.grid_type(), GridType::Voronoi);
    assert_eq!(buffer, generate(&scene, None));
    assert!(!buffer.is_empty());
}

#[test]
fn test_long_expression_chain_gives_empty_buffer() {
    for op in ["+", "*"] {
        let scene = Scene::new()
            .with_canvas_size(40, 40)
            .with_noise("custom")
            .with_custom_fn(vec!["x"; 20_000].join(op));
        let buffer = generate(&scene, None);
        assert!(buffer.is_empty());
        assert_eq!(buffer.grid_type(), GridType::Hexagons);
    }
}

#[test]
fn test_tiny_cell_size_gives_empty_buffer() {
    for grid in all_grids() {
        let scene = Scene::new()
            .with_canvas_size(1000, 1000)
            .with_grid(grid)
            .with_cell_size(0.0008);
        let buffer = generate(&scene, None);
        assert!(buffer.is_empty());
        assert_eq!(buffer.grid_type(), grid);
    }
}

#[test]
fn test_zero_sized_canvas_gives_empty_buffer() {
    for grid in all_grids() {
        for canvas in [CanvasSize::new(0, 120), CanvasSize::new(120, 0)] {
            let scene = scene_for(grid).with_canvas_size(canvas.width, canvas.height);
            let buffer = generate(&scene, None);
            assert!(buffer.is_empty());
            assert!(buffer.vertices().is_empty());
            assert!(buffer.fill_colors().is_empty());
            assert_eq!(buffer.polygons().count(), 0);
            assert!(buffer.check_layout().is_ok());
            assert_eq!(buffer.grid_type(), grid);
            assert_eq!(buffer.canvas_size(), canvas);
        }
    }
}
