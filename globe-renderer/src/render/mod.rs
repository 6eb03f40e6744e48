pub mod base_map;
pub mod canvas;
pub mod color;
pub mod mesh;
pub mod render_loop;
pub mod scene;
