use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use lyon::math::{Point, point};
use lyon::path::Polygon;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, TessellationError,
    VertexBuffers,
};

use super::canvas::{DrawCommand, DrawList, Layer};
use crate::common::projection::ScreenPoint;

pub const DEFAULT_TOLERANCE: f32 = 0.25;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub layer: i32,
}

pub type Mesh = VertexBuffers<GpuVertex, u32>;

struct WithStyle {
    color: Vec4,
    layer: Layer,
}

impl FillVertexConstructor<GpuVertex> for WithStyle {
    fn new_vertex(&mut self, vertex: FillVertex) -> GpuVertex {
        GpuVertex {
            position: vertex.position().to_array(),
            color: self.color.into(),
            layer: self.layer as i32,
        }
    }
}

impl StrokeVertexConstructor<GpuVertex> for WithStyle {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> GpuVertex {
        GpuVertex {
            position: vertex.position().to_array(),
            color: self.color.into(),
            layer: self.layer as i32,
        }
    }
}

fn to_point(screen: ScreenPoint) -> Point {
    point(screen.x as f32, screen.y as f32)
}

/// Turns a recorded frame into indexed triangles, keeping the command order
/// so later layers overdraw earlier ones.
pub fn tessellate(list: &DrawList, tolerance: f32) -> Result<Mesh, TessellationError> {
    let mut mesh = Mesh::new();
    let mut fill = FillTessellator::new();
    let mut stroke = StrokeTessellator::new();
    let fill_options = FillOptions::tolerance(tolerance);

    for command in list.commands() {
        match command {
            DrawCommand::Clear => mesh.clear(),
            &DrawCommand::FillCircle {
                layer,
                center,
                radius,
                color,
            } => {
                fill.tessellate_circle(
                    to_point(center),
                    radius as f32,
                    &fill_options,
                    &mut BuffersBuilder::new(&mut mesh, WithStyle { color, layer }),
                )?;
            }
            &DrawCommand::StrokeCircle {
                layer,
                center,
                radius,
                width,
                color,
            } => {
                stroke.tessellate_circle(
                    to_point(center),
                    radius as f32,
                    &StrokeOptions::tolerance(tolerance).with_line_width(width as f32),
                    &mut BuffersBuilder::new(&mut mesh, WithStyle { color, layer }),
                )?;
            }
            DrawCommand::StrokePolyline {
                layer,
                points,
                width,
                color,
            } => {
                let points = points.iter().copied().map(to_point).collect::<Vec<_>>();
                stroke.tessellate_polygon(
                    Polygon {
                        points: &points,
                        closed: false,
                    },
                    &StrokeOptions::tolerance(tolerance).with_line_width(*width as f32),
                    &mut BuffersBuilder::new(
                        &mut mesh,
                        WithStyle {
                            color: *color,
                            layer: *layer,
                        },
                    ),
                )?;
            }
            DrawCommand::FillPolygon {
                layer,
                points,
                color,
            } => {
                let points = points.iter().copied().map(to_point).collect::<Vec<_>>();
                fill.tessellate_polygon(
                    Polygon {
                        points: &points,
                        closed: true,
                    },
                    &fill_options,
                    &mut BuffersBuilder::new(
                        &mut mesh,
                        WithStyle {
                            color: *color,
                            layer: *layer,
                        },
                    ),
                )?;
            }
        }
    }

    log::trace!(
        "Tessellated {} commands into {} vertices, {} indices",
        list.len(),
        mesh.vertices.len(),
        mesh.indices.len()
    );
    Ok(mesh)
}
