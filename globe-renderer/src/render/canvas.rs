use glam::Vec4;
use strum::{Display, EnumIter};

use crate::common::projection::ScreenPoint;

/// Draw order of a frame, back to front.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Layer {
    Sphere,
    Graticule,
    Landmass,
    Routes,
    Particles,
    Markers,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle {
        layer: Layer,
        center: ScreenPoint,
        radius: f64,
        color: Vec4,
    },
    StrokeCircle {
        layer: Layer,
        center: ScreenPoint,
        radius: f64,
        width: f64,
        color: Vec4,
    },
    StrokePolyline {
        layer: Layer,
        points: Vec<ScreenPoint>,
        width: f64,
        color: Vec4,
    },
    FillPolygon {
        layer: Layer,
        points: Vec<ScreenPoint>,
        color: Vec4,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> Option<Layer> {
        match self {
            DrawCommand::Clear => None,
            DrawCommand::FillCircle { layer, .. }
            | DrawCommand::StrokeCircle { layer, .. }
            | DrawCommand::StrokePolyline { layer, .. }
            | DrawCommand::FillPolygon { layer, .. } => Some(*layer),
        }
    }
}

/// The 2D drawing surface owned by the host.
pub trait Canvas {
    fn clear(&mut self);
    fn fill_circle(&mut self, layer: Layer, center: ScreenPoint, radius: f64, color: Vec4);
    fn stroke_circle(
        &mut self,
        layer: Layer,
        center: ScreenPoint,
        radius: f64,
        width: f64,
        color: Vec4,
    );
    fn stroke_polyline(&mut self, layer: Layer, points: &[ScreenPoint], width: f64, color: Vec4);
    fn fill_polygon(&mut self, layer: Layer, points: &[ScreenPoint], color: Vec4);
}

/// Canvas that records commands instead of rasterizing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(move |command| command.layer() == Some(layer))
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, layer: Layer, center: ScreenPoint, radius: f64, color: Vec4) {
        self.commands.push(DrawCommand::FillCircle {
            layer,
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(
        &mut self,
        layer: Layer,
        center: ScreenPoint,
        radius: f64,
        width: f64,
        color: Vec4,
    ) {
        self.commands.push(DrawCommand::StrokeCircle {
            layer,
            center,
            radius,
            width,
            color,
        });
    }

    fn stroke_polyline(&mut self, layer: Layer, points: &[ScreenPoint], width: f64, color: Vec4) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::StrokePolyline {
            layer,
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, layer: Layer, points: &[ScreenPoint], color: Vec4) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::FillPolygon {
            layer,
            points: points.to_vec(),
            color,
        });
    }
}
