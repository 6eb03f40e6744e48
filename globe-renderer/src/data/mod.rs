pub mod globe_data;
pub mod scene_data;
pub mod suppliers;

use winit::dpi::PhysicalSize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl Size<u32> {
    pub fn to_f64(self) -> Size<f64> {
        Size {
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

impl<T> From<PhysicalSize<T>> for Size<T> {
    fn from(physical_size: PhysicalSize<T>) -> Self {
        Size {
            width: physical_size.width,
            height: physical_size.height,
        }
    }
}

impl<T> From<(T, T)> for Size<T> {
    fn from(value: (T, T)) -> Self {
        Size {
            width: value.0,
            height: value.1,
        }
    }
}
