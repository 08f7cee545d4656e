//! Render host for native windows

use medscene_core::RenderHost;

/// A desktop window standing in for the page container
///
/// Any container id resolves to the window; native builds always have a
/// GPU backend available to Bevy.
#[derive(Debug, Clone, Copy)]
pub struct NativeHost {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Default for NativeHost {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            scale_factor: 1.0,
        }
    }
}

impl RenderHost for NativeHost {
    fn container_size(&self, _id: &str) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }

    fn supports_rendering(&self) -> bool {
        true
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.scale_factor
    }
}
