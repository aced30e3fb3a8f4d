//! Per-pixel identifier target for click selection.
//!
//! Objects are drawn into an `R32Uint` texture with their pick id
//! (object index + 1); 0 is the cleared no-object sentinel. After a
//! click, the single texel under the cursor is copied out and mapped.

use super::RenderError;

pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;
const TEXEL_BYTES: u64 = 4;

pub struct PickTarget {
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    texture: wgpu::Texture,
    width: u32,
    height: u32,
}

impl PickTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pick texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICK_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pick depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: super::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pick readback buffer"),
            size: TEXEL_BYTES,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            readback,
            texture,
            width,
            height,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Queues a copy of the texel at (x, y) into the readback buffer.
    /// Coordinates are clamped to the target bounds.
    pub fn encode_readback(&self, encoder: &mut wgpu::CommandEncoder, x: u32, y: u32) {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: None,
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Maps the readback buffer and decodes the identifier. Call after
    /// the copy has been submitted.
    pub fn resolve(&self, device: &wgpu::Device) -> Result<Option<usize>, RenderError> {
        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::PickReadback(e.to_string()))?;
        rx.recv()
            .map_err(|_| RenderError::PickReadback("map callback dropped".to_string()))?
            .map_err(|e| RenderError::PickReadback(e.to_string()))?;

        let id = {
            let data = slice.get_mapped_range();
            u32::from_le_bytes([data[0], data[1], data[2], data[3]])
        };
        self.readback.unmap();
        Ok(decode_pick_id(id))
    }
}

/// 0 is the background sentinel; any other value is the object index
/// shifted up by one.
pub fn decode_pick_id(id: u32) -> Option<usize> {
    (id != 0).then(|| id as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_decodes_to_no_hit() {
        assert_eq!(decode_pick_id(0), None);
    }

    #[test]
    fn ids_decode_to_object_indices() {
        assert_eq!(decode_pick_id(1), Some(0));
        assert_eq!(decode_pick_id(5), Some(4));
        assert_eq!(decode_pick_id(u32::MAX), Some(u32::MAX as usize - 1));
    }
}
