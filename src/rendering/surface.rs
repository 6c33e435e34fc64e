use crate::error::GpuError;
use crate::rendering::render_config::DEPTH_FORMAT;

/// Picks a format from the surface capabilities and configures it for `size`.
pub(super) fn configure_surface(
    device: &wgpu::Device,
    size: &winit::dpi::PhysicalSize<u32>,
    surface: &wgpu::Surface<'_>,
    surface_caps: &wgpu::SurfaceCapabilities,
) -> Result<wgpu::SurfaceConfiguration, GpuError> {
    let format = *surface_caps
        .formats
        .first()
        .ok_or(GpuError::UnsupportedSurface)?;

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        // Request compatibility with the sRGB-format texture view we're going to create later.
        view_formats: vec![format.add_srgb_suffix()],
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        width: size.width.max(1),
        height: size.height.max(1),
        desired_maximum_frame_latency: 2,
        present_mode: wgpu::PresentMode::AutoVsync,
    };
    surface.configure(device, &surface_config);

    Ok(surface_config)
}

/// Depth buffer matching the surface size; recreated on every resize.
pub(super) fn create_depth_view(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: surface_config.width,
            height: surface_config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
