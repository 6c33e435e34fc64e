use crate::rendering::geometry::MeshVertex;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Glowing layers add light on top of whatever is behind them
const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

// Configuration for rendering and shaders
pub(crate) struct RenderConfig {
    pub surface_format: wgpu::TextureFormat,
    pub scene_layout: wgpu::BindGroupLayout,
    pub mesh_layout: wgpu::BindGroupLayout,
    pub points_layout: wgpu::BindGroupLayout,

    pub body_pipeline: wgpu::RenderPipeline,
    pub glow_pipeline: wgpu::RenderPipeline,
    pub disk_pipeline: wgpu::RenderPipeline,
    pub star_pipeline: wgpu::RenderPipeline,
    pub particle_pipeline: wgpu::RenderPipeline,
}

impl RenderConfig {
    pub(crate) fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });
        let disk_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Disk Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/disk.wgsl").into()),
        });
        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/points.wgsl").into()),
        });

        let scene_layout = uniform_layout(device, "Scene Bind Group Layout");
        let mesh_layout = uniform_layout(device, "Mesh Bind Group Layout");
        let points_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &mesh_layout],
            push_constant_ranges: &[],
        });
        let points_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &points_layout],
            push_constant_ranges: &[],
        });

        let mesh_buffers = [MeshVertex::layout()];

        // The body writes depth so the disk and particles behind it are hidden
        let body_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "Body Pipeline",
                layout: &mesh_pipeline_layout,
                module: &mesh_shader,
                entry_points: ("vs_mesh", "fs_mesh"),
                vertex_buffers: &mesh_buffers,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull_mode: None,
                depth_write_enabled: true,
            },
        );
        // Back faces only, which leaves a halo around the body's silhouette
        let glow_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "Glow Pipeline",
                layout: &mesh_pipeline_layout,
                module: &mesh_shader,
                entry_points: ("vs_mesh", "fs_mesh"),
                vertex_buffers: &mesh_buffers,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull_mode: Some(wgpu::Face::Front),
                depth_write_enabled: false,
            },
        );
        let disk_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "Disk Pipeline",
                layout: &mesh_pipeline_layout,
                module: &disk_shader,
                entry_points: ("vs_disk", "fs_disk"),
                vertex_buffers: &mesh_buffers,
                blend: ADDITIVE_BLENDING,
                cull_mode: None,
                depth_write_enabled: false,
            },
        );

        let star_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "Star Pipeline",
                layout: &points_pipeline_layout,
                module: &points_shader,
                entry_points: ("vs_point", "fs_point"),
                vertex_buffers: &[],
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull_mode: None,
                depth_write_enabled: false,
            },
        );
        let particle_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "Particle Pipeline",
                layout: &points_pipeline_layout,
                module: &points_shader,
                entry_points: ("vs_point", "fs_point"),
                vertex_buffers: &[],
                blend: ADDITIVE_BLENDING,
                cull_mode: None,
                depth_write_enabled: false,
            },
        );

        Self {
            surface_format,
            scene_layout,
            mesh_layout,
            points_layout,
            body_pipeline,
            glow_pipeline,
            disk_pipeline,
            star_pipeline,
            particle_pipeline,
        }
    }

    pub(crate) fn create_scene_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        bind_buffer(device, &self.scene_layout, buffer, "Scene Bind Group")
    }

    pub(crate) fn create_mesh_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        bind_buffer(device, &self.mesh_layout, buffer, label)
    }

    pub(crate) fn create_points_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        bind_buffer(device, &self.points_layout, buffer, label)
    }
}

fn bind_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    module: &'a wgpu::ShaderModule,
    entry_points: (&'a str, &'a str),
    vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: wgpu::BlendState,
    cull_mode: Option<wgpu::Face>,
    depth_write_enabled: bool,
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: Some(desc.entry_points.0),
            buffers: desc.vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: Some(desc.entry_points.1),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format.add_srgb_suffix(),
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write_enabled,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
