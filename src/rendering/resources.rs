use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::rendering::geometry::{self, Mesh};
use crate::rendering::render_config::RenderConfig;
use crate::simulation::particles::ParticleSystem;
use crate::simulation::types::{MeshUniforms, PointInstance, SceneUniforms};

const BODY_RADIUS: f32 = 1.0;
const BODY_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.95];
const GLOW_RADIUS: f32 = 1.2;
const GLOW_COLOR: [f32; 4] = [0.29, 0.055, 0.306, 0.3]; // #4a0e4e
const SPHERE_SEGMENTS: u32 = 32;

const DISK_MESH_INNER_RADIUS: f32 = 1.5;
const DISK_MESH_OUTER_RADIUS: f32 = 8.0;
const DISK_THETA_SEGMENTS: u32 = 64;
const DISK_PHI_SEGMENTS: u32 = 8;

// Geometry plus its per-mesh uniforms
pub(crate) struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl MeshBuffers {
    fn new(
        device: &wgpu::Device,
        render_config: &RenderConfig,
        mesh: &Mesh,
        uniforms: MeshUniforms,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniform Buffer")),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group =
            render_config.create_mesh_bind_group(device, &uniform_buffer, &format!("{label} Bind Group"));

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// Storage buffer of billboards drawn as instanced quads
pub(crate) struct PointBuffers {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub count: u32,
}

impl PointBuffers {
    fn new(
        device: &wgpu::Device,
        render_config: &RenderConfig,
        points: &[PointInstance],
        label: &str,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Buffer")),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group =
            render_config.create_points_bind_group(device, &buffer, &format!("{label} Bind Group"));

        Self {
            buffer,
            bind_group,
            count: points.len() as u32,
        }
    }

    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        // 6 vertices (2 triangles) per billboard instance
        render_pass.draw(0..6, 0..self.count);
    }
}

// GPU resources for everything in the scene
pub(crate) struct SceneResources {
    pub scene_buffer: wgpu::Buffer,
    pub scene_bind_group: wgpu::BindGroup,
    pub body: MeshBuffers,
    pub glow: MeshBuffers,
    pub disk: MeshBuffers,
    pub stars: PointBuffers,
    pub particles: PointBuffers,
    particle_staging: Vec<PointInstance>,
}

impl SceneResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        render_config: &RenderConfig,
        scene: &SceneUniforms,
        particles: &ParticleSystem,
        stars: &[PointInstance],
    ) -> Self {
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*scene]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = render_config.create_scene_bind_group(device, &scene_buffer);

        let body = MeshBuffers::new(
            device,
            render_config,
            &geometry::uv_sphere(BODY_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            MeshUniforms::new(Mat4::IDENTITY, BODY_COLOR),
            "Body",
        );
        let glow = MeshBuffers::new(
            device,
            render_config,
            &geometry::uv_sphere(GLOW_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            MeshUniforms::new(Mat4::IDENTITY, GLOW_COLOR),
            "Glow",
        );
        let disk = MeshBuffers::new(
            device,
            render_config,
            &geometry::ring(
                DISK_MESH_INNER_RADIUS,
                DISK_MESH_OUTER_RADIUS,
                DISK_THETA_SEGMENTS,
                DISK_PHI_SEGMENTS,
            ),
            MeshUniforms::new(Mat4::IDENTITY, [1.0; 4]),
            "Disk",
        );

        let stars = PointBuffers::new(device, render_config, stars, "Stars");

        let mut particle_staging = Vec::with_capacity(particles.len());
        particles.write_instances(&mut particle_staging);
        let particles = PointBuffers::new(device, render_config, &particle_staging, "Particles");

        Self {
            scene_buffer,
            scene_bind_group,
            body,
            glow,
            disk,
            stars,
            particles,
            particle_staging,
        }
    }

    pub(crate) fn update_scene(&self, queue: &wgpu::Queue, scene: &SceneUniforms) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[*scene]));
    }

    pub(crate) fn update_disk(&self, queue: &wgpu::Queue, model: Mat4) {
        let uniforms = MeshUniforms::new(model, [1.0; 4]);
        queue.write_buffer(&self.disk.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Uploads the current particle state, replacing the GPU buffer when the
    /// particle count changed.
    pub(crate) fn update_particles(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        render_config: &RenderConfig,
        particles: &ParticleSystem,
    ) {
        particles.write_instances(&mut self.particle_staging);

        if self.particle_staging.len() as u32 != self.particles.count {
            // Swap in a fully built buffer; the old one is freed on drop
            self.particles = PointBuffers::new(device, render_config, &self.particle_staging, "Particles");
            log::debug!("particle GPU buffer resized to {}", self.particles.count);
        } else {
            queue.write_buffer(
                &self.particles.buffer,
                0,
                bytemuck::cast_slice(&self.particle_staging),
            );
        }
    }
}
