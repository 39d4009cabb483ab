//! SDF-based WebGPU render pipeline
//!
//! Draws one fullscreen triangle; the fragment shader evaluates the metaball
//! field for every pixel from a fixed-capacity blob uniform array.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::sim::{BlobSample, Simulator};

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0
    pub blob_count: u32,      // offset 8
    pub smooth_k: f32,        // offset 12
    pub edge_width: f32,      // offset 16
    pub sentinel: f32,        // offset 20
    pub _pad: [f32; 2],       // offset 24 - align color to 16 bytes
    pub color: [f32; 4],      // offset 32
}

impl Globals {
    pub fn new(width: u32, height: u32, blob_count: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            blob_count,
            smooth_k: SMOOTH_K,
            edge_width: EDGE_WIDTH,
            sentinel: FIELD_SENTINEL,
            _pad: [0.0; 2],
            color: [BLOB_COLOR[0], BLOB_COLOR[1], BLOB_COLOR[2], 1.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlobData {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32, // Uniform array stride must be 16 bytes
}

/// Fill the fixed-size GPU blob array; blobs past `MAX_BLOBS` are dropped
pub fn pack_blobs(samples: &[BlobSample]) -> ([BlobData; MAX_BLOBS], u32) {
    let mut data = [BlobData::zeroed(); MAX_BLOBS];
    let count = samples.len().min(MAX_BLOBS);
    for (slot, blob) in data.iter_mut().zip(samples.iter().take(count)) {
        *slot = BlobData {
            center: [blob.x, blob.y],
            radius: blob.radius,
            _pad: 0.0,
        };
    }
    (data, count as u32)
}

// ============================================================================
// METABALL RENDER STATE
// ============================================================================

pub struct MetaballRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    blobs_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl MetaballRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("metaball-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("metaball_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("metaball_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::new(width, height, 0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let blobs_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blobs"),
            size: (std::mem::size_of::<BlobData>() * MAX_BLOBS) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("metaball_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("metaball_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: blobs_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("metaball_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("metaball_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            blobs_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the blob snapshot and draw
    pub fn render(&mut self, sim: &Simulator) -> Result<(), wgpu::SurfaceError> {
        let (blobs_data, blob_count) = pack_blobs(&sim.snapshot());

        let globals = Globals::new(self.size.0, self.size.1, blob_count);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.blobs_buffer, 0, bytemuck::cast_slice(&blobs_data));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("metaball_encoder"),
            });

        {
            let clear = wgpu::Color {
                r: BACKGROUND[0] as f64,
                g: BACKGROUND[1] as f64,
                b: BACKGROUND[2] as f64,
                a: 1.0,
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("metaball_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
