use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::model::camera::CameraState;
use crate::view::gpu_init::GpuContext;
use crate::view::raster::Surface;

/// Uniform block consumed by the scene shader. Field order and padding
/// match the WGSL struct; total size is 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    time: f32,
    _pad0: f32,
    resolution: [f32; 2],
    rotation: [f32; 2],
    _pad1: [f32; 2],
    position: [f32; 3],
    _pad2: f32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Fullscreen quad as a 4-vertex triangle strip: positions in clip space,
/// UVs with origin at the bottom-left.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, 1.0], uv: [0.0, 1.0] },  // top left
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 1.0] },   // top right
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 0.0] }, // bottom left
    QuadVertex { position: [1.0, -1.0], uv: [1.0, 0.0] },  // bottom right
];

/// Counts per-frame texture creations and releases so a leak shows up as
/// an imbalance instead of silent VRAM growth.
#[derive(Default)]
pub struct TextureLedger {
    created: AtomicUsize,
    released: AtomicUsize,
}

impl TextureLedger {
    pub fn note_created(&self, n: usize) {
        self.created.fetch_add(n, Ordering::Relaxed);
    }

    pub fn note_released(&self, n: usize) {
        self.released.fetch_add(n, Ordering::Relaxed);
    }

    pub fn counts(&self) -> (usize, usize) {
        (
            self.created.load(Ordering::Relaxed),
            self.released.load(Ordering::Relaxed),
        )
    }

    pub fn balanced(&self) -> bool {
        let (created, released) = self.counts();
        created == released
    }
}

/// The two GPU textures that live for exactly one frame: the flipped UI
/// overlay (unit 0) and the static background (unit 1).
///
/// Dropping this struct destroys both textures, so release happens on
/// every exit path out of `composite`, early returns included.
struct FrameTextures<'a> {
    ui: wgpu::Texture,
    background: wgpu::Texture,
    ledger: &'a TextureLedger,
}

impl<'a> FrameTextures<'a> {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ledger: &'a TextureLedger,
        ui_pixels: &[u8],
        ui_size: (u32, u32),
        background: &RgbaImage,
    ) -> Self {
        let ui = upload_texture(device, queue, "ui_overlay", ui_size.0, ui_size.1, ui_pixels);
        let background = upload_texture(
            device,
            queue,
            "background",
            background.width(),
            background.height(),
            background.as_raw(),
        );
        ledger.note_created(2);
        Self { ui, background, ledger }
    }
}

impl Drop for FrameTextures<'_> {
    fn drop(&mut self) {
        self.ui.destroy();
        self.background.destroy();
        self.ledger.note_released(2);
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}

/// Merges the CPU-rasterized UI layer and the shader-rendered scene into
/// one presented frame.
pub struct Compositor {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    ledger: TextureLedger,
    flip_scratch: Vec<u8>,
}

impl Compositor {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = gpu.device.as_ref();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            quad_buffer,
            uniform_buffer,
            ledger: TextureLedger::default(),
            flip_scratch: Vec::new(),
        }
    }

    /// (created, released) texture counts since startup.
    pub fn texture_counts(&self) -> (usize, usize) {
        self.ledger.counts()
    }

    /// Render one frame: upload the UI and background as fresh textures,
    /// draw the fullscreen pass, present, and release both textures.
    pub fn composite(
        &mut self,
        gpu: &GpuContext,
        ui: &Surface,
        background: &RgbaImage,
        time: f32,
        camera: &CameraState,
    ) -> Result<(), wgpu::SurfaceError> {
        let uniforms = SceneUniforms {
            time,
            _pad0: 0.0,
            resolution: [gpu.config.width as f32, gpu.config.height as f32],
            rotation: [camera.yaw(), camera.pitch()],
            _pad1: [0.0, 0.0],
            position: camera.position.to_array(),
            _pad2: 0.0,
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        // Acquire before creating the per-frame textures so a failed frame
        // cannot strand them.
        let frame = gpu.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // The raster surface has a top-left origin; the quad UVs have a
        // bottom-left one, so the buffer goes up flipped.
        ui.flip_into(&mut self.flip_scratch);
        let textures = FrameTextures::new(
            gpu.device.as_ref(),
            &gpu.queue,
            &self.ledger,
            &self.flip_scratch,
            (ui.width(), ui.height()),
            background,
        );

        let ui_view = textures.ui.create_view(&wgpu::TextureViewDescriptor::default());
        let bg_view = textures
            .background
            .create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&ui_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&bg_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("composite_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            pass.draw(0..4, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        // `textures` drops here, destroying both per-frame textures.
        Ok(())
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Load the background material, scaled down to a quarter on each axis and
/// flipped to the texture origin. Falls back to a procedural slab when the
/// file is absent so the binary always starts.
pub fn load_background(path: &Path) -> RgbaImage {
    match image::open(path) {
        Ok(img) => {
            let img = img.to_rgba8();
            let scaled = image::imageops::resize(
                &img,
                (img.width() / 4).max(1),
                (img.height() / 4).max(1),
                image::imageops::FilterType::Triangle,
            );
            image::imageops::flip_vertical(&scaled)
        }
        Err(err) => {
            tracing::warn!("could not load {}: {err}; using procedural fallback", path.display());
            procedural_concrete(256, 256)
        }
    }
}

/// Flat grey slab with hashed per-pixel speckle.
fn procedural_concrete(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let mut h = x.wrapping_mul(374_761_393).wrapping_add(y.wrapping_mul(668_265_263));
        h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
        let speckle = (h >> 24) as u8 % 24;
        let base = 110u8 + speckle;
        image::Rgba([base, base, base.saturating_sub(4), 255])
    })
}
