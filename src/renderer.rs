use image::RgbaImage;
use wgpu::{include_wgsl, util::DeviceExt};
use winit::dpi::PhysicalSize;

use crate::{
    geometry::{MeshData, MeshVertex},
    scene::Scene,
    texture::Texture,
};

pub struct VertexBuffer(wgpu::Buffer);

impl VertexBuffer {
    pub fn init_immediate<'label>(
        device: &wgpu::Device,
        content: &[u8],
        label: Option<&'label str>,
    ) -> Self {
        let init_descriptor = wgpu::util::BufferInitDescriptor {
            label,
            contents: content,
            usage: wgpu::BufferUsages::VERTEX,
        };
        let buffer = device.create_buffer_init(&init_descriptor);
        Self(buffer)
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }
}

pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    format: wgpu::IndexFormat,
}

macro_rules! index_buffer_init_immediate {
    ($device:expr, $content:expr, $label:expr, $ty:ident) => {{
        let init_descriptor = wgpu::util::BufferInitDescriptor {
            label: $label,
            contents: bytemuck::cast_slice($content),
            usage: wgpu::BufferUsages::INDEX,
        };
        let buffer = $device.create_buffer_init(&init_descriptor);
        IndexBuffer {
            buffer,
            format: wgpu::IndexFormat::$ty,
        }
    }};
}

impl IndexBuffer {
    pub fn init_immediate_u16<'label>(
        device: &wgpu::Device,
        content: &[u16],
        label: Option<&'label str>,
    ) -> Self {
        index_buffer_init_immediate!(device, content, label, Uint16)
    }

    pub fn init_immediate_u32<'label>(
        device: &wgpu::Device,
        content: &[u32],
        label: Option<&'label str>,
    ) -> Self {
        index_buffer_init_immediate!(device, content, label, Uint32)
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    pub fn count(&self) -> u32 {
        (self.buffer.size() / Self::format_size(self.format) as u64) as u32
    }

    /// Return the index byte size from the index format
    #[inline(always)]
    pub fn format_size(format: wgpu::IndexFormat) -> u8 {
        match format {
            wgpu::IndexFormat::Uint16 => 2,
            wgpu::IndexFormat::Uint32 => 4,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Full-screen quad in clip space.
#[rustfmt::skip]
pub const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 1.0] },
    QuadVertex { position: [ 1.0, -1.0, 0.0], tex_coords: [1.0, 1.0] },
    QuadVertex { position: [ 1.0,  1.0, 0.0], tex_coords: [1.0, 0.0] },
    QuadVertex { position: [-1.0,  1.0, 0.0], tex_coords: [0.0, 0.0] },
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct LightUniform {
    position: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    lights: [LightUniform; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    base_color: [f32; 4],
    surface: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct HelperUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl GlobalsUniform {
    fn from_scene(scene: &Scene, encode_srgb: bool) -> Self {
        let camera = &scene.camera;
        let light = |index: usize| {
            let light = &scene.lights()[index];
            LightUniform {
                position: light.position.extend(1.0).to_array(),
                color: light.color.to_vec3().extend(light.intensity).to_array(),
            }
        };
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: camera
                .position
                .extend(if encode_srgb { 1.0 } else { 0.0 })
                .to_array(),
            lights: [light(0), light(1)],
        }
    }
}

impl ObjectUniform {
    fn from_scene(scene: &Scene) -> Self {
        let sphere = &scene.sphere;
        let model = sphere.transform.matrix();
        let material = &sphere.material;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color: material.color.to_vec3().extend(1.0).to_array(),
            surface: [material.metalness, material.roughness, 1.0, 0.0],
        }
    }
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        value: &T,
        label: &str,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(label),
        });
        Self { buffer, bind_group }
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry(0)],
        label: Some(label),
    })
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entries(first_binding: u32) -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: first_binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: first_binding + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    format: wgpu::TextureFormat,
    depth: bool,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: "vs_main",
            buffers: &[desc.vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: desc.depth.then(|| wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// Draws the scene into an offscreen target sized by the viewport, then
/// scales that target onto the surface.
pub struct SceneRenderer {
    format: wgpu::TextureFormat,
    encode_srgb: bool,

    sphere_pipeline: wgpu::RenderPipeline,
    helper_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,

    globals: UniformSlot,
    object_buffer: wgpu::Buffer,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    normal_map: Texture,
    helpers: [UniformSlot; 2],

    sphere_vertices: VertexBuffer,
    sphere_indices: IndexBuffer,
    helper_meshes: [(VertexBuffer, IndexBuffer); 2],
    quad_vertices: VertexBuffer,
    quad_indices: IndexBuffer,

    blit_layout: wgpu::BindGroupLayout,
    blit_bind_group: wgpu::BindGroup,
    target: Texture,
    depth: Texture,
    target_size: PhysicalSize<u32>,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        scene: &Scene,
        target_size: PhysicalSize<u32>,
    ) -> Self {
        let encode_srgb = !format.is_srgb();

        let globals_layout = uniform_layout(device, "globals_bind_group_layout");
        let helper_layout = uniform_layout(device, "helper_bind_group_layout");
        let [normal_texture_entry, normal_sampler_entry] = texture_entries(1);
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0), normal_texture_entry, normal_sampler_entry],
            label: Some("material_bind_group_layout"),
        });
        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &texture_entries(0),
            label: Some("blit_bind_group_layout"),
        });

        let globals = UniformSlot::new(
            device,
            &globals_layout,
            &GlobalsUniform::from_scene(scene, encode_srgb),
            "Globals Buffer",
        );
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Buffer"),
            contents: bytemuck::bytes_of(&ObjectUniform::from_scene(scene)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let normal_map = Texture::flat_normal(device, queue);
        let material_bind_group =
            Self::material_bind_group(device, &material_layout, &object_buffer, &normal_map);

        let helpers = scene.helpers().map(|helper| {
            UniformSlot::new(
                device,
                &helper_layout,
                &HelperUniform {
                    model: helper.matrix(scene).to_cols_array_2d(),
                    color: helper.color(scene).to_vec3().extend(1.0).to_array(),
                },
                "Helper Buffer",
            )
        });

        let sphere_mesh = scene.sphere.geometry.build();
        let sphere_vertices = VertexBuffer::init_immediate(
            device,
            bytemuck::cast_slice(&sphere_mesh.vertices),
            Some("Sphere Vertex Buffer"),
        );
        let sphere_indices = IndexBuffer::init_immediate_u32(
            device,
            &sphere_mesh.indices,
            Some("Sphere Index Buffer"),
        );
        let helper_meshes = scene.helpers().map(|helper| {
            let mesh = helper.geometry().build();
            wireframe_buffers(device, &mesh)
        });

        let quad_vertices = VertexBuffer::init_immediate(
            device,
            bytemuck::cast_slice(QUAD_VERTICES),
            Some("Quad Vertex Buffer"),
        );
        let quad_indices =
            IndexBuffer::init_immediate_u16(device, QUAD_INDICES, Some("Quad Index Buffer"));

        let sphere_shader = device.create_shader_module(include_wgsl!("asset/shader/sphere.wgsl"));
        let helper_shader = device.create_shader_module(include_wgsl!("asset/shader/helper.wgsl"));
        let blit_shader = device.create_shader_module(include_wgsl!("asset/shader/blit.wgsl"));

        let sphere_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "Sphere Pipeline",
                shader: &sphere_shader,
                bind_group_layouts: &[&globals_layout, &material_layout],
                vertex_layout: MeshVertex::layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                format,
                depth: true,
            },
        );
        let helper_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "Helper Pipeline",
                shader: &helper_shader,
                bind_group_layouts: &[&globals_layout, &helper_layout],
                vertex_layout: MeshVertex::layout(),
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                format,
                depth: true,
            },
        );
        let blit_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "Blit Pipeline",
                shader: &blit_shader,
                bind_group_layouts: &[&blit_layout],
                vertex_layout: QuadVertex::layout(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                format,
                depth: false,
            },
        );

        let target = Texture::render_target(device, target_size.width, target_size.height, format);
        let depth = Texture::depth(device, target_size.width, target_size.height);
        let blit_bind_group = Self::blit_bind_group(device, &blit_layout, &target);

        tracing::info!(
            width = target_size.width,
            height = target_size.height,
            ?format,
            "scene renderer ready"
        );

        Self {
            format,
            encode_srgb,
            sphere_pipeline,
            helper_pipeline,
            blit_pipeline,
            globals,
            object_buffer,
            material_layout,
            material_bind_group,
            normal_map,
            helpers,
            sphere_vertices,
            sphere_indices,
            helper_meshes,
            quad_vertices,
            quad_indices,
            blit_layout,
            blit_bind_group,
            target,
            depth,
            target_size,
        }
    }

    fn material_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        object_buffer: &wgpu::Buffer,
        normal_map: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&normal_map.sampler),
                },
            ],
            label: Some("material_bind_group"),
        })
    }

    fn blit_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        target: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&target.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&target.sampler),
                },
            ],
            label: Some("blit_bind_group"),
        })
    }

    /// Swap the flat placeholder for the loaded normal map.
    pub fn set_normal_map(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, img: &RgbaImage) {
        self.normal_map = Texture::from_image(
            device,
            queue,
            img,
            Texture::NORMAL_MAP_FORMAT,
            Some("Normal map"),
        );
        self.material_bind_group = Self::material_bind_group(
            device,
            &self.material_layout,
            &self.object_buffer,
            &self.normal_map,
        );
    }

    /// Recreate the offscreen target. Same-size requests are ignored.
    pub fn resize_target(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size == self.target_size || size.width == 0 || size.height == 0 {
            return;
        }
        self.target = Texture::render_target(device, size.width, size.height, self.format);
        self.depth = Texture::depth(device, size.width, size.height);
        self.blit_bind_group = Self::blit_bind_group(device, &self.blit_layout, &self.target);
        self.target_size = size;
        tracing::debug!(width = size.width, height = size.height, "scene target resized");
    }

    /// Upload the scene's current state.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene) {
        queue.write_buffer(
            &self.globals.buffer,
            0,
            bytemuck::bytes_of(&GlobalsUniform::from_scene(scene, self.encode_srgb)),
        );
        queue.write_buffer(
            &self.object_buffer,
            0,
            bytemuck::bytes_of(&ObjectUniform::from_scene(scene)),
        );
        for (slot, helper) in self.helpers.iter().zip(scene.helpers()) {
            let uniform = HelperUniform {
                model: helper.matrix(scene).to_cols_array_2d(),
                color: helper.color(scene).to_vec3().extend(1.0).to_array(),
            };
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Record the scene pass and the scale-up onto `surface_view`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            render_pass.set_pipeline(&self.sphere_pipeline);
            render_pass.set_bind_group(0, &self.globals.bind_group, &[]);
            render_pass.set_bind_group(1, &self.material_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.sphere_vertices.buffer().slice(..));
            render_pass.set_index_buffer(
                self.sphere_indices.buffer().slice(..),
                self.sphere_indices.format(),
            );
            render_pass.draw_indexed(0..self.sphere_indices.count(), 0, 0..1);

            render_pass.set_pipeline(&self.helper_pipeline);
            for (slot, (vertices, indices)) in self.helpers.iter().zip(&self.helper_meshes) {
                render_pass.set_bind_group(1, &slot.bind_group, &[]);
                render_pass.set_vertex_buffer(0, vertices.buffer().slice(..));
                render_pass.set_index_buffer(indices.buffer().slice(..), indices.format());
                render_pass.draw_indexed(0..indices.count(), 0, 0..1);
            }
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });
        render_pass.set_pipeline(&self.blit_pipeline);
        render_pass.set_bind_group(0, &self.blit_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_vertices.buffer().slice(..));
        render_pass.set_index_buffer(self.quad_indices.buffer().slice(..), self.quad_indices.format());
        render_pass.draw_indexed(0..self.quad_indices.count(), 0, 0..1);
    }
}

fn wireframe_buffers(device: &wgpu::Device, mesh: &MeshData) -> (VertexBuffer, IndexBuffer) {
    let vertices = VertexBuffer::init_immediate(
        device,
        bytemuck::cast_slice(&mesh.vertices),
        Some("Helper Vertex Buffer"),
    );
    let indices = IndexBuffer::init_immediate_u32(
        device,
        &mesh.wireframe_indices(),
        Some("Helper Index Buffer"),
    );
    (vertices, indices)
}
