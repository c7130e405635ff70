#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use gpu::{LineVertex, MeshVertex, RenderFrame, SphereMesh};
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub mesh_pipeline: ::wgpu::RenderPipeline,
        pub line_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub sphere_vertex_buffer: ::wgpu::Buffer,
        pub sphere_index_buffer: ::wgpu::Buffer,
        pub sphere_index_count: u32,
        pub grid_vertex_buffer: Option<::wgpu::Buffer>,
        pub grid_vertex_count: u32,
        pub line_vertex_buffer: Option<::wgpu::Buffer>,
        pub line_vertex_count: u32,
        pub marker_vertex_buffer: Option<::wgpu::Buffer>,
        pub marker_vertex_count: u32,
    }

    const GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_dir: vec3<f32>,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

    const MESH_WGSL: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), normal, color);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(globals.light_dir);
    let shade = 0.35 + 0.65 * max(dot(n, l), 0.0);
    return vec4<f32>(fs_in.color.rgb * shade, fs_in.color.a);
}
"#;

    const LINE_WGSL: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), color);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    return fs_in.color;
}
"#;

    const MESH_ATTRIBUTES: [::wgpu::VertexAttribute; 3] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];
    const LINE_ATTRIBUTES: [::wgpu::VertexAttribute; 2] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    const LIGHT_DIR: [f32; 3] = [0.4, 0.7, 0.2];

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        light_dir: [f32; 3],
        _pad: f32,
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("fibration-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn vertex_buffer<T: bytemuck::Pod>(
        device: &::wgpu::Device,
        label: &str,
        data: &[T],
    ) -> Option<::wgpu::Buffer> {
        if data.is_empty() {
            return None;
        }
        Some(device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: ::wgpu::BufferUsages::VERTEX,
        }))
    }

    fn sphere_buffers(device: &::wgpu::Device, sphere: &SphereMesh) -> (::wgpu::Buffer, ::wgpu::Buffer) {
        let vertices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("fibration-sphere-vertices"),
            contents: bytemuck::cast_slice(&sphere.vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("fibration-sphere-indices"),
            contents: bytemuck::cast_slice(&sphere.indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        (vertices, indices)
    }

    /// One alpha-blended pipeline over the shared globals layout.
    struct PipelineDesc<'a> {
        label: &'a str,
        body_wgsl: &'a str,
        stride: usize,
        attributes: &'a [::wgpu::VertexAttribute],
        topology: ::wgpu::PrimitiveTopology,
        depth_write: bool,
    }

    fn scene_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        format: ::wgpu::TextureFormat,
        desc: PipelineDesc<'_>,
    ) -> ::wgpu::RenderPipeline {
        let module = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!(
                "{GLOBALS_WGSL}{}",
                desc.body_wgsl
            ))),
        });
        let targets = [Some(::wgpu::ColorTargetState {
            format,
            blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
            write_mask: ::wgpu::ColorWrites::ALL,
        })];

        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: desc.stride as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: desc.attributes,
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &targets,
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: desc.topology,
                ..Default::default()
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: desc.depth_write,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    pub async fn init_wgpu_from_canvas_id(
        canvas_id: &str,
        sphere: &SphereMesh,
        grid: &[LineVertex],
    ) -> Result<WgpuContext, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // The surface must not outlive its instance; the instance lives for the whole app.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("fibration-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().cloned())
            .ok_or_else(|| JsValue::from_str("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .cloned()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("fibration-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("fibration-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("fibration-globals-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("fibration-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        // Spheres and markers.
        let mesh_pipeline = scene_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineDesc {
                label: "fibration-mesh-pipeline",
                body_wgsl: MESH_WGSL,
                stride: std::mem::size_of::<MeshVertex>(),
                attributes: &MESH_ATTRIBUTES,
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                depth_write: true,
            },
        );
        // Fibers, circles, projection rays and the ground grid.
        let line_pipeline = scene_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineDesc {
                label: "fibration-line-pipeline",
                body_wgsl: LINE_WGSL,
                stride: std::mem::size_of::<LineVertex>(),
                attributes: &LINE_ATTRIBUTES,
                topology: ::wgpu::PrimitiveTopology::LineList,
                depth_write: false,
            },
        );

        let (sphere_vertex_buffer, sphere_index_buffer) = sphere_buffers(&device, sphere);

        let globals = Globals {
            view_proj: [[0.0; 4]; 4],
            light_dir: LIGHT_DIR,
            _pad: 0.0,
        };
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&globals));

        Ok(WgpuContext {
            _instance: instance,
            surface,
            grid_vertex_buffer: vertex_buffer(&device, "fibration-grid-vertices", grid),
            grid_vertex_count: grid.len() as u32,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            mesh_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: sphere.indices.len() as u32,
            line_vertex_buffer: None,
            line_vertex_count: 0,
            marker_vertex_buffer: None,
            marker_vertex_count: 0,
        })
    }

    /// Replaces the selection geometry (fibers, circles, markers).
    pub fn upload_frame(ctx: &mut WgpuContext, frame: &RenderFrame) {
        ctx.line_vertex_buffer = vertex_buffer(&ctx.device, "fibration-line-vertices", &frame.lines);
        ctx.line_vertex_count = frame.lines.len() as u32;
        ctx.marker_vertex_buffer =
            vertex_buffer(&ctx.device, "fibration-marker-vertices", &frame.markers);
        ctx.marker_vertex_count = frame.markers.len() as u32;
    }

    /// Replaces the static scene (sphere and ground grid) on an existing context.
    pub fn set_scene_geometry(ctx: &mut WgpuContext, sphere: &SphereMesh, grid: &[LineVertex]) {
        let (vertices, indices) = sphere_buffers(&ctx.device, sphere);
        ctx.sphere_vertex_buffer = vertices;
        ctx.sphere_index_buffer = indices;
        ctx.sphere_index_count = sphere.indices.len() as u32;
        ctx.grid_vertex_buffer = vertex_buffer(&ctx.device, "fibration-grid-vertices", grid);
        ctx.grid_vertex_count = grid.len() as u32;
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    pub fn render(ctx: &WgpuContext, view_proj: [[f32; 4]; 4]) -> Result<(), JsValue> {
        let frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let globals = Globals {
            view_proj,
            light_dir: LIGHT_DIR,
            _pad: 0.0,
        };
        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&globals));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("fibration-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("fibration-scene-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.035,
                            a: 1.0,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);

            rpass.set_pipeline(&ctx.mesh_pipeline);
            rpass.set_vertex_buffer(0, ctx.sphere_vertex_buffer.slice(..));
            rpass.set_index_buffer(ctx.sphere_index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..ctx.sphere_index_count, 0, 0..1);

            if let Some(buf) = &ctx.marker_vertex_buffer {
                rpass.set_vertex_buffer(0, buf.slice(..));
                rpass.draw(0..ctx.marker_vertex_count, 0..1);
            }

            rpass.set_pipeline(&ctx.line_pipeline);
            if let Some(buf) = &ctx.grid_vertex_buffer {
                rpass.set_vertex_buffer(0, buf.slice(..));
                rpass.draw(0..ctx.grid_vertex_count, 0..1);
            }
            if let Some(buf) = &ctx.line_vertex_buffer {
                rpass.set_vertex_buffer(0, buf.slice(..));
                rpass.draw(0..ctx.line_vertex_count, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use gpu::{LineVertex, RenderFrame, SphereMesh};
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu_from_canvas_id(
        _canvas_id: &str,
        _sphere: &SphereMesh,
        _grid: &[LineVertex],
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn upload_frame(_ctx: &mut WgpuContext, _frame: &RenderFrame) {}

    pub fn set_scene_geometry(_ctx: &mut WgpuContext, _sphere: &SphereMesh, _grid: &[LineVertex]) {}

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render(_ctx: &WgpuContext, _view_proj: [[f32; 4]; 4]) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{
    WgpuContext, init_wgpu_from_canvas_id, render, resize_wgpu, set_scene_geometry, upload_frame,
};
