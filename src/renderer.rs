use std::sync::Arc;
use winit::window::Window;

use crate::core::gpu::GpuContext;
use crate::core::ring::{slot_index, FrameRing, ShaderMatrices};
use crate::core::timeline::FrameTimeline;
use crate::error::{Error, Result};
use crate::math;

/// Frames the CPU may run ahead of the GPU; also the ring size.
pub const FRAME_RING_DEPTH: usize = 2;

/// Cube vertices drawn per frame (12 triangles, generated in the shader).
const CUBE_VERTEX_COUNT: u32 = 36;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.086,
    g: 0.086,
    b: 0.1137,
    a: 1.0,
};

/// Renders the spinning cube and owns the whole frame lifecycle: admission
/// against the frame timeline, recording, submission, presentation and the
/// resize/shutdown drains.
///
/// Field order doubles as teardown order: the ring and pipeline drop before
/// the surface, the surface before the device (reverse of acquisition).
pub struct CubeRenderer {
    ring: FrameRing,
    timeline: FrameTimeline,
    pipeline: wgpu::RenderPipeline,
    slot_layout: wgpu::BindGroupLayout,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    gpu: GpuContext,
    spin_speed: f32,
    rotation_turns: f32,
}

impl CubeRenderer {
    /// Init ordering: instance → surface → device → surface config →
    /// frame ring → render resources → timeline. Any failure unwinds the
    /// earlier steps by drop.
    pub async fn new(window: Arc<Window>, spin_speed: f32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Initialization(format!("failed to create surface: {e}")))?;

        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let config = Self::surface_config(&surface, &gpu, size.width, size.height);
        surface.configure(gpu.device(), &config);

        let slot_layout = Self::create_slot_layout(gpu.device());
        let ring = FrameRing::new(gpu.device(), &slot_layout, FRAME_RING_DEPTH);
        let pipeline = Self::create_pipeline(gpu.device(), &slot_layout, config.format);
        let timeline = FrameTimeline::new(FRAME_RING_DEPTH);

        log::info!(
            "renderer initialized: {}x{} surface, {:?}, ring depth {FRAME_RING_DEPTH}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            ring,
            timeline,
            pipeline,
            slot_layout,
            surface,
            config,
            gpu,
            spin_speed,
            rotation_turns: 0.0,
        })
    }

    /// One rendered frame: admit, acquire, record, submit, present, signal.
    pub fn draw_frame(&mut self, dt: f32) -> Result<()> {
        // Admit: claim the next index and wait out the frame that last used
        // this ring slot. The first FRAME_RING_DEPTH frames have no such
        // predecessor and never wait.
        let frame = self.timeline.advance();
        if let Some(target) = self.timeline.reuse_target(frame) {
            self.wait_gpu(target)?;
        }

        // Acquire the presentation target. The platform rotates buffers on
        // its own schedule; a stale surface is reconfigured and the frame is
        // skipped rather than failed.
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::warn!("surface stale at frame {frame}, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                self.submit_empty(frame);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquire timed out at frame {frame}");
                self.submit_empty(frame);
                return Ok(());
            }
            Err(e) => return Err(Error::Surface(e)),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let slot = self.ring.slot(slot_index(frame, self.ring.depth()));

        // Pose + transform upload into the admitted slot's uniform buffer.
        self.rotation_turns = math::wrap_turns(self.rotation_turns + self.spin_speed * dt);
        let aspect = self.config.width as f32 / self.config.height as f32;
        slot.write(
            self.gpu.queue(),
            ShaderMatrices {
                clip_from_local: math::clip_from_local(self.rotation_turns, aspect)
                    .to_cols_array_2d(),
            },
        );

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_viewport(
                0.0,
                0.0,
                self.config.width as f32,
                self.config.height as f32,
                0.0,
                1.0,
            );
            pass.set_scissor_rect(0, 0, self.config.width, self.config.height);
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, slot.bind_group(), &[]);
            pass.draw(0..CUBE_VERTEX_COUNT, 0..1);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.gpu
            .queue()
            .on_submitted_work_done(self.timeline.signaler(frame));
        surface_texture.present();

        log::trace!("frame {frame} submitted");
        Ok(())
    }

    /// Tear down and rebuild everything that depends on the surface size.
    /// The timeline is drained first so no slot is in flight, but its
    /// counter is NOT reset: frame numbering is continuous across resizes.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            // Minimized; keep the old configuration.
            return Ok(());
        }

        self.drain()?;

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);
        self.ring = FrameRing::new(self.gpu.device(), &self.slot_layout, FRAME_RING_DEPTH);

        log::info!("surface resized to {width}x{height}");
        Ok(())
    }

    /// Wait for every admitted frame to complete. Called before resize
    /// teardown and on shutdown.
    pub fn drain(&self) -> Result<()> {
        if let Some(last) = self.timeline.last_admitted() {
            self.wait_gpu(last)?;
        }
        Ok(())
    }

    /// Block until the timeline reports `frame` complete, driving completion
    /// callbacks through blocking device maintenance. Each iteration parks
    /// in the driver until some submission finishes; an empty queue with the
    /// target still unsignaled means the device will never deliver it.
    fn wait_gpu(&self, frame: u64) -> Result<()> {
        while !self.timeline.is_complete(frame) {
            if matches!(self.gpu.poll_wait()?, wgpu::PollStatus::QueueEmpty)
                && !self.timeline.is_complete(frame)
            {
                return Err(Error::DeviceLost(format!(
                    "frame {frame} was never signaled"
                )));
            }
        }
        Ok(())
    }

    /// A skipped frame (stale surface, acquire timeout) still claimed an
    /// index, so its completion must flow through the GPU in submission
    /// order or a later admission would wait forever.
    fn submit_empty(&self, frame: u64) {
        let encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Empty Frame Encoder"),
            });
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.gpu
            .queue()
            .on_submitted_work_done(self.timeline.signaler(frame));
    }

    fn surface_config(
        surface: &wgpu::Surface<'_>,
        gpu: &GpuContext,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // Vsync pacing: throttle presentation to display refresh.
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: FRAME_RING_DEPTH as u32,
        }
    }

    fn create_slot_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Slot Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ShaderMatrices>() as u64
                    ),
                },
                count: None,
            }],
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        slot_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("cube.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[slot_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                // The generated cube winds clockwise seen from outside.
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
