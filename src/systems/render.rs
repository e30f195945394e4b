//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Shadow and mesh pipelines
//! - Frame rendering
//!
//! After [`SceneRenderer::detach`] the GPU state is dropped and every further
//! call is a no-op or an error.

use std::sync::Arc;

use skyline_render::{
    pipeline::{MeshPipeline, ShadowPipeline},
    scene_uniforms, ContextError, Environment, FramePlan, GeometryKey, GpuScene, Lighting,
    PerspectiveCamera, RenderContext, RenderError, SceneGraph, SceneRenderer,
};
use winit::window::Window;

use crate::config::RenderingConfig;

/// GPU state that exists only while attached to the window
struct Attached {
    context: RenderContext,
    mesh_pipeline: MeshPipeline,
    shadow_pipeline: ShadowPipeline,
    gpu_scene: GpuScene,
}

/// Manages GPU rendering
pub struct RenderSystem {
    attached: Option<Attached>,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(window: Arc<Window>, config: &RenderingConfig, vsync: bool) -> Result<Self, ContextError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let mut mesh_pipeline = MeshPipeline::new(&context.device, context.format());
        let shadow_pipeline = ShadowPipeline::new(
            &context.device,
            mesh_pipeline.uniform_buffer(),
            config.shadow_map_size,
        );
        mesh_pipeline.bind_shadow_map(&context.device, shadow_pipeline.view(), shadow_pipeline.sampler());
        mesh_pipeline.ensure_depth_texture(&context.device, context.size.width, context.size.height);

        let gpu_scene = GpuScene::new(&context.device);

        log::info!(
            "Render system ready: {}x{}, {:?}, shadow map {}",
            context.size.width,
            context.size.height,
            context.format(),
            shadow_pipeline.size()
        );

        Ok(Self {
            attached: Some(Attached {
                context,
                mesh_pipeline,
                shadow_pipeline,
                gpu_scene,
            }),
        })
    }
}

impl SceneRenderer for RenderSystem {
    fn render(
        &mut self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        environment: &Environment,
    ) -> Result<(), RenderError> {
        let Some(Attached {
            context,
            mesh_pipeline,
            shadow_pipeline,
            gpu_scene,
        }) = self.attached.as_mut()
        else {
            return Err(RenderError::Other("renderer is detached".into()));
        };

        let lighting = Lighting::from_graph(graph);
        let plan = FramePlan::build(graph, camera.position);

        gpu_scene.prepare(&context.device, graph, plan.geometries());
        gpu_scene.write_instances(&context.device, &context.queue, &plan.instances);

        if let Some(sun) = lighting.sun.filter(|s| s.shadow_map_size > 0) {
            if shadow_pipeline.ensure_size(&context.device, sun.shadow_map_size) {
                mesh_pipeline.bind_shadow_map(&context.device, shadow_pipeline.view(), shadow_pipeline.sampler());
            }
        }

        let uniforms = scene_uniforms(camera, &lighting, environment);
        mesh_pipeline.update_uniforms(&context.queue, &uniforms);

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                let err = RenderError::from(e);
                if err == RenderError::SurfaceLost {
                    context.reconfigure();
                }
                return Err(err);
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if lighting.has_shadows() {
            shadow_pipeline.render(&mut encoder, gpu_scene, &plan.shadow_casters);
        }

        let bg = environment.background;
        mesh_pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg.r as f64,
                g: bg.g as f64,
                b: bg.b as f64,
                a: 1.0,
            },
            gpu_scene,
            &plan.opaque,
            &plan.transparent,
        )?;

        context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let Some(attached) = self.attached.as_mut() else { return };
        attached
            .context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        attached
            .mesh_pipeline
            .ensure_depth_texture(&attached.context.device, width, height);
    }

    fn release(&mut self, geometries: &[GeometryKey]) -> usize {
        self.attached
            .as_mut()
            .map_or(0, |a| a.gpu_scene.release(geometries))
    }

    fn detach(&mut self) {
        if let Some(mut attached) = self.attached.take() {
            let released = attached.gpu_scene.release_all();
            log::info!("Render system detached, released {} GPU meshes", released);
        }
    }
}
