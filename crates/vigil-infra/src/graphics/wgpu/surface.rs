// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An off-screen wgpu render surface.
//!
//! The host owns a device and a color target sized from a logical size and
//! the current pixel ratio. A device-lost callback turns GPU context loss
//! into a [`SurfaceSignal::Lost`] on the channel handed over at creation;
//! [`WgpuSurfaceHost::restore`] requests a fresh device and reports
//! [`SurfaceSignal::Restored`] on the same channel.

use super::conversions::{backend_name, physical_extent, sample_count, IntoWgpu};
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vigil_core::{FrameLoop, RenderSurface, SurfaceParams, SurfaceSignal};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Color target plus, when multisampling, its resolve target.
struct RenderTargets {
    color_view: wgpu::TextureView,
    resolve_view: Option<wgpu::TextureView>,
    extent: wgpu::Extent3d,
    sample_count: u32,
    format: wgpu::TextureFormat,
}

impl RenderTargets {
    fn new(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        params: &SurfaceParams,
        logical_size: (u32, u32),
    ) -> Self {
        let format = Self::color_format(adapter, params);
        let format_features = adapter.get_texture_format_features(format);
        let requested = sample_count(params.antialias);
        let sample_count = if format_features.flags.sample_count_supported(requested) {
            requested
        } else {
            1
        };
        let extent = physical_extent(
            logical_size,
            params.pixel_ratio,
            device.limits().max_texture_dimension_2d,
        );

        let create = |label: &'static str, samples: u32| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: samples,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let (color_view, resolve_view) = if sample_count > 1 {
            (
                create("Vigil Multisampled Color Target", sample_count),
                Some(create("Vigil Resolve Target", 1)),
            )
        } else {
            (create("Vigil Color Target", 1), None)
        };

        log::debug!(
            "Render targets created: {}x{} {format:?}, {sample_count} sample(s).",
            extent.width,
            extent.height
        );
        Self {
            color_view,
            resolve_view,
            extent,
            sample_count,
            format,
        }
    }

    /// The precision-derived format, or a plain 8-bit format if the adapter
    /// cannot render to it.
    fn color_format(adapter: &wgpu::Adapter, params: &SurfaceParams) -> wgpu::TextureFormat {
        let preferred: wgpu::TextureFormat = params.precision.into_wgpu();
        let allowed = adapter.get_texture_format_features(preferred).allowed_usages;
        if allowed.contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
            preferred
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

/// One device generation. Replaced wholesale on restore.
struct GpuContext {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    targets: RenderTargets,
    /// Set by the device-lost callback.
    lost: Arc<AtomicBool>,
    /// Set when the host drops this generation on purpose, silencing the callback.
    retired: Arc<AtomicBool>,
}

impl GpuContext {
    fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }

    fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }
}

/// A wgpu device rendering into an off-screen target.
pub struct WgpuSurfaceHost {
    instance: wgpu::Instance,
    logical_size: (u32, u32),
    params: SurfaceParams,
    frame_loop: FrameLoop,
    signals: flume::Sender<SurfaceSignal>,
    context: Option<GpuContext>,
    frames_submitted: u64,
}

impl WgpuSurfaceHost {
    /// Creates the surface, blocking until a device is ready.
    pub fn new(
        params: &SurfaceParams,
        logical_size: (u32, u32),
        signals: flume::Sender<SurfaceSignal>,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let context = Self::create_context(&instance, params, logical_size, &signals, None)?;
        Ok(Self {
            instance,
            logical_size,
            params: *params,
            frame_loop: FrameLoop::Always,
            signals,
            context: Some(context),
            frames_submitted: 0,
        })
    }

    fn create_context(
        instance: &wgpu::Instance,
        params: &SurfaceParams,
        logical_size: (u32, u32),
        signals: &flume::Sender<SurfaceSignal>,
        reuse_adapter: Option<wgpu::Adapter>,
    ) -> Result<GpuContext> {
        let adapter = match reuse_adapter {
            Some(adapter) => adapter,
            None => pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: params.power_preference.into_wgpu(),
                compatible_surface: None,
                force_fallback_adapter: false,
            }))
            .map_err(|e| anyhow!("Failed to find a suitable adapter: {}", e))?,
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Vigil Render Device"),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Failed to create logical device: {}", e))?;

        let lost = Arc::new(AtomicBool::new(false));
        let retired = Arc::new(AtomicBool::new(false));
        {
            let lost = Arc::clone(&lost);
            let retired = Arc::clone(&retired);
            let sender = signals.clone();
            device.set_device_lost_callback(move |reason, message| {
                if retired.load(Ordering::Acquire) {
                    return;
                }
                lost.store(true, Ordering::Release);
                log::warn!("GPU device lost ({reason:?}): {message}");
                let signal = SurfaceSignal::Lost {
                    reason: format!("{reason:?}: {message}"),
                };
                if sender.send(signal).is_err() {
                    log::debug!("Device loss reported after the surface owner went away.");
                }
            });
        }

        let targets = RenderTargets::new(&adapter, &device, params, logical_size);
        let info = adapter.get_info();
        log::info!(
            "Render device ready on \"{}\" ({}).",
            info.name,
            backend_name(info.backend)
        );

        Ok(GpuContext {
            adapter,
            device,
            queue,
            targets,
            lost,
            retired,
        })
    }

    /// Requests a fresh device after a loss and reports the restore.
    ///
    /// Does nothing if the current device is healthy.
    pub fn restore(&mut self) -> Result<()> {
        if self.context.as_ref().is_some_and(|c| !c.is_lost()) {
            return Ok(());
        }
        let adapter = self.context.take().map(|old| {
            old.retire();
            old.adapter
        });
        let context = Self::create_context(
            &self.instance,
            &self.params,
            self.logical_size,
            &self.signals,
            adapter,
        )?;
        self.context = Some(context);
        self.signals
            .send(SurfaceSignal::Restored)
            .map_err(|_| anyhow!("Surface owner is gone; restore not delivered"))?;
        Ok(())
    }

    /// Destroys the current device as the platform would under memory pressure.
    ///
    /// The loss is reported on the signal channel before this returns.
    pub fn simulate_context_loss(&mut self) {
        let Some(context) = self.context.as_ref() else {
            return;
        };
        if context.is_lost() {
            return;
        }
        // Report once, synchronously; the callback is silenced for this generation.
        context.lost.store(true, Ordering::Release);
        context.retire();
        context.device.destroy();
        if self
            .signals
            .send(SurfaceSignal::Lost {
                reason: "device destroyed (simulated)".into(),
            })
            .is_err()
        {
            log::debug!("Simulated loss not delivered; surface owner is gone.");
        }
    }

    /// `true` while the device is lost or absent.
    pub fn is_context_lost(&self) -> bool {
        self.context.as_ref().map_or(true, GpuContext::is_lost)
    }

    /// Frames submitted over the host's lifetime.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Parameters of the most recent (re)creation.
    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Physical size and sample count of the current color target.
    pub fn target_info(&self) -> Option<(u32, u32, u32)> {
        self.context.as_ref().map(|c| {
            (
                c.targets.extent.width,
                c.targets.extent.height,
                c.targets.sample_count,
            )
        })
    }

    /// Changes the logical size and rebuilds the targets.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize request to zero dimensions: {width}x{height}");
            return;
        }
        self.logical_size = (width, height);
        if let Some(context) = self.context.as_mut().filter(|c| !c.is_lost()) {
            context.targets =
                RenderTargets::new(&context.adapter, &context.device, &self.params, (width, height));
        }
    }
}

impl RenderSurface for WgpuSurfaceHost {
    fn submit_frame(&mut self) {
        if self.frame_loop == FrameLoop::Never {
            log::warn!("Frame submitted while the render loop is suspended; skipped.");
            return;
        }
        let Some(context) = self.context.as_ref().filter(|c| !c.is_lost()) else {
            return;
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Vigil Frame Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vigil Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &context.targets.color_view,
                    resolve_target: context.targets.resolve_view.as_ref(),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        context.queue.submit(std::iter::once(encoder.finish()));
        self.frames_submitted += 1;
    }

    fn recreate(&mut self, params: &SurfaceParams) {
        let power_changed = params.power_preference != self.params.power_preference;
        self.params = *params;

        if let Some(context) = self.context.as_mut() {
            if !context.is_lost() && !power_changed {
                context.targets = RenderTargets::new(
                    &context.adapter,
                    &context.device,
                    &self.params,
                    self.logical_size,
                );
                return;
            }
        }

        // Lost, released, or a different adapter is wanted: start a new generation.
        let previous = self.context.take().map(|old| {
            old.retire();
            old.adapter
        });
        let adapter = if power_changed { None } else { previous };
        match Self::create_context(
            &self.instance,
            &self.params,
            self.logical_size,
            &self.signals,
            adapter,
        ) {
            Ok(context) => self.context = Some(context),
            Err(e) => log::error!("Failed to recreate render surface: {e:#}"),
        }
    }

    fn set_frame_loop(&mut self, frame_loop: FrameLoop) {
        self.frame_loop = frame_loop;
    }

    fn release(&mut self) {
        if let Some(context) = self.context.take() {
            context.retire();
            log::debug!("Render device released.");
        }
    }

    fn describe(&self) -> String {
        match &self.context {
            Some(context) => {
                let info = context.adapter.get_info();
                format!(
                    "wgpu {} on \"{}\", {:?} {}x",
                    backend_name(info.backend),
                    info.name,
                    context.targets.format,
                    context.targets.sample_count
                )
            }
            None => "wgpu off-screen surface (no device)".to_string(),
        }
    }
}

impl Drop for WgpuSurfaceHost {
    fn drop(&mut self) {
        self.release();
    }
}
