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

//! Conversions between the resilience vocabulary and wgpu types.

use std::collections::BTreeMap;
use vigil_core::{FeatureLevel, PowerPreference, ShaderPrecision};

/// Sample count requested when antialiasing is on.
pub const MSAA_SAMPLES: u32 = 4;

/// A local extension trait to convert our types into wgpu types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a wgpu-compatible type.
    fn into_wgpu(self) -> T;
}

impl IntoWgpu<wgpu::PowerPreference> for PowerPreference {
    fn into_wgpu(self) -> wgpu::PowerPreference {
        match self {
            PowerPreference::Default => wgpu::PowerPreference::None,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
        }
    }
}

impl IntoWgpu<wgpu::Backends> for FeatureLevel {
    fn into_wgpu(self) -> wgpu::Backends {
        match self {
            FeatureLevel::Extended => wgpu::Backends::PRIMARY,
            FeatureLevel::Baseline => wgpu::Backends::SECONDARY,
        }
    }
}

impl IntoWgpu<wgpu::Limits> for FeatureLevel {
    fn into_wgpu(self) -> wgpu::Limits {
        match self {
            FeatureLevel::Extended => wgpu::Limits::default(),
            FeatureLevel::Baseline => wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

impl IntoWgpu<wgpu::TextureFormat> for ShaderPrecision {
    fn into_wgpu(self) -> wgpu::TextureFormat {
        match self {
            ShaderPrecision::High => wgpu::TextureFormat::Rgba16Float,
            ShaderPrecision::Medium => wgpu::TextureFormat::Rgba8UnormSrgb,
            ShaderPrecision::Low => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Returns a human-readable name for a backend.
pub fn backend_name(backend: wgpu::Backend) -> &'static str {
    match backend {
        wgpu::Backend::Vulkan => "Vulkan",
        wgpu::Backend::Metal => "Metal",
        wgpu::Backend::Dx12 => "DirectX 12",
        wgpu::Backend::Gl => "OpenGL",
        wgpu::Backend::BrowserWebGpu => "WebGPU",
        wgpu::Backend::Noop => "No-op",
    }
}

/// Maps a PCI vendor id to a vendor name, falling back to the hex id.
pub fn vendor_name(vendor_id: u32) -> String {
    let name = match vendor_id {
        0x10DE => "NVIDIA",
        0x1002 | 0x1022 => "AMD",
        0x8086 => "Intel",
        0x106B => "Apple",
        0x13B5 => "ARM",
        0x5143 => "Qualcomm",
        0x1010 => "Imagination Technologies",
        0x10005 => "Mesa",
        0 => return String::new(),
        other => return format!("0x{other:04x}"),
    };
    name.to_string()
}

/// Number of samples for the color target.
pub fn sample_count(antialias: bool) -> u32 {
    if antialias {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// Physical size of a target whose logical size is `logical` at `pixel_ratio`,
/// clamped to `[1, max_dimension]` on each axis.
pub fn physical_extent(logical: (u32, u32), pixel_ratio: f32, max_dimension: u32) -> wgpu::Extent3d {
    let scale = |v: u32| -> u32 {
        let scaled = (v as f32 * pixel_ratio).round();
        if scaled.is_finite() && scaled >= 1.0 {
            (scaled as u32).min(max_dimension.max(1))
        } else {
            1
        }
    };
    wgpu::Extent3d {
        width: scale(logical.0),
        height: scale(logical.1),
        depth_or_array_layers: 1,
    }
}

/// The numeric limits recorded in a capability snapshot.
pub fn limits_map(limits: &wgpu::Limits) -> BTreeMap<String, f64> {
    [
        ("max_texture_dimension_1d", limits.max_texture_dimension_1d as f64),
        ("max_texture_dimension_2d", limits.max_texture_dimension_2d as f64),
        ("max_texture_dimension_3d", limits.max_texture_dimension_3d as f64),
        ("max_texture_array_layers", limits.max_texture_array_layers as f64),
        ("max_bind_groups", limits.max_bind_groups as f64),
        ("max_vertex_buffers", limits.max_vertex_buffers as f64),
        ("max_vertex_attributes", limits.max_vertex_attributes as f64),
        ("max_samplers_per_shader_stage", limits.max_samplers_per_shader_stage as f64),
        (
            "max_uniform_buffer_binding_size",
            limits.max_uniform_buffer_binding_size as f64,
        ),
        (
            "max_storage_buffer_binding_size",
            limits.max_storage_buffer_binding_size as f64,
        ),
        ("max_color_attachments", limits.max_color_attachments as f64),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name_function() {
        assert_eq!(backend_name(wgpu::Backend::Vulkan), "Vulkan");
        assert_eq!(backend_name(wgpu::Backend::Metal), "Metal");
        assert_eq!(backend_name(wgpu::Backend::Dx12), "DirectX 12");
        assert_eq!(backend_name(wgpu::Backend::Gl), "OpenGL");
    }

    #[test]
    fn test_power_preference_conversion() {
        let low: wgpu::PowerPreference = PowerPreference::LowPower.into_wgpu();
        assert_eq!(low, wgpu::PowerPreference::LowPower);
        let default: wgpu::PowerPreference = PowerPreference::Default.into_wgpu();
        assert_eq!(default, wgpu::PowerPreference::None);
    }

    #[test]
    fn test_feature_levels_map_to_backends_and_limits() {
        let extended: wgpu::Backends = FeatureLevel::Extended.into_wgpu();
        let baseline: wgpu::Backends = FeatureLevel::Baseline.into_wgpu();
        assert_eq!(extended, wgpu::Backends::PRIMARY);
        assert!(baseline.contains(wgpu::Backends::GL));

        let baseline_limits: wgpu::Limits = FeatureLevel::Baseline.into_wgpu();
        let extended_limits: wgpu::Limits = FeatureLevel::Extended.into_wgpu();
        assert!(
            baseline_limits.max_texture_dimension_2d <= extended_limits.max_texture_dimension_2d
        );
    }

    #[test]
    fn test_vendor_names() {
        assert_eq!(vendor_name(0x10DE), "NVIDIA");
        assert_eq!(vendor_name(0x8086), "Intel");
        assert_eq!(vendor_name(0xABCD), "0xabcd");
        assert_eq!(vendor_name(0), "");
    }

    #[test]
    fn test_sample_count_follows_antialias() {
        assert_eq!(sample_count(true), 4);
        assert_eq!(sample_count(false), 1);
    }

    #[test]
    fn test_physical_extent_scales_and_clamps() {
        let extent = physical_extent((800, 600), 2.0, 8192);
        assert_eq!((extent.width, extent.height), (1600, 1200));

        let extent = physical_extent((800, 600), 0.5, 8192);
        assert_eq!((extent.width, extent.height), (400, 300));

        let extent = physical_extent((4000, 10), 1.0, 2048);
        assert_eq!((extent.width, extent.height), (2048, 10));

        let extent = physical_extent((0, 600), f32::NAN, 2048);
        assert_eq!((extent.width, extent.height), (1, 1));
        assert_eq!(extent.depth_or_array_layers, 1);
    }

    #[test]
    fn test_limits_map_records_texture_size() {
        let limits = wgpu::Limits::downlevel_webgl2_defaults();
        let map = limits_map(&limits);
        assert_eq!(
            map.get("max_texture_dimension_2d").copied(),
            Some(limits.max_texture_dimension_2d as f64)
        );
        assert!(map.contains_key("max_vertex_attributes"));
    }
}
