//! Unit tests for texture.rs and view.rs descriptors
//!
//! Tests format sizes, mip chain computation and mip range resolution.

use crate::device::{TextureFormat, TextureUsage, TextureInfo, MipmapMode, MipRange};

// ============================================================================
// FORMATS
// ============================================================================

#[test]
fn test_every_format_is_four_bytes() {
    for format in [
        TextureFormat::R8G8B8A8_UNORM,
        TextureFormat::R8G8B8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM,
        TextureFormat::D24_UNORM_S8_UINT,
        TextureFormat::D32_FLOAT,
    ] {
        assert_eq!(format.bytes_per_pixel(), 4, "{:?}", format);
    }
}

#[test]
fn test_texture_format_depth_and_stencil() {
    assert!(!TextureFormat::R8G8B8A8_UNORM.is_depth());
    assert!(TextureFormat::D24_UNORM_S8_UINT.is_depth());
    assert!(TextureFormat::D24_UNORM_S8_UINT.has_stencil());
    assert!(TextureFormat::D32_FLOAT.is_depth());
    assert!(!TextureFormat::D32_FLOAT.has_stencil());
}

#[test]
fn test_texture_usage_flags_combine() {
    let usage = TextureUsage::RENDER_TARGET | TextureUsage::SAMPLED;
    assert!(usage.contains(TextureUsage::RENDER_TARGET));
    assert!(usage.contains(TextureUsage::SAMPLED));
    assert!(!usage.contains(TextureUsage::DEPTH_STENCIL));
}

// ============================================================================
// MIPMAP MODE
// ============================================================================

#[test]
fn test_single_level_mode() {
    let mode = MipmapMode::None;
    assert_eq!(mode.mip_levels(4096, 16), 1);
    assert!(!mode.is_generated());
}

#[test]
fn test_generated_mode_builds_full_chain() {
    let mode = MipmapMode::Generate { max_levels: None };
    assert!(mode.is_generated());

    // 512 -> 256 -> ... -> 1
    assert_eq!(mode.mip_levels(512, 512), 10);
    assert_eq!(mode.mip_levels(1, 1), 1);
    assert_eq!(mode.mip_levels(2, 1), 2);

    // Largest side decides, non powers of two round down
    assert_eq!(mode.mip_levels(3, 800), 10);
    assert_eq!(mode.mip_levels(300, 200), 9);
    assert_eq!(mode.mip_levels(1024, 16), 11);
}

#[test]
fn test_generated_mode_level_cap() {
    assert_eq!(MipmapMode::Generate { max_levels: Some(3) }.mip_levels(512, 512), 3);
    assert_eq!(MipmapMode::Generate { max_levels: Some(0) }.mip_levels(512, 512), 1);
    // A cap longer than the chain changes nothing
    assert_eq!(MipmapMode::Generate { max_levels: Some(32) }.mip_levels(8, 2), 4);
}

#[test]
fn test_mipmap_mode_max_mip_levels() {
    // floor(log2(max(w, h))) + 1
    assert_eq!(MipmapMode::max_mip_levels(1, 1), 1);
    assert_eq!(MipmapMode::max_mip_levels(2, 1), 2);
    assert_eq!(MipmapMode::max_mip_levels(255, 255), 8);
    assert_eq!(MipmapMode::max_mip_levels(256, 256), 9);
    assert_eq!(MipmapMode::max_mip_levels(1024, 512), 11);
    assert_eq!(MipmapMode::max_mip_levels(16384, 16384), 15);
}

// ============================================================================
// TEXTURE INFO / MIP RANGE
// ============================================================================

#[test]
fn test_texture_info_mip_size() {
    let info = TextureInfo {
        width: 512,
        height: 128,
        format: TextureFormat::R8G8B8A8_UNORM,
        usage: TextureUsage::SAMPLED,
        mip_levels: 10,
        samples: 1,
        generates_mips: true,
    };

    assert_eq!(info.mip_size(0), (512, 128));
    assert_eq!(info.mip_size(2), (128, 32));
    // Height clamps to 1 before width does
    assert_eq!(info.mip_size(8), (2, 1));
    assert_eq!(info.mip_size(9), (1, 1));
}

#[test]
fn test_mip_range_resolve() {
    assert_eq!(MipRange::All.resolve(0, 10), 10);
    assert_eq!(MipRange::All.resolve(0, 1), 1);
    assert_eq!(MipRange::All.resolve(3, 10), 7);
    assert_eq!(MipRange::Count(4).resolve(0, 10), 4);
    assert_eq!(MipRange::Count(4).resolve(8, 10), 2);
    assert_eq!(MipRange::All.resolve(12, 10), 0);
}
