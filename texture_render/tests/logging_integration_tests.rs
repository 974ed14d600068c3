//! Integration tests for logging around offscreen rendering
//!
//! These tests verify that construction failures and misuse of the
//! begin/end protocol are reported through the installed logger.
//!
//! Run with: cargo test --test logging_integration_tests


use serial_test::serial;
use texture_render::rtt::OffscreenRenderTarget;
use texture_render::rtt::log::{self, LogSeverity};
use texture_render_device_cpu::{CpuContext, CpuDevice};
use cpu_test_utils::CaptureLogger;

#[test]
#[serial]
fn test_integration_construction_failure_is_logged() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let device = CpuDevice::default();
    device.fail_after(Some(3));
    let result = OffscreenRenderTarget::new(&device, 64, 64, false);
    assert!(result.is_err());

    {
        let captured = entries.lock().unwrap();

        // Backend reports the exhausted allocation
        let backend = captured.iter()
            .find(|e| e.source == "rtt::cpu" && e.severity == LogSeverity::Error)
            .expect("backend error entry");
        assert!(backend.message.contains("depth/stencil") || backend.message.contains("texture"));

        // Target reports which step failed, with its location
        let target = captured.iter()
            .find(|e| e.source == "rtt::OffscreenRenderTarget" && e.severity == LogSeverity::Error)
            .expect("target error entry");
        assert!(target.message.contains("depth/stencil texture"));
        assert!(target.file.is_some());
        assert!(target.line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_end_without_begin_warns() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let device = CpuDevice::default();
    let mut context = CpuContext::new();
    let mut target = OffscreenRenderTarget::new(&device, 16, 16, false).unwrap();
    target.end(&mut context);

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|e| {
            e.source == "rtt::OffscreenRenderTarget"
                && e.severity == LogSeverity::Warn
                && e.message.contains("without a matching begin()")
        }));
    }
    assert_eq!(context.command_count("set_render_targets"), 0);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_drop_while_rendering_warns() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let device = CpuDevice::default();
    let mut context = CpuContext::new();
    let mut target = OffscreenRenderTarget::new(&device, 16, 16, false).unwrap();
    target.begin(&mut context);
    drop(target);

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Warn && e.message.contains("dropped while rendering")));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_successful_cycle_has_no_warnings() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let device = CpuDevice::default();
    let mut context = CpuContext::new();
    let mut target = OffscreenRenderTarget::new(&device, 16, 16, true).unwrap();
    target.begin(&mut context);
    target.end(&mut context);

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().all(|e| e.severity < LogSeverity::Warn));
        assert!(captured.iter().any(|e| e.source == "rtt::OffscreenRenderTarget" && e.severity == LogSeverity::Debug));
    }

    log::reset_logger();
}
