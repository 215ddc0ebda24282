use facegate_camera::{CameraConfig, CameraError};
use facegate_image::ImageError;
use std::io;

#[test]
fn test_io_permission_denied_maps_to_permission_error() {
    let err: CameraError = io::Error::new(io::ErrorKind::PermissionDenied, "EACCES").into();
    assert!(matches!(err, CameraError::PermissionDenied(_)));
    assert!(err.to_string().starts_with("permission denied"));
}

#[test]
fn test_io_not_found_maps_to_not_found() {
    let err: CameraError = io::Error::new(io::ErrorKind::NotFound, "/dev/video9").into();
    assert!(matches!(err, CameraError::NotFound(ref msg) if msg.contains("/dev/video9")));
}

#[test]
fn test_other_io_maps_to_device() {
    let err: CameraError = io::Error::other("ioctl failed").into();
    assert!(matches!(err, CameraError::Device(_)));
    assert!(err.is_access_error());
}

#[test]
fn test_image_error_maps_to_decode() {
    let err: CameraError = ImageError::Decode("bad marker".to_string()).into();
    assert!(matches!(err, CameraError::Decode(_)));
    assert!(!CameraError::Stream("eof".to_string()).is_access_error());
}

#[test]
fn test_config_builder() {
    let config = CameraConfig::default()
        .with_device("/dev/video2")
        .with_width(1280)
        .with_height(720)
        .with_fps(15)
        .with_buffer_count(2)
        .with_mjpeg(false);

    assert_eq!(config.device(), std::path::Path::new("/dev/video2"));
    assert_eq!((config.width(), config.height()), (1280, 720));
    assert_eq!(config.fps(), 15);
    assert_eq!(config.buffer_count(), 2);
    assert!(!config.prefer_mjpeg());
}

#[test]
fn test_default_config_prefers_mjpeg() {
    let config = CameraConfig::default();
    assert_eq!(config.device(), std::path::Path::new("/dev/video0"));
    assert_eq!((config.width(), config.height(), config.fps()), (640, 480, 30));
    assert!(config.prefer_mjpeg());
}
