//! The estimator falls back to unit pixel scale with a logged warning when
//! neither an explicit scale nor an image scale is available.

use corrfield::{CorrelationFunction, Image};
use log::{LevelFilter, Metadata, Record};
use ndarray::Array2;
use once_cell::sync::Lazy;
use std::sync::Mutex;

static MESSAGES: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(Vec::new()));

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        MESSAGES
            .lock()
            .unwrap()
            .push(format!("{}: {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

#[test]
fn unset_scale_defaults_to_unit_with_warning() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Warn);

    let data = Array2::from_shape_fn((4, 4), |(i, j)| (i * 4 + j) as f64);
    let image = Image::new(data, 0.0);
    let cf = CorrelationFunction::from_image(&image, 0.0, None).unwrap();

    assert_eq!(cf.profile().scale(), 1.0);

    let messages = MESSAGES.lock().unwrap();
    assert!(
        messages
            .iter()
            .any(|m| m.starts_with("WARN") && m.contains("assuming unit scale")),
        "expected a scale-fallback warning, got: {messages:?}"
    );
}

#[test]
fn explicit_scale_suppresses_fallback() {
    let data = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64);
    let image = Image::new(data, 0.0);
    let cf = CorrelationFunction::from_image(&image, 0.25, None).unwrap();
    assert_eq!(cf.profile().scale(), 0.25);
}
