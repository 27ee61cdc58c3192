//! PublicationDriver - frame to wire-message conversion and fan-out

use std::sync::Arc;

use contracts::{CameraInfo, Frame, ImageMessage, ImageMetadata, ImagePublisher, MetadataPublisher};
use observability::BridgeMetrics;
use tracing::error;

/// Publication driver
///
/// Consumes dequeued frames and emits image + calibration + metadata
/// messages. The image copy is only made when the image topic has
/// subscribers; metadata is published independently so downstream exposure
/// controllers keep working without an image subscriber.
pub struct PublicationDriver {
    image: Arc<dyn ImagePublisher>,
    meta: Arc<dyn MetadataPublisher>,
    camera_info: CameraInfo,
    frame_id: String,
    metrics: Arc<BridgeMetrics>,
}

impl PublicationDriver {
    /// Create a new publication driver
    pub fn new(
        image: Arc<dyn ImagePublisher>,
        meta: Arc<dyn MetadataPublisher>,
        camera_info: CameraInfo,
        frame_id: impl Into<String>,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            image,
            meta,
            camera_info,
            frame_id: frame_id.into(),
            metrics,
        }
    }

    /// Publish one frame
    pub fn publish(&self, frame: &Frame) {
        let encoding = frame.pixel_format.wire_encoding();

        if self.image.subscriber_count() > 0 {
            match fill_image(frame, encoding, &self.frame_id) {
                Some(image) => {
                    let info = self.camera_info.stamped(frame.timestamp_ns);
                    self.image.publish(image, info);
                    self.metrics.record_published();
                }
                None => {
                    error!(
                        width = frame.width,
                        height = frame.height,
                        stride = frame.stride,
                        len = frame.data.len(),
                        "fill image failed"
                    );
                }
            }
        }

        if self.meta.subscriber_count() > 0 {
            self.meta.publish(ImageMetadata {
                frame_id: self.frame_id.clone(),
                stamp_ns: frame.timestamp_ns,
                brightness: frame.brightness,
                exposure_time_us: frame.exposure_time_us,
                max_exposure_time_us: frame.max_exposure_time_us,
                gain: frame.gain,
                camera_time_ns: frame.timestamp_ns,
            });
        }
    }
}

/// Build the outgoing image message, validating the payload size.
///
/// An unknown pixel format still produces a message (encoding "INVALID") so
/// the stream never stalls; a short payload does not.
fn fill_image(frame: &Frame, encoding: &str, frame_id: &str) -> Option<ImageMessage> {
    let expected = frame.stride as usize * frame.height as usize;
    if frame.data.len() < expected {
        return None;
    }

    Some(ImageMessage {
        frame_id: frame_id.to_string(),
        stamp_ns: frame.timestamp_ns,
        height: frame.height,
        width: frame.width,
        stride: frame.stride,
        encoding: encoding.to_string(),
        data: frame.data.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{CountingImageSink, CountingMetadataSink};
    use bytes::Bytes;
    use contracts::PixelFormat;

    fn make_frame(pixel_format: PixelFormat, data_len: usize) -> Frame {
        Frame {
            width: 4,
            height: 2,
            stride: 4,
            pixel_format,
            timestamp_ns: 1_000,
            brightness: 100,
            exposure_time_us: 5_000,
            max_exposure_time_us: 20_000,
            gain: 1.5,
            data: Bytes::from(vec![0u8; data_len]),
        }
    }

    fn make_driver(
        image: Arc<CountingImageSink>,
        meta: Arc<CountingMetadataSink>,
    ) -> (PublicationDriver, Arc<BridgeMetrics>) {
        let metrics = Arc::new(BridgeMetrics::new());
        let driver = PublicationDriver::new(
            image,
            meta,
            CameraInfo::default(),
            "camera",
            metrics.clone(),
        );
        (driver, metrics)
    }

    #[test]
    fn test_publish_image_and_metadata() {
        let image = Arc::new(CountingImageSink::with_subscribers(1));
        let meta = Arc::new(CountingMetadataSink::with_subscribers(1));
        let (driver, metrics) = make_driver(image.clone(), meta.clone());

        driver.publish(&make_frame(PixelFormat::Mono8, 8));

        assert_eq!(image.published(), 1);
        assert_eq!(meta.published(), 1);
        assert_eq!(metrics.published_count(), 1);

        let last = meta.last().unwrap();
        assert_eq!(last.exposure_time_us, 5_000);
        assert_eq!(last.camera_time_ns, 1_000);
    }

    #[test]
    fn test_no_image_subscriber_skips_copy_but_not_metadata() {
        let image = Arc::new(CountingImageSink::with_subscribers(0));
        let meta = Arc::new(CountingMetadataSink::with_subscribers(1));
        let (driver, metrics) = make_driver(image.clone(), meta.clone());

        driver.publish(&make_frame(PixelFormat::Mono8, 8));

        assert_eq!(image.published(), 0);
        assert_eq!(meta.published(), 1);
        assert_eq!(metrics.published_count(), 0);
    }

    #[test]
    fn test_invalid_format_still_emitted() {
        let image = Arc::new(CountingImageSink::with_subscribers(1));
        let meta = Arc::new(CountingMetadataSink::with_subscribers(0));
        let (driver, _) = make_driver(image.clone(), meta);

        driver.publish(&make_frame(PixelFormat::Invalid, 8));

        assert_eq!(image.published(), 1);
        assert_eq!(image.last().unwrap().encoding, "INVALID");
    }

    #[test]
    fn test_short_payload_not_emitted() {
        let image = Arc::new(CountingImageSink::with_subscribers(1));
        let meta = Arc::new(CountingMetadataSink::with_subscribers(0));
        let (driver, metrics) = make_driver(image.clone(), meta);

        driver.publish(&make_frame(PixelFormat::Mono8, 3));

        assert_eq!(image.published(), 0);
        assert_eq!(metrics.published_count(), 0);
    }
}
