//! Microphone capture via cpal.
//!
//! The input stream runs at the device's native rate and channel count. Each
//! callback is down-mixed to mono and appended to a shared buffer; once the
//! stop signal fires the whole take is resampled to the target rate in one
//! pass. cpal streams are not `Send` on every host, so the stream lives on a
//! blocking thread for its whole lifetime.

use tokio::sync::oneshot;

use crate::error::{Result, VoiceError};

/// Records one utterance from an input device.
#[derive(Debug, Clone)]
pub struct Recorder {
    device_name: Option<String>,
    sample_rate: u32,
}

impl Recorder {
    /// Recorder for the named device (`None` = system default) producing
    /// mono audio at `sample_rate`.
    pub fn new(device_name: Option<String>, sample_rate: u32) -> Self {
        Self {
            device_name,
            sample_rate,
        }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Capture until `stop` fires (or its sender is dropped).
    ///
    /// Returns mono f32 samples at [`sample_rate`](Self::sample_rate).
    pub async fn record(&self, stop: oneshot::Receiver<()>) -> Result<Vec<f32>> {
        let device_name = self.device_name.clone();
        let target_rate = self.sample_rate;
        tokio::task::spawn_blocking(move || native::record_blocking(device_name, target_rate, stop))
            .await
            .map_err(|e| VoiceError::Stream(format!("capture task failed: {e}")))?
    }
}

/// Names of the available input devices.
pub fn list_devices() -> Vec<String> {
    native::list_devices()
}

#[cfg(feature = "capture")]
mod native {
    use std::sync::{Arc, Mutex};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, SampleFormat, SizedSample, Stream, StreamConfig};
    use tokio::sync::oneshot;
    use tracing::{debug, error, info};

    use crate::dsp::{resample_linear, to_mono};
    use crate::error::{Result, VoiceError};

    type Shared = Arc<Mutex<Vec<f32>>>;

    pub(super) fn list_devices() -> Vec<String> {
        let host = cpal::default_host();
        let mut names = Vec::new();
        if let Ok(devices) = host.input_devices() {
            for dev in devices {
                if let Ok(name) = dev.name() {
                    names.push(name);
                }
            }
        }
        names
    }

    fn resolve_device(device_name: Option<&str>) -> Result<Device> {
        let host = cpal::default_host();
        let device = match device_name {
            Some(name) => host
                .input_devices()
                .map_err(|e| VoiceError::NoDevice(format!("failed to enumerate devices: {e}")))?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| VoiceError::NoDevice(format!("input device not found: {name}")))?,
            None => host
                .default_input_device()
                .ok_or_else(|| VoiceError::NoDevice("no default input device available".into()))?,
        };
        info!(device = %device.name().unwrap_or_else(|_| "unknown".into()), "selected input device");
        Ok(device)
    }

    fn build<T: SizedSample>(
        device: &Device,
        config: &StreamConfig,
        buffer: Shared,
        convert: fn(T) -> f32,
    ) -> Result<Stream> {
        let channels = config.channels;
        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data.iter().map(|&s| convert(s)).collect();
                    let mono = to_mono(&floats, channels);
                    if let Ok(mut guard) = buffer.lock() {
                        guard.extend_from_slice(&mono);
                    }
                },
                |err| error!(error = %err, "audio input stream error"),
                None,
            )
            .map_err(|e| VoiceError::Stream(format!("failed to build input stream: {e}")))
    }

    pub(super) fn record_blocking(
        device_name: Option<String>,
        target_rate: u32,
        stop: oneshot::Receiver<()>,
    ) -> Result<Vec<f32>> {
        let device = resolve_device(device_name.as_deref())?;
        let default = device
            .default_input_config()
            .map_err(|e| VoiceError::Stream(format!("failed to get input config: {e}")))?;
        let native_rate = default.sample_rate().0;
        let format = default.sample_format();
        let config: StreamConfig = default.config();
        debug!(native_rate, channels = config.channels, ?format, "input config");

        let buffer: Shared = Arc::new(Mutex::new(Vec::new()));
        let stream = match format {
            SampleFormat::F32 => build::<f32>(&device, &config, buffer.clone(), |s| s)?,
            SampleFormat::I16 => {
                build::<i16>(&device, &config, buffer.clone(), |s| s as f32 / 32_768.0)?
            }
            SampleFormat::U16 => build::<u16>(&device, &config, buffer.clone(), |s| {
                (s as f32 - 32_768.0) / 32_768.0
            })?,
            other => {
                return Err(VoiceError::Stream(format!(
                    "unsupported sample format: {other:?}"
                )));
            }
        };
        stream
            .play()
            .map_err(|e| VoiceError::Stream(format!("failed to start input stream: {e}")))?;
        info!("recording started");

        // A dropped sender also ends the take.
        let _ = stop.blocking_recv();
        drop(stream);

        let captured = buffer
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .map_err(|_| VoiceError::Stream("capture buffer poisoned".into()))?;
        info!(samples = captured.len(), native_rate, "recording finished");
        Ok(resample_linear(&captured, native_rate, target_rate))
    }
}

#[cfg(not(feature = "capture"))]
mod native {
    use tokio::sync::oneshot;
    use tracing::warn;

    use crate::error::{Result, VoiceError};

    pub(super) fn list_devices() -> Vec<String> {
        Vec::new()
    }

    pub(super) fn record_blocking(
        _device_name: Option<String>,
        _target_rate: u32,
        _stop: oneshot::Receiver<()>,
    ) -> Result<Vec<f32>> {
        warn!("microphone capture requested but the capture feature is disabled");
        Err(VoiceError::Unavailable(
            "microphone capture is not available (compile with --features capture)".into(),
        ))
    }
}
