use candle_core::Device;

/// Picks the tensor device: Metal when the feature is enabled and the
/// device initializes, CPU otherwise.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    if let Ok(dev) = Device::new_metal(0) {
        tracing::debug!("tensor device: Metal (MPS)");
        return dev;
    }
    tracing::debug!("tensor device: CPU");
    Device::Cpu
}
